use core::future::Future;

use crate::{Flake, FlakeGenerator, Result, futures::SleepProvider};

/// An implementation of [`SleepProvider`] using Tokio's timer.
///
/// This is the default provider for use in async applications built on Tokio.
pub struct TokioSleep;
impl SleepProvider for TokioSleep {
    async fn sleep_for(dur: core::time::Duration) {
        tokio::time::sleep(dur).await
    }
}

/// An implementation of [`SleepProvider`] using Tokio's yield.
///
/// This strategy avoids timer-based delays by yielding to the scheduler
/// immediately, which can improve responsiveness in low-concurrency
/// scenarios.
///
/// However, it comes at the cost of more frequent rescheduling, which can
/// result in tighter polling loops and increased CPU usage under load. In
/// highly concurrent cases, a timer-based sleep (e.g., [`TokioSleep`]) is
/// often more efficient due to reduced scheduler churn.
pub struct TokioYield;
impl SleepProvider for TokioYield {
    async fn sleep_for(_dur: core::time::Duration) {
        tokio::task::yield_now().await
    }
}

/// Extension trait for asynchronously generating flake identifiers on the
/// [`tokio`](https://docs.rs/tokio) runtime.
///
/// Provides a convenience method that uses [`TokioSleep`] as the sleep
/// provider, so callers need not name a sleep strategy.
pub trait FlakeGeneratorAsyncTokioExt {
    /// Returns a future that resolves to the next available identifier using
    /// [`TokioSleep`].
    ///
    /// # Errors
    ///
    /// Returns an error if the underlying generator fails.
    fn try_next_async(&self) -> impl Future<Output = Result<Flake>>;
}

impl<G> FlakeGeneratorAsyncTokioExt for G
where
    G: FlakeGenerator + Sync,
{
    fn try_next_async(&self) -> impl Future<Output = Result<Flake>> {
        <Self as crate::futures::FlakeGeneratorAsyncExt>::try_next_async::<TokioSleep>(self)
    }
}
