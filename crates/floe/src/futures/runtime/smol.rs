use core::future::Future;

use smol::Timer;

use crate::{Flake, FlakeGenerator, Result, futures::SleepProvider};

/// An implementation of [`SleepProvider`] using Smol's timer.
///
/// This is the default provider for use in async applications built on Smol.
pub struct SmolSleep;
impl SleepProvider for SmolSleep {
    async fn sleep_for(dur: core::time::Duration) {
        Timer::after(dur).await;
    }
}

/// An implementation of [`SleepProvider`] using Smol's yield.
///
/// This strategy avoids timer-based delays by yielding to the scheduler
/// immediately, which can improve responsiveness in low-concurrency
/// scenarios.
///
/// However, it comes at the cost of more frequent rescheduling, which can
/// result in tighter polling loops and increased CPU usage under load. In
/// highly concurrent cases, a timer-based sleep (e.g., [`SmolSleep`]) is
/// often more efficient due to reduced scheduler churn.
pub struct SmolYield;
impl SleepProvider for SmolYield {
    async fn sleep_for(_dur: core::time::Duration) {
        smol::future::yield_now().await;
    }
}

/// Extension trait for asynchronously generating flake identifiers on the
/// [`smol`](https://docs.rs/smol) runtime.
///
/// Provides a convenience method that uses [`SmolSleep`] as the sleep
/// provider, so callers need not name a sleep strategy.
pub trait FlakeGeneratorAsyncSmolExt {
    /// Returns a future that resolves to the next available identifier using
    /// [`SmolSleep`].
    ///
    /// # Errors
    ///
    /// Returns an error if the underlying generator fails.
    fn try_next_async(&self) -> impl Future<Output = Result<Flake>>;
}

impl<G> FlakeGeneratorAsyncSmolExt for G
where
    G: FlakeGenerator + Sync,
{
    fn try_next_async(&self) -> impl Future<Output = Result<Flake>> {
        <Self as crate::futures::FlakeGeneratorAsyncExt>::try_next_async::<SmolSleep>(self)
    }
}
