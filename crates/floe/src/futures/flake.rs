use core::{future::Future, time::Duration};

use crate::{Flake, FlakeGenerator, IdGenStatus, Result, futures::SleepProvider};

/// Extension trait for asynchronously generating flake identifiers.
///
/// This lets any [`FlakeGenerator`] yield identifiers in a `Future`-based
/// context: whenever the generator reports backpressure, the task sleeps (or
/// yields) through the given [`SleepProvider`] instead of spinning, so a
/// cooperative scheduler is never starved while the per-millisecond bound is
/// still enforced.
pub trait FlakeGeneratorAsyncExt {
    /// Returns a future that resolves to the next available identifier.
    ///
    /// If the generator is not ready to issue immediately, the future sleeps
    /// for the backoff the generator indicated and retries.
    ///
    /// # Errors
    ///
    /// Propagates [`Error::ClockMovedBackwards`] from generators configured
    /// with [`ClockPolicy::Fail`].
    ///
    /// [`Error::ClockMovedBackwards`]: crate::Error::ClockMovedBackwards
    /// [`ClockPolicy::Fail`]: crate::ClockPolicy::Fail
    fn try_next_async<S>(&self) -> impl Future<Output = Result<Flake>>
    where
        S: SleepProvider;
}

impl<G> FlakeGeneratorAsyncExt for G
where
    G: FlakeGenerator + Sync,
{
    fn try_next_async<S>(&self) -> impl Future<Output = Result<Flake>>
    where
        S: SleepProvider,
    {
        async {
            loop {
                let dur = match self.try_poll()? {
                    IdGenStatus::Ready { id } => return Ok(id),
                    IdGenStatus::Pending { yield_for } => Duration::from_millis(yield_for),
                };
                S::sleep_for(dur).await;
            }
        }
    }
}
