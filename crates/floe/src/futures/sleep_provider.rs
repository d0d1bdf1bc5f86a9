use core::future::Future;
use core::time::Duration;

/// A trait that abstracts over how to sleep for a given [`Duration`] in async
/// contexts.
///
/// This allows identifier generation to be generic over runtimes like `Tokio`
/// or `Smol`.
pub trait SleepProvider {
    /// The returned future is `Send` so it can be safely moved across
    /// threads.
    fn sleep_for(dur: Duration) -> impl Future<Output = ()> + Send;
}
