use crate::Flake;

/// The outcome of a non-blocking attempt to generate an identifier.
///
/// - [`IdGenStatus::Ready`] carries a freshly minted identifier.
/// - [`IdGenStatus::Pending`] means the generator is throttled: either the
///   per-millisecond sequence space is exhausted, or the clock is behind the
///   last issued timestamp and the generator is configured to wait it out.
///
/// `Pending` lets callers pick their own backoff (spin, yield, or an async
/// sleep) instead of blocking inside the generator.
///
/// # Example
/// ```
/// use floe::{FixedWorkerId, GeneratorConfig, IdGenStatus, LockFlakeGenerator};
///
/// let generator = LockFlakeGenerator::new(FixedWorkerId(0), GeneratorConfig::default()).unwrap();
///
/// let id = loop {
///     match generator.try_poll().unwrap() {
///         IdGenStatus::Ready { id } => break id,
///         IdGenStatus::Pending { .. } => std::thread::yield_now(),
///     }
/// };
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum IdGenStatus {
    /// A unique identifier was generated and is ready to use.
    Ready {
        /// The generated identifier.
        id: Flake,
    },
    /// No identifier could be generated yet.
    Pending {
        /// Milliseconds to back off before polling again.
        yield_for: u64,
    },
}
