mod basic;
mod lock;

pub use basic::*;
pub use lock::*;

use crate::{BitLayout, Flake, FlakeParts, IdGenStatus, Result};

/// Mutable generation state: the last relative timestamp an identifier was
/// minted at, and the sequence value issued within that millisecond.
///
/// Mutated only inside a generator's critical section.
#[derive(Copy, Clone, Debug, Default)]
pub(crate) struct FlakeState {
    pub(crate) last_timestamp: u64,
    pub(crate) sequence: u64,
}

/// A minimal interface over flake generators.
///
/// The blocking entry points differ per implementation (a lock generator
/// stalls all callers while it waits out backpressure, a single-threaded one
/// only stalls itself), but the non-blocking poll is common and is what the
/// async extensions build on.
pub trait FlakeGenerator {
    /// Attempts to generate the next identifier without blocking.
    ///
    /// Returns [`IdGenStatus::Pending`] when the generator is throttled.
    ///
    /// # Errors
    ///
    /// Returns [`Error::ClockMovedBackwards`] if the clock regressed and the
    /// generator was configured with [`ClockPolicy::Fail`].
    ///
    /// [`Error::ClockMovedBackwards`]: crate::Error::ClockMovedBackwards
    /// [`ClockPolicy::Fail`]: crate::ClockPolicy::Fail
    fn try_poll(&self) -> Result<IdGenStatus>;

    /// The bit layout identifiers from this generator are packed with.
    fn layout(&self) -> BitLayout;

    /// Splits an identifier minted by this generator into its fields.
    fn decompose(&self, flake: Flake) -> FlakeParts {
        self.layout().decompose(flake)
    }
}
