use core::{cell::Cell, cmp::Ordering};

#[cfg(feature = "tracing")]
use tracing::instrument;

use crate::{
    BitLayout, ClockPolicy, Error, Flake, FlakeGenerator, FlakeParts, GeneratorConfig, IdGenStatus,
    MonotonicClock, Result, TimeSource, WorkerIdResolver, generator::FlakeState,
};

/// A non-concurrent flake generator for single-threaded environments.
///
/// State lives in a [`Cell`], so there is no lock to take on the hot path —
/// and no `Sync`: the type cannot be shared across threads. The generation
/// algorithm and the identifiers produced are the same as
/// [`LockFlakeGenerator`]'s.
///
/// ## Recommended When
/// - One thread (or one owning task) mints all identifiers
/// - You want the fastest generator
///
/// ## See Also
/// - [`LockFlakeGenerator`] for shared use across threads
///
/// [`LockFlakeGenerator`]: crate::LockFlakeGenerator
pub struct BasicFlakeGenerator<T = MonotonicClock>
where
    T: TimeSource,
{
    state: Cell<FlakeState>,
    layout: BitLayout,
    worker_id: u64,
    epoch_ms: u64,
    policy: ClockPolicy,
    time: T,
}

impl BasicFlakeGenerator<MonotonicClock> {
    /// Creates a generator backed by a fresh [`MonotonicClock`].
    ///
    /// # Errors
    ///
    /// Same conditions as [`LockFlakeGenerator::new`]: an invalid bit layout
    /// or an out-of-range resolved worker id.
    ///
    /// [`LockFlakeGenerator::new`]: crate::LockFlakeGenerator::new
    pub fn new(resolver: impl WorkerIdResolver, config: GeneratorConfig) -> Result<Self> {
        Self::with_time_source(resolver, config, MonotonicClock::new())
    }
}

impl<T> BasicFlakeGenerator<T>
where
    T: TimeSource,
{
    /// Creates a generator reading time from a caller-supplied source.
    ///
    /// # Errors
    ///
    /// Same conditions as [`LockFlakeGenerator::new`].
    ///
    /// [`LockFlakeGenerator::new`]: crate::LockFlakeGenerator::new
    pub fn with_time_source(
        resolver: impl WorkerIdResolver,
        config: GeneratorConfig,
        time: T,
    ) -> Result<Self> {
        let layout = config.layout()?;
        let worker_id = resolver.resolve();
        if worker_id > layout.max_worker_id() {
            return Err(Error::WorkerIdOutOfRange {
                worker_id,
                max: layout.max_worker_id(),
                bits: layout.worker_id_bits(),
            });
        }
        Ok(Self {
            state: Cell::new(FlakeState::default()),
            layout,
            worker_id,
            epoch_ms: config.epoch_millis(),
            policy: config.clock_policy,
            time,
        })
    }

    /// This instance's worker id.
    pub fn worker_id(&self) -> u64 {
        self.worker_id
    }

    /// The bit layout identifiers are packed with.
    pub fn layout(&self) -> BitLayout {
        self.layout
    }

    /// Splits an identifier minted by this generator into its fields.
    pub fn decompose(&self, flake: Flake) -> FlakeParts {
        self.layout.decompose(flake)
    }

    fn now(&self) -> u64 {
        self.time.current_millis().saturating_sub(self.epoch_ms)
    }

    /// Generates the next identifier, spinning on the clock when the current
    /// millisecond's sequence space is exhausted (or while a regressed clock
    /// catches up under [`ClockPolicy::Wait`]).
    ///
    /// # Errors
    ///
    /// Returns [`Error::ClockMovedBackwards`] only under
    /// [`ClockPolicy::Fail`].
    #[cfg_attr(feature = "tracing", instrument(level = "trace", skip(self)))]
    pub fn next(&self) -> Result<Flake> {
        loop {
            match self.try_poll()? {
                IdGenStatus::Ready { id } => break Ok(id),
                IdGenStatus::Pending { .. } => core::hint::spin_loop(),
            }
        }
    }

    /// Attempts to generate the next identifier without blocking.
    ///
    /// Same contract as [`LockFlakeGenerator::try_poll`].
    ///
    /// # Errors
    ///
    /// Returns [`Error::ClockMovedBackwards`] only under
    /// [`ClockPolicy::Fail`].
    ///
    /// [`LockFlakeGenerator::try_poll`]: crate::LockFlakeGenerator::try_poll
    #[cfg_attr(feature = "tracing", instrument(level = "trace", skip(self)))]
    pub fn try_poll(&self) -> Result<IdGenStatus> {
        let now = self.now();
        let mut state = self.state.get();

        let status = match now.cmp(&state.last_timestamp) {
            Ordering::Equal => {
                if state.sequence < self.layout.max_sequence() {
                    state.sequence += 1;
                    IdGenStatus::Ready {
                        id: self.layout.compose(now, self.worker_id, state.sequence),
                    }
                } else {
                    IdGenStatus::Pending { yield_for: 1 }
                }
            }
            Ordering::Greater => {
                state.last_timestamp = now;
                state.sequence = 0;
                IdGenStatus::Ready {
                    id: self.layout.compose(now, self.worker_id, 0),
                }
            }
            Ordering::Less => match self.policy {
                ClockPolicy::Wait => IdGenStatus::Pending {
                    yield_for: state.last_timestamp - now,
                },
                ClockPolicy::Fail => {
                    return Err(Error::ClockMovedBackwards {
                        behind_ms: state.last_timestamp - now,
                    });
                }
                ClockPolicy::Tolerate => {
                    state.last_timestamp = now;
                    state.sequence = 0;
                    IdGenStatus::Ready {
                        id: self.layout.compose(now, self.worker_id, 0),
                    }
                }
            },
        };

        self.state.set(state);
        Ok(status)
    }
}

impl<T> FlakeGenerator for BasicFlakeGenerator<T>
where
    T: TimeSource,
{
    fn try_poll(&self) -> Result<IdGenStatus> {
        self.try_poll()
    }

    fn layout(&self) -> BitLayout {
        self.layout()
    }
}
