use std::sync::Arc;

use core::cmp::Ordering;
use parking_lot::Mutex;

#[cfg(feature = "tracing")]
use tracing::instrument;

use crate::{
    BitLayout, ClockPolicy, Error, Flake, FlakeGenerator, FlakeParts, GeneratorConfig, IdGenStatus,
    MonotonicClock, Result, TimeSource, WorkerIdResolver, generator::FlakeState,
};

/// A lock-based flake generator suitable for multi-threaded environments.
///
/// The whole generation step — clock read, comparison against the last
/// issued timestamp, sequence update, identifier composition — runs as one
/// critical section behind a [`parking_lot::Mutex`], so concurrent callers
/// can never observe the same `(timestamp, sequence)` pair. State lives in an
/// `Arc`, making clones cheap handles onto the same generator.
///
/// ## Recommended When
/// - Any number of threads share one generator instance
/// - Fair access across threads is important
///
/// ## See Also
/// - [`BasicFlakeGenerator`] for single-threaded use
///
/// [`BasicFlakeGenerator`]: crate::BasicFlakeGenerator
#[derive(Clone, Debug)]
pub struct LockFlakeGenerator<T = MonotonicClock>
where
    T: TimeSource,
{
    state: Arc<Mutex<FlakeState>>,
    layout: BitLayout,
    worker_id: u64,
    epoch_ms: u64,
    policy: ClockPolicy,
    time: T,
}

impl LockFlakeGenerator<MonotonicClock> {
    /// Creates a generator backed by a fresh [`MonotonicClock`].
    ///
    /// The resolver is invoked exactly once to obtain this instance's worker
    /// id; see [`WorkerIdResolver`] for sourcing options.
    ///
    /// # Errors
    ///
    /// - [`Error::InvalidBitLayout`] if the configured widths do not sum to
    ///   64 bits.
    /// - [`Error::WorkerIdOutOfRange`] if the resolved worker id does not fit
    ///   the configured width.
    ///
    /// # Example
    /// ```
    /// use floe::{FixedWorkerId, GeneratorConfig, LockFlakeGenerator};
    ///
    /// let generator =
    ///     LockFlakeGenerator::new(FixedWorkerId(3), GeneratorConfig::default()).unwrap();
    /// let id = generator.next().unwrap();
    /// assert_eq!(generator.decompose(id).worker_id, 3);
    /// ```
    pub fn new(resolver: impl WorkerIdResolver, config: GeneratorConfig) -> Result<Self> {
        Self::with_time_source(resolver, config, MonotonicClock::new())
    }
}

impl<T> LockFlakeGenerator<T>
where
    T: TimeSource,
{
    /// Creates a generator reading time from a caller-supplied source.
    ///
    /// Validation runs in order: bit layout first, then the resolved worker
    /// id against the layout's maximum. No partially-initialized generator
    /// escapes on failure.
    ///
    /// # Errors
    ///
    /// Same conditions as [`LockFlakeGenerator::new`].
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
            state: Arc::new(Mutex::new(FlakeState::default())),
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

    /// Milliseconds since the configured epoch. An epoch in the future pins
    /// the reading to zero rather than underflowing.
    fn now(&self) -> u64 {
        self.time.current_millis().saturating_sub(self.epoch_ms)
    }

    /// Generates the next identifier, blocking as needed.
    ///
    /// When the sequence space for the current millisecond is exhausted, the
    /// call spins on the clock **while holding the lock** until it advances.
    /// That stalls every caller on this instance, which is deliberate: it
    /// bounds throughput to `max_sequence + 1` identifiers per millisecond
    /// instead of failing callers. The same applies while waiting out a
    /// regressed clock under [`ClockPolicy::Wait`]. Callers needing bounded
    /// latency should wrap the call with their own deadline, or use
    /// [`Self::try_poll`].
    ///
    /// # Errors
    ///
    /// Returns [`Error::ClockMovedBackwards`] only under
    /// [`ClockPolicy::Fail`].
    #[cfg_attr(feature = "tracing", instrument(level = "trace", skip(self)))]
    pub fn next(&self) -> Result<Flake> {
        let mut state = self.state.lock();
        let mut now = self.now();

        if now < state.last_timestamp {
            match self.policy {
                ClockPolicy::Wait => {
                    while now < state.last_timestamp {
                        core::hint::spin_loop();
                        now = self.now();
                    }
                }
                ClockPolicy::Fail => {
                    return Err(Error::ClockMovedBackwards {
                        behind_ms: state.last_timestamp - now,
                    });
                }
                ClockPolicy::Tolerate => {
                    state.sequence = 0;
                    state.last_timestamp = now;
                    return Ok(self.layout.compose(now, self.worker_id, 0));
                }
            }
        }

        if now == state.last_timestamp {
            state.sequence = (state.sequence + 1) & self.layout.max_sequence();
            if state.sequence == 0 {
                // Sequence space exhausted: hold the lock until the clock
                // moves strictly past the exhausted millisecond.
                while now <= state.last_timestamp {
                    core::hint::spin_loop();
                    now = self.now();
                }
                state.last_timestamp = now;
            }
        } else {
            state.sequence = 0;
            state.last_timestamp = now;
        }

        Ok(self
            .layout
            .compose(state.last_timestamp, self.worker_id, state.sequence))
    }

    /// Attempts to generate the next identifier without blocking.
    ///
    /// Sequence exhaustion — and a regressed clock under
    /// [`ClockPolicy::Wait`] — surface as [`IdGenStatus::Pending`] with the
    /// number of milliseconds to back off, instead of stalling the caller.
    ///
    /// # Returns
    /// - `Ok(IdGenStatus::Ready { id })`: a new identifier is available
    /// - `Ok(IdGenStatus::Pending { yield_for })`: time to wait (in
    ///   milliseconds) before trying again
    /// - `Err(e)`: the clock regressed under [`ClockPolicy::Fail`]
    ///
    /// # Example
    /// ```
    /// use floe::{FixedWorkerId, GeneratorConfig, IdGenStatus, LockFlakeGenerator};
    ///
    /// let generator =
    ///     LockFlakeGenerator::new(FixedWorkerId(0), GeneratorConfig::default()).unwrap();
    ///
    /// let id = loop {
    ///     match generator.try_poll().unwrap() {
    ///         IdGenStatus::Ready { id } => break id,
    ///         IdGenStatus::Pending { yield_for } => {
    ///             std::thread::sleep(core::time::Duration::from_millis(yield_for));
    ///         }
    ///     }
    /// };
    /// ```
    #[cfg_attr(feature = "tracing", instrument(level = "trace", skip(self)))]
    pub fn try_poll(&self) -> Result<IdGenStatus> {
        let now = self.now();
        let mut state = self.state.lock();

        match now.cmp(&state.last_timestamp) {
            Ordering::Equal => {
                if state.sequence < self.layout.max_sequence() {
                    state.sequence += 1;
                    Ok(IdGenStatus::Ready {
                        id: self.layout.compose(now, self.worker_id, state.sequence),
                    })
                } else {
                    Ok(IdGenStatus::Pending { yield_for: 1 })
                }
            }
            Ordering::Greater => {
                state.last_timestamp = now;
                state.sequence = 0;
                Ok(IdGenStatus::Ready {
                    id: self.layout.compose(now, self.worker_id, 0),
                })
            }
            Ordering::Less => match self.policy {
                ClockPolicy::Wait => Ok(Self::cold_clock_behind(now, state.last_timestamp)),
                ClockPolicy::Fail => Err(Error::ClockMovedBackwards {
                    behind_ms: state.last_timestamp - now,
                }),
                ClockPolicy::Tolerate => {
                    state.last_timestamp = now;
                    state.sequence = 0;
                    Ok(IdGenStatus::Ready {
                        id: self.layout.compose(now, self.worker_id, 0),
                    })
                }
            },
        }
    }

    #[cold]
    #[inline(never)]
    fn cold_clock_behind(now: u64, last_timestamp: u64) -> IdGenStatus {
        let yield_for = last_timestamp - now;
        debug_assert!(yield_for > 0);
        IdGenStatus::Pending { yield_for }
    }
}

impl<T> FlakeGenerator for LockFlakeGenerator<T>
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
