use core::time::Duration;

use crate::{BitLayout, Result};

/// Default epoch: Friday, January 1, 2021 00:00:00 UTC.
pub const DEFAULT_EPOCH: Duration = Duration::from_millis(1_609_430_400_000);

/// Twitter epoch: Thursday, November 4, 2010 1:42:54.657 UTC.
///
/// A documented alternative for deployments that want interchangeable
/// timestamps with classic Twitter-layout ids.
pub const TWITTER_EPOCH: Duration = Duration::from_millis(1_288_834_974_657);

/// Policy applied when the clock reads an earlier millisecond than the last
/// issued timestamp.
///
/// Clock regression (NTP step adjustments, leap-second smearing, VM
/// migration) threatens the uniqueness invariant: re-entering an already
/// exhausted millisecond can re-issue an identifier. Which trade-off to make
/// is a deployment decision, so it is part of [`GeneratorConfig`] rather than
/// baked in.
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq)]
pub enum ClockPolicy {
    /// Hold back issuance until the clock catches up to the last issued
    /// timestamp. Preserves monotonicity and uniqueness; callers stall for
    /// the duration of the regression.
    #[default]
    Wait,

    /// Surface the regression as [`Error::ClockMovedBackwards`] and leave
    /// retry policy to the caller.
    ///
    /// [`Error::ClockMovedBackwards`]: crate::Error::ClockMovedBackwards
    Fail,

    /// Reset the sequence and continue with the earlier timestamp.
    ///
    /// Never stalls and never errors, but a regression into an exhausted
    /// millisecond can re-issue an identifier. Matches the classic reference
    /// behavior of this id scheme.
    Tolerate,
}

/// Configuration for a flake generator.
///
/// A plain record with documented defaults; pass it to
/// [`LockFlakeGenerator::new`] or [`BasicFlakeGenerator::new`], which
/// validate it and fail construction rather than produce a half-configured
/// generator.
///
/// # Example
/// ```
/// use floe::{ClockPolicy, GeneratorConfig};
///
/// let config = GeneratorConfig::default()
///     .with_worker_id_bits(8)
///     .with_sequence_bits(14)
///     .with_clock_policy(ClockPolicy::Fail);
/// assert!(config.layout().is_ok());
/// ```
///
/// [`LockFlakeGenerator::new`]: crate::LockFlakeGenerator::new
/// [`BasicFlakeGenerator::new`]: crate::BasicFlakeGenerator::new
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub struct GeneratorConfig {
    /// Zero point subtracted from wall-clock time before encoding, as a
    /// duration since the Unix epoch. Defaults to [`DEFAULT_EPOCH`].
    pub epoch: Duration,
    /// Width of the worker-id field. Defaults to 10 (1024 workers).
    pub worker_id_bits: u8,
    /// Width of the sequence field. Defaults to 12 (4096 ids per ms).
    pub sequence_bits: u8,
    /// Clock-regression policy. Defaults to [`ClockPolicy::Wait`].
    pub clock_policy: ClockPolicy,
}

impl Default for GeneratorConfig {
    fn default() -> Self {
        Self {
            epoch: DEFAULT_EPOCH,
            worker_id_bits: 10,
            sequence_bits: 12,
            clock_policy: ClockPolicy::default(),
        }
    }
}

impl GeneratorConfig {
    /// Replaces the epoch.
    #[must_use]
    pub fn with_epoch(mut self, epoch: Duration) -> Self {
        self.epoch = epoch;
        self
    }

    /// Replaces the worker-id field width.
    #[must_use]
    pub fn with_worker_id_bits(mut self, bits: u8) -> Self {
        self.worker_id_bits = bits;
        self
    }

    /// Replaces the sequence field width.
    #[must_use]
    pub fn with_sequence_bits(mut self, bits: u8) -> Self {
        self.sequence_bits = bits;
        self
    }

    /// Replaces the clock-regression policy.
    #[must_use]
    pub fn with_clock_policy(mut self, policy: ClockPolicy) -> Self {
        self.clock_policy = policy;
        self
    }

    /// Validates the configured partition.
    ///
    /// # Errors
    ///
    /// Returns [`Error::InvalidBitLayout`] when the widths do not sum to 64.
    ///
    /// [`Error::InvalidBitLayout`]: crate::Error::InvalidBitLayout
    pub fn layout(&self) -> Result<BitLayout> {
        BitLayout::new(self.worker_id_bits, self.sequence_bits)
    }

    pub(crate) fn epoch_millis(&self) -> u64 {
        self.epoch.as_millis() as u64
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_match_the_documented_partition() {
        let config = GeneratorConfig::default();
        assert_eq!(config.epoch, DEFAULT_EPOCH);
        assert_eq!(config.worker_id_bits, 10);
        assert_eq!(config.sequence_bits, 12);
        assert_eq!(config.clock_policy, ClockPolicy::Wait);
        assert!(config.layout().is_ok());
    }

    #[test]
    fn builders_replace_single_fields() {
        let config = GeneratorConfig::default()
            .with_epoch(Duration::ZERO)
            .with_worker_id_bits(5)
            .with_sequence_bits(17)
            .with_clock_policy(ClockPolicy::Tolerate);
        assert_eq!(config.epoch_millis(), 0);
        assert_eq!(config.clock_policy, ClockPolicy::Tolerate);
        assert!(config.layout().is_ok());
    }
}
