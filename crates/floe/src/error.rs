/// A result type defaulting to the crate's [`Error`].
///
/// Construction is the only fallible surface unless the generator was
/// configured with [`ClockPolicy::Fail`].
///
/// [`ClockPolicy::Fail`]: crate::ClockPolicy::Fail
pub type Result<T, E = Error> = core::result::Result<T, E>;

/// All errors that `floe` can produce.
#[derive(Clone, Debug, PartialEq, Eq, thiserror::Error)]
#[non_exhaustive]
pub enum Error {
    /// The configured field widths do not account for every bit of a 64-bit
    /// identifier.
    ///
    /// A layout is valid only when `worker_id_bits + sequence_bits` plus the
    /// fixed 41 timestamp bits and the single reserved bit equal 64.
    #[error(
        "invalid bit layout: 41 timestamp + {worker_id_bits} worker id + {sequence_bits} sequence + 1 reserved bits must equal 64"
    )]
    InvalidBitLayout {
        worker_id_bits: u8,
        sequence_bits: u8,
    },

    /// The resolved worker id does not fit the configured worker-id field.
    #[error("worker id {worker_id} exceeds the maximum {max} representable in {bits} bits")]
    WorkerIdOutOfRange { worker_id: u64, max: u64, bits: u8 },

    /// The clock read an earlier millisecond than the last issued timestamp.
    ///
    /// Only surfaced when the generator was configured with
    /// [`ClockPolicy::Fail`]; the other policies absorb the regression.
    ///
    /// [`ClockPolicy::Fail`]: crate::ClockPolicy::Fail
    #[error("clock moved backwards by {behind_ms} ms")]
    ClockMovedBackwards { behind_ms: u64 },
}
