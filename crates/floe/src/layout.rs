use crate::{Error, Flake, FlakeParts, Result};

/// Width of the timestamp field in every layout. Roughly 69 years of
/// millisecond range from the configured epoch.
pub const TIMESTAMP_BITS: u8 = 41;

/// Width of the reserved leading bit. Always encoded as zero, which keeps
/// every identifier representable as a non-negative `i64`.
pub const RESERVED_BITS: u8 = 1;

/// Total identifier width, including the reserved bit.
pub const TOTAL_BITS: u8 = 64;

/// A validated bit partition for 64-bit flake identifiers.
///
/// Unlike layouts fixed at compile time, the worker-id and sequence widths
/// here are plain runtime values, so one binary can host generators with
/// different partitions. The timestamp width is not negotiable.
///
/// ```text
///  Bit Index:  63           63 62            22 21            12 11            0
///              +--------------+----------------+----------------+--------------+
///  Field:      | reserved (1) | timestamp (41) | worker id (W)  | sequence (S) |
///              +--------------+----------------+----------------+--------------+
///              |<----------- MSB ---------- 64 bits ---------- LSB ----------->|
/// ```
///
/// (Field positions shown for the default `W = 10`, `S = 12` partition.)
///
/// # Example
/// ```
/// use floe::BitLayout;
///
/// let layout = BitLayout::new(10, 12).unwrap();
/// assert_eq!(layout.max_worker_id(), 1023);
/// assert_eq!(layout.max_sequence(), 4095);
///
/// // 10 + 13 + 41 + 1 != 64
/// assert!(BitLayout::new(10, 13).is_err());
/// ```
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub struct BitLayout {
    worker_id_bits: u8,
    sequence_bits: u8,
}

impl BitLayout {
    /// Validates a worker-id/sequence partition.
    ///
    /// # Errors
    ///
    /// Returns [`Error::InvalidBitLayout`] unless `worker_id_bits +
    /// sequence_bits + TIMESTAMP_BITS + RESERVED_BITS == TOTAL_BITS`.
    pub fn new(worker_id_bits: u8, sequence_bits: u8) -> Result<Self> {
        let total = u32::from(RESERVED_BITS)
            + u32::from(TIMESTAMP_BITS)
            + u32::from(worker_id_bits)
            + u32::from(sequence_bits);
        if total != u32::from(TOTAL_BITS) {
            return Err(Error::InvalidBitLayout {
                worker_id_bits,
                sequence_bits,
            });
        }
        Ok(Self {
            worker_id_bits,
            sequence_bits,
        })
    }

    /// Width of the worker-id field.
    pub const fn worker_id_bits(&self) -> u8 {
        self.worker_id_bits
    }

    /// Width of the sequence field.
    pub const fn sequence_bits(&self) -> u8 {
        self.sequence_bits
    }

    /// Maximum representable timestamp value.
    pub const fn max_timestamp(&self) -> u64 {
        (1 << TIMESTAMP_BITS) - 1
    }

    /// Maximum representable worker id.
    pub const fn max_worker_id(&self) -> u64 {
        (1 << self.worker_id_bits) - 1
    }

    /// Maximum representable sequence value; also the sequence wrap mask.
    pub const fn max_sequence(&self) -> u64 {
        (1 << self.sequence_bits) - 1
    }

    /// Number of bits the worker id is shifted left.
    pub const fn worker_id_shift(&self) -> u8 {
        self.sequence_bits
    }

    /// Number of bits the timestamp is shifted left.
    pub const fn timestamp_shift(&self) -> u8 {
        self.worker_id_bits + self.sequence_bits
    }

    /// Packs a `(timestamp, worker_id, sequence)` triple into an identifier.
    ///
    /// Each field is masked to its width before shifting.
    pub const fn compose(&self, timestamp: u64, worker_id: u64, sequence: u64) -> Flake {
        debug_assert!(timestamp <= self.max_timestamp(), "timestamp overflow");
        debug_assert!(worker_id <= self.max_worker_id(), "worker id overflow");
        debug_assert!(sequence <= self.max_sequence(), "sequence overflow");
        let timestamp = (timestamp & self.max_timestamp()) << self.timestamp_shift();
        let worker_id = (worker_id & self.max_worker_id()) << self.worker_id_shift();
        let sequence = sequence & self.max_sequence();
        Flake::from_raw(timestamp | worker_id | sequence)
    }

    /// Splits an identifier back into the triple that produced it.
    ///
    /// Only meaningful for identifiers packed with the same layout.
    pub const fn decompose(&self, flake: Flake) -> FlakeParts {
        let raw = flake.to_raw();
        FlakeParts {
            timestamp: (raw >> self.timestamp_shift()) & self.max_timestamp(),
            worker_id: (raw >> self.worker_id_shift()) & self.max_worker_id(),
            sequence: raw & self.max_sequence(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_partition_shifts_and_masks() {
        let layout = BitLayout::new(10, 12).unwrap();
        assert_eq!(layout.timestamp_shift(), 22);
        assert_eq!(layout.worker_id_shift(), 12);
        assert_eq!(layout.max_worker_id(), 1023);
        assert_eq!(layout.max_sequence(), 4095);
        assert_eq!(layout.max_timestamp(), (1 << 41) - 1);
    }

    #[test]
    fn rejects_partitions_that_do_not_fill_64_bits() {
        assert!(matches!(
            BitLayout::new(10, 13),
            Err(Error::InvalidBitLayout {
                worker_id_bits: 10,
                sequence_bits: 13,
            })
        ));
        assert!(BitLayout::new(0, 0).is_err());
        assert!(BitLayout::new(22, 1).is_err());
    }

    #[test]
    fn accepts_lopsided_partitions() {
        // Every split of the 22 configurable bits is valid, including the
        // degenerate single-worker and single-id-per-ms splits.
        for worker_id_bits in 0..=22u8 {
            let layout = BitLayout::new(worker_id_bits, 22 - worker_id_bits).unwrap();
            assert_eq!(
                layout.timestamp_shift(),
                layout.worker_id_bits() + layout.sequence_bits()
            );
        }
    }

    #[test]
    fn compose_decompose_round_trip() {
        let layout = BitLayout::new(10, 12).unwrap();
        let id = layout.compose(1_234_567, 42, 7);
        let parts = layout.decompose(id);
        assert_eq!(parts.timestamp, 1_234_567);
        assert_eq!(parts.worker_id, 42);
        assert_eq!(parts.sequence, 7);
    }

    #[test]
    fn compose_decompose_round_trip_at_field_maxima() {
        let layout = BitLayout::new(10, 12).unwrap();
        let id = layout.compose(
            layout.max_timestamp(),
            layout.max_worker_id(),
            layout.max_sequence(),
        );
        // All field bits set, reserved bit still clear.
        assert!(id.to_i64() >= 0);
        let parts = layout.decompose(id);
        assert_eq!(parts.timestamp, layout.max_timestamp());
        assert_eq!(parts.worker_id, layout.max_worker_id());
        assert_eq!(parts.sequence, layout.max_sequence());
    }

    #[test]
    fn zero_width_fields_decompose_to_zero() {
        let layout = BitLayout::new(0, 22).unwrap();
        assert_eq!(layout.max_worker_id(), 0);
        let id = layout.compose(5, 0, 9);
        let parts = layout.decompose(id);
        assert_eq!(parts.worker_id, 0);
        assert_eq!(parts.sequence, 9);
    }
}
