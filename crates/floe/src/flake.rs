use core::fmt;

/// A 64-bit flake identifier.
///
/// Values are immutable once minted and order exactly as their raw integers:
/// the timestamp occupies the most significant field, so sorting flakes sorts
/// them by mint time (and, within a millisecond, by sequence).
///
/// A `Flake` carries no layout information of its own; splitting one back
/// into fields goes through the [`BitLayout`] (or generator) that packed it.
///
/// [`BitLayout`]: crate::BitLayout
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[derive(Copy, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Flake {
    id: u64,
}

impl Flake {
    /// Wraps a raw identifier value.
    pub const fn from_raw(raw: u64) -> Self {
        Self { id: raw }
    }

    /// Returns the raw identifier value.
    pub const fn to_raw(&self) -> u64 {
        self.id
    }

    /// Returns the identifier as a signed 64-bit integer.
    ///
    /// The reserved leading bit is always zero, so the result is never
    /// negative. Useful for stores and protocols that only speak `i64`.
    pub const fn to_i64(&self) -> i64 {
        self.id as i64
    }

    /// Returns the identifier as a zero-padded 20-digit string.
    ///
    /// Padded strings sort lexicographically in mint order.
    pub fn to_padded_string(&self) -> String {
        format!("{:020}", self.id)
    }
}

impl fmt::Display for Flake {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.id)
    }
}

impl fmt::Debug for Flake {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Flake")
            .field("id", &format_args!("{} (0x{:016x})", self.id, self.id))
            .finish()
    }
}

/// The decoded fields of a [`Flake`].
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub struct FlakeParts {
    /// Milliseconds since the generator's epoch.
    pub timestamp: u64,
    /// The minting instance's worker id.
    pub worker_id: u64,
    /// Intra-millisecond sequence number.
    pub sequence: u64,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn raw_round_trip_and_ordering() {
        let a = Flake::from_raw(100);
        let b = Flake::from_raw(200);
        assert!(a < b);
        assert_eq!(a.to_raw(), 100);
        assert_eq!(b.to_i64(), 200);
    }

    #[test]
    fn padded_strings_sort_in_mint_order() {
        let a = Flake::from_raw(99);
        let b = Flake::from_raw(100);
        assert!(a.to_padded_string() < b.to_padded_string());
        assert_eq!(a.to_padded_string().len(), 20);
    }

    #[cfg(feature = "serde")]
    #[test]
    fn serde_round_trip() {
        let id = Flake::from_raw(0x0000_00ff_c0ff_ee00);
        let json = serde_json::to_string(&id).unwrap();
        let back: Flake = serde_json::from_str(&json).unwrap();
        assert_eq!(id, back);
    }
}
