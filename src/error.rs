//! Error types for sieve construction and queries

use thiserror::Error;

/// Result alias used throughout the crate
pub type Result<T> = std::result::Result<T, Error>;

/// Contract violations raised while building or querying a sieve.
///
/// None of these are transient: the computation is deterministic, so the
/// same input fails the same way every time.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum Error {
    /// Table capacity is zero, too large for the backing storage, or
    /// inconsistent with the data supplied for it
    #[error("invalid capacity {capacity}: {reason}")]
    InvalidCapacity { capacity: u64, reason: String },

    /// Two tables of different logical sizes were merged
    #[error("capacity mismatch: {left} != {right}")]
    CapacityMismatch { left: usize, right: usize },

    /// Index access outside `[0, capacity)`
    #[error("index {index} out of range for capacity {capacity}")]
    IndexOutOfRange { index: usize, capacity: usize },

    /// Number with no table entry: only odd numbers from 3 up are tracked
    #[error("{n} is not an odd number >= 3")]
    NotOddNumber { n: u64 },

    /// Query above the bound the sieve was built for
    #[error("query {n} exceeds sieve bound {bound}")]
    QueryOutOfBound { n: u64, bound: u64 },
}

impl Error {
    pub(crate) fn invalid_capacity(capacity: impl TryInto<u64>, reason: impl Into<String>) -> Self {
        Error::InvalidCapacity {
            capacity: capacity.try_into().unwrap_or(u64::MAX),
            reason: reason.into(),
        }
    }
}
