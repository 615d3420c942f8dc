//! Error types for chronal operations.

use thiserror::Error;

#[derive(Error, Debug)]
pub enum ChronalError {
    /// A field value outside its legal bounds, given the other fields that
    /// are currently fixed. Detected before any result is produced.
    #[error("Value {value} for {field} must be in the range [{lower},{upper}]")]
    Range {
        field: &'static str,
        value: i64,
        lower: i64,
        upper: i64,
    },

    /// Signed 64-bit overflow, reported at the operation whose result would
    /// wrap rather than masked by wraparound.
    #[error("Arithmetic overflow: {0}")]
    Overflow(String),

    /// A partial index outside `[0, size)`.
    #[error("Index {index} out of bounds for partial of size {size}")]
    InvalidIndex { index: usize, size: usize },

    /// A required argument was absent.
    #[error("Missing argument: {0}")]
    MissingArgument(&'static str),

    /// Malformed construction input: mismatched array lengths, duplicate or
    /// unordered field types, an unsorted transition table, and the like.
    #[error("Invalid argument: {0}")]
    InvalidArgument(String),

    /// A zone name that no provider can resolve.
    #[error("Unknown time zone: {0}")]
    UnknownZone(String),
}

pub type Result<T> = std::result::Result<T, ChronalError>;
