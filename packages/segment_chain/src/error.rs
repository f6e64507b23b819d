use thiserror::Error;

/// Errors that can occur when freezing buffer segments.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum Error {
    /// The caller tried to freeze a zero-capacity buffer. An empty segment records
    /// nothing, so freezing one is always a caller bug.
    #[error("a frozen segment requires a non-empty buffer")]
    EmptyBuffer,

    /// The caller claimed more of the buffer as used than the buffer holds.
    #[error("used length {used} exceeds the buffer capacity {capacity}")]
    UsedBeyondCapacity {
        /// The used length the caller passed.
        used: usize,

        /// The actual capacity of the buffer being frozen.
        capacity: usize,
    },
}

/// A specialized `Result` type for segment chain operations, returning the crate's
/// [`Error`] type as the error value.
pub(crate) type Result<T> = std::result::Result<T, Error>;
