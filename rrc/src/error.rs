//! RRC codec errors.

use thiserror::Error;

/// Errors raised decoding or encoding an RRC message, IE, or SIB.
///
/// All three variants come from untrusted wire data, never from a
/// programmer mistake (those panic in [`crate::bit_cursor`] instead).
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum RrcError {
    /// A decoded count, length, or tag fell outside its architectural
    /// bound (e.g. a scheduling-info count that would index past the
    /// maximum this implementation supports).
    #[error("invalid input: {0}")]
    InvalidInput(String),

    /// An extension bit was set on a field this implementation does
    /// not carry an open-type expansion for.
    #[error("unexpected extension bit set")]
    UnexpectedExtension,

    /// The bit cursor ran out of bits before the message was fully
    /// decoded.
    #[error("truncated message: needed {needed} more bits, had {available}")]
    Truncated { needed: u32, available: usize },
}
