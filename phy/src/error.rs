//! PHY contract errors.

use thiserror::Error;
use rrc::RrcError;

/// Failures a [`crate::contract::PhyFrontend`] call can report. These
/// are all *transient* in the scanner's eyes — "the signal wasn't
/// there this time" — and are handled by rewinding, never by
/// aborting the scan.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum PhyError {
    /// The primitive ran but found nothing (no correlation peak
    /// cleared the detection threshold, no valid sync sequence, a
    /// CRC check failed).
    #[error("PHY primitive found nothing")]
    NotFound,

    /// A transport block failed CRC after channel decode.
    #[error("CRC check failed")]
    CrcFailed,

    /// The decoded bits failed the RRC codec.
    #[error(transparent)]
    Rrc(#[from] RrcError),
}
