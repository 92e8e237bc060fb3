//! Scanner-level errors.

use thiserror::Error;

/// Errors `run_scan_from_file` can raise. A malformed cell or a PHY
/// miss is routine and handled by rewinding inside the FSM itself —
/// the only failures that reach a caller are ones outside the FSM's
/// control, namely the input file and the CLI's chunk-size argument.
#[derive(Error, Debug)]
pub enum ScanError {
    #[error("failed to open input file: {0}")]
    Open(#[source] std::io::Error),

    #[error("failed to read input file: {0}")]
    Read(#[source] std::io::Error),

    #[error("chunk-size must be in 1..={max}, got {got}")]
    InvalidChunkSize { got: usize, max: usize },
}
