//! The scanner crate: a sliding sample buffer, the PHY-driven state
//! machine built on top of it, and the cell reporter that turns
//! decoded SIBs into output.

pub mod error;
pub mod fsm;
pub mod reporter;
pub mod run;
pub mod sample_buffer;

pub use error::ScanError;
pub use fsm::{CellDescriptor, DecodedSibSet, ScanStats, Scanner, ScannerState};
pub use reporter::CellReporter;
pub use run::run_scan_from_file;
pub use sample_buffer::SampleBuffer;
