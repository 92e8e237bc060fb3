//! The PHY front end contract: the boundary between the scanner's
//! sample-level state machine and the correlation/demodulation/FEC
//! stack, which this crate does not implement.

pub mod contract;
pub mod error;
pub mod reference;

pub use contract::*;
pub use error::PhyError;
