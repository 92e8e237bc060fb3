//! RRC unaligned-PER codec for E-UTRAN broadcast channels.
//!
//! Covers BCCH-BCH (the MIB), BCCH-DLSCH (SIB1 and the
//! SystemInformation container for SIB2/3/4/8), and PCCH (Paging) —
//! the broadcast-side subset of 3GPP TS 36.331 a passive downlink
//! scanner needs to decode.

pub mod bit_cursor;
pub mod error;
pub mod ie;
pub mod message;

pub use bit_cursor::{BitReader, BitWriter, RrcMessage};
pub use error::RrcError;
pub use message::*;
