//! CDMA2000 interworking IEs used by SIB8: the long system-time
//! fields (encoded split across two PER segments) and the CDMA2000
//! band-class list.

use crate::bit_cursor::{BitReader, BitWriter};
use crate::error::RrcError;
use crate::ie::codec::{decode_seq_len, encode_seq_len};

pub const MAX_BAND_CLASSES: u32 = 32;

/// Split a `total_bits`-wide system time value into a 32-bit upper
/// segment and a `total_bits - 32` lower segment, the layout
/// `SystemTimeInfoCdma2000` uses for both its 49-bit (synchronous)
/// and 39-bit (asynchronous) variants.
fn encode_long_time(w: &mut BitWriter, value: u64, total_bits: u32) {
    let lower_bits = total_bits - 32;
    debug_assert!(value < (1u64 << total_bits), "system time value does not fit in {total_bits} bits");
    let upper = (value >> lower_bits) as u32;
    let lower = (value & ((1u64 << lower_bits) - 1)) as u32;
    w.write_bits(upper, 32);
    w.write_bits(lower, lower_bits);
}

fn decode_long_time(r: &mut BitReader, total_bits: u32) -> Result<u64, RrcError> {
    let lower_bits = total_bits - 32;
    let upper = r.try_read_bits(32)? as u64;
    let lower = r.try_read_bits(lower_bits)? as u64;
    Ok((upper << lower_bits) | lower)
}

/// 49-bit synchronous CDMA2000 system time.
pub fn encode_cdma_sync_time(w: &mut BitWriter, value: u64) {
    encode_long_time(w, value, 49);
}

pub fn decode_cdma_sync_time(r: &mut BitReader) -> Result<u64, RrcError> {
    decode_long_time(r, 49)
}

/// 39-bit asynchronous CDMA2000 system time.
pub fn encode_cdma_async_time(w: &mut BitWriter, value: u64) {
    encode_long_time(w, value, 39);
}

pub fn decode_cdma_async_time(r: &mut BitReader) -> Result<u64, RrcError> {
    decode_long_time(r, 39)
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CdmaBandClass {
    pub band_class: u8,
    pub cell_reselection_priority: u8,
    pub threshold_high_db: u8,
}

pub fn encode_band_class_list(w: &mut BitWriter, classes: &[CdmaBandClass]) {
    encode_seq_len(w, classes.len(), MAX_BAND_CLASSES);
    for c in classes {
        debug_assert!(c.band_class < 32);
        debug_assert!(c.cell_reselection_priority < 8);
        w.write_bits(c.band_class as u32, 5);
        w.write_bits(c.cell_reselection_priority as u32, 3);
        w.write_bits(c.threshold_high_db as u32, 6);
    }
}

pub fn decode_band_class_list(r: &mut BitReader) -> Result<Vec<CdmaBandClass>, RrcError> {
    let count = decode_seq_len(r, MAX_BAND_CLASSES)?;
    let mut classes = Vec::with_capacity(count);
    for _ in 0..count {
        let band_class = r.try_read_bits(5)? as u8;
        let cell_reselection_priority = r.try_read_bits(3)? as u8;
        let threshold_high_db = r.try_read_bits(6)? as u8;
        classes.push(CdmaBandClass { band_class, cell_reselection_priority, threshold_high_db });
    }
    Ok(classes)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_long_time_49_round_trip() {
        let value: u64 = (1u64 << 49) - 1;
        let mut w = BitWriter::new();
        encode_cdma_sync_time(&mut w, value);
        let msg = w.into_message();
        assert_eq!(msg.n_bits, 49);
        assert_eq!(decode_cdma_sync_time(&mut msg.reader()).unwrap(), value);
    }

    #[test]
    fn test_long_time_39_round_trip() {
        let value: u64 = 0x1234_5678_9A;
        let mut w = BitWriter::new();
        encode_cdma_async_time(&mut w, value & ((1 << 39) - 1));
        let msg = w.into_message();
        assert_eq!(msg.n_bits, 39);
        assert_eq!(decode_cdma_async_time(&mut msg.reader()).unwrap(), value & ((1 << 39) - 1));
    }

    #[test]
    fn test_band_class_list_round_trip() {
        let classes = vec![CdmaBandClass { band_class: 1, cell_reselection_priority: 3, threshold_high_db: 20 }];
        let mut w = BitWriter::new();
        encode_band_class_list(&mut w, &classes);
        let msg = w.into_message();
        assert_eq!(decode_band_class_list(&mut msg.reader()).unwrap(), classes);
    }
}
