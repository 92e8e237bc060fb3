//! Generic unaligned-PER encoding primitives shared by every IE.

use crate::bit_cursor::{BitReader, BitWriter};
use crate::error::RrcError;
use common::ceil_log2;

/// Encode an octet string with the two-choice length prefix: a `0`
/// bit plus a 7-bit length for strings shorter than 128 bytes, or a
/// `10` prefix plus a 14-bit length for strings up to 16383 bytes.
pub fn encode_octet_string(w: &mut BitWriter, data: &[u8]) {
    debug_assert!(data.len() < (1 << 14), "octet string too long for this length encoding");
    if data.len() < 128 {
        w.write_bit(false);
        w.write_bits(data.len() as u32, 7);
    } else {
        w.write_bits(0b10, 2);
        w.write_bits(data.len() as u32, 14);
    }
    for &byte in data {
        w.write_bits(byte as u32, 8);
    }
}

/// Decode an octet string written by [`encode_octet_string`].
pub fn decode_octet_string(r: &mut BitReader) -> Result<Vec<u8>, RrcError> {
    let short = r.try_read_bits(1)? == 0;
    let len = if short {
        r.try_read_bits(7)? as usize
    } else {
        let second = r.try_read_bits(1)?;
        if second != 0 {
            return Err(RrcError::InvalidInput("unsupported octet string length form".into()));
        }
        r.try_read_bits(14)? as usize
    };
    let mut data = Vec::with_capacity(len.min(4096));
    for _ in 0..len {
        data.push(r.try_read_bits(8)? as u8);
    }
    Ok(data)
}

/// Encode the count of a bounded sequence (`1..=max` items) as
/// `count - 1` in `ceil(log2(max))` bits.
pub fn encode_seq_len(w: &mut BitWriter, count: usize, max: u32) {
    debug_assert!(count >= 1 && count as u32 <= max, "sequence count {count} out of bounds 1..={max}");
    let bits = ceil_log2(max);
    if bits > 0 {
        w.write_bits((count - 1) as u32, bits);
    }
}

/// Decode a bounded sequence count written by [`encode_seq_len`].
pub fn decode_seq_len(r: &mut BitReader, max: u32) -> Result<usize, RrcError> {
    let bits = ceil_log2(max);
    let raw = if bits > 0 { r.try_read_bits(bits)? } else { 0 };
    let count = raw as usize + 1;
    if count as u32 > max {
        return Err(RrcError::InvalidInput(format!("sequence count {count} exceeds bound {max}")));
    }
    Ok(count)
}

/// Encode a constrained integer `value` from the range
/// `[lower, lower + span)` as `value - lower` in `bits` bits.
pub fn encode_constrained(w: &mut BitWriter, value: i64, lower: i64, bits: u32) {
    debug_assert!(value >= lower, "value {value} below lower bound {lower}");
    w.write_bits((value - lower) as u32, bits);
}

/// Decode a constrained integer written by [`encode_constrained`].
pub fn decode_constrained(r: &mut BitReader, lower: i64, bits: u32) -> Result<i64, RrcError> {
    let raw = r.try_read_bits(bits)?;
    Ok(lower + raw as i64)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_octet_string_short_form() {
        let mut w = BitWriter::new();
        encode_octet_string(&mut w, &[1, 2, 3]);
        let msg = w.into_message();
        let mut r = msg.reader();
        assert_eq!(decode_octet_string(&mut r).unwrap(), vec![1, 2, 3]);
    }

    #[test]
    fn test_octet_string_length_boundary_127_vs_128() {
        let data127 = vec![0xAAu8; 127];
        let data128 = vec![0xBBu8; 128];

        let mut w = BitWriter::new();
        encode_octet_string(&mut w, &data127);
        let msg = w.into_message();
        // 1 (short-form flag) + 7 (length) + 127*8 bits.
        assert_eq!(msg.n_bits, 1 + 7 + 127 * 8);
        assert_eq!(decode_octet_string(&mut msg.reader()).unwrap(), data127);

        let mut w = BitWriter::new();
        encode_octet_string(&mut w, &data128);
        let msg = w.into_message();
        // 2 (long-form prefix) + 14 (length) + 128*8 bits.
        assert_eq!(msg.n_bits, 2 + 14 + 128 * 8);
        assert_eq!(decode_octet_string(&mut msg.reader()).unwrap(), data128);
    }

    #[test]
    fn test_seq_len_round_trip() {
        let mut w = BitWriter::new();
        encode_seq_len(&mut w, 5, 32);
        let msg = w.into_message();
        assert_eq!(decode_seq_len(&mut msg.reader(), 32).unwrap(), 5);
    }

    #[test]
    fn test_constrained_round_trip() {
        let mut w = BitWriter::new();
        encode_constrained(&mut w, -70, -70, 6);
        let msg = w.into_message();
        assert_eq!(decode_constrained(&mut msg.reader(), -70, 6).unwrap(), -70);
    }
}
