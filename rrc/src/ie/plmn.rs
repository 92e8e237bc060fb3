//! PLMN Identity IE.
//!
//! Each digit is packed as its own 4-bit BCD nibble, matching how the
//! reference decoder formats a PLMN back out as hex digits. The MCC
//! carries a presence bit of its own: when a PLMN entry in a SIB1
//! PLMN identity list omits it, the decoded value is the *previous*
//! list entry's MCC, not a default — handled one layer up, in
//! `crate::message::sib1`, since the reuse rule is a property of the
//! list, not of a single PLMN Identity IE.

use crate::bit_cursor::{BitReader, BitWriter};
use crate::error::RrcError;
use common::{Mcc, Mnc, PlmnId};

fn bcd_pack(digits: &[u8]) -> u32 {
    digits.iter().fold(0u32, |acc, &d| (acc << 4) | d as u32)
}

fn bcd_unpack(value: u32, n_digits: u32) -> Vec<u8> {
    (0..n_digits)
        .rev()
        .map(|i| ((value >> (4 * i)) & 0xF) as u8)
        .collect()
}

/// Encode a PLMN Identity IE. `mcc` is `None` when this entry should
/// reuse the previous list entry's MCC (SIB1's PLMN-reuse rule); the
/// reference encoder never actually exercises this path (it always
/// writes an explicit MCC), but a complete codec needs to be able to
/// produce it too.
pub fn encode_plmn_identity(w: &mut BitWriter, mcc: Option<&Mcc>, mnc: &Mnc) {
    match mcc {
        Some(mcc) => {
            w.write_bit(true);
            w.write_bits(bcd_pack(&mcc.0), 12);
        }
        None => w.write_bit(false),
    }
    match mnc {
        Mnc::TwoDigit(d) => {
            w.write_bits(0, 1);
            w.write_bits(bcd_pack(d), 8);
        }
        Mnc::ThreeDigit(d) => {
            w.write_bits(1, 1);
            w.write_bits(bcd_pack(d), 12);
        }
    }
}

/// Decode a PLMN Identity IE. Returns `(mcc, mnc)`; `mcc` is `None`
/// when the MCC-present bit was clear and the caller must substitute
/// the previous list entry's MCC.
pub fn decode_plmn_identity(r: &mut BitReader) -> Result<(Option<Mcc>, Mnc), RrcError> {
    let mcc_present = r.try_read_bits(1)? != 0;
    let mcc = if mcc_present {
        let value = r.try_read_bits(12)?;
        let digits = bcd_unpack(value, 3);
        Some(Mcc([digits[0], digits[1], digits[2]]))
    } else {
        None
    };

    let three_digit = r.try_read_bits(1)? != 0;
    let mnc = if three_digit {
        let value = r.try_read_bits(12)?;
        let digits = bcd_unpack(value, 3);
        Mnc::ThreeDigit([digits[0], digits[1], digits[2]])
    } else {
        let value = r.try_read_bits(8)?;
        let digits = bcd_unpack(value, 2);
        Mnc::TwoDigit([digits[0], digits[1]])
    };

    Ok((mcc, mnc))
}

/// Convenience wrapper for call sites that always have a resolved
/// MCC in hand (tests, and any PLMN that is not list entry 0 in a
/// reused-MCC SIB1 list).
pub fn encode_plmn(w: &mut BitWriter, plmn: &PlmnId) {
    encode_plmn_identity(w, Some(&plmn.mcc), &plmn.mnc);
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_plmn_round_trip_two_digit_mnc() {
        let plmn = PlmnId { mcc: Mcc([2, 0, 8]), mnc: Mnc::TwoDigit([9, 3]) };
        let mut w = BitWriter::new();
        encode_plmn(&mut w, &plmn);
        let msg = w.into_message();
        let (mcc, mnc) = decode_plmn_identity(&mut msg.reader()).unwrap();
        assert_eq!(mcc, Some(plmn.mcc));
        assert_eq!(mnc, plmn.mnc);
    }

    #[test]
    fn test_plmn_round_trip_three_digit_mnc() {
        let plmn = PlmnId { mcc: Mcc([3, 1, 0], ), mnc: Mnc::ThreeDigit([2, 6, 0]) };
        let mut w = BitWriter::new();
        encode_plmn(&mut w, &plmn);
        let msg = w.into_message();
        let (mcc, mnc) = decode_plmn_identity(&mut msg.reader()).unwrap();
        assert_eq!(mcc, Some(plmn.mcc));
        assert_eq!(mnc, plmn.mnc);
    }

    #[test]
    fn test_plmn_mcc_omitted() {
        let mnc = Mnc::TwoDigit([9, 3]);
        let mut w = BitWriter::new();
        encode_plmn_identity(&mut w, None, &mnc);
        let msg = w.into_message();
        let (mcc, decoded_mnc) = decode_plmn_identity(&mut msg.reader()).unwrap();
        assert_eq!(mcc, None);
        assert_eq!(decoded_mnc, mnc);
    }
}
