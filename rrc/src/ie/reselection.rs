//! Cell-reselection scalar IEs used by SIB3.

use crate::bit_cursor::{BitReader, BitWriter};
use crate::error::RrcError;
use crate::ie::codec::{decode_constrained, encode_constrained};

/// Q-Hyst: `{0, 2, .., 30}` dB, encoded as `value_db / 2` in 4 bits.
pub fn encode_q_hyst(w: &mut BitWriter, db: u8) {
    encode_constrained(w, db as i64 / 2, 0, 4);
}

pub fn decode_q_hyst(r: &mut BitReader) -> Result<u8, RrcError> {
    Ok((decode_constrained(r, 0, 4)? * 2) as u8)
}

/// S-IntraSearch / S-NonIntraSearch: `{0, 2, .., 62}` dB, 5 bits.
pub fn encode_s_search(w: &mut BitWriter, db: u8) {
    encode_constrained(w, db as i64 / 2, 0, 5);
}

pub fn decode_s_search(r: &mut BitReader) -> Result<u8, RrcError> {
    Ok((decode_constrained(r, 0, 5)? * 2) as u8)
}

/// T-Reselection: `{0, 1, .., 7}` seconds, 3 bits.
pub fn encode_t_reselection(w: &mut BitWriter, seconds: u8) {
    encode_constrained(w, seconds as i64, 0, 3);
}

pub fn decode_t_reselection(r: &mut BitReader) -> Result<u8, RrcError> {
    Ok(decode_constrained(r, 0, 3)? as u8)
}

/// Speed-state scale factors: three `{0.25, 0.5, 0.75, 1.0}` enum
/// selectors (medium, high, and the shared `t_reselection` scale),
/// packed as three 2-bit fields.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SpeedStateScaleFactors {
    pub sf_medium_quarters: u8,
    pub sf_high_quarters: u8,
}

pub fn encode_speed_state_scale_factors(w: &mut BitWriter, v: &SpeedStateScaleFactors) {
    debug_assert!((1..=4).contains(&v.sf_medium_quarters));
    debug_assert!((1..=4).contains(&v.sf_high_quarters));
    w.write_bits((v.sf_medium_quarters - 1) as u32, 2);
    w.write_bits((v.sf_high_quarters - 1) as u32, 2);
}

pub fn decode_speed_state_scale_factors(r: &mut BitReader) -> Result<SpeedStateScaleFactors, RrcError> {
    let sf_medium_quarters = r.try_read_bits(2)? as u8 + 1;
    let sf_high_quarters = r.try_read_bits(2)? as u8 + 1;
    Ok(SpeedStateScaleFactors { sf_medium_quarters, sf_high_quarters })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_q_hyst_round_trip() {
        let mut w = BitWriter::new();
        encode_q_hyst(&mut w, 16);
        let msg = w.into_message();
        assert_eq!(decode_q_hyst(&mut msg.reader()).unwrap(), 16);
    }

    #[test]
    fn test_speed_state_scale_factors_round_trip() {
        let v = SpeedStateScaleFactors { sf_medium_quarters: 3, sf_high_quarters: 2 };
        let mut w = BitWriter::new();
        encode_speed_state_scale_factors(&mut w, &v);
        let msg = w.into_message();
        assert_eq!(decode_speed_state_scale_factors(&mut msg.reader()).unwrap(), v);
    }
}
