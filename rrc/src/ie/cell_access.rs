//! Cell-access scalar IEs: unbounded-width bit fields and the
//! constrained integers that carry a fixed dBm/dB offset.

use crate::bit_cursor::{BitReader, BitWriter};
use crate::error::RrcError;
use crate::ie::codec::{decode_constrained, encode_constrained};
use common::{CellId, PhichDuration, PhichResource, Tac};

/// Tracking Area Code, 16 bits, no offset.
pub fn encode_tac(w: &mut BitWriter, tac: Tac) {
    w.write_bits(tac.0 as u32, 16);
}

pub fn decode_tac(r: &mut BitReader) -> Result<Tac, RrcError> {
    Ok(Tac(r.try_read_bits(16)? as u16))
}

/// E-UTRAN Cell Identity, 28 bits, no offset.
pub fn encode_cell_identity(w: &mut BitWriter, cell_id: CellId) {
    w.write_bits(cell_id.0, 28);
}

pub fn decode_cell_identity(r: &mut BitReader) -> Result<CellId, RrcError> {
    Ok(CellId(r.try_read_bits(28)?))
}

/// CSG Identity, 27 bits, no offset.
pub fn encode_csg_identity(w: &mut BitWriter, csg_id: u32) {
    w.write_bits(csg_id, 27);
}

pub fn decode_csg_identity(r: &mut BitReader) -> Result<u32, RrcError> {
    r.try_read_bits(27)
}

/// Q-Rx-Lev-Min, `value_dbm = 2 * raw - 70`, encoded in 6 bits.
pub fn encode_q_rx_lev_min(w: &mut BitWriter, dbm: i8) {
    let raw = (dbm as i64 + 70) / 2;
    encode_constrained(w, raw, 0, 6);
}

pub fn decode_q_rx_lev_min(r: &mut BitReader) -> Result<i8, RrcError> {
    let raw = decode_constrained(r, 0, 6)?;
    Ok((raw * 2 - 70) as i8)
}

/// Q-Rx-Lev-Min-Offset: present only if the optional flag is set;
/// encoded value is `(offset_db / 2) - 1` in 3 bits, offset in
/// `{2, 4, .., 16}`.
pub fn encode_q_rx_lev_min_offset(w: &mut BitWriter, offset_db: u8) {
    encode_constrained(w, (offset_db as i64 / 2) - 1, 0, 3);
}

pub fn decode_q_rx_lev_min_offset(r: &mut BitReader) -> Result<u8, RrcError> {
    let raw = decode_constrained(r, 0, 3)?;
    Ok(((raw + 1) * 2) as u8)
}

/// P-Max, `value_dbm = raw - 30`, encoded in 6 bits.
pub fn encode_p_max(w: &mut BitWriter, dbm: i8) {
    encode_constrained(w, dbm as i64 + 30, 0, 6);
}

pub fn decode_p_max(r: &mut BitReader) -> Result<i8, RrcError> {
    let raw = decode_constrained(r, 0, 6)?;
    Ok((raw - 30) as i8)
}

/// PHICH Config: duration (1 bit) + resource (2 bits).
pub fn encode_phich_config(w: &mut BitWriter, duration: PhichDuration, resource: PhichResource) {
    w.write_bit(matches!(duration, PhichDuration::Extended));
    w.write_bits(resource.to_wire(), 2);
}

pub fn decode_phich_config(r: &mut BitReader) -> Result<(PhichDuration, PhichResource), RrcError> {
    let duration = if r.try_read_bits(1)? != 0 { PhichDuration::Extended } else { PhichDuration::Normal };
    let resource_raw = r.try_read_bits(2)?;
    let resource = PhichResource::from_wire(resource_raw)
        .ok_or_else(|| RrcError::InvalidInput(format!("invalid PHICH resource {resource_raw}")))?;
    Ok((duration, resource))
}

/// ARFCN-ValueEUTRA, 16 bits, no offset (0..=65535 per 36.331's
/// extended range; this implementation does not decode the extended
/// 18-bit NB-IoT variant).
pub fn encode_arfcn_value_eutra(w: &mut BitWriter, arfcn: u16) {
    w.write_bits(arfcn as u32, 16);
}

pub fn decode_arfcn_value_eutra(r: &mut BitReader) -> Result<u16, RrcError> {
    Ok(r.try_read_bits(16)? as u16)
}
