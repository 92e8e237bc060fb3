//! Paging IEs: the UE-identity choice and a paging record.

use crate::bit_cursor::{BitReader, BitWriter};
use crate::error::RrcError;
use crate::ie::codec::{decode_seq_len, encode_seq_len};

pub const MAX_PAGING_RECORDS: u32 = 16;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct STmsi {
    pub mmec: u8,
    pub m_tmsi: u32,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum UeIdentity {
    STmsi(STmsi),
    /// IMSI digits, 6..=21 BCD digits per 36.331.
    Imsi(Vec<u8>),
}

fn encode_ue_identity(w: &mut BitWriter, id: &UeIdentity) {
    match id {
        UeIdentity::STmsi(s) => {
            w.write_bit(false);
            w.write_bits(s.mmec as u32, 8);
            w.write_bits(s.m_tmsi, 32);
        }
        UeIdentity::Imsi(digits) => {
            w.write_bit(true);
            debug_assert!((6..=21).contains(&digits.len()));
            w.write_bits(digits.len() as u32, 5);
            for &d in digits {
                debug_assert!(d < 10);
                w.write_bits(d as u32, 4);
            }
        }
    }
}

fn decode_ue_identity(r: &mut BitReader) -> Result<UeIdentity, RrcError> {
    if r.try_read_bits(1)? == 0 {
        let mmec = r.try_read_bits(8)? as u8;
        let m_tmsi = r.try_read_bits(32)?;
        Ok(UeIdentity::STmsi(STmsi { mmec, m_tmsi }))
    } else {
        let len = r.try_read_bits(5)? as usize;
        if !(6..=21).contains(&len) {
            return Err(RrcError::InvalidInput(format!("invalid IMSI digit count {len}")));
        }
        let mut digits = Vec::with_capacity(len);
        for _ in 0..len {
            digits.push(r.try_read_bits(4)? as u8);
        }
        Ok(UeIdentity::Imsi(digits))
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CnDomain {
    Ps,
    Cs,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PagingRecord {
    pub ue_identity: UeIdentity,
    pub cn_domain: CnDomain,
}

pub fn encode_paging_record_list(w: &mut BitWriter, records: &[PagingRecord]) {
    encode_seq_len(w, records.len(), MAX_PAGING_RECORDS);
    for record in records {
        encode_ue_identity(w, &record.ue_identity);
        w.write_bit(matches!(record.cn_domain, CnDomain::Cs));
    }
}

pub fn decode_paging_record_list(r: &mut BitReader) -> Result<Vec<PagingRecord>, RrcError> {
    let count = decode_seq_len(r, MAX_PAGING_RECORDS)?;
    let mut records = Vec::with_capacity(count);
    for _ in 0..count {
        let ue_identity = decode_ue_identity(r)?;
        let cn_domain = if r.try_read_bits(1)? != 0 { CnDomain::Cs } else { CnDomain::Ps };
        records.push(PagingRecord { ue_identity, cn_domain });
    }
    Ok(records)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_paging_record_list_round_trip() {
        let records = vec![
            PagingRecord { ue_identity: UeIdentity::STmsi(STmsi { mmec: 7, m_tmsi: 0xDEADBEEF }), cn_domain: CnDomain::Ps },
            PagingRecord { ue_identity: UeIdentity::Imsi(vec![3, 1, 0, 1, 5, 0, 1, 2, 3, 4, 5]), cn_domain: CnDomain::Cs },
        ];
        let mut w = BitWriter::new();
        encode_paging_record_list(&mut w, &records);
        let msg = w.into_message();
        assert_eq!(decode_paging_record_list(&mut msg.reader()).unwrap(), records);
    }
}
