//! Neighbor-cell list IEs used by SIB4: intra-frequency neighbor
//! cells and blacklisted physical-cell-identity ranges.

use crate::bit_cursor::{BitReader, BitWriter};
use crate::error::RrcError;
use crate::ie::codec::{decode_seq_len, encode_seq_len};
use common::Pci;

pub const MAX_NEIGHBORS: u32 = 16;
pub const MAX_BLACKLIST: u32 = 16;

/// Q-Offset-Range: 31 values in `{-24, -22, .., 24}` dB, 5 bits.
fn encode_q_offset_range(w: &mut BitWriter, db: i8) {
    let idx = ((db as i32 + 24) / 2) as u32;
    w.write_bits(idx, 5);
}

fn decode_q_offset_range(r: &mut BitReader) -> Result<i8, RrcError> {
    let idx = r.try_read_bits(5)?;
    Ok((idx as i32 * 2 - 24) as i8)
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct IntraFreqNeighborCell {
    pub pci: Pci,
    pub q_offset_cell_db: i8,
}

pub fn encode_intra_freq_neighbor_list(w: &mut BitWriter, cells: &[IntraFreqNeighborCell]) {
    encode_seq_len(w, cells.len(), MAX_NEIGHBORS);
    for cell in cells {
        w.write_bits(cell.pci.0 as u32, 9);
        encode_q_offset_range(w, cell.q_offset_cell_db);
    }
}

pub fn decode_intra_freq_neighbor_list(r: &mut BitReader) -> Result<Vec<IntraFreqNeighborCell>, RrcError> {
    let count = decode_seq_len(r, MAX_NEIGHBORS)?;
    let mut cells = Vec::with_capacity(count);
    for _ in 0..count {
        let pci_raw = r.try_read_bits(9)?;
        let pci = Pci::new(pci_raw as u16)
            .ok_or_else(|| RrcError::InvalidInput(format!("invalid PCI {pci_raw} in neighbor list")))?;
        let q_offset_cell_db = decode_q_offset_range(r)?;
        cells.push(IntraFreqNeighborCell { pci, q_offset_cell_db });
    }
    Ok(cells)
}

/// A blacklisted range of physical cell identities: `start..=(start +
/// range - 1)`, `range` in `{1, 2, 4, 8, .., 504}` encoded as its
/// base-2 log in 4 bits (0 meaning a single cell).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PhysCellIdRange {
    pub start: Pci,
    pub range_log2: u8,
}

pub fn encode_blacklist(w: &mut BitWriter, ranges: &[PhysCellIdRange]) {
    encode_seq_len(w, ranges.len(), MAX_BLACKLIST);
    for range in ranges {
        w.write_bits(range.start.0 as u32, 9);
        w.write_bits(range.range_log2 as u32, 4);
    }
}

pub fn decode_blacklist(r: &mut BitReader) -> Result<Vec<PhysCellIdRange>, RrcError> {
    let count = decode_seq_len(r, MAX_BLACKLIST)?;
    let mut ranges = Vec::with_capacity(count);
    for _ in 0..count {
        let pci_raw = r.try_read_bits(9)?;
        let start = Pci::new(pci_raw as u16)
            .ok_or_else(|| RrcError::InvalidInput(format!("invalid PCI {pci_raw} in blacklist")))?;
        let range_log2 = r.try_read_bits(4)? as u8;
        ranges.push(PhysCellIdRange { start, range_log2 });
    }
    Ok(ranges)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_intra_freq_neighbor_list_round_trip() {
        let cells = vec![
            IntraFreqNeighborCell { pci: Pci(12), q_offset_cell_db: -4 },
            IntraFreqNeighborCell { pci: Pci(300), q_offset_cell_db: 6 },
        ];
        let mut w = BitWriter::new();
        encode_intra_freq_neighbor_list(&mut w, &cells);
        let msg = w.into_message();
        assert_eq!(decode_intra_freq_neighbor_list(&mut msg.reader()).unwrap(), cells);
    }

    #[test]
    fn test_blacklist_round_trip() {
        let ranges = vec![PhysCellIdRange { start: Pci(0), range_log2: 3 }];
        let mut w = BitWriter::new();
        encode_blacklist(&mut w, &ranges);
        let msg = w.into_message();
        assert_eq!(decode_blacklist(&mut msg.reader()).unwrap(), ranges);
    }
}
