//! Turns decoded MIB/SIB payloads into human-readable cell reports,
//! and tracks which SIBs SIB1's scheduling info says to expect.

use std::io::Write;

use rrc::{Mib, Sib1, Sib2, Sib3, Sib4, Sib8, SibType};

use crate::fsm::{CellDescriptor, DecodedSibSet};

pub struct CellReporter {
    sink: Box<dyn Write + Send>,
}

impl CellReporter {
    pub fn new(sink: Box<dyn Write + Send>) -> Self {
        Self { sink }
    }

    pub fn print_mib(&mut self, cell: &CellDescriptor, mib: &Mib, sibs: &mut DecodedSibSet) {
        let _ = writeln!(
            self.sink,
            "MIB: n_id_cell={} dl_bandwidth={:?} phich_duration={:?} sfn={}",
            cell.n_id_cell, mib.dl_bandwidth, mib.phich_duration, cell.sfn
        );
        sibs.mib_printed = true;
    }

    pub fn print_sib1(&mut self, sib1: &Sib1, cell: &mut CellDescriptor, sibs: &mut DecodedSibSet) {
        if let Some(prev_tag) = cell.prev_si_value_tag {
            if prev_tag != sib1.system_info_value_tag {
                sibs.sib2_printed = false;
                sibs.sib3_printed = false;
                sibs.sib4_printed = false;
                sibs.sib8_printed = false;
            }
        }
        cell.prev_si_value_tag = Some(sib1.system_info_value_tag);

        match sib1.resolved_plmns() {
            Ok(plmns) => {
                for plmn in plmns {
                    let _ = writeln!(self.sink, "SIB1: PLMN mcc={:?} mnc={:?}", plmn.mcc.0, plmn.mnc.digits());
                }
            }
            Err(e) => {
                let _ = writeln!(self.sink, "SIB1: PLMN list malformed: {e}");
            }
        }
        let _ = writeln!(
            self.sink,
            "SIB1: tac={} cell_id={} barred={} value_tag={}",
            sib1.tac.0, sib1.cell_id.0, sib1.cell_barred, sib1.system_info_value_tag
        );

        sibs.sib3_expected = false;
        sibs.sib4_expected = false;
        sibs.sib8_expected = false;
        for si in &sib1.scheduling_info_list {
            for mapping in &si.sib_mapping {
                match mapping {
                    SibType::Type3 => sibs.sib3_expected = true,
                    SibType::Type4 => sibs.sib4_expected = true,
                    SibType::Type8 => sibs.sib8_expected = true,
                    _ => {}
                }
            }
        }

        sibs.sib1_printed = true;
    }

    pub fn print_sib2(&mut self, sib2: &Sib2, sibs: &mut DecodedSibSet) {
        let _ = writeln!(self.sink, "SIB2: time_alignment_timer_sf={}", sib2.time_alignment_timer_sf);
        sibs.sib2_printed = true;
    }

    pub fn print_sib3(&mut self, sib3: &Sib3, sibs: &mut DecodedSibSet) {
        let _ = writeln!(self.sink, "SIB3: q_hyst_db={} q_rx_lev_min={}", sib3.q_hyst_db, sib3.q_rx_lev_min);
        sibs.sib3_printed = true;
    }

    pub fn print_sib4(&mut self, sib4: &Sib4, sibs: &mut DecodedSibSet) {
        let _ = writeln!(self.sink, "SIB4: {} intra-freq neighbors", sib4.intra_freq_neighbors.len());
        sibs.sib4_printed = true;
    }

    pub fn print_sib8(&mut self, sib8: &Sib8, sibs: &mut DecodedSibSet) {
        let _ = writeln!(self.sink, "SIB8: {} band classes", sib8.band_classes.len());
        sibs.sib8_printed = true;
    }

    pub fn note_unsupported_sib(&mut self, tag: u8) {
        let _ = writeln!(self.sink, "not handling SIB {tag}");
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use common::{CellId, Mcc, Mnc, Tac};
    use rrc::{PlmnListEntry, SchedulingInfo, SiPeriodicity, SiWindowLength};

    fn sib1_with(scheduling_info_list: Vec<SchedulingInfo>, system_info_value_tag: u8) -> Sib1 {
        Sib1 {
            plmn_ids: vec![PlmnListEntry {
                mcc: Some(Mcc([0, 0, 1])),
                mnc: Mnc::TwoDigit([0, 1]),
                reserved_for_operator_use: false,
            }],
            tac: Tac(1),
            cell_id: CellId(1),
            cell_barred: false,
            intra_freq_reselection: true,
            csg_indication: false,
            csg_identity: None,
            q_rx_lev_min: -70,
            q_rx_lev_min_offset: None,
            p_max: None,
            freq_band_indicator: 1,
            scheduling_info_list,
            si_window_length: SiWindowLength::Ms5,
            system_info_value_tag,
        }
    }

    #[test]
    fn test_sib1_scheduling_drives_expectations() {
        let sib1 = sib1_with(
            vec![SchedulingInfo { si_periodicity: SiPeriodicity::Rf16, sib_mapping: vec![SibType::Type3, SibType::Type8] }],
            1,
        );
        let mut cell = CellDescriptor::default();
        let mut sibs = DecodedSibSet::default();
        let mut reporter = CellReporter::new(Box::new(std::io::sink()));

        reporter.print_sib1(&sib1, &mut cell, &mut sibs);

        assert!(sibs.sib3_expected);
        assert!(!sibs.sib4_expected);
        assert!(sibs.sib8_expected);
        assert!(sibs.sib1_printed);
    }

    #[test]
    fn test_value_tag_change_invalidates_previously_printed_sibs() {
        let mut cell = CellDescriptor::default();
        let mut sibs = DecodedSibSet::default();
        let mut reporter = CellReporter::new(Box::new(std::io::sink()));

        reporter.print_sib1(&sib1_with(Vec::new(), 7), &mut cell, &mut sibs);
        sibs.sib2_printed = true;
        sibs.sib3_printed = true;
        sibs.sib4_printed = true;
        sibs.sib8_printed = true;

        // Same value tag again: already-printed SIBs stay printed.
        reporter.print_sib1(&sib1_with(Vec::new(), 7), &mut cell, &mut sibs);
        assert!(sibs.sib2_printed);
        assert!(sibs.sib3_printed);
        assert!(sibs.sib4_printed);
        assert!(sibs.sib8_printed);

        // Value tag changes: the system information has been updated,
        // so every previously printed SIB (other than MIB/SIB1) must
        // be re-decoded and re-reported before the cell can complete.
        reporter.print_sib1(&sib1_with(Vec::new(), 8), &mut cell, &mut sibs);
        assert!(!sibs.sib2_printed);
        assert!(!sibs.sib3_printed);
        assert!(!sibs.sib4_printed);
        assert!(!sibs.sib8_printed);
        assert!(sibs.sib1_printed);
        assert_eq!(cell.prev_si_value_tag, Some(8));
    }
}
