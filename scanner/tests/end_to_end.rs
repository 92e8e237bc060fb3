//! End-to-end scenarios driving the full scanner state machine with a
//! scripted PHY front end: ingest raw samples in, decoded cell
//! reports out.

use common::{CellId, DlBandwidth, Mcc, Mnc, PhichDuration, PhichResource, Tac};
use phy::reference::ScriptedPhyFrontend;
use phy::{BchDecodeResult, CoarseTiming, CorrPeak, DciInfo, PssResult, Subframe, SssResult};
use rrc::{
    pack_bcch_bch_msg, pack_bcch_dlsch_msg, BcchDlSchMsg, Mib, PlmnListEntry, SchedulingInfo, Sib,
    Sib1, Sib2, SiWindowLength,
};
use scanner::{CellReporter, Scanner};

fn placeholder_subframe(subframe_idx: u8) -> Subframe {
    Subframe { subframe_idx, n_ant: 1, data: Vec::new() }
}

fn minimal_sib1(scheduling_info_list: Vec<SchedulingInfo>) -> Sib1 {
    Sib1 {
        plmn_ids: vec![PlmnListEntry { mcc: Some(Mcc([0, 0, 1])), mnc: Mnc::TwoDigit([0, 1]), reserved_for_operator_use: false }],
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
        system_info_value_tag: 7,
    }
}

/// Script a single-peak, single-frequency cell whose schedule only
/// calls for SIB2 (no SIB3/4/8), and drive it through one `work()`
/// call on a buffer large enough that every state transition fires in
/// a single pass.
#[test]
fn test_single_cell_scan_reaches_completion() {
    let mut phy = ScriptedPhyFrontend::new();

    phy.coarse_timing.push_back(Ok(CoarseTiming { peaks: vec![CorrPeak { symbol_start: 0, freq_offset_hz: 0.0 }] }));
    phy.pss.push_back(Ok(PssResult { n_id_2: 0, symbol_idx: 0 }));
    phy.sss.push_back(Ok(SssResult { n_id_1: 0, frame_start_idx: 0 }));

    let mib = Mib { dl_bandwidth: DlBandwidth::N6, phich_duration: PhichDuration::Normal, phich_resource: PhichResource::OneSixth, sfn_div_4: 0 };
    phy.subframes.push_back(Ok(placeholder_subframe(0)));
    phy.bch.push_back(Ok(BchDecodeResult { mib_bits: pack_bcch_bch_msg(&mib), n_ant: 1, sfn_offset: 0 }));

    let sib1 = minimal_sib1(Vec::new());
    phy.subframes.push_back(Ok(placeholder_subframe(5)));
    phy.pdcch.push_back(Ok(DciInfo { rb_start: 0, n_rb: 6, mcs: 0 }));
    phy.pdsch.push_back(Ok(pack_bcch_dlsch_msg(&BcchDlSchMsg::Sib1(sib1))));

    let sib2 = Sib2 {
        ac_barring_info: None,
        ul_arfcn: None,
        ul_bandwidth: None,
        additional_spectrum_emission: 1,
        mbsfn_subframe_configs: Vec::new(),
        time_alignment_timer_sf: 0,
    };
    phy.subframes.push_back(Ok(placeholder_subframe(0)));
    phy.pdcch.push_back(Ok(DciInfo { rb_start: 0, n_rb: 6, mcs: 0 }));
    phy.pdsch.push_back(Ok(pack_bcch_dlsch_msg(&BcchDlSchMsg::SystemInformation(vec![Sib::Type2(sib2)]))));

    let reporter = CellReporter::new(Box::new(Vec::<u8>::new()));
    let mut sc_scanner = Scanner::new(phy, reporter);

    let input = vec![1i8; 1_400_000];
    let stats = sc_scanner.work(&input);

    assert_eq!(stats.cells_completed, 1);
}

/// A coarse timing search that never finds a peak should keep
/// rewinding through `CoarseTimingSearch` rather than getting stuck.
#[test]
fn test_no_signal_never_completes_a_cell() {
    let phy = ScriptedPhyFrontend::new();
    let reporter = CellReporter::new(Box::new(std::io::sink()));
    let mut sc_scanner = Scanner::new(phy, reporter);

    let input = vec![1i8; 1_400_000];
    let stats = sc_scanner.work(&input);

    assert_eq!(stats.cells_completed, 0);
}
