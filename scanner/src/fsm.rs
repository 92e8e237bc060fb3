//! The scanner state machine: drives the PHY contract across a
//! sliding sample buffer, decoding MIB and SIB1/2/3/4/8 for each
//! correlation peak in turn.

use phy::{BchDecodeResult, CoarseTiming, CorrPeak, IqSamples, PhyError, PhyFrontend};
use rrc::{unpack_bcch_bch_msg, unpack_bcch_dlsch_msg, BcchDlSchMsg, Mib, Sib};
use common::{Pci, PhichDuration, PhichResource};
use tracing::{debug, info};

use crate::reporter::CellReporter;
use crate::sample_buffer::{SampleBuffer, ONE_FRAME_NUM_SAMPS, ONE_SUBFRAME_NUM_SAMPS};

const COARSE_TIMING_SEARCH_NUM_SAMPS: usize = 12 * ONE_SUBFRAME_NUM_SAMPS;
const BCH_DECODE_NUM_SAMPS: usize = 2 * ONE_FRAME_NUM_SAMPS;
const PDSCH_DECODE_SIB1_NUM_SAMPS: usize = 2 * ONE_FRAME_NUM_SAMPS;
const PDSCH_DECODE_SI_GENERIC_NUM_SAMPS: usize = ONE_FRAME_NUM_SAMPS;
const MAX_CORR_PEAKS: usize = 4;

/// A view of the buffer's unconsumed tail, constructed inline at each
/// call site so the borrow stays scoped to `buf` alone and the caller
/// remains free to borrow other `Scanner` fields (e.g. `phy`) in the
/// same expression.
fn iq_view(buf: &SampleBuffer) -> IqSamples<'_> {
    IqSamples { i: &buf.i_plane()[buf.r()..], q: &buf.q_plane()[buf.r()..] }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ScannerState {
    CoarseTimingSearch,
    PssAndFineTimingSearch,
    SssSearch,
    BchDecode,
    PdschDecodeSib1,
    PdschDecodeSiGeneric,
}

/// Everything decoded so far about the cell currently being scanned.
#[derive(Debug, Clone, Copy)]
pub struct CellDescriptor {
    pub n_id_1: u16,
    pub n_id_2: u16,
    pub n_id_cell: u16,
    pub n_ant: u8,
    pub n_rb_dl: u16,
    pub fft_pad_size: u16,
    pub phich_duration: PhichDuration,
    pub phich_resource: PhichResource,
    pub sfn: u16,
    pub n_sfr: u8,
    pub prev_si_value_tag: Option<u8>,
}

impl Default for CellDescriptor {
    fn default() -> Self {
        Self {
            n_id_1: 0,
            n_id_2: 0,
            n_id_cell: 0,
            n_ant: 0,
            n_rb_dl: 6,
            fft_pad_size: 988,
            phich_duration: PhichDuration::Normal,
            phich_resource: PhichResource::OneSixth,
            sfn: 0,
            n_sfr: 0,
            prev_si_value_tag: None,
        }
    }
}

/// Which SIBs have been reported for the current cell, and which
/// ones SIB1's scheduling info said to expect.
#[derive(Debug, Clone, Copy, Default)]
pub struct DecodedSibSet {
    pub mib_printed: bool,
    pub sib1_printed: bool,
    pub sib2_printed: bool,
    pub sib3_printed: bool,
    pub sib4_printed: bool,
    pub sib8_printed: bool,
    pub sib3_expected: bool,
    pub sib4_expected: bool,
    pub sib8_expected: bool,
}

impl DecodedSibSet {
    pub fn cell_complete(&self) -> bool {
        self.mib_printed
            && self.sib1_printed
            && self.sib2_printed
            && self.sib3_printed == self.sib3_expected
            && self.sib4_printed == self.sib4_expected
            && self.sib8_printed == self.sib8_expected
    }
}

/// What happened during one `work()` call: how many input bytes were
/// consumed and how many cells reached completion.
#[derive(Debug, Clone, Copy, Default)]
pub struct ScanStats {
    pub input_consumed: usize,
    pub cells_completed: usize,
}

pub struct Scanner<P: PhyFrontend> {
    buf: SampleBuffer,
    phy: P,
    state: ScannerState,
    cell: CellDescriptor,
    sibs: DecodedSibSet,
    peak_idx: usize,
    timing: CoarseTiming,
    reporter: CellReporter,
}

impl<P: PhyFrontend> Scanner<P> {
    pub fn new(phy: P, reporter: CellReporter) -> Self {
        Self {
            buf: SampleBuffer::new(),
            phy,
            state: ScannerState::CoarseTimingSearch,
            cell: CellDescriptor::default(),
            sibs: DecodedSibSet::default(),
            peak_idx: 0,
            timing: CoarseTiming::default(),
            reporter,
        }
    }

    pub fn state(&self) -> ScannerState {
        self.state
    }

    fn init_cell(&mut self) {
        self.state = ScannerState::CoarseTimingSearch;
        self.cell = CellDescriptor::default();
        self.sibs = DecodedSibSet::default();
    }

    fn num_samps_needed(&self) -> usize {
        match self.state {
            ScannerState::CoarseTimingSearch => COARSE_TIMING_SEARCH_NUM_SAMPS,
            ScannerState::PssAndFineTimingSearch => COARSE_TIMING_SEARCH_NUM_SAMPS,
            ScannerState::SssSearch => COARSE_TIMING_SEARCH_NUM_SAMPS,
            ScannerState::BchDecode => BCH_DECODE_NUM_SAMPS,
            ScannerState::PdschDecodeSib1 => PDSCH_DECODE_SIB1_NUM_SAMPS,
            ScannerState::PdschDecodeSiGeneric => PDSCH_DECODE_SI_GENERIC_NUM_SAMPS,
        }
    }

    fn current_peak(&self) -> Option<CorrPeak> {
        self.timing.peaks.get(self.peak_idx).copied()
    }

    /// Process one ingest's worth of input samples, running the state
    /// machine as far forward as the buffer allows.
    pub fn work(&mut self, input: &[i8]) -> ScanStats {
        let mut stats = ScanStats::default();

        let deferred = if self.buf.has_room_for(input.len()) {
            self.buf.ingest(input);
            stats.input_consumed = input.len();
            None
        } else {
            Some(input)
        };

        if self.state != ScannerState::CoarseTimingSearch {
            if let Some(peak) = self.current_peak() {
                self.buf.freq_shift(0, self.buf.w(), peak.freq_offset_hz);
            }
        }

        while self.buf.r() < self.buf.w().saturating_sub(self.num_samps_needed()) {
            if self.sibs.cell_complete() {
                info!(n_id_cell = self.cell.n_id_cell, "cell scan complete");
                stats.cells_completed += 1;
                self.peak_idx += 1;
                self.init_cell();
                continue;
            }

            self.step();
        }

        let active_offset = self.current_peak().map(|p| p.freq_offset_hz).unwrap_or(0.0);
        self.buf.compact(active_offset);

        if let Some(input) = deferred {
            self.buf.ingest(input);
            stats.input_consumed = input.len();
        }

        stats
    }

    fn rewind_to_coarse_search(&mut self) {
        self.state = ScannerState::CoarseTimingSearch;
        self.buf.set_r(self.buf.r() + COARSE_TIMING_SEARCH_NUM_SAMPS);
    }

    fn step(&mut self) {
        match self.state {
            ScannerState::CoarseTimingSearch => self.step_coarse_timing(),
            ScannerState::PssAndFineTimingSearch => self.step_pss(),
            ScannerState::SssSearch => self.step_sss(),
            ScannerState::BchDecode => self.step_bch(),
            ScannerState::PdschDecodeSib1 => self.step_sib1(),
            ScannerState::PdschDecodeSiGeneric => self.step_si_generic(),
        }
    }

    fn step_coarse_timing(&mut self) {
        let iq = iq_view(&self.buf);
        match self.phy.find_coarse_timing_and_freq_offset(iq, MAX_CORR_PEAKS) {
            Ok(timing) if self.peak_idx < timing.peaks.len() => {
                self.timing = timing;
                let offset = self.timing.peaks[self.peak_idx].freq_offset_hz;
                debug!(peak_idx = self.peak_idx, freq_offset_hz = offset, "coarse timing found");
                self.buf.freq_shift(0, self.buf.w(), offset);
                self.state = ScannerState::PssAndFineTimingSearch;
            }
            _ => self.rewind_to_coarse_search(),
        }
    }

    fn step_pss(&mut self) {
        let iq = iq_view(&self.buf);
        match self.phy.find_pss_and_fine_timing(iq) {
            Ok(result) => {
                self.cell.n_id_2 = result.n_id_2;
                self.state = ScannerState::SssSearch;
            }
            Err(_) => self.rewind_to_coarse_search(),
        }
    }

    fn step_sss(&mut self) {
        let iq = iq_view(&self.buf);
        match self.phy.find_sss(iq, self.cell.n_id_2) {
            Ok(result) => {
                self.cell.n_id_1 = result.n_id_1;
                self.cell.n_id_cell = Pci::from_parts(result.n_id_1, self.cell.n_id_2).0;
                debug!(n_id_cell = self.cell.n_id_cell, "sss found, cell identity resolved");
                self.state = ScannerState::BchDecode;
                let mut frame_start = result.frame_start_idx;
                while frame_start < self.buf.r() {
                    frame_start += ONE_FRAME_NUM_SAMPS;
                }
                self.buf.set_r(frame_start);
            }
            Err(_) => self.rewind_to_coarse_search(),
        }
    }

    fn step_bch(&mut self) {
        let iq = iq_view(&self.buf);
        let mut sfn_offset = 0u8;
        let outcome: Result<Mib, PhyError> = (|| {
            let subframe = self.phy.get_subframe_and_ce(iq, 0, 4)?;
            let BchDecodeResult { mib_bits, n_ant, sfn_offset: offset } = self.phy.bch_channel_decode(&subframe)?;
            self.cell.n_ant = n_ant;
            sfn_offset = offset;
            Ok(unpack_bcch_bch_msg(&mib_bits)?)
        })();

        match outcome {
            Ok(mib) => {
                self.cell.n_rb_dl = mib.dl_bandwidth.n_rb_dl();
                self.cell.fft_pad_size = mib.dl_bandwidth.fft_pad_size();
                self.cell.phich_duration = mib.phich_duration;
                self.cell.phich_resource = mib.phich_resource;
                // PBCH only carries sfn_div_4; the PHY's sfn_offset (0..=3)
                // fills in which of the 4 frames since then this one is.
                self.cell.sfn = ((mib.sfn_div_4 as u16) << 2) | sfn_offset as u16;
                self.reporter.print_mib(&self.cell, &mib, &mut self.sibs);
                self.state = ScannerState::PdschDecodeSib1;
                if self.cell.sfn % 2 != 0 {
                    self.buf.set_r(self.buf.r() + ONE_FRAME_NUM_SAMPS);
                    self.cell.sfn += 1;
                }
            }
            Err(_) => self.rewind_to_coarse_search(),
        }
    }

    fn decode_bcch_dlsch(&mut self, subframe_idx: u8) -> Result<BcchDlSchMsg, PhyError> {
        let iq = iq_view(&self.buf);
        let subframe = self.phy.get_subframe_and_ce(iq, subframe_idx, self.cell.n_ant)?;
        let dci = self.phy.pdcch_channel_decode(&subframe)?;
        let payload = self.phy.pdsch_channel_decode(&subframe, &dci)?;
        Ok(unpack_bcch_dlsch_msg(&payload)?)
    }

    fn step_sib1(&mut self) {
        match self.decode_bcch_dlsch(5) {
            Ok(BcchDlSchMsg::Sib1(sib1)) => {
                self.reporter.print_sib1(&sib1, &mut self.cell, &mut self.sibs);
                self.state = ScannerState::PdschDecodeSiGeneric;
                self.cell.n_sfr = 0;
            }
            _ => {
                self.buf.set_r(self.buf.r() + PDSCH_DECODE_SIB1_NUM_SAMPS);
                self.cell.sfn += 2;
            }
        }
    }

    fn step_si_generic(&mut self) {
        if let Ok(BcchDlSchMsg::SystemInformation(sibs)) = self.decode_bcch_dlsch(self.cell.n_sfr) {
            for sib in sibs {
                match sib {
                    Sib::Type2(sib2) => self.reporter.print_sib2(&sib2, &mut self.sibs),
                    Sib::Type3(sib3) => self.reporter.print_sib3(&sib3, &mut self.sibs),
                    Sib::Type4(sib4) => self.reporter.print_sib4(&sib4, &mut self.sibs),
                    Sib::Type8(sib8) => self.reporter.print_sib8(&sib8, &mut self.sibs),
                    Sib::Type1(_) => {}
                    Sib::Unsupported(tag) => self.reporter.note_unsupported_sib(tag),
                }
            }
        }

        self.cell.n_sfr += 1;
        if self.cell.n_sfr >= 10 {
            self.cell.n_sfr = 0;
            self.cell.sfn += 1;
            self.buf.set_r(self.buf.r() + PDSCH_DECODE_SI_GENERIC_NUM_SAMPS);
        }
    }
}
