//! A scripted [`PhyFrontend`] for driving scanner tests without a
//! real correlator or FEC stack: each primitive call pops the next
//! pre-programmed result off its own queue, or reports `NotFound`
//! once the queue is empty. This plays the same "swap in a fake
//! behind the trait boundary" role the teacher's feature-gated
//! hardware adapter plays behind its own trait.

use std::collections::VecDeque;

use crate::contract::{BchDecodeResult, CoarseTiming, DciInfo, IqSamples, PhyFrontend, PssResult, Subframe, SssResult};
use crate::error::PhyError;

#[derive(Default)]
pub struct ScriptedPhyFrontend {
    pub coarse_timing: VecDeque<Result<CoarseTiming, PhyError>>,
    pub pss: VecDeque<Result<PssResult, PhyError>>,
    pub sss: VecDeque<Result<SssResult, PhyError>>,
    pub subframes: VecDeque<Result<Subframe, PhyError>>,
    pub bch: VecDeque<Result<BchDecodeResult, PhyError>>,
    pub pdcch: VecDeque<Result<DciInfo, PhyError>>,
    pub pdsch: VecDeque<Result<rrc::RrcMessage, PhyError>>,
}

impl ScriptedPhyFrontend {
    pub fn new() -> Self {
        Self::default()
    }
}

impl PhyFrontend for ScriptedPhyFrontend {
    fn find_coarse_timing_and_freq_offset(&mut self, _iq: IqSamples<'_>, _max_peaks: usize) -> Result<CoarseTiming, PhyError> {
        self.coarse_timing.pop_front().unwrap_or(Err(PhyError::NotFound))
    }

    fn find_pss_and_fine_timing(&mut self, _iq: IqSamples<'_>) -> Result<PssResult, PhyError> {
        self.pss.pop_front().unwrap_or(Err(PhyError::NotFound))
    }

    fn find_sss(&mut self, _iq: IqSamples<'_>, _n_id_2: u16) -> Result<SssResult, PhyError> {
        self.sss.pop_front().unwrap_or(Err(PhyError::NotFound))
    }

    fn get_subframe_and_ce(&mut self, _iq: IqSamples<'_>, _subframe_idx: u8, _n_ant_hint: u8) -> Result<Subframe, PhyError> {
        self.subframes.pop_front().unwrap_or(Err(PhyError::NotFound))
    }

    fn bch_channel_decode(&mut self, _subframe: &Subframe) -> Result<BchDecodeResult, PhyError> {
        self.bch.pop_front().unwrap_or(Err(PhyError::NotFound))
    }

    fn pdcch_channel_decode(&mut self, _subframe: &Subframe) -> Result<DciInfo, PhyError> {
        self.pdcch.pop_front().unwrap_or(Err(PhyError::NotFound))
    }

    fn pdsch_channel_decode(&mut self, _subframe: &Subframe, _dci: &DciInfo) -> Result<rrc::RrcMessage, PhyError> {
        self.pdsch.pop_front().unwrap_or(Err(PhyError::NotFound))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::contract::CorrPeak;

    #[test]
    fn test_empty_queue_reports_not_found() {
        let mut phy = ScriptedPhyFrontend::new();
        let iq = IqSamples { i: &[], q: &[] };
        assert_eq!(phy.find_pss_and_fine_timing(iq), Err(PhyError::NotFound));
    }

    #[test]
    fn test_scripted_result_is_returned_once() {
        let mut phy = ScriptedPhyFrontend::new();
        phy.coarse_timing.push_back(Ok(CoarseTiming { peaks: vec![CorrPeak { symbol_start: 10, freq_offset_hz: 1.5 }] }));
        let iq = IqSamples { i: &[], q: &[] };
        let result = phy.find_coarse_timing_and_freq_offset(iq, 4).unwrap();
        assert_eq!(result.peaks.len(), 1);
        assert_eq!(phy.find_coarse_timing_and_freq_offset(iq, 4), Err(PhyError::NotFound));
    }
}
