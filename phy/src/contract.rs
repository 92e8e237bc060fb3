//! The PHY front end contract.
//!
//! Correlation, OFDM demodulation, channel estimation, and forward
//! error correction are out of scope for this crate (spec.md's
//! external collaborators) — this module only defines the boundary
//! the scanner FSM drives them through, one method per primitive the
//! FSM's state table calls out.

use crate::error::PhyError;
use common::{DlBandwidth, PhichDuration, PhichResource};

/// A borrowed view of interleaved I/Q samples, decoupled from the
/// scanner's own buffer representation so this crate never depends on
/// it (the scanner depends on `phy`, not the other way around).
#[derive(Debug, Clone, Copy)]
pub struct IqSamples<'a> {
    pub i: &'a [f32],
    pub q: &'a [f32],
}

/// A single detected correlation peak: where its frame appears to
/// start in the buffer, and the carrier frequency offset estimated
/// alongside it.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CorrPeak {
    pub symbol_start: usize,
    pub freq_offset_hz: f32,
}

/// Result of a coarse timing and frequency offset search: every peak
/// found, strongest first.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct CoarseTiming {
    pub peaks: Vec<CorrPeak>,
}

/// Result of fine PSS timing refinement: the sector identity (0..=2)
/// and the symbol index the PSS was found at.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PssResult {
    pub n_id_2: u16,
    pub symbol_idx: usize,
}

/// Result of an SSS search: the group identity (0..=167) and the
/// absolute sample index the radio frame starts at.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SssResult {
    pub n_id_1: u16,
    pub frame_start_idx: usize,
}

/// A channel-estimated subframe, opaque to the scanner beyond being
/// handed to the next decode stage.
#[derive(Debug, Clone)]
pub struct Subframe {
    pub subframe_idx: u8,
    pub n_ant: u8,
    /// Resource-element data, PHY-internal; the scanner never reads
    /// this directly.
    pub data: Vec<f32>,
}

/// A decoded MIB payload plus what the BCH decode itself discloses
/// beyond the bits: the antenna count (PBCH carries no explicit
/// `n_ant` field; it is inferred from which of the per-antenna-count
/// CRC masks clears) and `sfn_offset` (0..=3), the number of radio
/// frames since the one the MIB's `sfn_div_4` was encoded against —
/// PBCH is only retransmitted every 4 frames, so the full SFN is
/// `(sfn_div_4 << 2) | sfn_offset`, not `sfn_div_4 << 2` alone.
#[derive(Debug, Clone)]
pub struct BchDecodeResult {
    pub mib_bits: rrc::RrcMessage,
    pub n_ant: u8,
    pub sfn_offset: u8,
}

/// Downlink control information sufficient to locate and demodulate
/// the BCCH-DLSCH transport block this scanner cares about.
#[derive(Debug, Clone, Copy)]
pub struct DciInfo {
    pub rb_start: u16,
    pub n_rb: u16,
    pub mcs: u8,
}

/// The PHY front end: correlation, demodulation, and FEC, behind one
/// trait boundary. `&mut self` because a real implementation caches
/// FFT plans and channel estimates across calls.
pub trait PhyFrontend {
    fn find_coarse_timing_and_freq_offset(
        &mut self,
        iq: IqSamples<'_>,
        max_peaks: usize,
    ) -> Result<CoarseTiming, PhyError>;

    fn find_pss_and_fine_timing(&mut self, iq: IqSamples<'_>) -> Result<PssResult, PhyError>;

    fn find_sss(&mut self, iq: IqSamples<'_>, n_id_2: u16) -> Result<SssResult, PhyError>;

    fn get_subframe_and_ce(
        &mut self,
        iq: IqSamples<'_>,
        subframe_idx: u8,
        n_ant_hint: u8,
    ) -> Result<Subframe, PhyError>;

    fn bch_channel_decode(&mut self, subframe: &Subframe) -> Result<BchDecodeResult, PhyError>;

    fn pdcch_channel_decode(&mut self, subframe: &Subframe) -> Result<DciInfo, PhyError>;

    fn pdsch_channel_decode(
        &mut self,
        subframe: &Subframe,
        dci: &DciInfo,
    ) -> Result<rrc::RrcMessage, PhyError>;
}

/// Maps a decoded [`common::DlBandwidth`] to the resource-block count
/// and FFT padding a PHY implementation needs to size its front end —
/// a pure lookup any `PhyFrontend` implementation will want, kept here
/// so it is defined once.
pub fn bandwidth_params(bw: DlBandwidth) -> (u16, u16) {
    (bw.n_rb_dl(), bw.fft_pad_size())
}

/// PHICH group count for one subframe, `ceil(N_g * N_rb_dl / 8)` with
/// `N_g` taken from [`PhichResource::as_fraction`] rather than
/// truncated.
pub fn phich_n_groups(resource: PhichResource, duration: PhichDuration, n_rb_dl: u16) -> u32 {
    let (num, den) = resource.as_fraction();
    let groups = (num as u32 * n_rb_dl as u32).div_ceil(8 * den as u32);
    match duration {
        PhichDuration::Normal => groups.max(1),
        PhichDuration::Extended => (groups * 2).max(1),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_phich_n_groups_uses_exact_fraction() {
        // N_g = 1/6, N_rb_dl = 50 -> ceil(50/48) = 2, never floors to 0.
        let groups = phich_n_groups(PhichResource::OneSixth, PhichDuration::Normal, 50);
        assert_eq!(groups, 2);
    }
}
