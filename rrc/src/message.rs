//! Top-level RRC message and SIB bodies: BCCH-BCH (MIB), BCCH-DLSCH
//! (SIB1 or a SystemInformation container), and PCCH (Paging).

use crate::bit_cursor::{BitReader, BitWriter, RrcMessage};
use crate::error::RrcError;
use crate::ie::cdma2000::{decode_band_class_list, decode_cdma_async_time, decode_cdma_sync_time,
    encode_band_class_list, encode_cdma_async_time, encode_cdma_sync_time, CdmaBandClass};
use crate::ie::cell_access::{decode_arfcn_value_eutra, decode_cell_identity, decode_csg_identity,
    decode_p_max, decode_phich_config, decode_q_rx_lev_min, decode_q_rx_lev_min_offset, decode_tac,
    encode_arfcn_value_eutra, encode_cell_identity, encode_csg_identity, encode_p_max,
    encode_phich_config, encode_q_rx_lev_min, encode_q_rx_lev_min_offset, encode_tac};
use crate::ie::codec::{decode_seq_len, encode_seq_len};
use crate::ie::neighbors::{decode_blacklist, decode_intra_freq_neighbor_list, encode_blacklist,
    encode_intra_freq_neighbor_list, IntraFreqNeighborCell, PhysCellIdRange, MAX_BLACKLIST, MAX_NEIGHBORS};
use crate::ie::paging::{decode_paging_record_list, encode_paging_record_list, PagingRecord, MAX_PAGING_RECORDS};
use crate::ie::plmn::{decode_plmn_identity, encode_plmn_identity};
use crate::ie::reselection::{decode_q_hyst, decode_s_search, decode_speed_state_scale_factors,
    decode_t_reselection, encode_q_hyst, encode_s_search, encode_speed_state_scale_factors,
    encode_t_reselection, SpeedStateScaleFactors};
use common::{CellId, Mcc, Mnc, PhichDuration, PhichResource, PlmnId, Tac, DlBandwidth};

const MAX_PLMN_IDS: u32 = 6;
const MAX_SCHED_INFO: u32 = 32;
const MAX_SIB_MAPPING: u32 = 32;
const MAX_MBSFN_CONFIGS: u32 = 8;

// ---------------------------------------------------------------- MIB

/// Master Information Block, carried on BCCH-BCH. Fixed 24-bit
/// payload: the 14 bits this implementation decodes plus 10 spare
/// bits, written as zero and never read back (the reference decoder
/// does not read them either).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Mib {
    pub dl_bandwidth: DlBandwidth,
    pub phich_duration: PhichDuration,
    pub phich_resource: PhichResource,
    pub sfn_div_4: u8,
}

pub fn pack_bcch_bch_msg(mib: &Mib) -> RrcMessage {
    let mut w = BitWriter::new();
    w.write_bits(mib.dl_bandwidth.to_wire(), 3);
    encode_phich_config(&mut w, mib.phich_duration, mib.phich_resource);
    w.write_bits(mib.sfn_div_4 as u32, 8);
    w.write_bits(0, 10);
    w.into_message()
}

pub fn unpack_bcch_bch_msg(msg: &RrcMessage) -> Result<Mib, RrcError> {
    let mut r = msg.reader();
    let dl_bw_raw = r.try_read_bits(3)?;
    let dl_bandwidth = DlBandwidth::from_wire(dl_bw_raw)
        .ok_or_else(|| RrcError::InvalidInput(format!("invalid DL bandwidth {dl_bw_raw}")))?;
    let (phich_duration, phich_resource) = decode_phich_config(&mut r)?;
    let sfn_div_4 = r.try_read_bits(8)? as u8;
    Ok(Mib { dl_bandwidth, phich_duration, phich_resource, sfn_div_4 })
}

// --------------------------------------------------------------- SIB1

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SiPeriodicity {
    Rf8,
    Rf16,
    Rf32,
    Rf64,
    Rf128,
    Rf256,
    Rf512,
}

impl SiPeriodicity {
    pub fn n_frames(&self) -> u32 {
        match self {
            SiPeriodicity::Rf8 => 8,
            SiPeriodicity::Rf16 => 16,
            SiPeriodicity::Rf32 => 32,
            SiPeriodicity::Rf64 => 64,
            SiPeriodicity::Rf128 => 128,
            SiPeriodicity::Rf256 => 256,
            SiPeriodicity::Rf512 => 512,
        }
    }

    fn from_wire(v: u32) -> Result<Self, RrcError> {
        Ok(match v {
            0 => SiPeriodicity::Rf8,
            1 => SiPeriodicity::Rf16,
            2 => SiPeriodicity::Rf32,
            3 => SiPeriodicity::Rf64,
            4 => SiPeriodicity::Rf128,
            5 => SiPeriodicity::Rf256,
            6 => SiPeriodicity::Rf512,
            _ => return Err(RrcError::InvalidInput(format!("invalid SI periodicity {v}"))),
        })
    }

    fn to_wire(self) -> u32 {
        match self {
            SiPeriodicity::Rf8 => 0,
            SiPeriodicity::Rf16 => 1,
            SiPeriodicity::Rf32 => 2,
            SiPeriodicity::Rf64 => 3,
            SiPeriodicity::Rf128 => 4,
            SiPeriodicity::Rf256 => 5,
            SiPeriodicity::Rf512 => 6,
        }
    }
}

/// SIB type as carried in a scheduling-info mapping entry. Only
/// Type3/Type4/Type8 drive this implementation's expected-SIB
/// tracking; the rest are decoded losslessly but otherwise inert.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SibType {
    Type3,
    Type4,
    Type5,
    Type6,
    Type7,
    Type8,
    Type9,
    Type10,
    Type11,
    Type12,
    Type13,
    Spare(u8),
}

impl SibType {
    fn from_wire(v: u32) -> Self {
        match v {
            0 => SibType::Type3,
            1 => SibType::Type4,
            2 => SibType::Type5,
            3 => SibType::Type6,
            4 => SibType::Type7,
            5 => SibType::Type8,
            6 => SibType::Type9,
            7 => SibType::Type10,
            8 => SibType::Type11,
            9 => SibType::Type12,
            10 => SibType::Type13,
            other => SibType::Spare(other as u8),
        }
    }

    fn to_wire(self) -> u32 {
        match self {
            SibType::Type3 => 0,
            SibType::Type4 => 1,
            SibType::Type5 => 2,
            SibType::Type6 => 3,
            SibType::Type7 => 4,
            SibType::Type8 => 5,
            SibType::Type9 => 6,
            SibType::Type10 => 7,
            SibType::Type11 => 8,
            SibType::Type12 => 9,
            SibType::Type13 => 10,
            SibType::Spare(v) => v as u32,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SchedulingInfo {
    pub si_periodicity: SiPeriodicity,
    pub sib_mapping: Vec<SibType>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SiWindowLength {
    Ms1,
    Ms2,
    Ms5,
    Ms10,
    Ms15,
    Ms20,
    Ms40,
}

impl SiWindowLength {
    pub fn as_ms(&self) -> u32 {
        match self {
            SiWindowLength::Ms1 => 1,
            SiWindowLength::Ms2 => 2,
            SiWindowLength::Ms5 => 5,
            SiWindowLength::Ms10 => 10,
            SiWindowLength::Ms15 => 15,
            SiWindowLength::Ms20 => 20,
            SiWindowLength::Ms40 => 40,
        }
    }

    fn from_wire(v: u32) -> Result<Self, RrcError> {
        Ok(match v {
            0 => SiWindowLength::Ms1,
            1 => SiWindowLength::Ms2,
            2 => SiWindowLength::Ms5,
            3 => SiWindowLength::Ms10,
            4 => SiWindowLength::Ms15,
            5 => SiWindowLength::Ms20,
            6 => SiWindowLength::Ms40,
            _ => return Err(RrcError::InvalidInput(format!("invalid SI window length {v}"))),
        })
    }

    fn to_wire(self) -> u32 {
        match self {
            SiWindowLength::Ms1 => 0,
            SiWindowLength::Ms2 => 1,
            SiWindowLength::Ms5 => 2,
            SiWindowLength::Ms10 => 3,
            SiWindowLength::Ms15 => 4,
            SiWindowLength::Ms20 => 5,
            SiWindowLength::Ms40 => 6,
        }
    }
}

/// A single PLMN list entry. `mcc` is `None` when this entry reuses
/// the previous entry's MCC (SIB1's optional-MCC-reuse rule).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PlmnListEntry {
    pub mcc: Option<Mcc>,
    pub mnc: Mnc,
    pub reserved_for_operator_use: bool,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Sib1 {
    pub plmn_ids: Vec<PlmnListEntry>,
    pub tac: Tac,
    pub cell_id: CellId,
    pub cell_barred: bool,
    pub intra_freq_reselection: bool,
    pub csg_indication: bool,
    pub csg_identity: Option<u32>,
    pub q_rx_lev_min: i8,
    pub q_rx_lev_min_offset: Option<u8>,
    pub p_max: Option<i8>,
    pub freq_band_indicator: u8,
    pub scheduling_info_list: Vec<SchedulingInfo>,
    pub si_window_length: SiWindowLength,
    pub system_info_value_tag: u8,
}

impl Sib1 {
    /// Resolve each list entry's MCC against its predecessor, per the
    /// reuse rule: the first entry must carry an explicit MCC.
    pub fn resolved_plmns(&self) -> Result<Vec<PlmnId>, RrcError> {
        let mut resolved = Vec::with_capacity(self.plmn_ids.len());
        let mut prev: Option<Mcc> = None;
        for entry in &self.plmn_ids {
            let mcc = match entry.mcc {
                Some(mcc) => mcc,
                None => prev.ok_or_else(|| {
                    RrcError::InvalidInput("first PLMN list entry omitted its MCC".into())
                })?,
            };
            prev = Some(mcc);
            resolved.push(PlmnId { mcc, mnc: entry.mnc });
        }
        Ok(resolved)
    }
}

pub fn pack_sib1(sib1: &Sib1) -> RrcMessage {
    let mut w = BitWriter::new();

    w.write_bit(sib1.p_max.is_some());
    w.write_bit(false); // tdd: FDD-only, see module docs.
    w.write_bit(false); // non-critical extension: never present.

    w.write_bit(sib1.csg_identity.is_some());

    encode_seq_len(&mut w, sib1.plmn_ids.len(), MAX_PLMN_IDS);
    for entry in &sib1.plmn_ids {
        encode_plmn_identity(&mut w, entry.mcc.as_ref(), &entry.mnc);
        w.write_bit(entry.reserved_for_operator_use);
    }

    encode_tac(&mut w, sib1.tac);
    encode_cell_identity(&mut w, sib1.cell_id);
    w.write_bit(sib1.cell_barred);
    w.write_bit(sib1.intra_freq_reselection);
    w.write_bit(sib1.csg_indication);
    if let Some(csg_id) = sib1.csg_identity {
        encode_csg_identity(&mut w, csg_id);
    }

    w.write_bit(sib1.q_rx_lev_min_offset.is_some());
    encode_q_rx_lev_min(&mut w, sib1.q_rx_lev_min);
    if let Some(offset) = sib1.q_rx_lev_min_offset {
        encode_q_rx_lev_min_offset(&mut w, offset);
    }

    if let Some(p_max) = sib1.p_max {
        encode_p_max(&mut w, p_max);
    }

    debug_assert!((1..=64).contains(&sib1.freq_band_indicator));
    w.write_bits((sib1.freq_band_indicator - 1) as u32, 6);

    encode_seq_len(&mut w, sib1.scheduling_info_list.len(), MAX_SCHED_INFO);
    for si in &sib1.scheduling_info_list {
        w.write_bits(si.si_periodicity.to_wire(), 3);
        w.write_bit(!si.sib_mapping.is_empty());
        if !si.sib_mapping.is_empty() {
            encode_seq_len(&mut w, si.sib_mapping.len(), MAX_SIB_MAPPING);
            for sib_type in &si.sib_mapping {
                w.write_bit(false); // extension: never present.
                w.write_bits(sib_type.to_wire(), 4);
            }
        }
    }

    w.write_bits(sib1.si_window_length.to_wire(), 3);
    debug_assert!(sib1.system_info_value_tag < 32);
    w.write_bits(sib1.system_info_value_tag as u32, 5);

    w.into_message()
}

pub fn unpack_sib1(r: &mut BitReader) -> Result<Sib1, RrcError> {
    let p_max_present = r.try_read_bits(1)? != 0;
    let tdd = r.try_read_bits(1)? != 0;
    let _non_crit_ext = r.try_read_bits(1)? != 0;
    if tdd {
        return Err(RrcError::UnexpectedExtension);
    }

    let csg_id_opt = r.try_read_bits(1)? != 0;

    let n_plmn = decode_seq_len(r, MAX_PLMN_IDS)?;
    let mut plmn_ids = Vec::with_capacity(n_plmn);
    let mut prev_mcc: Option<Mcc> = None;
    for i in 0..n_plmn {
        let (mut mcc, mnc) = decode_plmn_identity(r)?;
        if mcc.is_none() && i != 0 {
            mcc = prev_mcc;
        }
        prev_mcc = mcc;
        let reserved_for_operator_use = r.try_read_bits(1)? != 0;
        plmn_ids.push(PlmnListEntry { mcc, mnc, reserved_for_operator_use });
    }

    let tac = decode_tac(r)?;
    let cell_id = decode_cell_identity(r)?;
    let cell_barred = r.try_read_bits(1)? != 0;
    let intra_freq_reselection = r.try_read_bits(1)? != 0;
    let csg_indication = r.try_read_bits(1)? != 0;
    let csg_identity = if csg_id_opt { Some(decode_csg_identity(r)?) } else { None };

    let q_rx_lev_min_offset_opt = r.try_read_bits(1)? != 0;
    let q_rx_lev_min = decode_q_rx_lev_min(r)?;
    let q_rx_lev_min_offset = if q_rx_lev_min_offset_opt { Some(decode_q_rx_lev_min_offset(r)?) } else { None };

    let p_max = if p_max_present { Some(decode_p_max(r)?) } else { None };

    let freq_band_indicator = r.try_read_bits(6)? as u8 + 1;

    let n_sched = decode_seq_len(r, MAX_SCHED_INFO)?;
    let mut scheduling_info_list = Vec::with_capacity(n_sched);
    for _ in 0..n_sched {
        let si_periodicity = SiPeriodicity::from_wire(r.try_read_bits(3)?)?;
        let mapping_present = r.try_read_bits(1)? != 0;
        let mut sib_mapping = Vec::new();
        if mapping_present {
            let n_mapping = decode_seq_len(r, MAX_SIB_MAPPING)?;
            for _ in 0..n_mapping {
                let ext = r.try_read_bits(1)? != 0;
                if ext {
                    return Err(RrcError::UnexpectedExtension);
                }
                sib_mapping.push(SibType::from_wire(r.try_read_bits(4)?));
            }
        }
        scheduling_info_list.push(SchedulingInfo { si_periodicity, sib_mapping });
    }

    let si_window_length = SiWindowLength::from_wire(r.try_read_bits(3)?)?;
    let system_info_value_tag = r.try_read_bits(5)? as u8;

    Ok(Sib1 {
        plmn_ids,
        tac,
        cell_id,
        cell_barred,
        intra_freq_reselection,
        csg_indication,
        csg_identity,
        q_rx_lev_min,
        q_rx_lev_min_offset,
        p_max,
        freq_band_indicator,
        scheduling_info_list,
        si_window_length,
        system_info_value_tag,
    })
}

// --------------------------------------------------------------- SIB2

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AcBarringConfig {
    pub factor_percent: u8,
    pub time_seconds: u16,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct AcBarringInfo {
    pub mo_signalling: Option<AcBarringConfig>,
    pub mo_data: Option<AcBarringConfig>,
    pub emergency: bool,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MbsfnSubframeConfig {
    pub radio_frame_allocation_period: u8,
    pub radio_frame_allocation_offset: u8,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Sib2 {
    pub ac_barring_info: Option<AcBarringInfo>,
    pub ul_arfcn: Option<u16>,
    pub ul_bandwidth: Option<DlBandwidth>,
    pub additional_spectrum_emission: u8,
    pub mbsfn_subframe_configs: Vec<MbsfnSubframeConfig>,
    pub time_alignment_timer_sf: u16,
}

pub fn pack_sib2(sib2: &Sib2) -> RrcMessage {
    let mut w = BitWriter::new();
    w.write_bit(false); // extension indicator: never present.
    w.write_bit(sib2.ac_barring_info.is_some());
    w.write_bit(!sib2.mbsfn_subframe_configs.is_empty());

    if let Some(info) = &sib2.ac_barring_info {
        w.write_bit(info.mo_signalling.is_some());
        w.write_bit(info.mo_data.is_some());
        w.write_bit(info.emergency);
        if let Some(cfg) = &info.mo_signalling {
            w.write_bits(cfg.factor_percent as u32, 4);
            w.write_bits(cfg.time_seconds as u32, 3);
        }
        if let Some(cfg) = &info.mo_data {
            w.write_bits(cfg.factor_percent as u32, 4);
            w.write_bits(cfg.time_seconds as u32, 3);
        }
    }

    w.write_bit(sib2.ul_arfcn.is_some());
    w.write_bit(sib2.ul_bandwidth.is_some());
    if let Some(arfcn) = sib2.ul_arfcn {
        encode_arfcn_value_eutra(&mut w, arfcn);
    }
    if let Some(bw) = sib2.ul_bandwidth {
        w.write_bits(bw.to_wire(), 3);
    }
    w.write_bits(sib2.additional_spectrum_emission as u32, 5);

    if !sib2.mbsfn_subframe_configs.is_empty() {
        encode_seq_len(&mut w, sib2.mbsfn_subframe_configs.len(), MAX_MBSFN_CONFIGS);
        for cfg in &sib2.mbsfn_subframe_configs {
            w.write_bits(cfg.radio_frame_allocation_period as u32, 3);
            w.write_bits(cfg.radio_frame_allocation_offset as u32, 4);
        }
    }

    w.write_bits(sib2.time_alignment_timer_sf as u32, 3);
    w.into_message()
}

pub fn unpack_sib2(r: &mut BitReader) -> Result<Sib2, RrcError> {
    let ext = r.try_read_bits(1)? != 0;
    if ext {
        return Err(RrcError::UnexpectedExtension);
    }
    let ac_barring_present = r.try_read_bits(1)? != 0;
    let mbsfn_present = r.try_read_bits(1)? != 0;

    let ac_barring_info = if ac_barring_present {
        let mo_signalling_present = r.try_read_bits(1)? != 0;
        let mo_data_present = r.try_read_bits(1)? != 0;
        let emergency = r.try_read_bits(1)? != 0;
        let mo_signalling = if mo_signalling_present {
            Some(AcBarringConfig { factor_percent: r.try_read_bits(4)? as u8, time_seconds: r.try_read_bits(3)? as u16 })
        } else {
            None
        };
        let mo_data = if mo_data_present {
            Some(AcBarringConfig { factor_percent: r.try_read_bits(4)? as u8, time_seconds: r.try_read_bits(3)? as u16 })
        } else {
            None
        };
        Some(AcBarringInfo { mo_signalling, mo_data, emergency })
    } else {
        None
    };

    let ul_arfcn_present = r.try_read_bits(1)? != 0;
    let ul_bw_present = r.try_read_bits(1)? != 0;
    let ul_arfcn = if ul_arfcn_present { Some(decode_arfcn_value_eutra(r)?) } else { None };
    let ul_bandwidth = if ul_bw_present {
        let raw = r.try_read_bits(3)?;
        Some(DlBandwidth::from_wire(raw).ok_or_else(|| RrcError::InvalidInput(format!("invalid UL bandwidth {raw}")))?)
    } else {
        None
    };
    let additional_spectrum_emission = r.try_read_bits(5)? as u8;

    let mbsfn_subframe_configs = if mbsfn_present {
        let count = decode_seq_len(r, MAX_MBSFN_CONFIGS)?;
        let mut configs = Vec::with_capacity(count);
        for _ in 0..count {
            configs.push(MbsfnSubframeConfig {
                radio_frame_allocation_period: r.try_read_bits(3)? as u8,
                radio_frame_allocation_offset: r.try_read_bits(4)? as u8,
            });
        }
        configs
    } else {
        Vec::new()
    };

    let time_alignment_timer_sf = r.try_read_bits(3)? as u16;

    Ok(Sib2 { ac_barring_info, ul_arfcn, ul_bandwidth, additional_spectrum_emission, mbsfn_subframe_configs, time_alignment_timer_sf })
}

// --------------------------------------------------------------- SIB3

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Sib3 {
    pub q_hyst_db: u8,
    pub speed_state_scale_factors: Option<SpeedStateScaleFactors>,
    pub q_rx_lev_min: i8,
    pub p_max: Option<i8>,
    pub s_intra_search_db: u8,
    pub t_reselection_eutra_s: u8,
}

pub fn pack_sib3(sib3: &Sib3) -> RrcMessage {
    let mut w = BitWriter::new();
    w.write_bit(false); // extension indicator.
    encode_q_hyst(&mut w, sib3.q_hyst_db);
    w.write_bit(sib3.speed_state_scale_factors.is_some());
    if let Some(sf) = &sib3.speed_state_scale_factors {
        encode_speed_state_scale_factors(&mut w, sf);
    }
    w.write_bit(sib3.p_max.is_some());
    encode_q_rx_lev_min(&mut w, sib3.q_rx_lev_min);
    if let Some(p_max) = sib3.p_max {
        encode_p_max(&mut w, p_max);
    }
    encode_s_search(&mut w, sib3.s_intra_search_db);
    encode_t_reselection(&mut w, sib3.t_reselection_eutra_s);
    w.into_message()
}

pub fn unpack_sib3(r: &mut BitReader) -> Result<Sib3, RrcError> {
    let ext = r.try_read_bits(1)? != 0;
    if ext {
        return Err(RrcError::UnexpectedExtension);
    }
    let q_hyst_db = decode_q_hyst(r)?;
    let speed_state_scale_factors = if r.try_read_bits(1)? != 0 {
        Some(decode_speed_state_scale_factors(r)?)
    } else {
        None
    };
    let p_max_present = r.try_read_bits(1)? != 0;
    let q_rx_lev_min = decode_q_rx_lev_min(r)?;
    let p_max = if p_max_present { Some(decode_p_max(r)?) } else { None };
    let s_intra_search_db = decode_s_search(r)?;
    let t_reselection_eutra_s = decode_t_reselection(r)?;
    Ok(Sib3 { q_hyst_db, speed_state_scale_factors, q_rx_lev_min, p_max, s_intra_search_db, t_reselection_eutra_s })
}

// --------------------------------------------------------------- SIB4

#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct Sib4 {
    pub intra_freq_neighbors: Vec<IntraFreqNeighborCell>,
    pub intra_freq_blacklist: Vec<PhysCellIdRange>,
}

pub fn pack_sib4(sib4: &Sib4) -> RrcMessage {
    let mut w = BitWriter::new();
    w.write_bit(false); // extension indicator.
    w.write_bit(!sib4.intra_freq_neighbors.is_empty());
    w.write_bit(!sib4.intra_freq_blacklist.is_empty());
    if !sib4.intra_freq_neighbors.is_empty() {
        encode_intra_freq_neighbor_list(&mut w, &sib4.intra_freq_neighbors);
    }
    if !sib4.intra_freq_blacklist.is_empty() {
        encode_blacklist(&mut w, &sib4.intra_freq_blacklist);
    }
    w.into_message()
}

pub fn unpack_sib4(r: &mut BitReader) -> Result<Sib4, RrcError> {
    let ext = r.try_read_bits(1)? != 0;
    if ext {
        return Err(RrcError::UnexpectedExtension);
    }
    let neighbors_present = r.try_read_bits(1)? != 0;
    let blacklist_present = r.try_read_bits(1)? != 0;
    let intra_freq_neighbors = if neighbors_present { decode_intra_freq_neighbor_list(r)? } else { Vec::new() };
    let intra_freq_blacklist = if blacklist_present { decode_blacklist(r)? } else { Vec::new() };
    debug_assert!(intra_freq_neighbors.len() as u32 <= MAX_NEIGHBORS);
    debug_assert!(intra_freq_blacklist.len() as u32 <= MAX_BLACKLIST);
    Ok(Sib4 { intra_freq_neighbors, intra_freq_blacklist })
}

// --------------------------------------------------------------- SIB8

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SystemTimeInfoCdma2000 {
    Synchronous(u64),
    Asynchronous(u64),
}

#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct Sib8 {
    pub system_time: Option<SystemTimeInfoCdma2000>,
    pub search_window_size: Option<u8>,
    pub band_classes: Vec<CdmaBandClass>,
}

pub fn pack_sib8(sib8: &Sib8) -> RrcMessage {
    let mut w = BitWriter::new();
    w.write_bit(false); // extension indicator.
    w.write_bit(sib8.system_time.is_some());
    w.write_bit(sib8.search_window_size.is_some());
    w.write_bit(!sib8.band_classes.is_empty());

    if let Some(time) = sib8.system_time {
        match time {
            SystemTimeInfoCdma2000::Synchronous(v) => {
                w.write_bit(false);
                encode_cdma_sync_time(&mut w, v);
            }
            SystemTimeInfoCdma2000::Asynchronous(v) => {
                w.write_bit(true);
                encode_cdma_async_time(&mut w, v);
            }
        }
    }
    if let Some(size) = sib8.search_window_size {
        w.write_bits(size as u32, 4);
    }
    if !sib8.band_classes.is_empty() {
        encode_band_class_list(&mut w, &sib8.band_classes);
    }
    w.into_message()
}

pub fn unpack_sib8(r: &mut BitReader) -> Result<Sib8, RrcError> {
    let ext = r.try_read_bits(1)? != 0;
    if ext {
        return Err(RrcError::UnexpectedExtension);
    }
    let time_present = r.try_read_bits(1)? != 0;
    let window_present = r.try_read_bits(1)? != 0;
    let band_classes_present = r.try_read_bits(1)? != 0;

    let system_time = if time_present {
        Some(if r.try_read_bits(1)? != 0 {
            SystemTimeInfoCdma2000::Asynchronous(decode_cdma_async_time(r)?)
        } else {
            SystemTimeInfoCdma2000::Synchronous(decode_cdma_sync_time(r)?)
        })
    } else {
        None
    };
    let search_window_size = if window_present { Some(r.try_read_bits(4)? as u8) } else { None };
    let band_classes = if band_classes_present { decode_band_class_list(r)? } else { Vec::new() };

    Ok(Sib8 { system_time, search_window_size, band_classes })
}

// -------------------------------------------------------- BCCH-DLSCH

/// A single SIB body as carried in a SystemInformation container, or
/// the whole message body when the container itself is a bare SIB1.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Sib {
    Type1(Sib1),
    Type2(Sib2),
    Type3(Sib3),
    Type4(Sib4),
    Type8(Sib8),
    /// A SIB type this implementation does not decode the body of
    /// (5, 6, 7, 9-13): the 4-bit tag is preserved so the scanner can
    /// still report "not handling SIB N" the way the reference
    /// implementation does.
    Unsupported(u8),
}

const MAX_SIBS_PER_SI: u32 = 32;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum BcchDlSchMsg {
    Sib1(Sib1),
    SystemInformation(Vec<Sib>),
}

pub fn pack_bcch_dlsch_msg(msg: &BcchDlSchMsg) -> RrcMessage {
    let mut w = BitWriter::new();
    w.write_bit(false); // critical extension marker: never present.
    match msg {
        BcchDlSchMsg::Sib1(sib1) => {
            w.write_bit(true);
            let inner = pack_sib1(sib1);
            for i in 0..inner.n_bits {
                let byte = inner.bytes[i / 8];
                let bit = (byte >> (7 - i % 8)) & 1 == 1;
                w.write_bit(bit);
            }
        }
        BcchDlSchMsg::SystemInformation(sibs) => {
            w.write_bit(false);
            encode_seq_len(&mut w, sibs.len(), MAX_SIBS_PER_SI);
            for sib in sibs {
                w.write_bit(false); // extension: never present.
                let (tag, body) = match sib {
                    Sib::Type1(s) => (0u32, pack_sib1(s)),
                    Sib::Type2(s) => (1u32, pack_sib2(s)),
                    Sib::Type3(s) => (2u32, pack_sib3(s)),
                    Sib::Type4(s) => (3u32, pack_sib4(s)),
                    Sib::Type8(s) => (7u32, pack_sib8(s)),
                    Sib::Unsupported(tag) => (*tag as u32, RrcMessage { bytes: Vec::new(), n_bits: 0 }),
                };
                w.write_bits(tag, 4);
                for i in 0..body.n_bits {
                    let byte = body.bytes[i / 8];
                    let bit = (byte >> (7 - i % 8)) & 1 == 1;
                    w.write_bit(bit);
                }
            }
        }
    }
    w.into_message()
}

fn sib_tag_to_wire(tag: u32) -> u8 {
    match tag {
        0 => 1,
        1 => 2,
        2 => 3,
        3 => 4,
        7 => 8,
        other => other as u8,
    }
}

pub fn unpack_bcch_dlsch_msg(msg: &RrcMessage) -> Result<BcchDlSchMsg, RrcError> {
    let mut r = msg.reader();
    let _critical_ext = r.try_read_bits(1)? != 0;
    if r.try_read_bits(1)? != 0 {
        let sib1 = unpack_sib1(&mut r)?;
        Ok(BcchDlSchMsg::Sib1(sib1))
    } else {
        let count = decode_seq_len(&mut r, MAX_SIBS_PER_SI)?;
        let mut sibs = Vec::with_capacity(count);
        for _ in 0..count {
            let ext = r.try_read_bits(1)? != 0;
            if ext {
                return Err(RrcError::UnexpectedExtension);
            }
            let tag = r.try_read_bits(4)?;
            let sib = match tag {
                0 => Sib::Type1(unpack_sib1(&mut r)?),
                1 => Sib::Type2(unpack_sib2(&mut r)?),
                2 => Sib::Type3(unpack_sib3(&mut r)?),
                3 => Sib::Type4(unpack_sib4(&mut r)?),
                7 => Sib::Type8(unpack_sib8(&mut r)?),
                other => Sib::Unsupported(sib_tag_to_wire(other)),
            };
            sibs.push(sib);
        }
        Ok(BcchDlSchMsg::SystemInformation(sibs))
    }
}

// ------------------------------------------------------------- PAGING

#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct PagingMsg {
    pub paging_record_list: Vec<PagingRecord>,
    pub system_info_modification: bool,
    pub etws_indication: bool,
    pub etws_dedicated_info: Option<Vec<u8>>,
}

pub fn pack_paging_msg(paging: &PagingMsg) -> RrcMessage {
    let mut w = BitWriter::new();
    w.write_bit(!paging.paging_record_list.is_empty());
    w.write_bit(paging.system_info_modification);
    w.write_bit(paging.etws_indication);
    w.write_bit(false); // non-critical extension chain: always absent.

    if !paging.paging_record_list.is_empty() {
        encode_paging_record_list(&mut w, &paging.paging_record_list);
    }
    if paging.etws_indication {
        w.write_bit(paging.etws_dedicated_info.is_some());
        if let Some(info) = &paging.etws_dedicated_info {
            crate::ie::codec::encode_octet_string(&mut w, info);
        }
    }
    w.into_message()
}

pub fn unpack_paging_msg(msg: &RrcMessage) -> Result<PagingMsg, RrcError> {
    let mut r = msg.reader();
    let records_present = r.try_read_bits(1)? != 0;
    let system_info_modification = r.try_read_bits(1)? != 0;
    let etws_indication = r.try_read_bits(1)? != 0;
    let non_crit_ext = r.try_read_bits(1)? != 0;
    if non_crit_ext {
        return Err(RrcError::UnexpectedExtension);
    }

    let paging_record_list = if records_present {
        decode_paging_record_list(&mut r)?
    } else {
        Vec::new()
    };
    debug_assert!(paging_record_list.len() as u32 <= MAX_PAGING_RECORDS);

    let etws_dedicated_info = if etws_indication {
        if r.try_read_bits(1)? != 0 {
            Some(crate::ie::codec::decode_octet_string(&mut r)?)
        } else {
            None
        }
    } else {
        None
    };

    Ok(PagingMsg { paging_record_list, system_info_modification, etws_indication, etws_dedicated_info })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample_sib1() -> Sib1 {
        Sib1 {
            plmn_ids: vec![PlmnListEntry { mcc: Some(Mcc([2, 0, 8])), mnc: Mnc::TwoDigit([9, 3]), reserved_for_operator_use: false }],
            tac: Tac(0x1234),
            cell_id: CellId(0x0ABC_DEF0 & CellId::MAX),
            cell_barred: false,
            intra_freq_reselection: true,
            csg_indication: false,
            csg_identity: None,
            q_rx_lev_min: -70,
            q_rx_lev_min_offset: None,
            p_max: Some(23),
            freq_band_indicator: 3,
            scheduling_info_list: vec![SchedulingInfo { si_periodicity: SiPeriodicity::Rf16, sib_mapping: vec![SibType::Type3] }],
            si_window_length: SiWindowLength::Ms20,
            system_info_value_tag: 5,
        }
    }

    #[test]
    fn test_mib_round_trip() {
        let mib = Mib { dl_bandwidth: DlBandwidth::N50, phich_duration: PhichDuration::Normal, phich_resource: PhichResource::OneHalf, sfn_div_4: 200 };
        let msg = pack_bcch_bch_msg(&mib);
        assert_eq!(msg.n_bits, 24);
        assert_eq!(unpack_bcch_bch_msg(&msg).unwrap(), mib);
    }

    #[test]
    fn test_sib1_round_trip_and_plmn_resolution() {
        let sib1 = sample_sib1();
        let msg = pack_sib1(&sib1);
        let decoded = unpack_sib1(&mut msg.reader()).unwrap();
        assert_eq!(decoded, sib1);
        let resolved = decoded.resolved_plmns().unwrap();
        assert_eq!(resolved[0].mcc, Mcc([2, 0, 8]));
    }

    #[test]
    fn test_sib1_plmn_mcc_reuse_across_entries() {
        let mut sib1 = sample_sib1();
        sib1.plmn_ids.push(PlmnListEntry { mcc: None, mnc: Mnc::ThreeDigit([4, 1, 0]), reserved_for_operator_use: false });
        let msg = pack_sib1(&sib1);
        let decoded = unpack_sib1(&mut msg.reader()).unwrap();
        let resolved = decoded.resolved_plmns().unwrap();
        assert_eq!(resolved[1].mcc, Mcc([2, 0, 8]));
        assert_eq!(resolved[1].mnc, Mnc::ThreeDigit([4, 1, 0]));
    }

    #[test]
    fn test_bcch_dlsch_sib1_round_trip() {
        let sib1 = sample_sib1();
        let body = BcchDlSchMsg::Sib1(sib1.clone());
        let msg = pack_bcch_dlsch_msg(&body);
        match unpack_bcch_dlsch_msg(&msg).unwrap() {
            BcchDlSchMsg::Sib1(decoded) => assert_eq!(decoded, sib1),
            _ => panic!("expected Sib1 variant"),
        }
    }

    #[test]
    fn test_bcch_dlsch_system_information_round_trip() {
        let sib3 = Sib3 { q_hyst_db: 4, speed_state_scale_factors: None, q_rx_lev_min: -60, p_max: None, s_intra_search_db: 10, t_reselection_eutra_s: 2 };
        let body = BcchDlSchMsg::SystemInformation(vec![Sib::Type3(sib3.clone())]);
        let msg = pack_bcch_dlsch_msg(&body);
        match unpack_bcch_dlsch_msg(&msg).unwrap() {
            BcchDlSchMsg::SystemInformation(sibs) => {
                assert_eq!(sibs.len(), 1);
                assert_eq!(sibs[0], Sib::Type3(sib3));
            }
            _ => panic!("expected SystemInformation variant"),
        }
    }

    #[test]
    fn test_paging_round_trip_with_etws_dedicated_info() {
        let paging = PagingMsg {
            paging_record_list: vec![],
            system_info_modification: true,
            etws_indication: true,
            etws_dedicated_info: Some(vec![0xDE, 0xAD, 0xBE, 0xEF]),
        };
        let msg = pack_paging_msg(&paging);
        assert_eq!(unpack_paging_msg(&msg).unwrap(), paging);
    }
}
