//! Common Types for LTE Downlink Scanning
//!
//! Defines the scalar identity and enumeration types shared by the
//! RRC codec, the PHY contract, and the scanner FSM.

use serde::{Deserialize, Serialize};
use num_derive::{FromPrimitive, ToPrimitive};

/// Physical Cell Identity, `N_id_cell = 3 * N_id_1 + N_id_2`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Pci(pub u16);

impl Pci {
    /// Maximum valid PCI value for LTE (`3 * 167 + 2`).
    pub const MAX: u16 = 503;

    /// Create a new PCI with validation.
    pub fn new(value: u16) -> Option<Self> {
        if value <= Self::MAX {
            Some(Self(value))
        } else {
            None
        }
    }

    /// Reconstruct a PCI from its group (`N_id_1`, 0..=167) and sector
    /// (`N_id_2`, 0..=2) identities.
    pub fn from_parts(n_id_1: u16, n_id_2: u16) -> Self {
        Self(3 * n_id_1 + n_id_2)
    }

    /// The group identity recovered from SSS correlation.
    pub fn n_id_1(&self) -> u16 {
        self.0 / 3
    }

    /// The sector identity recovered from PSS correlation.
    pub fn n_id_2(&self) -> u16 {
        self.0 % 3
    }
}

/// E-UTRAN Cell Identity (28 bits).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct CellId(pub u32);

impl CellId {
    /// Maximum representable value (28 bits).
    pub const MAX: u32 = (1 << 28) - 1;

    pub fn new(value: u32) -> Option<Self> {
        if value <= Self::MAX {
            Some(Self(value))
        } else {
            None
        }
    }
}

/// Tracking Area Code (16 bits).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Tac(pub u16);

/// Downlink channel bandwidth, named by resource blocks per 36.211.
#[derive(Debug, Clone, Copy, PartialEq, Eq, FromPrimitive, ToPrimitive, Serialize, Deserialize)]
pub enum DlBandwidth {
    /// 1.4 MHz, 6 RBs.
    N6 = 6,
    /// 3 MHz, 15 RBs.
    N15 = 15,
    /// 5 MHz, 25 RBs.
    N25 = 25,
    /// 10 MHz, 50 RBs.
    N50 = 50,
    /// 15 MHz, 75 RBs.
    N75 = 75,
    /// 20 MHz, 100 RBs.
    N100 = 100,
}

impl DlBandwidth {
    /// Number of resource blocks this bandwidth spans.
    pub fn n_rb_dl(&self) -> u16 {
        match self {
            DlBandwidth::N6 => 6,
            DlBandwidth::N15 => 15,
            DlBandwidth::N25 => 25,
            DlBandwidth::N50 => 50,
            DlBandwidth::N75 => 75,
            DlBandwidth::N100 => 100,
        }
    }

    /// FFT padding size used by the PHY front end at this bandwidth.
    pub fn fft_pad_size(&self) -> u16 {
        match self {
            DlBandwidth::N6 => 988,
            DlBandwidth::N15 => 934,
            DlBandwidth::N25 => 874,
            DlBandwidth::N50 => 724,
            DlBandwidth::N75 => 574,
            DlBandwidth::N100 => 424,
        }
    }

    /// 3-bit field value carried on the wire.
    pub fn from_wire(value: u32) -> Option<Self> {
        match value {
            0 => Some(DlBandwidth::N6),
            1 => Some(DlBandwidth::N15),
            2 => Some(DlBandwidth::N25),
            3 => Some(DlBandwidth::N50),
            4 => Some(DlBandwidth::N75),
            5 => Some(DlBandwidth::N100),
            _ => None,
        }
    }

    pub fn to_wire(&self) -> u32 {
        match self {
            DlBandwidth::N6 => 0,
            DlBandwidth::N15 => 1,
            DlBandwidth::N25 => 2,
            DlBandwidth::N50 => 3,
            DlBandwidth::N75 => 4,
            DlBandwidth::N100 => 5,
        }
    }
}

/// PHICH duration, a single unlabeled bit on the wire.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum PhichDuration {
    Normal,
    Extended,
}

/// PHICH resource, decoded losslessly as an enum; the *rational* group
/// size it names is recovered with [`PhichResource::as_fraction`]
/// rather than truncated by integer division.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum PhichResource {
    OneSixth,
    OneHalf,
    One,
    Two,
}

impl PhichResource {
    pub fn from_wire(value: u32) -> Option<Self> {
        match value {
            0 => Some(PhichResource::OneSixth),
            1 => Some(PhichResource::OneHalf),
            2 => Some(PhichResource::One),
            3 => Some(PhichResource::Two),
            _ => None,
        }
    }

    pub fn to_wire(&self) -> u32 {
        match self {
            PhichResource::OneSixth => 0,
            PhichResource::OneHalf => 1,
            PhichResource::One => 2,
            PhichResource::Two => 3,
        }
    }

    /// The group-size multiplier as an exact `(numerator, denominator)`
    /// pair, e.g. `(1, 6)` for `OneSixth`.
    pub fn as_fraction(&self) -> (u32, u32) {
        match self {
            PhichResource::OneSixth => (1, 6),
            PhichResource::OneHalf => (1, 2),
            PhichResource::One => (1, 1),
            PhichResource::Two => (2, 1),
        }
    }
}

/// Mobile Country Code: three BCD digits, 0..=9 each.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Mcc(pub [u8; 3]);

/// Mobile Network Code: two or three BCD digits.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Mnc {
    TwoDigit([u8; 2]),
    ThreeDigit([u8; 3]),
}

impl Mnc {
    pub fn digits(&self) -> &[u8] {
        match self {
            Mnc::TwoDigit(d) => d,
            Mnc::ThreeDigit(d) => d,
        }
    }
}

/// PLMN Identity: a decoded (MCC, MNC) pair. Wire-level packing lives
/// in `rrc::ie::plmn`, since 36.331's unaligned-PER layout (BCD
/// digits, an optional-MCC reuse rule) is a property of the RRC
/// message codec, not of the identity itself.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct PlmnId {
    pub mcc: Mcc,
    pub mnc: Mnc,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_pci_validation() {
        assert!(Pci::new(0).is_some());
        assert!(Pci::new(503).is_some());
        assert!(Pci::new(504).is_none());
    }

    #[test]
    fn test_pci_parts_roundtrip() {
        let pci = Pci::from_parts(55, 2);
        assert_eq!(pci.n_id_1(), 55);
        assert_eq!(pci.n_id_2(), 2);
        assert_eq!(pci.0, 167);
    }

    #[test]
    fn test_dl_bandwidth_wire_roundtrip() {
        for v in 0u32..=5 {
            let bw = DlBandwidth::from_wire(v).unwrap();
            assert_eq!(bw.to_wire(), v);
        }
        assert_eq!(DlBandwidth::N100.n_rb_dl(), 100);
    }

    #[test]
    fn test_phich_resource_fraction_not_truncated() {
        assert_eq!(PhichResource::OneSixth.as_fraction(), (1, 6));
        assert_eq!(PhichResource::OneHalf.as_fraction(), (1, 2));
    }
}
