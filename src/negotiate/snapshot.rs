//! Hardware capability report handed over by the firmware interface.

use serde::{Deserialize, Serialize};

use super::mcs::{stream_support, ChannelWidth, MCS_NOT_SUPPORTED};
use crate::CfgError;

/// Upper bound on chain mask bits and spatial streams.
pub const MAX_CHAINS: u32 = 8;

/// What the radio and firmware can actually do.
///
/// Read-only to the negotiator. Missing JSON sections fall back to the
/// [`Default`] report of a 2x2, 160 MHz capable radio.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct HardwareCapabilitySnapshot {
    pub radio: RadioCaps,
    pub ht: HtCaps,
    pub vht: VhtCaps,
    /// Absent when the firmware has no 802.11ax support.
    pub he: Option<HeCaps>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct RadioCaps {
    pub tx_chain_mask: u32,
    pub rx_chain_mask: u32,
    pub max_spatial_streams: u32,
    /// [`ChannelWidth`] code.
    pub max_channel_width: u32,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct HtCaps {
    pub ldpc: bool,
    pub chan_width_40: bool,
    pub short_gi_20: bool,
    pub short_gi_40: bool,
    pub tx_stbc: bool,
    pub rx_stbc: u32,
    pub greenfield: bool,
    pub max_amsdu_len: bool,
    /// Supported MCS set, one byte per stream for MCS 0-31.
    pub mcs_set: Vec<u8>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct VhtCaps {
    pub max_mpdu_len: u32,
    pub ldpc: bool,
    pub short_gi_80: bool,
    pub short_gi_160: bool,
    pub tx_stbc: bool,
    pub rx_stbc: u32,
    pub su_beamformer: bool,
    pub su_beamformee: bool,
    pub mu_beamformer: bool,
    pub mu_beamformee: bool,
    pub beamformee_sts: u32,
    pub sounding_dimensions: u32,
    pub txop_ps: bool,
    pub ampdu_len_exp: u32,
    pub rx_mcs_map: u16,
    pub tx_mcs_map: u16,
    pub vht20_mcs9: bool,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct HeCaps {
    pub ldpc: bool,
    pub chan_width_160: bool,
    pub su_beamformer: bool,
    pub su_beamformee: bool,
    pub mu_beamformer: bool,
    pub ul_mumimo: bool,
    pub ul_ofdma: bool,
    pub beamformee_sts_lt_80: u32,
    pub rx_mcs_map_lt_80: u16,
    pub tx_mcs_map_lt_80: u16,
    pub rx_mcs_map_160: u16,
    pub tx_mcs_map_160: u16,
}

impl Default for HardwareCapabilitySnapshot {
    fn default() -> Self {
        Self {
            radio: RadioCaps::default(),
            ht: HtCaps::default(),
            vht: VhtCaps::default(),
            he: Some(HeCaps::default()),
        }
    }
}

impl Default for RadioCaps {
    fn default() -> Self {
        Self {
            tx_chain_mask: 0b11,
            rx_chain_mask: 0b11,
            max_spatial_streams: 2,
            max_channel_width: ChannelWidth::Mhz160.code(),
        }
    }
}

impl Default for HtCaps {
    fn default() -> Self {
        Self {
            ldpc: true,
            chan_width_40: true,
            short_gi_20: true,
            short_gi_40: true,
            tx_stbc: true,
            rx_stbc: 1,
            greenfield: false,
            max_amsdu_len: true,
            mcs_set: vec![0xff, 0xff],
        }
    }
}

impl Default for VhtCaps {
    fn default() -> Self {
        Self {
            max_mpdu_len: 2,
            ldpc: true,
            short_gi_80: true,
            short_gi_160: true,
            tx_stbc: true,
            rx_stbc: 1,
            su_beamformer: true,
            su_beamformee: true,
            mu_beamformer: true,
            mu_beamformee: true,
            beamformee_sts: 3,
            sounding_dimensions: 1,
            txop_ps: false,
            ampdu_len_exp: 7,
            rx_mcs_map: 0xfffa,
            tx_mcs_map: 0xfffa,
            vht20_mcs9: true,
        }
    }
}

impl Default for HeCaps {
    fn default() -> Self {
        Self {
            ldpc: true,
            chan_width_160: true,
            su_beamformer: true,
            su_beamformee: true,
            mu_beamformer: true,
            ul_mumimo: true,
            ul_ofdma: true,
            beamformee_sts_lt_80: 3,
            rx_mcs_map_lt_80: 0xfffa,
            tx_mcs_map_lt_80: 0xfffa,
            rx_mcs_map_160: 0xfffa,
            tx_mcs_map_160: 0xfffa,
        }
    }
}

impl HeCaps {
    /// Capabilities of a radio without HE support: nothing.
    pub fn absent() -> Self {
        Self {
            ldpc: false,
            chan_width_160: false,
            su_beamformer: false,
            su_beamformee: false,
            mu_beamformer: false,
            ul_mumimo: false,
            ul_ofdma: false,
            beamformee_sts_lt_80: 0,
            rx_mcs_map_lt_80: super::mcs::MCS_MAP_NONE,
            tx_mcs_map_lt_80: super::mcs::MCS_MAP_NONE,
            rx_mcs_map_160: super::mcs::MCS_MAP_NONE,
            tx_mcs_map_160: super::mcs::MCS_MAP_NONE,
        }
    }
}

impl HardwareCapabilitySnapshot {
    /// Parse a JSON capability report.
    pub fn from_json(json: &str) -> Result<Self, CfgError> {
        serde_json::from_str(json).map_err(|e| CfgError::InvalidFormat(e.to_string()))
    }

    /// Widest channel the radio supports.
    pub fn max_channel_width(&self) -> Result<ChannelWidth, CfgError> {
        ChannelWidth::from_code(self.radio.max_channel_width).ok_or_else(|| {
            invalid(format!(
                "unknown channel width code {}",
                self.radio.max_channel_width
            ))
        })
    }

    /// Reject structurally impossible reports.
    pub fn validate(&self) -> Result<(), CfgError> {
        let radio = &self.radio;
        if radio.max_spatial_streams == 0 {
            return Err(invalid("zero spatial streams"));
        }
        if radio.max_spatial_streams > MAX_CHAINS {
            return Err(invalid(format!(
                "{} spatial streams (max {})",
                radio.max_spatial_streams, MAX_CHAINS
            )));
        }
        for (name, mask) in [("tx", radio.tx_chain_mask), ("rx", radio.rx_chain_mask)] {
            if mask == 0 || mask >> MAX_CHAINS != 0 {
                return Err(invalid(format!("{} chain mask {:#x}", name, mask)));
            }
            if radio.max_spatial_streams > mask.count_ones() {
                return Err(invalid(format!(
                    "{} spatial streams on {} {} chains",
                    radio.max_spatial_streams,
                    mask.count_ones(),
                    name
                )));
            }
        }
        self.max_channel_width()?;

        check_max("ht rx_stbc", self.ht.rx_stbc, 3)?;
        if self.ht.mcs_set.len() > 10 {
            return Err(invalid(format!(
                "ht mcs_set is {} bytes (max 10)",
                self.ht.mcs_set.len()
            )));
        }

        let vht = &self.vht;
        check_max("vht max_mpdu_len", vht.max_mpdu_len, 2)?;
        check_max("vht rx_stbc", vht.rx_stbc, 4)?;
        check_max("vht beamformee_sts", vht.beamformee_sts, 7)?;
        check_max("vht sounding_dimensions", vht.sounding_dimensions, 7)?;
        check_max("vht ampdu_len_exp", vht.ampdu_len_exp, 7)?;
        if stream_support(vht.rx_mcs_map, 0) == MCS_NOT_SUPPORTED
            || stream_support(vht.tx_mcs_map, 0) == MCS_NOT_SUPPORTED
        {
            return Err(invalid("vht mcs map without a supported stream"));
        }

        if let Some(he) = &self.he {
            check_max("he beamformee_sts_lt_80", he.beamformee_sts_lt_80, 7)?;
        }
        Ok(())
    }
}

fn check_max(field: &str, value: u32, max: u32) -> Result<(), CfgError> {
    if value > max {
        Err(invalid(format!("{} = {} (max {})", field, value, max)))
    } else {
        Ok(())
    }
}

fn invalid(reason: impl Into<String>) -> CfgError {
    CfgError::InvalidSnapshot(reason.into())
}
