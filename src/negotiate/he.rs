//! HE (802.11ax) capability rules.

use super::mcs::{self, ChannelWidth, MCS_MAP_NONE};
use super::{Baseline, HeCaps, Merge};
use crate::schema::items::he;
use crate::schema::GroupId;
use crate::CfgError;

const G: GroupId = GroupId::He;

pub(super) fn apply(m: &mut Merge<'_>, hw: &HeCaps, base: &Baseline) -> Result<(), CfgError> {
    let nss = base.spatial_streams;

    m.and_flag(G, he::LDPC_CODING_CAP, hw.ldpc)?;
    let su_bfer = m.and_flag(G, he::SU_BEAMFORMER, hw.su_beamformer && base.tx_chains() >= 2)?;
    m.and_flag(G, he::SU_BEAMFORMEE, hw.su_beamformee)?;
    m.and_flag(G, he::MU_BEAMFORMER, hw.mu_beamformer && su_bfer)?;
    m.min_int(G, he::BFEE_STS_LT_80, hw.beamformee_sts_lt_80.min(base.rx_chains()))?;

    let ul_mumimo = m.min_int(G, he::UL_MUMIMO, u32::from(hw.ul_mumimo && nss >= 2))?;
    m.min_int(G, he::ENABLE_UL_MIMO, ul_mumimo)?;
    m.min_int(G, he::ENABLE_UL_OFDM, u32::from(hw.ul_ofdma))?;

    clamp_map(m, he::RX_MCS_MAP_LT_80, hw.rx_mcs_map_lt_80, nss)?;
    clamp_map(m, he::TX_MCS_MAP_LT_80, hw.tx_mcs_map_lt_80, nss)?;

    let wide = m.and_flag(
        G,
        he::CHAN_WIDTH_160,
        hw.chan_width_160 && base.channel_width >= ChannelWidth::Mhz160,
    )?;
    if wide {
        clamp_map(m, he::RX_MCS_MAP_160, hw.rx_mcs_map_160, nss)?;
        clamp_map(m, he::TX_MCS_MAP_160, hw.tx_mcs_map_160, nss)?;
    } else {
        m.put_int(G, he::RX_MCS_MAP_160, u32::from(MCS_MAP_NONE))?;
        m.put_int(G, he::TX_MCS_MAP_160, u32::from(MCS_MAP_NONE))?;
    }
    Ok(())
}

fn clamp_map(m: &mut Merge<'_>, item: &'static str, hw: u16, nss: u32) -> Result<(), CfgError> {
    let requested = m.int(G, item)? as u16;
    m.put_int(G, item, u32::from(mcs::clamp_map(requested, hw, nss)))
}
