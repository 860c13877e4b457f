//! VHT (802.11ac) capability rules.
//!
//! Resolution order inside the family:
//! 1. width and the 2x2 switch are written back from the baseline
//! 2. MCS maps and data rates follow the baseline stream count
//! 3. guard interval and STBC follow width and chains
//! 4. beamforming: SU roles first, MU and sounding derived from them

use super::mcs::{self, ChannelWidth, MCS_NOT_SUPPORTED};
use super::{Baseline, Merge, VhtCaps};
use crate::schema::items::vht;
use crate::schema::GroupId;
use crate::CfgError;

pub(super) fn apply(m: &mut Merge<'_>, hw: &VhtCaps, base: &Baseline) -> Result<(), CfgError> {
    const G: GroupId = GroupId::Vht;
    let width = base.channel_width;
    m.put_int(G, vht::CHAN_WIDTH, width.code())?;

    // The baseline stream count already folds in the requested 2x2 switch.
    let nss = base.spatial_streams;
    m.and_flag(G, vht::ENABLE_2X2, nss >= 2)?;

    m.and_flag(G, vht::LDPC_CODING_CAP, hw.ldpc)?;

    let rx_map = clamp_map(m, vht::RX_MCS_MAP, hw.rx_mcs_map, nss)?;
    let tx_map = clamp_map(m, vht::TX_MCS_MAP, hw.tx_mcs_map, nss)?;
    second_stream(m, vht::RX_MCS_2X2, rx_map, nss)?;
    second_stream(m, vht::TX_MCS_2X2, tx_map, nss)?;
    let rx_first = mcs::stream_support(rx_map, 0);
    let tx_first = mcs::stream_support(tx_map, 0);
    support(m, vht::RX_MCS_8_9, rx_first)?;
    support(m, vht::TX_MCS_8_9, tx_first)?;

    let rate = width.stream_rate_mbps() * nss;
    m.min_int(G, vht::RX_SUPP_DATA_RATE, rate)?;
    m.min_int(G, vht::TX_SUPP_DATA_RATE, rate)?;
    m.and_flag(G, vht::VHT20_MCS9, hw.vht20_mcs9)?;

    m.and_flag(G, vht::SHORT_GI_80, hw.short_gi_80 && width >= ChannelWidth::Mhz80)?;
    m.and_flag(G, vht::SHORT_GI_160, hw.short_gi_160 && width >= ChannelWidth::Mhz160)?;
    m.and_flag(G, vht::TX_STBC, hw.tx_stbc && base.tx_chains() >= 2)?;
    m.min_int(G, vht::RX_STBC, hw.rx_stbc.min(nss))?;

    let su_bfer = m.and_flag(G, vht::SU_BEAMFORMER, hw.su_beamformer && base.tx_chains() >= 2)?;
    let su_bfee = m.and_flag(G, vht::SU_BEAMFORMEE, hw.su_beamformee)?;
    m.and_flag(G, vht::MU_BEAMFORMER, hw.mu_beamformer && su_bfer)?;
    m.and_flag(G, vht::MU_BEAMFORMEE, hw.mu_beamformee && su_bfee)?;
    m.and_flag(G, vht::ENABLE_TX_BF, su_bfee)?;
    m.min_int(G, vht::TX_BFEE_ANT_SUPP, hw.beamformee_sts.min(base.rx_chains()))?;
    m.min_int(
        G,
        vht::NUM_SOUNDING_DIM,
        hw.sounding_dimensions.min(base.tx_chains().saturating_sub(1)),
    )?;

    m.and_flag(G, vht::TXOP_PS, hw.txop_ps)?;
    m.min_int(G, vht::AMPDU_LEN_EXP, hw.ampdu_len_exp)?;
    m.min_int(G, vht::MAX_MPDU_LEN, hw.max_mpdu_len)?;
    Ok(())
}

fn clamp_map(m: &mut Merge<'_>, item: &'static str, hw: u16, nss: u32) -> Result<u16, CfgError> {
    let requested = m.int(GroupId::Vht, item)? as u16;
    let effective = mcs::clamp_map(requested, hw, nss);
    m.put_int(GroupId::Vht, item, u32::from(effective))?;
    Ok(effective)
}

/// 2x2 support value: unsupported on a single stream, otherwise no higher
/// than the second stream of the effective map.
fn second_stream(m: &mut Merge<'_>, item: &'static str, map: u16, nss: u32) -> Result<(), CfgError> {
    let effective = if nss < 2 {
        MCS_NOT_SUPPORTED
    } else {
        mcs::min_support(m.int(GroupId::Vht, item)?, mcs::stream_support(map, 1))
    };
    m.put_int(GroupId::Vht, item, effective)
}

fn support(m: &mut Merge<'_>, item: &'static str, limit: u32) -> Result<(), CfgError> {
    let effective = mcs::min_support(m.int(GroupId::Vht, item)?, limit);
    m.put_int(GroupId::Vht, item, effective)
}
