//! HT (802.11n) capability rules.

use super::mcs::ChannelWidth;
use super::{Baseline, HtCaps, Merge};
use crate::schema::items::ht;
use crate::schema::{ConfigValue, GroupId};
use crate::CfgError;

/// Bytes of the supported MCS set that map one-to-one to spatial streams.
const PER_STREAM_MCS_BYTES: usize = 4;

pub(super) fn apply(m: &mut Merge<'_>, hw: &HtCaps, base: &Baseline) -> Result<(), CfgError> {
    const G: GroupId = GroupId::Ht;

    m.and_flag(G, ht::ADV_CODING_CAP, hw.ldpc)?;
    m.and_flag(G, ht::SHORT_GI_20, hw.short_gi_20)?;
    m.and_flag(G, ht::GREENFIELD, hw.greenfield)?;
    m.and_flag(G, ht::MAX_AMSDU_LEN, hw.max_amsdu_len)?;

    let forty = m.and_flag(
        G,
        ht::CHAN_WIDTH_40,
        hw.chan_width_40 && base.channel_width >= ChannelWidth::Mhz40,
    )?;
    m.and_flag(G, ht::SHORT_GI_40, hw.short_gi_40 && forty)?;
    m.and_flag(G, ht::DSSS_CCK_40, forty)?;

    m.and_flag(G, ht::TX_STBC, hw.tx_stbc && base.tx_chains() >= 2)?;
    m.min_int(G, ht::RX_STBC, hw.rx_stbc.min(base.spatial_streams))?;

    let mcs = mcs_set(&m.bytes(G, ht::RX_MCS_BITMAP)?, &hw.mcs_set, base.spatial_streams);
    m.put(G, ht::RX_MCS_BITMAP, ConfigValue::Bytes(mcs))?;
    Ok(())
}

/// Bytewise AND with hardware; per-stream bytes past `nss` are cleared.
/// Keeps the requested length.
fn mcs_set(requested: &[u8], hardware: &[u8], nss: u32) -> Vec<u8> {
    requested
        .iter()
        .enumerate()
        .map(|(i, &byte)| {
            if i < PER_STREAM_MCS_BYTES && i as u32 >= nss {
                0
            } else {
                byte & hardware.get(i).copied().unwrap_or(0)
            }
        })
        .collect()
}
