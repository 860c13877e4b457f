//! Chain masks, spatial streams and channel width.

use log::warn;

use super::mcs::ChannelWidth;
use super::{Baseline, HardwareCapabilitySnapshot, Merge};
use crate::schema::items::{radio, vht};
use crate::schema::GroupId;
use crate::CfgError;

pub(super) fn apply(m: &mut Merge<'_>, hw: &HardwareCapabilitySnapshot) -> Result<Baseline, CfgError> {
    let tx_chain_mask = chain_mask(m.int(GroupId::Radio, radio::TX_CHAIN_MASK)?, hw.radio.tx_chain_mask);
    let rx_chain_mask = chain_mask(m.int(GroupId::Radio, radio::RX_CHAIN_MASK)?, hw.radio.rx_chain_mask);
    m.put_int(GroupId::Radio, radio::TX_CHAIN_MASK, tx_chain_mask)?;
    m.put_int(GroupId::Radio, radio::RX_CHAIN_MASK, rx_chain_mask)?;

    let tx_chains = tx_chain_mask.count_ones();
    let chain_streams = hw
        .radio
        .max_spatial_streams
        .min(tx_chains)
        .min(rx_chain_mask.count_ones());
    // The 2x2 switch lives in VHT but caps the stream count of every family.
    let spatial_streams = if m.flag(GroupId::Vht, vht::ENABLE_2X2)? {
        chain_streams
    } else {
        1
    };

    m.min_int(GroupId::Radio, radio::NUM_11B_TX_CHAINS, tx_chains)?;
    m.min_int(GroupId::Radio, radio::NUM_11AG_TX_CHAINS, tx_chains)?;

    // Width is a VHT item but bounds every family, so it is resolved here
    // and written by the VHT step.
    let requested = ChannelWidth::from_code(m.int(GroupId::Vht, vht::CHAN_WIDTH)?)
        .unwrap_or(ChannelWidth::Mhz20);
    let channel_width = requested.min(hw.max_channel_width()?);

    Ok(Baseline {
        tx_chain_mask,
        rx_chain_mask,
        spatial_streams,
        channel_width,
    })
}

/// Requested chains that exist in hardware.
///
/// The mask items have a minimum of 1, so an empty intersection cannot be
/// stored. It falls back to the lowest hardware chain instead, which is the
/// one case where the effective mask holds a chain that was not requested.
fn chain_mask(requested: u32, hardware: u32) -> u32 {
    match requested & hardware {
        0 => {
            let fallback = hardware & hardware.wrapping_neg();
            warn!(
                "Chain mask {:#x} shares no chain with hardware {:#x}, using {:#x}",
                requested, hardware, fallback
            );
            fallback
        }
        mask => mask,
    }
}
