//! Capability negotiation.
//!
//! [`negotiate`] merges a [`HardwareCapabilitySnapshot`] with the values
//! currently requested in a [`ConfigStore`] and writes the effective
//! capability set back in place. Families are resolved in a fixed order
//! (radio, HT, VHT, HE); each later family reads the [`Baseline`] derived
//! by the radio step (chains, spatial streams, channel width).
//!
//! Negotiation is destructive: the requested value of every field is
//! replaced by its effective value. Callers that want the original request
//! must read it first. Running it a second time against the same snapshot
//! changes nothing.

mod he;
mod ht;
pub mod mcs;
mod radio;
mod snapshot;
mod vht;

use log::{debug, trace};

use crate::schema::{ConfigValue, GroupId, ValueType};
use crate::store::{ConfigStore, GroupLock};
use crate::CfgError;

pub use mcs::ChannelWidth;
pub use snapshot::{HardwareCapabilitySnapshot, HeCaps, HtCaps, RadioCaps, VhtCaps, MAX_CHAINS};

/// Groups written by negotiation, in lock order.
pub const NEGOTIATED_GROUPS: [GroupId; 4] = [GroupId::Radio, GroupId::Ht, GroupId::Vht, GroupId::He];

/// Radio-level limits every capability family is bounded by.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Baseline {
    pub tx_chain_mask: u32,
    pub rx_chain_mask: u32,
    pub spatial_streams: u32,
    pub channel_width: ChannelWidth,
}

impl Baseline {
    pub fn tx_chains(&self) -> u32 {
        self.tx_chain_mask.count_ones()
    }

    pub fn rx_chains(&self) -> u32 {
        self.rx_chain_mask.count_ones()
    }
}

/// One field whose effective value differs from what was requested.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FieldChange {
    pub group: GroupId,
    pub item: &'static str,
    pub requested: ConfigValue,
    pub effective: ConfigValue,
}

/// Outcome of a negotiation run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NegotiationReport {
    pub baseline: Baseline,
    /// Whether the HE family was negotiated (store has the group).
    pub he_negotiated: bool,
    pub changes: Vec<FieldChange>,
}

impl NegotiationReport {
    /// True when every requested value was already within capabilities.
    pub fn is_noop(&self) -> bool {
        self.changes.is_empty()
    }

    pub fn changes_in(&self, group: GroupId) -> impl Iterator<Item = &FieldChange> {
        self.changes.iter().filter(move |c| c.group == group)
    }
}

/// Merge `hw` into the requested values held by `store`.
///
/// Fails only with [`CfgError::InvalidSnapshot`] for a malformed snapshot,
/// in which case the store is untouched. All negotiated groups are published
/// together: concurrent readers see the state before or after, never a mix.
pub fn negotiate(
    store: &ConfigStore,
    hw: &HardwareCapabilitySnapshot,
) -> Result<NegotiationReport, CfgError> {
    hw.validate()?;
    run(Merge::new(store.lock_groups(&NEGOTIATED_GROUPS)), hw)
}

/// Negotiate the schema defaults of the negotiated groups against `hw`.
///
/// The defaults are never published on their own: readers go straight from
/// the previous effective values to the newly negotiated ones. Changes in
/// the report are relative to the defaults.
pub fn negotiate_from_defaults(
    store: &ConfigStore,
    hw: &HardwareCapabilitySnapshot,
) -> Result<NegotiationReport, CfgError> {
    hw.validate()?;
    let mut lock = store.lock_groups(&NEGOTIATED_GROUPS);
    lock.stage_defaults();
    run(Merge::new(lock), hw)
}

fn run(mut merge: Merge<'_>, hw: &HardwareCapabilitySnapshot) -> Result<NegotiationReport, CfgError> {
    let baseline = radio::apply(&mut merge, hw)?;
    ht::apply(&mut merge, &hw.ht, &baseline)?;
    vht::apply(&mut merge, &hw.vht, &baseline)?;
    let he_negotiated = merge.lock.has_group(GroupId::He);
    if he_negotiated {
        match &hw.he {
            Some(caps) => he::apply(&mut merge, caps, &baseline)?,
            None => he::apply(&mut merge, &HeCaps::absent(), &baseline)?,
        }
    }

    let changes = merge.commit();
    debug!(
        "Negotiated {} stream(s) at {}: {} field(s) changed",
        baseline.spatial_streams,
        baseline.channel_width,
        changes.len()
    );
    Ok(NegotiationReport {
        baseline,
        he_negotiated,
        changes,
    })
}

/// Staging area shared by the family rules.
pub(crate) struct Merge<'a> {
    lock: GroupLock<'a>,
    changes: Vec<FieldChange>,
}

impl<'a> Merge<'a> {
    fn new(lock: GroupLock<'a>) -> Self {
        Self {
            lock,
            changes: Vec::new(),
        }
    }

    /// Requested value as this run sees it, including anything staged
    /// before the family rules ran.
    pub(crate) fn flag(&self, group: GroupId, item: &'static str) -> Result<bool, CfgError> {
        match self.lock.pending(group, item)? {
            ConfigValue::Bool(v) => Ok(v),
            other => Err(mismatch(item, &other, ValueType::Bool)),
        }
    }

    pub(crate) fn int(&self, group: GroupId, item: &'static str) -> Result<u32, CfgError> {
        match self.lock.pending(group, item)? {
            ConfigValue::Int(v) => Ok(v),
            other => Err(mismatch(item, &other, ValueType::Int)),
        }
    }

    pub(crate) fn bytes(&self, group: GroupId, item: &'static str) -> Result<Vec<u8>, CfgError> {
        match self.lock.pending(group, item)? {
            ConfigValue::Bytes(v) => Ok(v),
            other => Err(mismatch(item, &other, ValueType::Bytes)),
        }
    }

    /// Record the effective value of a field. Each field is resolved once.
    pub(crate) fn put(
        &mut self,
        group: GroupId,
        item: &'static str,
        effective: ConfigValue,
    ) -> Result<(), CfgError> {
        let requested = self.lock.pending(group, item)?;
        if requested != effective {
            trace!("{}.{}: {:?} -> {:?}", group, item, requested, effective);
            self.lock.stage(group, item, effective.clone())?;
            self.changes.push(FieldChange {
                group,
                item,
                requested,
                effective,
            });
        }
        Ok(())
    }

    /// `requested && allowed`, returning the effective flag.
    pub(crate) fn and_flag(
        &mut self,
        group: GroupId,
        item: &'static str,
        allowed: bool,
    ) -> Result<bool, CfgError> {
        let effective = self.flag(group, item)? && allowed;
        self.put(group, item, ConfigValue::Bool(effective))?;
        Ok(effective)
    }

    /// `min(requested, limit)`, returning the effective value.
    pub(crate) fn min_int(
        &mut self,
        group: GroupId,
        item: &'static str,
        limit: u32,
    ) -> Result<u32, CfgError> {
        let effective = self.int(group, item)?.min(limit);
        self.put(group, item, ConfigValue::Int(effective))?;
        Ok(effective)
    }

    pub(crate) fn put_int(
        &mut self,
        group: GroupId,
        item: &'static str,
        effective: u32,
    ) -> Result<(), CfgError> {
        self.put(group, item, ConfigValue::Int(effective))
    }

    fn commit(self) -> Vec<FieldChange> {
        self.lock.commit();
        self.changes
    }
}

fn mismatch(item: &'static str, stored: &ConfigValue, requested: ValueType) -> CfgError {
    CfgError::TypeMismatch {
        item,
        expected: stored.value_type(),
        found: requested,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::schema::items::{he as he_items, ht as ht_items, radio as radio_items, vht as vht_items};
    use crate::schema::{CapabilityTag, FeatureSet};
    use std::sync::Arc;
    use std::thread;

    fn one_stream_hw() -> HardwareCapabilitySnapshot {
        let mut hw = HardwareCapabilitySnapshot::default();
        hw.radio.tx_chain_mask = 0b1;
        hw.radio.rx_chain_mask = 0b1;
        hw.radio.max_spatial_streams = 1;
        hw.vht.rx_mcs_map = 0xfffe;
        hw.vht.tx_mcs_map = 0xfffe;
        hw
    }

    // ==================== Clamp Tests ====================

    #[test]
    fn test_capable_hardware_keeps_defaults() {
        let store = ConfigStore::new(FeatureSet::ALL);
        let before: Vec<_> = NEGOTIATED_GROUPS
            .iter()
            .map(|&g| store.snapshot_group(g))
            .collect();

        let report = negotiate(&store, &HardwareCapabilitySnapshot::default()).unwrap();
        // default requests only ask for what a capable 2x2 radio offers
        assert!(report.is_noop(), "unexpected changes: {:?}", report.changes);
        let after: Vec<_> = NEGOTIATED_GROUPS
            .iter()
            .map(|&g| store.snapshot_group(g))
            .collect();
        assert_eq!(before, after);
        assert_eq!(report.baseline.spatial_streams, 2);
        assert_eq!(report.baseline.channel_width, ChannelWidth::Mhz80);
    }

    #[test]
    fn test_effective_never_exceeds_hardware() {
        let store = ConfigStore::new(FeatureSet::ALL);
        store.set_int(GroupId::Vht, vht_items::AMPDU_LEN_EXP, 7).unwrap();
        store.set_int(GroupId::Vht, vht_items::MAX_MPDU_LEN, 2).unwrap();
        store.set_int(GroupId::Vht, vht_items::RX_STBC, 4).unwrap();

        let mut hw = HardwareCapabilitySnapshot::default();
        hw.vht.ampdu_len_exp = 5;
        hw.vht.max_mpdu_len = 1;
        hw.vht.rx_stbc = 1;
        negotiate(&store, &hw).unwrap();

        assert_eq!(store.get_int(GroupId::Vht, vht_items::AMPDU_LEN_EXP).unwrap(), 5);
        assert_eq!(store.get_int(GroupId::Vht, vht_items::MAX_MPDU_LEN).unwrap(), 1);
        assert_eq!(store.get_int(GroupId::Vht, vht_items::RX_STBC).unwrap(), 1);
    }

    #[test]
    fn test_request_below_hardware_is_kept() {
        let store = ConfigStore::new(FeatureSet::ALL);
        store.set_int(GroupId::Vht, vht_items::AMPDU_LEN_EXP, 3).unwrap();
        store.set_bool(GroupId::Vht, vht_items::SU_BEAMFORMEE, false).unwrap();
        negotiate(&store, &HardwareCapabilitySnapshot::default()).unwrap();
        assert_eq!(store.get_int(GroupId::Vht, vht_items::AMPDU_LEN_EXP).unwrap(), 3);
        assert!(!store.get_bool(GroupId::Vht, vht_items::SU_BEAMFORMEE).unwrap());
    }

    #[test]
    fn test_hardware_flag_forces_false() {
        let store = ConfigStore::new(FeatureSet::ALL);
        let mut hw = HardwareCapabilitySnapshot::default();
        hw.vht.ldpc = false;
        hw.ht.short_gi_20 = false;

        let report = negotiate(&store, &hw).unwrap();
        assert!(!store.get_bool(GroupId::Vht, vht_items::LDPC_CODING_CAP).unwrap());
        assert!(!store.get_bool(GroupId::Ht, ht_items::SHORT_GI_20).unwrap());
        assert!(report.changes.contains(&FieldChange {
            group: GroupId::Vht,
            item: vht_items::LDPC_CODING_CAP,
            requested: ConfigValue::Bool(true),
            effective: ConfigValue::Bool(false),
        }));
    }

    // ==================== Dependency Tests ====================

    #[test]
    fn test_single_stream_hardware_disables_2x2() {
        let store = ConfigStore::new(FeatureSet::ALL);
        assert!(store.get_bool(GroupId::Vht, vht_items::ENABLE_2X2).unwrap());

        let report = negotiate(&store, &one_stream_hw()).unwrap();
        assert_eq!(report.baseline.spatial_streams, 1);

        assert!(!store.get_bool(GroupId::Vht, vht_items::ENABLE_2X2).unwrap());
        assert_eq!(store.get_int(GroupId::Vht, vht_items::RX_MCS_2X2).unwrap(), 3);
        assert_eq!(store.get_int(GroupId::Vht, vht_items::TX_MCS_2X2).unwrap(), 3);
        assert_eq!(store.get_int(GroupId::Vht, vht_items::RX_MCS_MAP).unwrap(), 0xfffe);
        assert_eq!(store.get_int(GroupId::Vht, vht_items::TX_MCS_MAP).unwrap(), 0xfffe);
        assert_eq!(store.get_int(GroupId::Vht, vht_items::RX_SUPP_DATA_RATE).unwrap(), 390);
        assert_eq!(store.get_int(GroupId::Radio, radio_items::TX_CHAIN_MASK).unwrap(), 1);
        assert!(!store.get_bool(GroupId::Vht, vht_items::TX_STBC).unwrap());
        assert_eq!(store.get_int(GroupId::Vht, vht_items::NUM_SOUNDING_DIM).unwrap(), 0);
        assert_eq!(store.get_int(GroupId::Vht, vht_items::TX_BFEE_ANT_SUPP).unwrap(), 1);
    }

    #[test]
    fn test_2x2_switch_limits_every_family() {
        let store = ConfigStore::new(FeatureSet::ALL);
        store.set_bool(GroupId::Vht, vht_items::ENABLE_2X2, false).unwrap();

        let report = negotiate(&store, &HardwareCapabilitySnapshot::default()).unwrap();
        assert_eq!(report.baseline.spatial_streams, 1);

        assert_eq!(
            store.get_bytes(GroupId::Ht, ht_items::RX_MCS_BITMAP).unwrap(),
            vec![0xff, 0x00]
        );
        assert_eq!(store.get_int(GroupId::Vht, vht_items::RX_MCS_MAP).unwrap(), 0xfffe);
        assert_eq!(store.get_int(GroupId::He, he_items::RX_MCS_MAP_LT_80).unwrap(), 0xfffe);
        assert_eq!(store.get_int(GroupId::He, he_items::TX_MCS_MAP_LT_80).unwrap(), 0xfffe);
        assert!(!store.get_bool(GroupId::Vht, vht_items::ENABLE_2X2).unwrap());

        assert!(negotiate(&store, &HardwareCapabilitySnapshot::default())
            .unwrap()
            .is_noop());
    }

    // ==================== Reset Tests ====================

    #[test]
    fn test_negotiate_from_defaults_ignores_current_request() {
        let store = ConfigStore::new(FeatureSet::ALL);
        store.set_bool(GroupId::Vht, vht_items::SU_BEAMFORMEE, false).unwrap();
        store.set_int(GroupId::Radio, radio_items::RTS_THRESHOLD, 10).unwrap();

        let mut hw = HardwareCapabilitySnapshot::default();
        hw.radio.max_channel_width = ChannelWidth::Mhz40.code();
        let report = negotiate_from_defaults(&store, &hw).unwrap();

        assert!(store.get_bool(GroupId::Vht, vht_items::SU_BEAMFORMEE).unwrap());
        assert_eq!(store.get_int(GroupId::Radio, radio_items::RTS_THRESHOLD).unwrap(), 2347);
        assert!(report.changes.contains(&FieldChange {
            group: GroupId::Vht,
            item: vht_items::CHAN_WIDTH,
            requested: ConfigValue::Int(ChannelWidth::Mhz80.code()),
            effective: ConfigValue::Int(ChannelWidth::Mhz40.code()),
        }));
        assert!(negotiate(&store, &hw).unwrap().is_noop());
    }

    #[test]
    fn test_80mhz_hardware_caps_160_request() {
        let store = ConfigStore::new(FeatureSet::ALL);
        store
            .set_int(GroupId::Vht, vht_items::CHAN_WIDTH, ChannelWidth::Mhz160.code())
            .unwrap();
        store.set_bool(GroupId::Vht, vht_items::SHORT_GI_160, true).unwrap();
        store.set_bool(GroupId::He, he_items::CHAN_WIDTH_160, true).unwrap();

        let mut hw = HardwareCapabilitySnapshot::default();
        hw.radio.max_channel_width = ChannelWidth::Mhz80.code();
        let report = negotiate(&store, &hw).unwrap();

        assert_eq!(report.baseline.channel_width, ChannelWidth::Mhz80);
        assert_eq!(
            store.get_int(GroupId::Vht, vht_items::CHAN_WIDTH).unwrap(),
            ChannelWidth::Mhz80.code()
        );
        assert!(!store.get_bool(GroupId::Vht, vht_items::SHORT_GI_160).unwrap());
        assert!(store.get_bool(GroupId::Vht, vht_items::SHORT_GI_80).unwrap());
        assert!(!store.get_bool(GroupId::He, he_items::CHAN_WIDTH_160).unwrap());
        assert_eq!(store.get_int(GroupId::He, he_items::RX_MCS_MAP_160).unwrap(), 0xffff);
    }

    #[test]
    fn test_160mhz_request_on_capable_hardware() {
        let store = ConfigStore::new(FeatureSet::ALL);
        store
            .set_int(GroupId::Vht, vht_items::CHAN_WIDTH, ChannelWidth::Mhz160.code())
            .unwrap();
        store.set_bool(GroupId::Vht, vht_items::SHORT_GI_160, true).unwrap();

        let report = negotiate(&store, &HardwareCapabilitySnapshot::default()).unwrap();
        assert_eq!(report.baseline.channel_width, ChannelWidth::Mhz160);
        assert!(store.get_bool(GroupId::Vht, vht_items::SHORT_GI_160).unwrap());
    }

    #[test]
    fn test_narrow_width_disables_wide_features() {
        let store = ConfigStore::new(FeatureSet::ALL);
        store
            .set_int(GroupId::Vht, vht_items::CHAN_WIDTH, ChannelWidth::Mhz20.code())
            .unwrap();
        negotiate(&store, &HardwareCapabilitySnapshot::default()).unwrap();
        assert!(!store.get_bool(GroupId::Vht, vht_items::SHORT_GI_80).unwrap());
        assert!(!store.get_bool(GroupId::Ht, ht_items::CHAN_WIDTH_40).unwrap());
        assert!(!store.get_bool(GroupId::Ht, ht_items::SHORT_GI_40).unwrap());
    }

    #[test]
    fn test_mu_beamformer_requires_su() {
        let store = ConfigStore::new(FeatureSet::ALL);
        store.set_bool(GroupId::Vht, vht_items::MU_BEAMFORMER, true).unwrap();
        store.set_bool(GroupId::Vht, vht_items::SU_BEAMFORMER, false).unwrap();
        negotiate(&store, &HardwareCapabilitySnapshot::default()).unwrap();
        assert!(!store.get_bool(GroupId::Vht, vht_items::MU_BEAMFORMER).unwrap());
    }

    // ==================== Idempotence Tests ====================

    #[test]
    fn test_negotiation_is_idempotent() {
        let store = ConfigStore::new(FeatureSet::ALL);
        store
            .set_int(GroupId::Vht, vht_items::CHAN_WIDTH, ChannelWidth::Mhz160.code())
            .unwrap();
        store.set_int(GroupId::Radio, radio_items::TX_CHAIN_MASK, 0xff).unwrap();
        store.set_bool(GroupId::He, he_items::SU_BEAMFORMER, true).unwrap();
        let mut hw = one_stream_hw();
        hw.radio.max_channel_width = ChannelWidth::Mhz80.code();

        let first = negotiate(&store, &hw).unwrap();
        assert!(!first.is_noop());
        let effective: Vec<_> = NEGOTIATED_GROUPS
            .iter()
            .map(|&g| store.snapshot_group(g))
            .collect();

        let second = negotiate(&store, &hw).unwrap();
        assert!(second.is_noop(), "second run changed {:?}", second.changes);
        assert_eq!(first.baseline, second.baseline);
        let again: Vec<_> = NEGOTIATED_GROUPS
            .iter()
            .map(|&g| store.snapshot_group(g))
            .collect();
        assert_eq!(effective, again);
    }

    // ==================== Failure Tests ====================

    #[test]
    fn test_invalid_snapshot_leaves_store_untouched() {
        let store = ConfigStore::new(FeatureSet::ALL);
        store.set_bool(GroupId::Vht, vht_items::SHORT_GI_160, true).unwrap();
        let before = store.to_json();

        let mut hw = one_stream_hw();
        hw.radio.max_spatial_streams = 0;
        assert!(matches!(negotiate(&store, &hw), Err(CfgError::InvalidSnapshot(_))));

        hw.radio.max_spatial_streams = 1;
        hw.radio.max_channel_width = 7;
        assert!(matches!(negotiate(&store, &hw), Err(CfgError::InvalidSnapshot(_))));

        assert_eq!(store.to_json(), before);
    }

    // ==================== HE Tests ====================

    #[test]
    fn test_he_skipped_without_dot11ax() {
        let store = ConfigStore::new(FeatureSet::ALL.without(CapabilityTag::Dot11ax));
        let report = negotiate(&store, &one_stream_hw()).unwrap();
        assert!(!report.he_negotiated);
        assert!(report.changes_in(GroupId::He).next().is_none());
    }

    #[test]
    fn test_he_disabled_when_hardware_lacks_it() {
        let store = ConfigStore::new(FeatureSet::ALL);
        let mut hw = HardwareCapabilitySnapshot::default();
        hw.he = None;
        let report = negotiate(&store, &hw).unwrap();
        assert!(report.he_negotiated);
        assert!(!store.get_bool(GroupId::He, he_items::SU_BEAMFORMEE).unwrap());
        assert_eq!(store.get_int(GroupId::He, he_items::RX_MCS_MAP_LT_80).unwrap(), 0xffff);
        assert_eq!(store.get_int(GroupId::He, he_items::UL_MUMIMO).unwrap(), 0);
    }

    #[test]
    fn test_he_ul_mumimo_needs_two_streams() {
        let store = ConfigStore::new(FeatureSet::ALL);
        let mut hw = one_stream_hw();
        if let Some(he) = hw.he.as_mut() {
            he.rx_mcs_map_lt_80 = 0xfffe;
        }
        negotiate(&store, &hw).unwrap();
        assert_eq!(store.get_int(GroupId::He, he_items::UL_MUMIMO).unwrap(), 0);
        assert_eq!(store.get_int(GroupId::He, he_items::RX_MCS_MAP_LT_80).unwrap(), 0xfffe);
    }

    // ==================== Concurrency Tests ====================

    #[test]
    fn test_readers_never_see_mixed_vht_family() {
        let store = Arc::new(ConfigStore::new(FeatureSet::ALL));
        let narrow = {
            let mut hw = HardwareCapabilitySnapshot::default();
            hw.radio.max_channel_width = ChannelWidth::Mhz40.code();
            hw
        };

        let writer = {
            let store = store.clone();
            thread::spawn(move || {
                for i in 0..200 {
                    // widen the request, then let alternating hardware clamp it
                    store.reset_to_defaults(GroupId::Vht);
                    let hw = if i % 2 == 0 {
                        narrow.clone()
                    } else {
                        HardwareCapabilitySnapshot::default()
                    };
                    negotiate(&store, &hw).unwrap();
                }
            })
        };

        for _ in 0..2000 {
            let vht = store.snapshot_group(GroupId::Vht);
            let value = |name: &str| {
                vht.iter()
                    .find(|(n, _)| *n == name)
                    .map(|(_, v)| v.clone())
                    .unwrap()
            };
            let width = value(vht_items::CHAN_WIDTH);
            let sgi80 = value(vht_items::SHORT_GI_80);
            if width == ConfigValue::Int(ChannelWidth::Mhz40.code()) {
                assert_eq!(sgi80, ConfigValue::Bool(false));
            }
        }
        writer.join().unwrap();
    }
}
