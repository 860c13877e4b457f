//! Typed, validated configuration store for one device context.
//!
//! Every item lives in its own [`RwLock`], so a `set` on one item never
//! blocks access to another. Each group additionally owns a publish gate:
//! ordinary `get`/`set` hold it shared, while [`ConfigStore::lock_groups`]
//! holds it exclusively so that a multi-item update (capability negotiation,
//! group reset) becomes visible all at once.
//!
//! # Example
//!
//! ```
//! use wlan_mlme_cfg::schema::{items, FeatureSet, GroupId};
//! use wlan_mlme_cfg::{CfgError, ConfigStore};
//!
//! let store = ConfigStore::new(FeatureSet::ALL);
//! assert_eq!(store.get_int(GroupId::Radio, items::radio::RTS_THRESHOLD).unwrap(), 2347);
//!
//! store.set_int(GroupId::Radio, items::radio::RTS_THRESHOLD, 3000).unwrap();
//! let err = store.set_int(GroupId::Radio, items::radio::RTS_THRESHOLD, 70000);
//! assert!(matches!(err, Err(CfgError::OutOfRange { .. })));
//! assert_eq!(store.get_int(GroupId::Radio, items::radio::RTS_THRESHOLD).unwrap(), 3000);
//! ```

mod lock;
mod slot;

use std::sync::{PoisonError, RwLock, RwLockReadGuard, RwLockWriteGuard};

use log::debug;

use crate::schema::{ConfigValue, FeatureSet, GroupId, ItemSpec, ValueType};
use crate::CfgError;

pub use lock::GroupLock;
pub(crate) use slot::Slot;

/// Placeholder rendered instead of secret values.
pub const REDACTED: &str = "<redacted>";

pub(crate) struct GroupSlots {
    id: GroupId,
    gate: RwLock<()>,
    slots: Vec<Slot>,
}

impl GroupSlots {
    fn find(&self, item: &str) -> Option<&Slot> {
        self.slots.iter().find(|slot| slot.spec.name == item)
    }

    fn shared(&self) -> RwLockReadGuard<'_, ()> {
        self.gate.read().unwrap_or_else(PoisonError::into_inner)
    }

    fn exclusive(&self) -> RwLockWriteGuard<'_, ()> {
        self.gate.write().unwrap_or_else(PoisonError::into_inner)
    }
}

/// Current values of every item of one device context.
///
/// Created with all items at their schema defaults. Items whose capability
/// tag is not in the store's [`FeatureSet`] are omitted and report
/// [`CfgError::NotFound`].
pub struct ConfigStore {
    features: FeatureSet,
    groups: Vec<GroupSlots>,
}

impl ConfigStore {
    /// Create a store with every admitted item at its default.
    pub fn new(features: FeatureSet) -> Self {
        let groups = GroupId::ALL
            .iter()
            .map(|&id| GroupSlots {
                id,
                gate: RwLock::new(()),
                slots: id
                    .items()
                    .iter()
                    .filter(|spec| features.admits(spec.tag))
                    .map(Slot::new)
                    .collect(),
            })
            .collect();
        Self { features, groups }
    }

    /// Capability tags this store was built with.
    pub fn features(&self) -> FeatureSet {
        self.features
    }

    /// Whether any item of `group` exists in this store.
    pub fn has_group(&self, group: GroupId) -> bool {
        !self.group(group).slots.is_empty()
    }

    /// Names of the items of `group` present in this store.
    pub fn item_names(&self, group: GroupId) -> Vec<&'static str> {
        self.group(group).slots.iter().map(|s| s.spec.name).collect()
    }

    /// Schema entry of a present item.
    pub fn spec(&self, group: GroupId, item: &str) -> Result<&'static ItemSpec, CfgError> {
        Ok(self.slot(group, item)?.spec)
    }

    /// Current value of an item. Byte strings are returned as a copy.
    pub fn get(&self, group: GroupId, item: &str) -> Result<ConfigValue, CfgError> {
        let g = self.group(group);
        let slot = self.slot(group, item)?;
        let _gate = g.shared();
        Ok(slot.load())
    }

    /// Current value of a boolean item.
    ///
    /// # Arguments
    ///
    /// * `group` - Group holding the item
    /// * `item` - Item name within the group
    ///
    /// Fails with [`CfgError::NotFound`] for an unknown or untagged item and
    /// [`CfgError::TypeMismatch`] when the item is not a boolean.
    pub fn get_bool(&self, group: GroupId, item: &str) -> Result<bool, CfgError> {
        let spec = self.spec(group, item)?;
        match self.get(group, item)? {
            ConfigValue::Bool(v) => Ok(v),
            _ => Err(wrong_accessor(spec, ValueType::Bool)),
        }
    }

    /// Current value of an integer item. Errors as for
    /// [`get_bool`](Self::get_bool).
    pub fn get_int(&self, group: GroupId, item: &str) -> Result<u32, CfgError> {
        let spec = self.spec(group, item)?;
        match self.get(group, item)? {
            ConfigValue::Int(v) => Ok(v),
            _ => Err(wrong_accessor(spec, ValueType::Int)),
        }
    }

    /// Copy of a byte-string item. Errors as for [`get_bool`](Self::get_bool).
    pub fn get_bytes(&self, group: GroupId, item: &str) -> Result<Vec<u8>, CfgError> {
        let spec = self.spec(group, item)?;
        match self.get(group, item)? {
            ConfigValue::Bytes(v) => Ok(v),
            _ => Err(wrong_accessor(spec, ValueType::Bytes)),
        }
    }

    /// Copy a byte-string item into `buf`, returning the number of bytes
    /// written.
    ///
    /// Fails with [`CfgError::BufferTooSmall`] when `buf` cannot hold the
    /// whole value; nothing is copied in that case.
    pub fn get_bytes_into(
        &self,
        group: GroupId,
        item: &str,
        buf: &mut [u8],
    ) -> Result<usize, CfgError> {
        let g = self.group(group);
        let slot = self.slot(group, item)?;
        let _gate = g.shared();
        let value = slot.read();
        match &*value {
            ConfigValue::Bytes(bytes) => {
                if bytes.len() > buf.len() {
                    return Err(CfgError::BufferTooSmall {
                        needed: bytes.len(),
                        available: buf.len(),
                    });
                }
                buf[..bytes.len()].copy_from_slice(bytes);
                Ok(bytes.len())
            }
            _ => Err(wrong_accessor(slot.spec, ValueType::Bytes)),
        }
    }

    /// Validate and replace an item's value.
    ///
    /// # Arguments
    ///
    /// * `group` - Group holding the item
    /// * `item` - Item name within the group
    /// * `value` - New value; its type must match the item's kind
    ///
    /// On error the stored value is left untouched.
    pub fn set(
        &self,
        group: GroupId,
        item: &str,
        value: impl Into<ConfigValue>,
    ) -> Result<(), CfgError> {
        let value = value.into();
        let g = self.group(group);
        let slot = self.slot(group, item)?;
        slot.spec.validate(&value)?;
        if slot.spec.secret {
            debug!("Set {}.{} = {}", group, slot.spec.name, REDACTED);
        } else {
            debug!("Set {}.{} = {:?}", group, slot.spec.name, value);
        }
        let _gate = g.shared();
        slot.store(value);
        Ok(())
    }

    /// Set a boolean item. See [`set`](Self::set).
    pub fn set_bool(&self, group: GroupId, item: &str, value: bool) -> Result<(), CfgError> {
        self.set(group, item, value)
    }

    /// Set an integer item.
    ///
    /// Fails with [`CfgError::OutOfRange`] when `value` is outside the item's
    /// `[min, max]`; the stored value is kept.
    pub fn set_int(&self, group: GroupId, item: &str, value: u32) -> Result<(), CfgError> {
        self.set(group, item, value)
    }

    /// Set a byte-string item from a copy of `value`.
    ///
    /// Fails with [`CfgError::TooLong`] when `value` exceeds the item's
    /// maximum length.
    pub fn set_bytes(&self, group: GroupId, item: &str, value: &[u8]) -> Result<(), CfgError> {
        self.set(group, item, value)
    }

    /// Restore every item of `group` to its schema default.
    ///
    /// The reset is published atomically with respect to
    /// [`snapshot_group`](Self::snapshot_group).
    pub fn reset_to_defaults(&self, group: GroupId) {
        let g = self.group(group);
        let _gate = g.exclusive();
        for slot in &g.slots {
            slot.reset();
        }
        debug!("Reset {} to defaults", group);
    }

    /// Restore every group to its defaults in one update.
    pub fn reset_all(&self) {
        self.reset_groups(&GroupId::ALL);
    }

    /// Restore `groups` to their defaults. Readers see all of them reset or
    /// none.
    pub fn reset_groups(&self, groups: &[GroupId]) {
        let mut lock = self.lock_groups(groups);
        lock.stage_defaults();
        lock.commit();
        debug!("Reset {:?} to defaults", groups);
    }

    /// Read every present item of `group` in one consistent view.
    pub fn snapshot_group(&self, group: GroupId) -> Vec<(&'static str, ConfigValue)> {
        let g = self.group(group);
        let _gate = g.shared();
        g.slots.iter().map(|s| (s.spec.name, s.load())).collect()
    }

    /// Dump the whole store as `{ group: { item: value } }` with secret
    /// values redacted. Groups without items are skipped.
    pub fn to_json(&self) -> serde_json::Value {
        let mut root = serde_json::Map::new();
        for g in self.groups.iter().filter(|g| !g.slots.is_empty()) {
            let _gate = g.shared();
            let mut items = serde_json::Map::new();
            for slot in &g.slots {
                let value = if slot.spec.secret {
                    serde_json::Value::String(REDACTED.to_string())
                } else {
                    slot.read().to_json()
                };
                items.insert(slot.spec.name.to_string(), value);
            }
            root.insert(g.id.name().to_string(), serde_json::Value::Object(items));
        }
        serde_json::Value::Object(root)
    }

    /// Exclusively hold the publish gates of `groups` for a transactional
    /// update. See [`GroupLock`].
    pub fn lock_groups(&self, groups: &[GroupId]) -> GroupLock<'_> {
        let mut ids = groups.to_vec();
        ids.sort();
        ids.dedup();
        let gates = ids.iter().map(|&id| self.group(id).exclusive()).collect();
        GroupLock::new(self, ids, gates)
    }

    fn group(&self, group: GroupId) -> &GroupSlots {
        &self.groups[group.index()]
    }

    pub(crate) fn slot(&self, group: GroupId, item: &str) -> Result<&Slot, CfgError> {
        self.group(group)
            .find(item)
            .ok_or_else(|| CfgError::NotFound {
                group,
                item: item.to_string(),
            })
    }
}

impl Default for ConfigStore {
    fn default() -> Self {
        Self::new(FeatureSet::default())
    }
}

impl std::fmt::Debug for ConfigStore {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ConfigStore")
            .field("features", &self.features)
            .finish_non_exhaustive()
    }
}

fn wrong_accessor(spec: &ItemSpec, requested: ValueType) -> CfgError {
    CfgError::TypeMismatch {
        item: spec.name,
        expected: spec.kind.value_type(),
        found: requested,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::schema::items::{he, identity, radio, vht, wep, wmm};
    use crate::schema::CapabilityTag;
    use std::sync::Arc;
    use std::thread;

    // ==================== Get/Set Tests ====================

    #[test]
    fn test_rts_threshold_scenario() {
        let store = ConfigStore::default();
        assert_eq!(store.get_int(GroupId::Radio, radio::RTS_THRESHOLD).unwrap(), 2347);

        store.set_int(GroupId::Radio, radio::RTS_THRESHOLD, 3000).unwrap();
        assert_eq!(store.get_int(GroupId::Radio, radio::RTS_THRESHOLD).unwrap(), 3000);

        let result = store.set_int(GroupId::Radio, radio::RTS_THRESHOLD, 70000);
        assert_eq!(
            result,
            Err(CfgError::OutOfRange {
                item: radio::RTS_THRESHOLD,
                value: 70000,
                min: 0,
                max: 65536,
            })
        );
        assert_eq!(store.get_int(GroupId::Radio, radio::RTS_THRESHOLD).unwrap(), 3000);
    }

    #[test]
    fn test_round_trip_every_item() {
        let store = ConfigStore::default();
        for group in GroupId::ALL {
            for spec in group.items() {
                let value = match spec.kind {
                    crate::schema::ItemKind::Bool => {
                        ConfigValue::Bool(!matches!(spec.default_value(), ConfigValue::Bool(true)))
                    }
                    crate::schema::ItemKind::Int { max, .. } => ConfigValue::Int(max),
                    crate::schema::ItemKind::Bytes { max_len } => {
                        ConfigValue::Bytes(vec![b'x'; max_len])
                    }
                };
                store.set(group, spec.name, value.clone()).unwrap();
                assert_eq!(store.get(group, spec.name).unwrap(), value);
            }
        }
    }

    #[test]
    fn test_out_of_range_below_min() {
        let store = ConfigStore::default();
        let result = store.set_int(GroupId::Radio, radio::FRAG_THRESHOLD, 255);
        assert!(matches!(result, Err(CfgError::OutOfRange { min: 256, .. })));
        assert_eq!(store.get_int(GroupId::Radio, radio::FRAG_THRESHOLD).unwrap(), 8000);
    }

    #[test]
    fn test_bytes_too_long_keeps_prior_value() {
        let store = ConfigStore::default();
        store
            .set_bytes(GroupId::Identity, identity::MODEL_NAME, b"Model-X")
            .unwrap();

        let result = store.set_bytes(GroupId::Identity, identity::MODEL_NAME, &[b'a'; 33]);
        assert_eq!(
            result,
            Err(CfgError::TooLong {
                item: identity::MODEL_NAME,
                len: 33,
                max: 32
            })
        );
        assert_eq!(
            store.get_bytes(GroupId::Identity, identity::MODEL_NAME).unwrap(),
            b"Model-X".to_vec()
        );
    }

    #[test]
    fn test_type_mismatch_on_set() {
        let store = ConfigStore::default();
        let result = store.set(GroupId::Vht, vht::LDPC_CODING_CAP, 1u32);
        assert!(matches!(
            result,
            Err(CfgError::TypeMismatch {
                expected: ValueType::Bool,
                found: ValueType::Int,
                ..
            })
        ));
        assert!(store.get_bool(GroupId::Vht, vht::LDPC_CODING_CAP).unwrap());
    }

    #[test]
    fn test_type_mismatch_on_typed_get() {
        let store = ConfigStore::default();
        let result = store.get_bool(GroupId::Radio, radio::RTS_THRESHOLD);
        assert!(matches!(
            result,
            Err(CfgError::TypeMismatch {
                expected: ValueType::Int,
                found: ValueType::Bool,
                ..
            })
        ));
    }

    #[test]
    fn test_unknown_item() {
        let store = ConfigStore::default();
        assert_eq!(
            store.get(GroupId::Sap, "no_such_item"),
            Err(CfgError::NotFound {
                group: GroupId::Sap,
                item: "no_such_item".to_string()
            })
        );
        assert!(store.set_int(GroupId::Sap, "no_such_item", 1).is_err());
    }

    #[test]
    fn test_returned_bytes_are_copies() {
        let store = ConfigStore::default();
        let mut name = store
            .get_bytes(GroupId::Identity, identity::MANUFACTURER_NAME)
            .unwrap();
        name.clear();
        assert_eq!(
            store
                .get_bytes(GroupId::Identity, identity::MANUFACTURER_NAME)
                .unwrap(),
            b"Generic".to_vec()
        );
    }

    #[test]
    fn test_get_bytes_into() {
        let store = ConfigStore::default();
        let mut buf = [0u8; 16];
        let len = store
            .get_bytes_into(GroupId::Identity, identity::MODEL_NAME, &mut buf)
            .unwrap();
        assert_eq!(&buf[..len], b"WLAN");

        let mut small = [0u8; 2];
        assert_eq!(
            store.get_bytes_into(GroupId::Identity, identity::MODEL_NAME, &mut small),
            Err(CfgError::BufferTooSmall {
                needed: 4,
                available: 2
            })
        );
        assert_eq!(small, [0, 0]);
    }

    // ==================== Reset Tests ====================

    #[test]
    fn test_reset_to_defaults_only_touches_group() {
        let store = ConfigStore::default();
        store.set_int(GroupId::WmmVo, wmm::AIFSN, 7).unwrap();
        store.set_int(GroupId::Radio, radio::RTS_THRESHOLD, 100).unwrap();

        store.reset_to_defaults(GroupId::WmmVo);

        assert_eq!(store.get_int(GroupId::WmmVo, wmm::AIFSN).unwrap(), 2);
        assert_eq!(store.get_int(GroupId::Radio, radio::RTS_THRESHOLD).unwrap(), 100);
    }

    #[test]
    fn test_reset_all() {
        let store = ConfigStore::default();
        store.set_int(GroupId::Vht, vht::CHAN_WIDTH, 0).unwrap();
        store.set_bytes(GroupId::Wep, wep::KEY_1, b"12345").unwrap();
        store.reset_all();
        assert_eq!(store.get_int(GroupId::Vht, vht::CHAN_WIDTH).unwrap(), 2);
        assert!(store.get_bytes(GroupId::Wep, wep::KEY_1).unwrap().is_empty());
    }

    // ==================== Capability Tag Tests ====================

    #[test]
    fn test_tagged_items_omitted() {
        let store = ConfigStore::new(FeatureSet::ALL.without(CapabilityTag::Dot11ax));
        assert!(!store.has_group(GroupId::He));
        assert!(matches!(
            store.get(GroupId::He, he::UL_MUMIMO),
            Err(CfgError::NotFound { .. })
        ));
        assert!(store.set_int(GroupId::He, he::UL_MUMIMO, 0).is_err());
        assert!(store.has_group(GroupId::Vht));
    }

    #[test]
    fn test_tagged_items_present_when_enabled() {
        let store = ConfigStore::new(FeatureSet::NONE.with(CapabilityTag::Dot11ax));
        assert_eq!(store.get_int(GroupId::He, he::UL_MUMIMO).unwrap(), 1);
        assert!(store
            .get(GroupId::Radio, radio::FILS_ENABLED)
            .is_err());
    }

    // ==================== Dump Tests ====================

    #[test]
    fn test_to_json_redacts_secrets() {
        let store = ConfigStore::default();
        store.set_bytes(GroupId::Wep, wep::KEY_2, b"secret").unwrap();
        let json = store.to_json();
        assert_eq!(json["wep"]["key_2"], serde_json::json!(REDACTED));
        assert_eq!(json["radio"]["rts_threshold"], serde_json::json!(2347));
        assert!(!json.to_string().contains("secret\""));
    }

    #[test]
    fn test_to_json_skips_empty_groups() {
        let store = ConfigStore::new(FeatureSet::NONE);
        let json = store.to_json();
        assert!(json.get("he").is_none());
        assert!(json.get("vht").is_some());
    }

    // ==================== Concurrency Tests ====================

    #[test]
    fn test_concurrent_sets_on_different_items() {
        let store = Arc::new(ConfigStore::default());
        let items = [wmm::DIR, wmm::AIFSN, wmm::CWMIN, wmm::CWMAX];
        let handles: Vec<_> = items
            .iter()
            .enumerate()
            .map(|(i, &item)| {
                let store = store.clone();
                thread::spawn(move || {
                    for _ in 0..500 {
                        store.set_int(GroupId::WmmBe, item, i as u32 + 1).unwrap();
                        assert_eq!(store.get_int(GroupId::WmmBe, item).unwrap(), i as u32 + 1);
                    }
                })
            })
            .collect();
        for handle in handles {
            handle.join().unwrap();
        }
    }

    #[test]
    fn test_bytes_never_torn() {
        let store = Arc::new(ConfigStore::default());
        let a = vec![b'a'; 32];
        let b = vec![b'b'; 5];

        let writer = {
            let store = store.clone();
            let (a, b) = (a.clone(), b.clone());
            thread::spawn(move || {
                for i in 0..1000 {
                    let value = if i % 2 == 0 { &a } else { &b };
                    store
                        .set_bytes(GroupId::Identity, identity::MODEL_NUMBER, value)
                        .unwrap();
                }
            })
        };

        for _ in 0..1000 {
            let seen = store
                .get_bytes(GroupId::Identity, identity::MODEL_NUMBER)
                .unwrap();
            assert!(seen == a || seen == b || seen == b"WLAN-0001".to_vec());
        }
        writer.join().unwrap();
    }
}
