//! Loading requested values from JSON documents.
//!
//! A document maps group names to objects of item values:
//!
//! ```json
//! {
//!     "radio": { "rts_threshold": 3000 },
//!     "vht": { "chan_width": 3, "short_gi_160mhz": true },
//!     "identity": { "model_name": "AP-9" },
//!     "wep": { "key_1": [1, 2, 3, 4, 5] }
//! }
//! ```
//!
//! Every item goes through [`ConfigStore::set`]; an item that fails keeps its
//! previous value and is listed in the [`LoadReport`], the rest still apply.

use log::{debug, warn};
use serde_json::Value;

use crate::schema::{ConfigValue, GroupId, ItemKind, ValueType};
use crate::{CfgError, ConfigStore};

/// Outcome of applying one document.
#[derive(Debug, Default, PartialEq, Eq)]
pub struct LoadReport {
    /// Items written.
    pub applied: usize,
    /// `group.item` paths that were refused, with the reason.
    pub rejected: Vec<(String, CfgError)>,
}

impl LoadReport {
    /// True when every item in the document was applied.
    pub fn is_clean(&self) -> bool {
        self.rejected.is_empty()
    }
}

/// Parse `json` and apply it to `store`.
///
/// Fails with [`CfgError::InvalidFormat`] only when the document itself is
/// not an object of objects, in which case nothing is applied. Per-item
/// problems end up in the report.
pub fn apply_json(store: &ConfigStore, json: &str) -> Result<LoadReport, CfgError> {
    let doc: Value = serde_json::from_str(json).map_err(|e| CfgError::InvalidFormat(e.to_string()))?;
    apply_value(store, &doc)
}

/// Apply an already parsed document.
pub fn apply_value(store: &ConfigStore, doc: &Value) -> Result<LoadReport, CfgError> {
    let groups = doc
        .as_object()
        .ok_or_else(|| CfgError::InvalidFormat("expected an object of groups".to_string()))?;

    // Shape is checked up front so a malformed document writes nothing.
    if let Some((group_name, _)) = groups.iter().find(|(_, items)| !items.is_object()) {
        return Err(CfgError::InvalidFormat(format!(
            "group {} is not an object",
            group_name
        )));
    }

    let mut report = LoadReport::default();
    for (group_name, items) in groups {
        let Some(items) = items.as_object() else {
            continue;
        };
        let group = match GroupId::from_name(group_name) {
            Some(group) => group,
            None => {
                for item in items.keys() {
                    report.rejected.push((
                        format!("{}.{}", group_name, item),
                        CfgError::InvalidFormat(format!("unknown group {}", group_name)),
                    ));
                }
                continue;
            }
        };

        for (item, value) in items {
            match apply_item(store, group, item, value) {
                Ok(()) => report.applied += 1,
                Err(e) => {
                    warn!("Rejected {}.{}: {}", group, item, e);
                    report.rejected.push((format!("{}.{}", group, item), e));
                }
            }
        }
    }
    debug!(
        "Loaded {} item(s), {} rejected",
        report.applied,
        report.rejected.len()
    );
    Ok(report)
}

fn apply_item(store: &ConfigStore, group: GroupId, item: &str, value: &Value) -> Result<(), CfgError> {
    let spec = store.spec(group, item)?;
    let value = to_config_value(spec.name, spec.kind, value)?;
    store.set(group, item, value)
}

/// Convert a JSON value for an item of `kind`.
fn to_config_value(name: &'static str, kind: ItemKind, value: &Value) -> Result<ConfigValue, CfgError> {
    let mismatch = |found| CfgError::TypeMismatch {
        item: name,
        expected: kind.value_type(),
        found,
    };
    match (kind, value) {
        (ItemKind::Bool, Value::Bool(b)) => Ok(ConfigValue::Bool(*b)),
        (ItemKind::Int { min, max }, Value::Number(n)) => {
            let v = n
                .as_u64()
                .ok_or_else(|| CfgError::InvalidFormat(format!("{} is not an unsigned integer: {}", name, n)))?;
            u32::try_from(v)
                .map(ConfigValue::Int)
                .map_err(|_| CfgError::OutOfRange {
                    item: name,
                    value: v,
                    min,
                    max,
                })
        }
        (ItemKind::Bytes { .. }, Value::String(s)) => Ok(ConfigValue::Bytes(s.as_bytes().to_vec())),
        (ItemKind::Bytes { .. }, Value::Array(elems)) => elems
            .iter()
            .map(|e| {
                e.as_u64()
                    .and_then(|b| u8::try_from(b).ok())
                    .ok_or_else(|| CfgError::InvalidFormat(format!("{} byte out of range: {}", name, e)))
            })
            .collect::<Result<Vec<u8>, _>>()
            .map(ConfigValue::Bytes),
        (_, Value::Bool(_)) => Err(mismatch(ValueType::Bool)),
        (_, Value::Number(_)) => Err(mismatch(ValueType::Int)),
        (_, Value::String(_)) | (_, Value::Array(_)) => Err(mismatch(ValueType::Bytes)),
        (_, other) => Err(CfgError::InvalidFormat(format!(
            "{} has unsupported value {}",
            name, other
        ))),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::schema::items::{identity, radio, vht, wep};
    use crate::schema::{CapabilityTag, FeatureSet};

    #[test]
    fn test_apply_document() {
        let store = ConfigStore::default();
        let report = apply_json(
            &store,
            r#"{
                "radio": { "rts_threshold": 3000 },
                "vht": { "chan_width": 3, "short_gi_160mhz": true },
                "identity": { "model_name": "AP-9" },
                "wep": { "key_1": [1, 2, 3, 4, 5] }
            }"#,
        )
        .unwrap();

        assert!(report.is_clean(), "{:?}", report.rejected);
        assert_eq!(report.applied, 5);
        assert_eq!(store.get_int(GroupId::Radio, radio::RTS_THRESHOLD).unwrap(), 3000);
        assert_eq!(store.get_int(GroupId::Vht, vht::CHAN_WIDTH).unwrap(), 3);
        assert!(store.get_bool(GroupId::Vht, vht::SHORT_GI_160).unwrap());
        assert_eq!(
            store.get_bytes(GroupId::Identity, identity::MODEL_NAME).unwrap(),
            b"AP-9".to_vec()
        );
        assert_eq!(
            store.get_bytes(GroupId::Wep, wep::KEY_1).unwrap(),
            vec![1, 2, 3, 4, 5]
        );
    }

    #[test]
    fn test_bad_items_are_reported_not_fatal() {
        let store = ConfigStore::default();
        let report = apply_json(
            &store,
            r#"{
                "radio": { "rts_threshold": 70000, "frag_threshold": 1000, "bogus": 1 },
                "vht": { "short_gi_80mhz": 1 },
                "mesh": { "ttl": 5 }
            }"#,
        )
        .unwrap();

        assert_eq!(report.applied, 1);
        assert_eq!(report.rejected.len(), 4);
        assert_eq!(store.get_int(GroupId::Radio, radio::RTS_THRESHOLD).unwrap(), 2347);
        assert_eq!(store.get_int(GroupId::Radio, radio::FRAG_THRESHOLD).unwrap(), 1000);

        let reason = |path: &str| {
            report
                .rejected
                .iter()
                .find(|(p, _)| p == path)
                .map(|(_, e)| e.clone())
                .unwrap()
        };
        assert!(matches!(reason("radio.rts_threshold"), CfgError::OutOfRange { .. }));
        assert!(matches!(reason("radio.bogus"), CfgError::NotFound { .. }));
        assert!(matches!(
            reason("vht.short_gi_80mhz"),
            CfgError::TypeMismatch {
                expected: ValueType::Bool,
                found: ValueType::Int,
                ..
            }
        ));
        assert!(matches!(reason("mesh.ttl"), CfgError::InvalidFormat(_)));
    }

    #[test]
    fn test_integer_wider_than_u32() {
        let store = ConfigStore::default();
        let report = apply_json(&store, r#"{ "radio": { "rts_threshold": 5000000000 } }"#).unwrap();
        assert!(matches!(
            report.rejected[0].1,
            CfgError::OutOfRange {
                value: 5_000_000_000,
                ..
            }
        ));
    }

    #[test]
    fn test_negative_and_fractional_numbers() {
        let store = ConfigStore::default();
        let report = apply_json(
            &store,
            r#"{ "radio": { "rts_threshold": -1, "frag_threshold": 1.5 } }"#,
        )
        .unwrap();
        assert_eq!(report.applied, 0);
        assert!(report
            .rejected
            .iter()
            .all(|(_, e)| matches!(e, CfgError::InvalidFormat(_))));
    }

    #[test]
    fn test_tagged_item_absent() {
        let store = ConfigStore::new(FeatureSet::ALL.without(CapabilityTag::Dot11ax));
        let report = apply_json(&store, r#"{ "he": { "ul_mumimo": 0 } }"#).unwrap();
        assert!(matches!(report.rejected[0].1, CfgError::NotFound { .. }));
    }

    #[test]
    fn test_malformed_document() {
        let store = ConfigStore::default();
        assert!(matches!(apply_json(&store, "[1, 2]"), Err(CfgError::InvalidFormat(_))));
        assert!(matches!(
            apply_json(&store, r#"{ "radio": 3 }"#),
            Err(CfgError::InvalidFormat(_))
        ));
        assert!(matches!(apply_json(&store, "{"), Err(CfgError::InvalidFormat(_))));
    }

    #[test]
    fn test_malformed_group_after_valid_one_applies_nothing() {
        let store = ConfigStore::default();
        let result = apply_json(
            &store,
            r#"{ "radio": { "rts_threshold": 3000 }, "wmm_be": 3 }"#,
        );
        assert!(matches!(result, Err(CfgError::InvalidFormat(_))));
        assert_eq!(store.get_int(GroupId::Radio, radio::RTS_THRESHOLD).unwrap(), 2347);
    }
}
