//! Configuration schema: groups, item kinds, defaults and capability tags.
//!
//! The schema is static data. Every group is a fixed table of [`ItemSpec`]s
//! declared in [`tables`]; nothing is added at runtime. A store built from
//! the schema decides per [`FeatureSet`] which tagged items exist.
//!
//! # Example
//!
//! ```
//! use wlan_mlme_cfg::schema::{self, items, GroupId, ItemKind};
//!
//! let rts = schema::find_item(GroupId::Radio, items::radio::RTS_THRESHOLD).unwrap();
//! assert_eq!(rts.kind, ItemKind::Int { min: 0, max: 65536 });
//! ```

mod tables;

use std::fmt;

pub use tables::{items, WEP_KEY_MAX_LEN};

/// Logical cluster of configuration items.
///
/// Declaration order is the lock order used when several groups are held at
/// once.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum GroupId {
    /// Generic radio parameters (thresholds, chain masks, WMM mode).
    Radio,
    /// HT (802.11n) capabilities.
    Ht,
    /// VHT (802.11ac) capabilities.
    Vht,
    /// HE (802.11ax) capabilities.
    He,
    /// WMM best effort access category.
    WmmBe,
    /// WMM background access category.
    WmmBk,
    /// WMM video access category.
    WmmVi,
    /// WMM voice access category.
    WmmVo,
    /// SAP/AP limits.
    Sap,
    /// Identity strings (manufacturer, model).
    Identity,
    /// WEP default keys.
    Wep,
}

impl GroupId {
    /// Every group, in lock order.
    pub const ALL: [GroupId; 11] = [
        Self::Radio,
        Self::Ht,
        Self::Vht,
        Self::He,
        Self::WmmBe,
        Self::WmmBk,
        Self::WmmVi,
        Self::WmmVo,
        Self::Sap,
        Self::Identity,
        Self::Wep,
    ];

    /// Name used in configuration documents and dumps.
    pub fn name(self) -> &'static str {
        match self {
            Self::Radio => "radio",
            Self::Ht => "ht",
            Self::Vht => "vht",
            Self::He => "he",
            Self::WmmBe => "wmm_be",
            Self::WmmBk => "wmm_bk",
            Self::WmmVi => "wmm_vi",
            Self::WmmVo => "wmm_vo",
            Self::Sap => "sap",
            Self::Identity => "identity",
            Self::Wep => "wep",
        }
    }

    /// Look up a group by its [`name`](Self::name).
    pub fn from_name(name: &str) -> Option<Self> {
        Self::ALL.iter().copied().find(|g| g.name() == name)
    }

    /// Static item table of this group.
    pub fn items(self) -> &'static [ItemSpec] {
        tables::group_items(self)
    }

    pub(crate) fn index(self) -> usize {
        self as usize
    }
}

impl fmt::Display for GroupId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Build-configuration capability an item depends on.
///
/// Items carrying a tag only exist in stores whose [`FeatureSet`] enables it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum CapabilityTag {
    /// 802.11ax (HE) support.
    Dot11ax,
    /// Fast initial link setup.
    Fils,
    /// Optimized connectivity experience.
    Oce,
}

impl CapabilityTag {
    fn bit(self) -> u8 {
        match self {
            Self::Dot11ax => 1 << 0,
            Self::Fils => 1 << 1,
            Self::Oce => 1 << 2,
        }
    }
}

/// Set of enabled capability tags for one store.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FeatureSet(u8);

impl FeatureSet {
    /// No optional capability.
    pub const NONE: FeatureSet = FeatureSet(0);
    /// Every optional capability.
    pub const ALL: FeatureSet = FeatureSet(0b111);

    /// Return a copy with `tag` enabled.
    pub fn with(self, tag: CapabilityTag) -> Self {
        Self(self.0 | tag.bit())
    }

    /// Return a copy with `tag` disabled.
    pub fn without(self, tag: CapabilityTag) -> Self {
        Self(self.0 & !tag.bit())
    }

    /// Whether `tag` is enabled.
    pub fn contains(self, tag: CapabilityTag) -> bool {
        self.0 & tag.bit() != 0
    }

    /// Whether an item with this (optional) tag is present.
    pub fn admits(self, tag: Option<CapabilityTag>) -> bool {
        tag.map_or(true, |t| self.contains(t))
    }
}

impl Default for FeatureSet {
    fn default() -> Self {
        Self::ALL
    }
}

/// Kind of value an item holds.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ValueType {
    Bool,
    Int,
    Bytes,
}

impl fmt::Display for ValueType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::Bool => "bool",
            Self::Int => "int",
            Self::Bytes => "bytes",
        })
    }
}

/// Declared kind and bounds of an item.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ItemKind {
    Bool,
    /// Unsigned integer constrained to `min..=max`.
    Int { min: u32, max: u32 },
    /// Byte string of at most `max_len` bytes.
    Bytes { max_len: usize },
}

impl ItemKind {
    pub fn value_type(self) -> ValueType {
        match self {
            Self::Bool => ValueType::Bool,
            Self::Int { .. } => ValueType::Int,
            Self::Bytes { .. } => ValueType::Bytes,
        }
    }
}

/// A configuration value.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ConfigValue {
    Bool(bool),
    Int(u32),
    Bytes(Vec<u8>),
}

impl ConfigValue {
    pub fn value_type(&self) -> ValueType {
        match self {
            Self::Bool(_) => ValueType::Bool,
            Self::Int(_) => ValueType::Int,
            Self::Bytes(_) => ValueType::Bytes,
        }
    }

    /// JSON rendering used by dumps. Byte strings that are valid UTF-8 render
    /// as strings, anything else as an array of numbers.
    pub fn to_json(&self) -> serde_json::Value {
        match self {
            Self::Bool(b) => serde_json::Value::Bool(*b),
            Self::Int(v) => serde_json::Value::from(*v),
            Self::Bytes(b) => match std::str::from_utf8(b) {
                Ok(s) => serde_json::Value::String(s.to_string()),
                Err(_) => serde_json::Value::from(b.clone()),
            },
        }
    }
}

impl From<bool> for ConfigValue {
    fn from(v: bool) -> Self {
        Self::Bool(v)
    }
}

impl From<u32> for ConfigValue {
    fn from(v: u32) -> Self {
        Self::Int(v)
    }
}

impl From<&[u8]> for ConfigValue {
    fn from(v: &[u8]) -> Self {
        Self::Bytes(v.to_vec())
    }
}

impl From<Vec<u8>> for ConfigValue {
    fn from(v: Vec<u8>) -> Self {
        Self::Bytes(v)
    }
}

/// Schema default, kept `const`-constructible.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DefaultValue {
    Bool(bool),
    Int(u32),
    Bytes(&'static [u8]),
}

/// Schema entry for one item.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ItemSpec {
    pub name: &'static str,
    pub kind: ItemKind,
    pub default: DefaultValue,
    /// Item only exists when this capability is enabled.
    pub tag: Option<CapabilityTag>,
    /// Value is key material: zeroized on replacement, redacted in dumps.
    pub secret: bool,
}

impl ItemSpec {
    pub const fn flag(name: &'static str, default: bool) -> Self {
        Self {
            name,
            kind: ItemKind::Bool,
            default: DefaultValue::Bool(default),
            tag: None,
            secret: false,
        }
    }

    pub const fn int(name: &'static str, min: u32, max: u32, default: u32) -> Self {
        Self {
            name,
            kind: ItemKind::Int { min, max },
            default: DefaultValue::Int(default),
            tag: None,
            secret: false,
        }
    }

    pub const fn bytes(name: &'static str, max_len: usize, default: &'static [u8]) -> Self {
        Self {
            name,
            kind: ItemKind::Bytes { max_len },
            default: DefaultValue::Bytes(default),
            tag: None,
            secret: false,
        }
    }

    pub const fn tagged(mut self, tag: CapabilityTag) -> Self {
        self.tag = Some(tag);
        self
    }

    pub const fn secret(mut self) -> Self {
        self.secret = true;
        self
    }

    /// Owned copy of the schema default.
    pub fn default_value(&self) -> ConfigValue {
        match self.default {
            DefaultValue::Bool(b) => ConfigValue::Bool(b),
            DefaultValue::Int(v) => ConfigValue::Int(v),
            DefaultValue::Bytes(b) => ConfigValue::Bytes(b.to_vec()),
        }
    }

    /// Check `value` against this item's kind and bounds.
    pub fn validate(&self, value: &ConfigValue) -> Result<(), crate::CfgError> {
        use crate::CfgError;

        match (self.kind, value) {
            (ItemKind::Bool, ConfigValue::Bool(_)) => Ok(()),
            (ItemKind::Int { min, max }, ConfigValue::Int(v)) => {
                if *v < min || *v > max {
                    Err(CfgError::OutOfRange {
                        item: self.name,
                        value: u64::from(*v),
                        min,
                        max,
                    })
                } else {
                    Ok(())
                }
            }
            (ItemKind::Bytes { max_len }, ConfigValue::Bytes(b)) => {
                if b.len() > max_len {
                    Err(CfgError::TooLong {
                        item: self.name,
                        len: b.len(),
                        max: max_len,
                    })
                } else {
                    Ok(())
                }
            }
            (kind, value) => Err(CfgError::TypeMismatch {
                item: self.name,
                expected: kind.value_type(),
                found: value.value_type(),
            }),
        }
    }
}

/// Find an item's schema entry regardless of capability tags.
pub fn find_item(group: GroupId, name: &str) -> Option<&'static ItemSpec> {
    group.items().iter().find(|spec| spec.name == name)
}
