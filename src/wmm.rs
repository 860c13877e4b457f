//! WMM access categories and their EDCA parameter sets.

use std::fmt;

use crate::schema::items::{radio, wmm};
use crate::schema::{ConfigValue, GroupId};
use crate::{CfgError, ConfigStore};

/// WMM access category.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum AccessCategory {
    BestEffort,
    Background,
    Video,
    Voice,
}

impl AccessCategory {
    pub const ALL: [AccessCategory; 4] = [
        Self::BestEffort,
        Self::Background,
        Self::Video,
        Self::Voice,
    ];

    /// Group holding this category's parameters.
    pub fn group(self) -> GroupId {
        match self {
            Self::BestEffort => GroupId::WmmBe,
            Self::Background => GroupId::WmmBk,
            Self::Video => GroupId::WmmVi,
            Self::Voice => GroupId::WmmVo,
        }
    }

    /// Bit of this category in the U-APSD mask (802.11 QoS Info order).
    fn uapsd_bit(self) -> u32 {
        match self {
            Self::Voice => 1 << 0,
            Self::Video => 1 << 1,
            Self::Background => 1 << 2,
            Self::BestEffort => 1 << 3,
        }
    }
}

impl fmt::Display for AccessCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::BestEffort => "BE",
            Self::Background => "BK",
            Self::Video => "VI",
            Self::Voice => "VO",
        })
    }
}

/// Contention parameters of one access category.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct EdcaParams {
    pub aifsn: u32,
    /// Exponent: CWmin = 2^cwmin - 1.
    pub cwmin: u32,
    /// Exponent: CWmax = 2^cwmax - 1.
    pub cwmax: u32,
    /// TXOP limit in units of 32 microseconds.
    pub txop_limit: u32,
}

impl EdcaParams {
    /// Read the parameter set of `ac` in one consistent view.
    pub fn load(store: &ConfigStore, ac: AccessCategory) -> Result<Self, CfgError> {
        let values = store.snapshot_group(ac.group());
        let int = |name: &'static str| -> Result<u32, CfgError> {
            match values.iter().find(|(n, _)| *n == name) {
                Some((_, ConfigValue::Int(v))) => Ok(*v),
                _ => Err(CfgError::NotFound {
                    group: ac.group(),
                    item: name.to_string(),
                }),
            }
        };
        Ok(Self {
            aifsn: int(wmm::AIFSN)?,
            cwmin: int(wmm::CWMIN)?,
            cwmax: int(wmm::CWMAX)?,
            txop_limit: int(wmm::TXOP_LIMIT)?,
        })
    }

    /// Write the whole set. Either every field is stored or, on a
    /// validation error, none is.
    pub fn store(&self, store: &ConfigStore, ac: AccessCategory) -> Result<(), CfgError> {
        if self.cwmin > self.cwmax {
            return Err(CfgError::OutOfRange {
                item: wmm::CWMIN,
                value: u64::from(self.cwmin),
                min: 0,
                max: self.cwmax,
            });
        }
        let group = ac.group();
        let mut lock = store.lock_groups(&[group]);
        lock.stage(group, wmm::AIFSN, self.aifsn)?;
        lock.stage(group, wmm::CWMIN, self.cwmin)?;
        lock.stage(group, wmm::CWMAX, self.cwmax)?;
        lock.stage(group, wmm::TXOP_LIMIT, self.txop_limit)?;
        lock.commit();
        Ok(())
    }

    /// TXOP limit in microseconds.
    pub fn txop_limit_us(&self) -> u32 {
        self.txop_limit * 32
    }
}

/// Whether U-APSD is enabled for `ac`.
pub fn uapsd_enabled(store: &ConfigStore, ac: AccessCategory) -> Result<bool, CfgError> {
    Ok(store.get_int(GroupId::Radio, radio::UAPSD_MASK)? & ac.uapsd_bit() != 0)
}

/// Enable or disable U-APSD for `ac`.
///
/// Read-modify-write of the shared mask; callers updating several
/// categories concurrently must serialize themselves.
pub fn set_uapsd(store: &ConfigStore, ac: AccessCategory, enabled: bool) -> Result<(), CfgError> {
    let mask = store.get_int(GroupId::Radio, radio::UAPSD_MASK)?;
    let mask = if enabled {
        mask | ac.uapsd_bit()
    } else {
        mask & !ac.uapsd_bit()
    };
    store.set_int(GroupId::Radio, radio::UAPSD_MASK, mask)
}
