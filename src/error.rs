//! Error type shared by the store, the negotiator and the device registry.

use std::fmt;

use crate::schema::{GroupId, ValueType};

/// Identifier of a managed device context.
pub type DeviceId = u32;

/// Errors reported by configuration and negotiation operations.
///
/// Every variant except [`CfgError::InvalidSnapshot`] describes a rejected
/// call that left the store exactly as it was.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CfgError {
    /// Unknown group/item, or an item omitted because its capability tag is
    /// disabled for this store.
    NotFound { group: GroupId, item: String },
    /// Integer outside the item's declared range.
    OutOfRange {
        item: &'static str,
        value: u64,
        min: u32,
        max: u32,
    },
    /// Byte string longer than the item allows.
    TooLong {
        item: &'static str,
        len: usize,
        max: usize,
    },
    /// Value kind disagrees with the item's declared kind.
    TypeMismatch {
        item: &'static str,
        expected: ValueType,
        found: ValueType,
    },
    /// Caller buffer cannot hold the stored byte string.
    BufferTooSmall { needed: usize, available: usize },
    /// Hardware capability report is structurally invalid.
    InvalidSnapshot(String),
    /// No device context registered under this id.
    UnknownDevice(DeviceId),
    /// A device context with this id already exists.
    DuplicateDevice(DeviceId),
    /// Malformed configuration document.
    InvalidFormat(String),
}

impl fmt::Display for CfgError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::NotFound { group, item } => write!(f, "no item {}.{}", group, item),
            Self::OutOfRange {
                item,
                value,
                min,
                max,
            } => write!(
                f,
                "{} out of range: {} (expected {}..={})",
                item, value, min, max
            ),
            Self::TooLong { item, len, max } => {
                write!(f, "{} too long: {} bytes (max {})", item, len, max)
            }
            Self::TypeMismatch {
                item,
                expected,
                found,
            } => write!(f, "{} expects {}, got {}", item, expected, found),
            Self::BufferTooSmall { needed, available } => write!(
                f,
                "buffer too small: need {} bytes, have {}",
                needed, available
            ),
            Self::InvalidSnapshot(reason) => write!(f, "invalid hardware snapshot: {}", reason),
            Self::UnknownDevice(id) => write!(f, "unknown device {}", id),
            Self::DuplicateDevice(id) => write!(f, "device {} already registered", id),
            Self::InvalidFormat(msg) => write!(f, "invalid format: {}", msg),
        }
    }
}

impl std::error::Error for CfgError {}
