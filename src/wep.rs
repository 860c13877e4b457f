//! WEP default keys.
//!
//! Keys are secret items: they are wiped from memory when replaced and
//! never appear in dumps. Copies handed out are wrapped in
//! [`Zeroizing`] so they are wiped when the caller drops them.

use zeroize::Zeroizing;

use crate::schema::items::wep;
use crate::schema::GroupId;
use crate::{CfgError, ConfigStore};

/// WEP-40 key length.
pub const WEP40_KEY_LEN: usize = 5;
/// WEP-104 key length.
pub const WEP104_KEY_LEN: usize = crate::schema::WEP_KEY_MAX_LEN;

/// Index of one of the four default keys.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct WepKeyId(u8);

impl WepKeyId {
    pub const ALL: [WepKeyId; 4] = [WepKeyId(0), WepKeyId(1), WepKeyId(2), WepKeyId(3)];

    pub fn new(index: u8) -> Option<Self> {
        (index < 4).then_some(Self(index))
    }

    pub fn index(self) -> u8 {
        self.0
    }

    fn item(self) -> &'static str {
        match self.0 {
            0 => wep::KEY_1,
            1 => wep::KEY_2,
            2 => wep::KEY_3,
            _ => wep::KEY_4,
        }
    }
}

/// Copy of key `id`; empty when the key is not set.
pub fn get_key(store: &ConfigStore, id: WepKeyId) -> Result<Zeroizing<Vec<u8>>, CfgError> {
    store.get_bytes(GroupId::Wep, id.item()).map(Zeroizing::new)
}

/// Install key `id`. Only WEP-40 and WEP-104 lengths are accepted, an empty
/// slice clears the key.
///
/// Keys longer than WEP-104 fail with [`CfgError::TooLong`] like any other
/// oversized byte string; other lengths fail with [`CfgError::InvalidFormat`].
pub fn set_key(store: &ConfigStore, id: WepKeyId, key: &[u8]) -> Result<(), CfgError> {
    match key.len() {
        0 | WEP40_KEY_LEN | WEP104_KEY_LEN => store.set_bytes(GroupId::Wep, id.item(), key),
        len if len > WEP104_KEY_LEN => Err(CfgError::TooLong {
            item: id.item(),
            len,
            max: WEP104_KEY_LEN,
        }),
        len => Err(CfgError::InvalidFormat(format!(
            "WEP key {} is {} bytes (expected {} or {})",
            id.index(),
            len,
            WEP40_KEY_LEN,
            WEP104_KEY_LEN
        ))),
    }
}

/// Index of the key used for transmission.
pub fn default_key_id(store: &ConfigStore) -> Result<WepKeyId, CfgError> {
    let index = store.get_int(GroupId::Wep, wep::DEFAULT_KEY_ID)?;
    // The item is range checked to 0..=3.
    Ok(WepKeyId(index as u8))
}

pub fn set_default_key_id(store: &ConfigStore, id: WepKeyId) -> Result<(), CfgError> {
    store.set_int(GroupId::Wep, wep::DEFAULT_KEY_ID, u32::from(id.index()))
}

/// Copy of the key selected as default.
pub fn default_key(store: &ConfigStore) -> Result<Zeroizing<Vec<u8>>, CfgError> {
    get_key(store, default_key_id(store)?)
}
