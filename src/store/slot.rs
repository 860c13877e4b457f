//! One synchronized item value.

use std::sync::{PoisonError, RwLock, RwLockReadGuard, RwLockWriteGuard};

use zeroize::Zeroize;

use crate::schema::{ConfigValue, ItemSpec};

/// Current value of one item plus its schema entry.
///
/// Values are replaced whole under the write lock, so a reader sees either
/// the old or the new value and never a partially written byte string.
pub(crate) struct Slot {
    pub(crate) spec: &'static ItemSpec,
    value: RwLock<ConfigValue>,
}

impl Slot {
    pub(crate) fn new(spec: &'static ItemSpec) -> Self {
        Self {
            spec,
            value: RwLock::new(spec.default_value()),
        }
    }

    /// Copy of the current value.
    pub(crate) fn load(&self) -> ConfigValue {
        self.read().clone()
    }

    /// Replace the value. Caller has validated `value` against the spec.
    pub(crate) fn store(&self, value: ConfigValue) {
        let old = std::mem::replace(&mut *self.write(), value);
        if self.spec.secret {
            wipe(old);
        }
    }

    pub(crate) fn reset(&self) {
        self.store(self.spec.default_value());
    }

    pub(crate) fn read(&self) -> RwLockReadGuard<'_, ConfigValue> {
        self.value.read().unwrap_or_else(PoisonError::into_inner)
    }

    fn write(&self) -> RwLockWriteGuard<'_, ConfigValue> {
        self.value.write().unwrap_or_else(PoisonError::into_inner)
    }
}

impl Drop for Slot {
    fn drop(&mut self) {
        if self.spec.secret {
            let value = self.value.get_mut().unwrap_or_else(PoisonError::into_inner);
            if let ConfigValue::Bytes(bytes) = value {
                bytes.zeroize();
            }
        }
    }
}

fn wipe(value: ConfigValue) {
    if let ConfigValue::Bytes(mut bytes) = value {
        bytes.zeroize();
    }
}
