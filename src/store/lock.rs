//! Transactional multi-group update.

use std::sync::RwLockWriteGuard;

use log::trace;

use super::{wrong_accessor, ConfigStore, Slot};
use crate::schema::{ConfigValue, GroupId, ValueType};
use crate::CfgError;

/// Exclusive hold on the publish gates of a set of groups.
///
/// Values are [`stage`](Self::stage)d (validated immediately, applied later)
/// and become visible together on [`commit`](Self::commit). Dropping the
/// lock without committing discards everything staged. While held, no
/// other thread can read or write any item of the locked groups, so readers
/// observe either the state before the transaction or the state after it.
pub struct GroupLock<'a> {
    store: &'a ConfigStore,
    groups: Vec<GroupId>,
    _gates: Vec<RwLockWriteGuard<'a, ()>>,
    staged: Vec<(&'a Slot, ConfigValue)>,
}

impl<'a> GroupLock<'a> {
    pub(super) fn new(
        store: &'a ConfigStore,
        groups: Vec<GroupId>,
        gates: Vec<RwLockWriteGuard<'a, ()>>,
    ) -> Self {
        Self {
            store,
            groups,
            _gates: gates,
            staged: Vec::new(),
        }
    }

    /// Groups held by this lock, in lock order.
    pub fn groups(&self) -> &[GroupId] {
        &self.groups
    }

    /// Whether `group` has any item in the underlying store.
    pub fn has_group(&self, group: GroupId) -> bool {
        self.store.has_group(group)
    }

    /// Value as committed, ignoring anything staged.
    pub fn get(&self, group: GroupId, item: &str) -> Result<ConfigValue, CfgError> {
        self.check_held(group, item)?;
        Ok(self.store.slot(group, item)?.load())
    }

    /// Committed value of a boolean item.
    ///
    /// Fails with [`CfgError::TypeMismatch`] when the item is not a boolean.
    pub fn get_bool(&self, group: GroupId, item: &str) -> Result<bool, CfgError> {
        match self.get(group, item)? {
            ConfigValue::Bool(v) => Ok(v),
            _ => Err(wrong_accessor(self.store.spec(group, item)?, ValueType::Bool)),
        }
    }

    /// Committed value of an integer item.
    pub fn get_int(&self, group: GroupId, item: &str) -> Result<u32, CfgError> {
        match self.get(group, item)? {
            ConfigValue::Int(v) => Ok(v),
            _ => Err(wrong_accessor(self.store.spec(group, item)?, ValueType::Int)),
        }
    }

    /// Copy of the committed value of a byte-string item.
    pub fn get_bytes(&self, group: GroupId, item: &str) -> Result<Vec<u8>, CfgError> {
        match self.get(group, item)? {
            ConfigValue::Bytes(v) => Ok(v),
            _ => Err(wrong_accessor(self.store.spec(group, item)?, ValueType::Bytes)),
        }
    }

    /// Validate `value` and queue it for commit. Staging the same item twice
    /// keeps the later value.
    pub fn stage(
        &mut self,
        group: GroupId,
        item: &str,
        value: impl Into<ConfigValue>,
    ) -> Result<(), CfgError> {
        self.check_held(group, item)?;
        let value = value.into();
        let store = self.store;
        let slot = store.slot(group, item)?;
        slot.spec.validate(&value)?;
        self.push_staged(slot, value);
        Ok(())
    }

    /// Value a commit would publish: the staged value when there is one,
    /// otherwise the committed value.
    pub fn pending(&self, group: GroupId, item: &str) -> Result<ConfigValue, CfgError> {
        self.check_held(group, item)?;
        let slot = self.store.slot(group, item)?;
        match self
            .staged
            .iter()
            .find(|(staged, _)| std::ptr::eq(*staged, slot))
        {
            Some((_, value)) => Ok(value.clone()),
            None => Ok(slot.load()),
        }
    }

    /// Stage the schema default of every item in every held group.
    pub fn stage_defaults(&mut self) {
        let store = self.store;
        for group in self.groups.clone() {
            for slot in &store.group(group).slots {
                self.push_staged(slot, slot.spec.default_value());
            }
        }
    }

    /// Number of values waiting for commit.
    pub fn staged_len(&self) -> usize {
        self.staged.len()
    }

    /// Apply every staged value and release the gates. Returns the number of
    /// items written.
    pub fn commit(mut self) -> usize {
        let staged = std::mem::take(&mut self.staged);
        let count = staged.len();
        for (slot, value) in staged {
            slot.store(value);
        }
        trace!("Committed {} values across {:?}", count, self.groups);
        count
    }

    fn push_staged(&mut self, slot: &'a Slot, value: ConfigValue) {
        match self
            .staged
            .iter_mut()
            .find(|(staged, _)| std::ptr::eq(*staged, slot))
        {
            Some(entry) => entry.1 = value,
            None => self.staged.push((slot, value)),
        }
    }

    fn check_held(&self, group: GroupId, item: &str) -> Result<(), CfgError> {
        if self.groups.contains(&group) {
            Ok(())
        } else {
            // Only held groups are reachable through the lock.
            Err(CfgError::NotFound {
                group,
                item: item.to_string(),
            })
        }
    }
}
