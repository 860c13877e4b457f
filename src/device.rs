//! Device contexts and the registry that owns them.
//!
//! Each managed subsystem instance gets one [`DeviceContext`], which
//! exclusively owns its [`ConfigStore`]. The firmware interface reports
//! hardware capabilities through
//! [`DeviceRegistry::report_hardware_capabilities`]; the last accepted
//! snapshot is kept so a restarted subsystem can be brought back to the
//! same negotiated state.

use std::collections::HashMap;
use std::sync::{Arc, Mutex, PoisonError, RwLock};

use log::{info, warn};

use crate::negotiate::{self, HardwareCapabilitySnapshot, NegotiationReport, NEGOTIATED_GROUPS};
use crate::schema::{FeatureSet, GroupId};
use crate::{CfgError, ConfigStore, DeviceId};

/// One managed subsystem instance.
pub struct DeviceContext {
    id: DeviceId,
    store: ConfigStore,
    last_snapshot: Mutex<Option<HardwareCapabilitySnapshot>>,
}

impl DeviceContext {
    /// Create a context whose store admits the items of `features`.
    pub fn new(id: DeviceId, features: FeatureSet) -> Self {
        Self {
            id,
            store: ConfigStore::new(features),
            last_snapshot: Mutex::new(None),
        }
    }

    pub fn id(&self) -> DeviceId {
        self.id
    }

    /// Configuration store owned by this device.
    pub fn store(&self) -> &ConfigStore {
        &self.store
    }

    /// Last snapshot that negotiated successfully.
    pub fn last_snapshot(&self) -> Option<HardwareCapabilitySnapshot> {
        self.snapshot_slot().clone()
    }

    /// Negotiate against `snapshot` and remember it on success.
    ///
    /// A rejected snapshot leaves both the store and the remembered snapshot
    /// as they were.
    pub fn apply_hardware_capabilities(
        &self,
        snapshot: &HardwareCapabilitySnapshot,
    ) -> Result<NegotiationReport, CfgError> {
        // Held across negotiation: the remembered snapshot is always the one
        // applied last.
        let mut last = self.snapshot_slot();
        match negotiate::negotiate(&self.store, snapshot) {
            Ok(report) => {
                info!(
                    "Device {}: negotiated {} stream(s) at {}, {} field(s) clamped",
                    self.id,
                    report.baseline.spatial_streams,
                    report.baseline.channel_width,
                    report.changes.len()
                );
                *last = Some(snapshot.clone());
                Ok(report)
            }
            Err(e) => {
                warn!("Device {}: capability report rejected: {}", self.id, e);
                Err(e)
            }
        }
    }

    /// Negotiate again against the last accepted snapshot, e.g. after new
    /// requested values were loaded. `None` when no snapshot was accepted yet.
    pub fn renegotiate(&self) -> Result<Option<NegotiationReport>, CfgError> {
        match self.last_snapshot() {
            Some(snapshot) => self.apply_hardware_capabilities(&snapshot).map(Some),
            None => Ok(None),
        }
    }

    /// Subsystem restart recovery: every group back to defaults, then
    /// negotiated against the last accepted snapshot if there is one.
    ///
    /// Negotiated groups go from their previous effective values straight to
    /// the renegotiated ones; the raw defaults are never visible to readers.
    pub fn reinitialize(&self) -> Result<Option<NegotiationReport>, CfgError> {
        info!("Device {}: reinitializing configuration", self.id);
        // Held throughout so a capability report cannot land between the
        // reset and the renegotiation.
        let last = self.snapshot_slot();
        let plain: Vec<GroupId> = GroupId::ALL
            .iter()
            .copied()
            .filter(|group| !NEGOTIATED_GROUPS.contains(group))
            .collect();
        self.store.reset_groups(&plain);
        match last.as_ref() {
            Some(snapshot) => negotiate::negotiate_from_defaults(&self.store, snapshot).map(Some),
            None => {
                self.store.reset_groups(&NEGOTIATED_GROUPS);
                Ok(None)
            }
        }
    }

    fn snapshot_slot(&self) -> std::sync::MutexGuard<'_, Option<HardwareCapabilitySnapshot>> {
        self.last_snapshot
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
    }
}

impl std::fmt::Debug for DeviceContext {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("DeviceContext")
            .field("id", &self.id)
            .field("store", &self.store)
            .finish()
    }
}

/// All device contexts, keyed by id.
#[derive(Default)]
pub struct DeviceRegistry {
    devices: RwLock<HashMap<DeviceId, Arc<DeviceContext>>>,
}

impl DeviceRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a device context with every item at its default.
    pub fn create(&self, id: DeviceId, features: FeatureSet) -> Result<Arc<DeviceContext>, CfgError> {
        let mut devices = self.devices.write().unwrap_or_else(PoisonError::into_inner);
        if devices.contains_key(&id) {
            return Err(CfgError::DuplicateDevice(id));
        }
        let device = Arc::new(DeviceContext::new(id, features));
        devices.insert(id, device.clone());
        info!("Device {} created", id);
        Ok(device)
    }

    /// Shared handle to device `id`, or [`CfgError::UnknownDevice`].
    pub fn get(&self, id: DeviceId) -> Result<Arc<DeviceContext>, CfgError> {
        self.devices
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .get(&id)
            .cloned()
            .ok_or(CfgError::UnknownDevice(id))
    }

    /// Tear down a device context. Its store is dropped once the last
    /// outstanding handle goes away.
    pub fn remove(&self, id: DeviceId) -> Result<Arc<DeviceContext>, CfgError> {
        let removed = self
            .devices
            .write()
            .unwrap_or_else(PoisonError::into_inner)
            .remove(&id)
            .ok_or(CfgError::UnknownDevice(id))?;
        info!("Device {} removed", id);
        Ok(removed)
    }

    /// Registered ids in ascending order.
    pub fn ids(&self) -> Vec<DeviceId> {
        let mut ids: Vec<_> = self
            .devices
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .keys()
            .copied()
            .collect();
        ids.sort_unstable();
        ids
    }

    /// Entry point for the firmware interface: negotiate `snapshot` on
    /// device `id`.
    pub fn report_hardware_capabilities(
        &self,
        id: DeviceId,
        snapshot: &HardwareCapabilitySnapshot,
    ) -> Result<NegotiationReport, CfgError> {
        self.get(id)?.apply_hardware_capabilities(snapshot)
    }
}
