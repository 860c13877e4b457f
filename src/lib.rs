//! MLME configuration store and capability negotiation.
//!
//! Every managed wireless subsystem instance (device context) owns a typed,
//! validated [`ConfigStore`] organised into capability groups. Hardware
//! capability reports are merged into the requested configuration by
//! [`negotiate()`], which writes the effective capability set back into the
//! store.

pub mod device;
pub mod error;
pub mod inspect;
pub mod loader;
pub mod negotiate;
pub mod schema;
pub mod store;
pub mod wep;
pub mod wmm;

// Re-export commonly used items
pub use device::{DeviceContext, DeviceRegistry};
pub use error::{CfgError, DeviceId};
pub use inspect::{InspectServer, DEFAULT_INSPECT_PORT};
pub use loader::{apply_json, LoadReport};
pub use negotiate::{
    negotiate, negotiate_from_defaults, ChannelWidth, FieldChange, HardwareCapabilitySnapshot, NegotiationReport,
};
pub use schema::{CapabilityTag, ConfigValue, FeatureSet, GroupId, ItemKind, ItemSpec, ValueType};
pub use store::{ConfigStore, GroupLock};
pub use wmm::{AccessCategory, EdcaParams};
