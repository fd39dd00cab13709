//! Scale fleet registry
//!
//! Keeps the authoritative list of hosts in an autoscaled compute pool,
//! persists it crash-safely, merges in hosts provisioned by Terraform and
//! tells the gateway to stop routing to hosts being decommissioned.
//!
//! # Architecture
//!
//! ```text
//!  terraform.tfstate ──► ProvisioningImporter ──┐
//!                                               ▼
//!  NameGenerator ──────────────────────────►  Fleet  ──► DecommissionNotifier ──► gateway
//!                                               │
//!                                  codec (sorted, versioned JSON)
//!                                               │
//!                                  AtomicFileStore (temp + rename)
//!                                               │
//!                                           fleet.json
//! ```
//!
//! # Example
//!
//! ```ignore
//! use scale_cloud::{DecommissionNotifier, FleetStore, InfraState, ProvisioningImporter};
//!
//! let store = FleetStore::new("fleet.json");
//! let mut fleet = store.load_or_default()?;
//!
//! let state = InfraState::from_file("terraform.tfstate")?;
//! let report = ProvisioningImporter::default().import(&mut fleet, &state)?;
//! store.save(&fleet)?;
//!
//! DecommissionNotifier::http()?.notify_fleet(&fleet, "brave-otter").await?;
//! fleet.delete("brave-otter");
//! store.save(&fleet)?;
//! ```

pub mod atomic;
pub mod codec;
pub mod config;
pub mod error;
pub mod fleet;
pub mod host;
pub mod import;
pub mod names;
pub mod notify;
pub mod store;

// Re-exports
pub use atomic::{AtomicFileStore, StagedWrite};
pub use codec::{FleetDocument, REGISTRY_VERSION, decode, encode};
pub use config::FleetConfig;
pub use error::{FleetError, Result};
pub use fleet::{DEFAULT_NAME_ATTEMPTS, Fleet};
pub use host::{HostRecord, HostStatus};
pub use import::{
    DEFAULT_INSTANCE_TYPE, ImportReport, InfraState, ProvisioningImporter, RESERVED_HOST_NAME,
};
pub use names::{NameGenerator, SlugGenerator};
pub use notify::{DecommissionNotifier, HttpTransport, UnregisterTransport};
pub use store::FleetStore;
