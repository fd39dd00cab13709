//! On-disk representation of the fleet registry
//!
//! The registry is kept in memory as a map; on disk it is a versioned JSON
//! document with hosts sorted by name, so saving unchanged state always
//! produces the same bytes.

use crate::error::{FleetError, Result};
use crate::fleet::Fleet;
use crate::host::HostRecord;
use serde::{Deserialize, Serialize};

/// Current registry document version
pub const REGISTRY_VERSION: u32 = 1;

fn default_version() -> u32 {
    REGISTRY_VERSION
}

/// Serializable form of [`Fleet`]
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FleetDocument {
    /// Hosts sorted by name
    #[serde(default, deserialize_with = "nullable_hosts")]
    pub hosts: Vec<HostRecord>,

    /// Gateway entrypoint, empty when unknown
    #[serde(default)]
    pub entrypoint: String,

    /// Document format version
    #[serde(default = "default_version")]
    pub version: u32,
}

/// `"hosts": null` reads as an empty list
fn nullable_hosts<'de, D>(deserializer: D) -> std::result::Result<Vec<HostRecord>, D::Error>
where
    D: serde::Deserializer<'de>,
{
    Ok(Option::<Vec<HostRecord>>::deserialize(deserializer)?.unwrap_or_default())
}

impl FleetDocument {
    pub fn pack(fleet: &Fleet) -> Self {
        Self {
            hosts: fleet.snapshot(),
            entrypoint: fleet.entrypoint().unwrap_or_default().to_string(),
            version: REGISTRY_VERSION,
        }
    }

    pub fn unpack(self) -> Result<Fleet> {
        if self.version > REGISTRY_VERSION {
            return Err(FleetError::UnsupportedVersion {
                found: self.version,
                supported: REGISTRY_VERSION,
            });
        }

        let mut fleet = Fleet::new();
        fleet.set_entrypoint(self.entrypoint);
        for host in self.hosts {
            fleet.insert(host)?;
        }
        Ok(fleet)
    }
}

/// Serialize a fleet into its canonical JSON form
pub fn encode(fleet: &Fleet) -> Result<Vec<u8>> {
    let document = FleetDocument::pack(fleet);
    let bytes = serde_json::to_vec_pretty(&document).map_err(std::io::Error::other)?;
    Ok(bytes)
}

/// Parse a registry document. Empty input is an error, not an empty fleet.
pub fn decode(bytes: &[u8]) -> Result<Fleet> {
    let document: FleetDocument =
        serde_json::from_slice(bytes).map_err(|e| FleetError::decode(e, bytes))?;
    document.unpack()
}
