//! Terraform state import
//!
//! Discovers hosts provisioned by Terraform and merges them into the fleet
//! registry. The merge is additive only: hosts already tracked locally keep
//! their status and timestamps, and nothing is ever removed, so importing the
//! same (or a grown) state repeatedly is safe.

use crate::error::{FleetError, Result};
use crate::fleet::Fleet;
use crate::host::HostRecord;
use chrono::{DateTime, Utc};
use serde_json::Value;
use std::collections::HashSet;
use std::path::Path;

/// Resource type of fleet workers in the Terraform state
pub const DEFAULT_INSTANCE_TYPE: &str = "yandex_compute_instance";

/// Instance name used by the gateway itself, never a fleet worker
pub const RESERVED_HOST_NAME: &str = "gateway";

const ENTRYPOINT_POINTER: &str = "/outputs/external_ip/value";

/// Read-only snapshot of the provisioning tool's state document
#[derive(Debug, Clone, PartialEq)]
pub struct InfraState(Value);

impl InfraState {
    pub fn from_value(value: Value) -> Self {
        Self(value)
    }

    pub fn from_slice(bytes: &[u8]) -> Result<Self> {
        serde_json::from_slice(bytes)
            .map(Self)
            .map_err(|e| FleetError::Config(format!("failed to parse infrastructure state: {}", e)))
    }

    pub fn from_file(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let bytes = std::fs::read(path).map_err(|e| {
            FleetError::Config(format!(
                "failed to read infrastructure state {}: {}",
                path.display(),
                e
            ))
        })?;
        Self::from_slice(&bytes)
    }

    pub fn as_value(&self) -> &Value {
        &self.0
    }

    /// Gateway address published in the Terraform outputs
    pub fn entrypoint(&self) -> Result<&str> {
        match self.0.pointer(ENTRYPOINT_POINTER).and_then(Value::as_str) {
            Some(ip) if !ip.is_empty() => Ok(ip),
            _ => Err(FleetError::Config(
                "infrastructure state does not contain a value for external_ip".to_string(),
            )),
        }
    }

    fn resources(&self) -> Result<&Vec<Value>> {
        self.0
            .get("resources")
            .and_then(Value::as_array)
            .ok_or_else(|| {
                FleetError::Config("failed to read infrastructure resources".to_string())
            })
    }
}

/// Outcome of a single import
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ImportReport {
    /// Entrypoint recorded in the registry
    pub entrypoint: String,

    /// Newly added host names, in discovery order
    pub added: Vec<String>,

    /// Hosts already present in the registry and left untouched
    pub existing: Vec<String>,

    /// Instances named after the reserved gateway host
    pub reserved: usize,

    /// Instances without a usable name
    pub unnamed: usize,

    /// Resources of other types, or without an instance list
    pub ignored_resources: usize,
}

impl ImportReport {
    pub fn has_changes(&self) -> bool {
        !self.added.is_empty()
    }
}

impl std::fmt::Display for ImportReport {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "{} added, {} already known, {} reserved, {} unnamed (entrypoint {})",
            self.added.len(),
            self.existing.len(),
            self.reserved,
            self.unnamed,
            self.entrypoint
        )
    }
}

/// Merges compute instances from Terraform state into a [`Fleet`]
#[derive(Debug, Clone)]
pub struct ProvisioningImporter {
    instance_type: String,
}

impl Default for ProvisioningImporter {
    fn default() -> Self {
        Self::new(DEFAULT_INSTANCE_TYPE)
    }
}

impl ProvisioningImporter {
    pub fn new(instance_type: impl Into<String>) -> Self {
        Self {
            instance_type: instance_type.into(),
        }
    }

    pub fn instance_type(&self) -> &str {
        &self.instance_type
    }

    /// Merge newly provisioned hosts into `fleet` and record the entrypoint.
    ///
    /// On error the fleet is left exactly as it was.
    #[tracing::instrument(skip_all, fields(instance_type = %self.instance_type))]
    pub fn import(&self, fleet: &mut Fleet, state: &InfraState) -> Result<ImportReport> {
        let (report, discovered) = self.plan(fleet, state)?;

        fleet.set_entrypoint(report.entrypoint.clone());
        for host in discovered {
            fleet.insert(host)?;
        }

        tracing::info!(
            added = report.added.len(),
            existing = report.existing.len(),
            entrypoint = %report.entrypoint,
            "Imported infrastructure state"
        );
        Ok(report)
    }

    /// Work out what an import would change without touching the fleet
    pub fn plan(
        &self,
        fleet: &Fleet,
        state: &InfraState,
    ) -> Result<(ImportReport, Vec<HostRecord>)> {
        let mut report = ImportReport {
            entrypoint: state.entrypoint()?.to_string(),
            ..Default::default()
        };
        let resources = state.resources()?;

        let mut discovered = Vec::new();
        let mut seen = HashSet::new();

        for resource in resources {
            let instances = match (
                resource.get("type").and_then(Value::as_str),
                resource.get("instances").and_then(Value::as_array),
            ) {
                (Some(kind), Some(instances)) if kind == self.instance_type => instances,
                _ => {
                    report.ignored_resources += 1;
                    continue;
                }
            };

            for instance in instances {
                let attributes = instance.get("attributes");
                let name = match attributes
                    .and_then(|a| a.get("name"))
                    .and_then(Value::as_str)
                {
                    Some(name) if !name.is_empty() => name,
                    _ => {
                        report.unnamed += 1;
                        continue;
                    }
                };

                if name == RESERVED_HOST_NAME {
                    report.reserved += 1;
                    continue;
                }
                if fleet.contains(name) {
                    report.existing.push(name.to_string());
                    continue;
                }
                if !seen.insert(name) {
                    continue;
                }

                let created_at = attributes
                    .and_then(|a| a.get("created_at"))
                    .and_then(Value::as_str)
                    .and_then(|raw| parse_created_at(name, raw));

                report.added.push(name.to_string());
                discovered.push(HostRecord::discovered(name, created_at));
            }
        }

        Ok((report, discovered))
    }
}

fn parse_created_at(name: &str, raw: &str) -> Option<DateTime<Utc>> {
    match DateTime::parse_from_rfc3339(raw) {
        Ok(ts) => Some(ts.with_timezone(&Utc)),
        Err(e) => {
            tracing::warn!(
                host = %name,
                created_at = %raw,
                error = %e,
                "Ignoring unparsable creation time"
            );
            None
        }
    }
}
