//! The fleet registry
//!
//! [`Fleet`] owns every [`HostRecord`] keyed by name together with the gateway
//! entrypoint. All mutations are in-memory only: persisting is an explicit
//! step (see [`crate::FleetStore`]) so a batch of changes lands in a single
//! durable write.

use crate::error::{FleetError, Result};
use crate::host::HostRecord;
use crate::names::NameGenerator;
use chrono::Utc;
use std::collections::HashMap;

/// How many candidates `create` asks for before giving up
pub const DEFAULT_NAME_ATTEMPTS: usize = 32;

/// Registry of fleet hosts
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Fleet {
    hosts: HashMap<String, HostRecord>,
    entrypoint: String,
}

impl Fleet {
    pub fn new() -> Self {
        Self::default()
    }

    /// Point-in-time copy of all hosts, sorted by name
    pub fn snapshot(&self) -> Vec<HostRecord> {
        let mut hosts: Vec<HostRecord> = self.hosts.values().cloned().collect();
        hosts.sort_by(|a, b| a.name.cmp(&b.name));
        hosts
    }

    /// Allocate a new host with a generated unique name
    pub fn create(&mut self, names: &mut dyn NameGenerator) -> Result<&HostRecord> {
        self.create_with_attempts(names, DEFAULT_NAME_ATTEMPTS)
    }

    /// Like [`Fleet::create`] with an explicit bound on generation attempts
    pub fn create_with_attempts(
        &mut self,
        names: &mut dyn NameGenerator,
        attempts: usize,
    ) -> Result<&HostRecord> {
        let name = (0..attempts)
            .filter_map(|_| names.generate())
            .find(|name| !name.is_empty() && !self.hosts.contains_key(name))
            .ok_or(FleetError::NameExhaustion { attempts })?;

        let host = HostRecord::new(name, Utc::now());
        tracing::debug!(host = %host.name, "Allocated host record");
        Ok(self.hosts.entry(host.name.clone()).or_insert(host))
    }

    /// Add an existing record; names must be unique
    pub fn insert(&mut self, host: HostRecord) -> Result<()> {
        if self.hosts.contains_key(&host.name) {
            return Err(FleetError::DuplicateHost(host.name));
        }
        self.hosts.insert(host.name.clone(), host);
        Ok(())
    }

    /// Remove a host by name. Removing an unknown host is a no-op.
    pub fn delete(&mut self, name: &str) -> Option<HostRecord> {
        let removed = self.hosts.remove(name);
        if removed.is_some() {
            tracing::debug!(host = %name, "Deleted host record");
        }
        removed
    }

    pub fn get(&self, name: &str) -> Option<&HostRecord> {
        self.hosts.get(name)
    }

    pub fn get_mut(&mut self, name: &str) -> Option<&mut HostRecord> {
        self.hosts.get_mut(name)
    }

    pub fn contains(&self, name: &str) -> bool {
        self.hosts.contains_key(name)
    }

    pub fn len(&self) -> usize {
        self.hosts.len()
    }

    pub fn is_empty(&self) -> bool {
        self.hosts.is_empty()
    }

    /// Gateway address used for decommission notifications, if set
    pub fn entrypoint(&self) -> Option<&str> {
        if self.entrypoint.is_empty() {
            None
        } else {
            Some(&self.entrypoint)
        }
    }

    pub fn set_entrypoint(&mut self, entrypoint: impl Into<String>) {
        self.entrypoint = entrypoint.into();
    }
}
