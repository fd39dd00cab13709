//! Runtime configuration
//!
//! Settings come from environment variables with platform defaults. The CLI
//! overrides individual values with its flags.

use crate::error::{FleetError, Result};
use crate::fleet::DEFAULT_NAME_ATTEMPTS;
use crate::import::DEFAULT_INSTANCE_TYPE;
use std::path::PathBuf;

/// Registry file location
pub const REGISTRY_PATH_ENV: &str = "SCALE_REGISTRY_PATH";

/// Terraform resource type of fleet workers
pub const INSTANCE_TYPE_ENV: &str = "SCALE_INSTANCE_TYPE";

/// Bound on name generation attempts per created host
pub const NAME_ATTEMPTS_ENV: &str = "SCALE_NAME_ATTEMPTS";

const REGISTRY_FILENAME: &str = "fleet.json";

/// Resolved fleet settings
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FleetConfig {
    pub registry_path: PathBuf,
    pub instance_type: String,
    pub name_attempts: usize,
}

impl FleetConfig {
    /// Resolve settings from the environment
    pub fn from_env() -> Result<Self> {
        let registry_path = match non_empty_var(REGISTRY_PATH_ENV) {
            Some(path) => PathBuf::from(path),
            None => default_registry_path(),
        };

        let instance_type =
            non_empty_var(INSTANCE_TYPE_ENV).unwrap_or_else(|| DEFAULT_INSTANCE_TYPE.to_string());

        let name_attempts = match non_empty_var(NAME_ATTEMPTS_ENV) {
            Some(raw) => parse_attempts(&raw)?,
            None => DEFAULT_NAME_ATTEMPTS,
        };

        let config = Self {
            registry_path,
            instance_type,
            name_attempts,
        };
        tracing::debug!(?config, "Resolved fleet configuration");
        Ok(config)
    }
}

/// `<data dir>/scale/fleet.json`, or `./fleet.json` without a data dir
pub fn default_registry_path() -> PathBuf {
    match dirs::data_dir() {
        Some(dir) => dir.join("scale").join(REGISTRY_FILENAME),
        None => PathBuf::from(REGISTRY_FILENAME),
    }
}

fn non_empty_var(key: &str) -> Option<String> {
    std::env::var(key).ok().filter(|v| !v.trim().is_empty())
}

fn parse_attempts(raw: &str) -> Result<usize> {
    match raw.trim().parse::<usize>() {
        Ok(n) if n > 0 => Ok(n),
        _ => Err(FleetError::Config(format!(
            "{} must be a positive integer, got '{}'",
            NAME_ATTEMPTS_ENV, raw
        ))),
    }
}
