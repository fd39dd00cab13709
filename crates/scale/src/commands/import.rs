//! scale import: merge Terraform state into the registry

use anyhow::Context;
use colored::Colorize;
use scale_cloud::{FleetConfig, FleetStore, InfraState, ProvisioningImporter};
use std::path::Path;

pub fn handle_import(
    store: &FleetStore,
    config: &FleetConfig,
    tfstate: &Path,
) -> anyhow::Result<()> {
    let mut fleet = store.load_or_default().context("failed to load registry")?;
    let state = InfraState::from_file(tfstate)?;

    let report = ProvisioningImporter::new(config.instance_type.as_str())
        .import(&mut fleet, &state)
        .with_context(|| format!("failed to import {}", tfstate.display()))?;

    store
        .save(&fleet)
        .with_context(|| format!("failed to save registry {}", store.path().display()))?;

    for name in &report.added {
        println!("{} {}", "+".green(), name);
    }
    println!("{}", report.to_string().dimmed());
    Ok(())
}
