//! scale list / show / create / status

use super::format_time;
use anyhow::Context;
use chrono::Utc;
use colored::Colorize;
use scale_cloud::{FleetConfig, FleetStore, HostStatus, SlugGenerator};

/// scale list: every host with its timestamps
pub fn handle_list(store: &FleetStore) -> anyhow::Result<()> {
    let fleet = store.load_or_default().context("failed to load registry")?;

    println!(
        "{}  {}",
        "Entrypoint:".bold(),
        fleet.entrypoint().unwrap_or("(not set)").cyan()
    );
    println!();

    println!(
        "  {:<24} {:<7} {:<20} {:<20} {}",
        "Host".bold(),
        "Status".bold(),
        "Created".bold(),
        "Idle since".bold(),
        "Updated".bold()
    );
    println!("  {}", "─".repeat(92).dimmed());

    let hosts = fleet.snapshot();
    if hosts.is_empty() {
        println!("  {}", "(none)".dimmed());
        return Ok(());
    }

    for host in &hosts {
        let status = if host.status.is_new() {
            "new".yellow()
        } else {
            host.status.to_string().normal()
        };
        println!(
            "  {:<24} {:<7} {:<20} {:<20} {}",
            host.name.green(),
            status,
            format_time(host.created_at),
            format_time(host.idle_since).dimmed(),
            format_time(host.updated_at).dimmed()
        );
    }
    println!();
    println!("  {} host(s)", hosts.len());
    Ok(())
}

/// scale show <name>
pub fn handle_show(store: &FleetStore, name: &str) -> anyhow::Result<()> {
    let fleet = store.load_or_default().context("failed to load registry")?;
    let host = fleet
        .get(name)
        .with_context(|| format!("host '{}' is not in the registry", name))?;
    println!("{}", serde_json::to_string_pretty(host)?);
    Ok(())
}

/// scale create: allocate hosts and persist them in one write
pub fn handle_create(store: &FleetStore, config: &FleetConfig, count: usize) -> anyhow::Result<()> {
    let mut fleet = store.load_or_default().context("failed to load registry")?;
    let mut names = SlugGenerator::new();

    let mut created = Vec::with_capacity(count);
    for _ in 0..count {
        let host = fleet
            .create_with_attempts(&mut names, config.name_attempts)
            .context("failed to allocate host")?;
        created.push(host.name.clone());
    }

    store
        .save(&fleet)
        .with_context(|| format!("failed to save registry {}", store.path().display()))?;

    for name in &created {
        println!("{} {}", "✓".green(), name);
    }
    Ok(())
}

/// scale status <name> <status> [--idle]
pub fn handle_status(
    store: &FleetStore,
    name: &str,
    status: i64,
    idle: bool,
) -> anyhow::Result<()> {
    let mut fleet = store.load_or_default().context("failed to load registry")?;
    let host = fleet
        .get_mut(name)
        .with_context(|| format!("host '{}' is not in the registry", name))?;

    host.transition(HostStatus(status), idle, Utc::now());
    let summary = host.to_string();

    store
        .save(&fleet)
        .with_context(|| format!("failed to save registry {}", store.path().display()))?;
    println!("{} {}", "✓".green(), summary);
    Ok(())
}
