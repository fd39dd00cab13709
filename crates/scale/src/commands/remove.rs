//! scale remove: decommission a host

use anyhow::Context;
use colored::Colorize;
use scale_cloud::{DecommissionNotifier, FleetStore};

pub async fn handle_remove(store: &FleetStore, name: &str, force: bool) -> anyhow::Result<()> {
    let mut fleet = store.load_or_default().context("failed to load registry")?;
    if !fleet.contains(name) {
        anyhow::bail!("host '{}' is not in the registry", name);
    }

    let notifier = DecommissionNotifier::http()?;
    match notifier.notify_fleet(&fleet, name).await {
        Ok(()) => println!("{} gateway stopped routing to {}", "✓".green(), name),
        Err(e) if force => {
            tracing::warn!(
                host = %name,
                error = %e,
                "Removing host without gateway acknowledgement"
            );
            println!("{} {}", "warning:".yellow().bold(), e);
        }
        Err(e) => {
            return Err(e).with_context(|| {
                format!(
                    "failed to unregister '{}' from the gateway (use --force to remove anyway)",
                    name
                )
            });
        }
    }

    fleet.delete(name);
    store
        .save(&fleet)
        .with_context(|| format!("failed to save registry {}", store.path().display()))?;
    println!("{} removed {}", "✓".green(), name);
    Ok(())
}
