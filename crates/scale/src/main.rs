mod commands;

use anyhow::Context;
use clap::{Parser, Subcommand};
use scale_cloud::{FleetConfig, FleetStore};
use std::path::PathBuf;
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(name = "scale")]
#[command(about = "Fleet host registry for autoscaled compute pools", long_about = None)]
struct Cli {
    /// Registry file (defaults to <data dir>/scale/fleet.json)
    #[arg(short, long, global = true, env = "SCALE_REGISTRY_PATH")]
    registry: Option<PathBuf>,

    /// Name generation attempts per created host
    #[arg(
        long,
        global = true,
        env = "SCALE_NAME_ATTEMPTS",
        value_parser = clap::value_parser!(u32).range(1..)
    )]
    name_attempts: Option<u32>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// List all hosts in the registry
    List,
    /// Show a single host as JSON
    Show {
        /// Host name
        name: String,
    },
    /// Allocate new hosts with generated names
    Create {
        /// Number of hosts to allocate
        #[arg(short = 'n', long, default_value = "1")]
        count: usize,
    },
    /// Change the status of a host
    Status {
        /// Host name
        name: String,
        /// New status ordinal
        #[arg(allow_negative_numbers = true)]
        status: i64,
        /// The new state is idle-capable
        #[arg(long)]
        idle: bool,
    },
    /// Merge hosts provisioned by Terraform into the registry
    Import {
        /// Path to terraform.tfstate
        tfstate: PathBuf,
        /// Terraform resource type of fleet workers
        #[arg(short = 't', long, env = "SCALE_INSTANCE_TYPE")]
        instance_type: Option<String>,
    },
    /// Unregister a host from the gateway and remove it from the registry
    Remove {
        /// Host name
        name: String,
        /// Remove the host even if the gateway could not be notified
        #[arg(short, long)]
        force: bool,
    },
    /// Show version information
    Version,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    // stdout is reserved for command output
    tracing_subscriber::fmt()
        .with_writer(std::io::stderr)
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")),
        )
        .init();

    if matches!(cli.command, Commands::Version) {
        println!("scale {}", env!("CARGO_PKG_VERSION"));
        return Ok(());
    }

    let mut config = FleetConfig::from_env().context("failed to resolve configuration")?;
    if let Some(path) = cli.registry {
        config.registry_path = path;
    }
    if let Some(attempts) = cli.name_attempts {
        config.name_attempts = attempts as usize;
    }
    let store = FleetStore::new(&config.registry_path);

    match cli.command {
        Commands::List => commands::hosts::handle_list(&store),
        Commands::Show { name } => commands::hosts::handle_show(&store, &name),
        Commands::Create { count } => commands::hosts::handle_create(&store, &config, count),
        Commands::Status { name, status, idle } => {
            commands::hosts::handle_status(&store, &name, status, idle)
        }
        Commands::Import {
            tfstate,
            instance_type,
        } => {
            if let Some(instance_type) = instance_type {
                config.instance_type = instance_type;
            }
            commands::import::handle_import(&store, &config, &tfstate)
        }
        Commands::Remove { name, force } => {
            commands::remove::handle_remove(&store, &name, force).await
        }
        Commands::Version => Ok(()),
    }
}
