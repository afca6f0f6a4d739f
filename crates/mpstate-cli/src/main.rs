//! mpstate CLI
//!
//! Projects the local multipass instance inventory into a state document

use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;

use clap::{Parser, Subcommand};
use color_eyre::Result;
use color_eyre::eyre::eyre;
use mpstate_exec::LocalRunner;
use mpstate_multipass::MultipassClient;
use mpstate_store::{Refresher, StateDocument};
use tracing_subscriber::EnvFilter;

mod config;

use config::Config;

#[derive(Parser)]
#[command(name = "mpstate")]
#[command(version, about = "Project multipass instance state into a local state document", long_about = None)]
struct Cli {
    /// Path to the config file
    #[arg(short, long, global = true)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Refresh the state document from multipass
    Sync {
        /// Write the state document here instead of the configured path
        #[arg(long)]
        state: Option<PathBuf>,
    },
    /// Print the stored state document
    Show {
        /// Read the state document from here instead of the configured path
        #[arg(long)]
        state: Option<PathBuf>,
    },
    /// Probe whether the multipass CLI is reachable
    Check,
}

#[tokio::main]
async fn main() -> Result<()> {
    // Initialize error handling
    color_eyre::install()?;

    let cli = Cli::parse();

    let config = match &cli.config {
        Some(path) => Config::load(path)?,
        None => Config::load_default()?,
    };

    // Initialize logging; RUST_LOG wins over the configured level
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new(&config.store.log_level)),
        )
        .init();

    match cli.command {
        Commands::Sync { state } => cmd_sync(&config, state).await,
        Commands::Show { state } => cmd_show(&config, state),
        Commands::Check => cmd_check(&config).await,
    }
}

fn build_client(config: &Config) -> MultipassClient {
    let runner = Arc::new(LocalRunner::new());
    let mut client = MultipassClient::new(runner).with_program(config.multipass.program.clone());
    if config.multipass.timeout_secs > 0 {
        client = client.with_deadline(Duration::from_secs(config.multipass.timeout_secs));
    }
    client
}

async fn cmd_sync(config: &Config, state_override: Option<PathBuf>) -> Result<()> {
    let path = state_override.unwrap_or_else(|| config.store.path.clone());

    // Carry the existing document forward so a sync overwrites state in
    // place, the way a declarative store refresh does.
    let mut doc = if path.exists() {
        StateDocument::load(&path)?
    } else {
        StateDocument::new()
    };

    let refresher = Refresher::new(build_client(config));
    let report = refresher.run(&mut doc).await?;
    doc.save(&path)?;

    for warning in &report.warnings {
        eprintln!("warning: {warning}");
    }
    println!(
        "Synced {} instance(s) to {}",
        report.instances,
        path.display()
    );

    Ok(())
}

fn cmd_show(config: &Config, state_override: Option<PathBuf>) -> Result<()> {
    let path = state_override.unwrap_or_else(|| config.store.path.clone());
    let doc = StateDocument::load(&path)?;

    println!("{}", serde_json::to_string_pretty(&doc)?);

    Ok(())
}

async fn cmd_check(config: &Config) -> Result<()> {
    let client = build_client(config);

    if client.is_available().await {
        println!("{} is reachable", config.multipass.program);
        Ok(())
    } else {
        Err(eyre!("{} is not reachable", config.multipass.program))
    }
}
