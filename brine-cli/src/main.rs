//! Brine — one-shot salt-minion configuration pipeline.
//!
//! Invoked by the configuration system on commit, with no arguments:
//!
//! ```text
//! brine
//! ```
//!
//! Reads the `service salt-minion` subtree, renders and writes
//! `/etc/salt/minion`, normalizes ownership, fetches the master signing
//! key if configured, and restarts (or stops) the daemon. Exits 0 on
//! success; any reported error prints its chain and exits 1.

use std::path::Path;

use anyhow::{Context, Result};
use clap::Parser;

use brine_apply::{pipeline, KeyOutcome, ServiceAction, Systemctl, WriteResult};
use brine_core::{reader, CliShellApi};

#[derive(Parser, Debug)]
#[command(
    name = "brine",
    version,
    about = "Generate the salt-minion configuration and reconcile the daemon",
    long_about = None,
)]
struct Cli {}

fn main() -> Result<()> {
    let Cli {} = Cli::parse();
    init_logging();

    let store = CliShellApi::new();
    let settings = reader::read(&store).context("failed to read salt-minion configuration")?;

    let manager = Systemctl::new();
    let report = pipeline::run_at(Path::new("/"), settings.as_ref(), &manager)
        .context("failed to apply salt-minion configuration")?;

    print_report(&report);
    Ok(())
}

fn init_logging() {
    use tracing_subscriber::EnvFilter;

    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .with_writer(std::io::stderr)
        .init();
}

fn print_report(report: &pipeline::PipelineReport) {
    if let Some(generate) = &report.generate {
        match &generate.config {
            WriteResult::Written { path } => println!("✎  {}", path.display()),
            WriteResult::Unchanged { path } => println!("·  {} (unchanged)", path.display()),
        }
        match &generate.key {
            KeyOutcome::Fetched { bytes } => println!("✎  master signing key ({bytes} bytes)"),
            KeyOutcome::AlreadyPresent | KeyOutcome::NotConfigured => {}
        }
    }
    match &report.service {
        ServiceAction::Restarted => println!("✓ salt-minion restarted"),
        ServiceAction::Stopped { removed_config } => {
            if *removed_config {
                println!("✓ salt-minion stopped, configuration removed");
            } else {
                println!("✓ salt-minion stopped");
            }
        }
    }
}
