//! dbshard Inspect - Main entry point

use clap::Parser;
use dbshard_inspect::{InspectArgs, Inspector};
use tracing_subscriber::EnvFilter;

fn main() -> anyhow::Result<()> {
    let args = InspectArgs::parse();

    // Initialize tracing (stderr, stdout carries the report)
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .with_writer(std::io::stderr)
        .init();

    // Load configuration from environment
    let inspector = Inspector::from_env()?;

    let report = inspector.report(&args.model, args.shard.as_deref());
    println!("{}", serde_json::to_string_pretty(&report)?);

    Ok(())
}
