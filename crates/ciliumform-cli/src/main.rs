//! ciliumform CLI
//!
//! Renders and validates Cilium policy manifests, or serves the data sources
//! to a host over line-delimited JSON.

use clap::Parser;

use ciliumform_cli::{Cli, Result};

#[tokio::main(flavor = "current_thread")]
async fn main() -> Result<()> {
    let cli = Cli::parse();
    ciliumform_common::telemetry::init_logging(&cli.log_config())?;
    cli.run().await
}
