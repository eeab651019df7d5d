//! Validate command

use std::path::PathBuf;

use clap::Args;

use super::{load_config, provider, report};
use crate::Result;

#[derive(Args, Debug)]
pub struct ValidateArgs {
    /// Data source type name
    pub type_name: String,

    /// Configuration file (YAML or JSON); `-` reads stdin
    #[arg(long, short)]
    pub config: PathBuf,
}

pub fn run(args: ValidateArgs) -> Result<()> {
    let config = load_config(&args.config)?;
    let diagnostics = provider()?.validate_data_source_config(&args.type_name, &config);
    report(&diagnostics)?;
    println!("{} valid", args.config.display());
    Ok(())
}
