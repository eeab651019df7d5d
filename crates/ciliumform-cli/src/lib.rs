//! ciliumform CLI library

pub mod commands;
pub mod error;

pub use error::{Error, Result};

use ciliumform_common::telemetry::{LogConfig, LogFormat};
use clap::{Parser, Subcommand};

/// ciliumform - Cilium policy manifests as data sources
#[derive(Parser, Debug)]
#[command(name = "ciliumform")]
#[command(version, about, long_about = None)]
pub struct Cli {
    /// Log line format (text or json)
    #[arg(long, global = true, env = "CILIUMFORM_LOG_FORMAT", default_value = "text")]
    pub log_format: LogFormat,

    /// Log filter directive, e.g. `debug` or `ciliumform_provider=trace`.
    /// Falls back to RUST_LOG.
    #[arg(long, global = true)]
    pub log_filter: Option<String>,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// List the available data sources
    List(commands::list::ListArgs),
    /// Print data source schemas as JSON
    Schema(commands::schema::SchemaArgs),
    /// Render a manifest from a configuration file
    Render(commands::render::RenderArgs),
    /// Validate a configuration file without rendering
    Validate(commands::validate::ValidateArgs),
    /// Answer line-delimited JSON requests on stdin
    Serve(commands::serve::ServeArgs),
}

impl Cli {
    /// Logging settings from the global flags
    pub fn log_config(&self) -> LogConfig {
        LogConfig {
            filter: self.log_filter.clone(),
            format: self.log_format,
        }
    }

    /// Run the CLI command
    pub async fn run(self) -> Result<()> {
        match self.command {
            Commands::List(args) => commands::list::run(args),
            Commands::Schema(args) => commands::schema::run(args),
            Commands::Render(args) => commands::render::run(args),
            Commands::Validate(args) => commands::validate::run(args),
            Commands::Serve(args) => commands::serve::run(args).await,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn cli_definition_is_consistent() {
        Cli::command().debug_assert();
    }

    #[test]
    fn parses_render_with_global_flags() {
        let cli = Cli::try_parse_from([
            "ciliumform",
            "render",
            "k8s_cilium_io_cilium_cidr_group_v2alpha1_manifest",
            "--config",
            "group.yaml",
            "--log-format",
            "json",
        ])
        .unwrap();
        assert_eq!(cli.log_format, LogFormat::Json);
        assert!(matches!(cli.command, Commands::Render(_)));
    }

    #[test]
    fn render_requires_config() {
        let err = Cli::try_parse_from(["ciliumform", "render", "some_type"]).unwrap_err();
        assert_eq!(err.kind(), clap::error::ErrorKind::MissingRequiredArgument);
    }

    #[test]
    fn rejects_unknown_log_format() {
        assert!(Cli::try_parse_from(["ciliumform", "--log-format", "xml", "list"]).is_err());
    }
}
