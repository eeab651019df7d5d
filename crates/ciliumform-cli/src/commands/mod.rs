//! CLI commands

use std::io::Read;
use std::path::Path;

use ciliumform_common::yaml::parse_yaml;
use ciliumform_provider::diagnostic::has_errors;
use ciliumform_provider::{Diagnostic, Provider};
use serde_json::Value;
use tracing::debug;

use crate::{Error, Result};

pub mod list;
pub mod render;
pub mod schema;
pub mod serve;
pub mod validate;

/// Path argument meaning "read standard input"
pub const STDIN_PATH: &str = "-";

/// Build the provider with every data source registered
pub fn provider() -> Result<Provider> {
    Ok(Provider::new()?)
}

/// Read a YAML or JSON configuration from a file, or stdin for `-`.
pub fn load_config(path: &Path) -> Result<Value> {
    let content = read_input(path).map_err(ciliumform_common::Error::from)?;
    debug!(path = %path.display(), bytes = content.len(), "loaded configuration");
    Ok(parse_yaml(&content).map_err(ciliumform_common::Error::from)?)
}

fn read_input(path: &Path) -> std::io::Result<String> {
    if path == Path::new(STDIN_PATH) {
        let mut buf = String::new();
        std::io::stdin().read_to_string(&mut buf)?;
        Ok(buf)
    } else {
        std::fs::read_to_string(path)
    }
}

/// Print diagnostics to stderr and fail when any is an error.
pub fn report(diagnostics: &[Diagnostic]) -> Result<()> {
    for diagnostic in diagnostics {
        eprintln!("{diagnostic}");
    }
    if has_errors(diagnostics) {
        let count = diagnostics.iter().filter(|d| d.is_error()).count();
        return Err(Error::validation(format!("{count} error diagnostic(s)")));
    }
    Ok(())
}
