//! Logging initialization
//!
//! Logs always go to stderr; stdout is reserved for rendered manifests and
//! protocol responses. The filter comes from `RUST_LOG` when set.

use std::str::FromStr;

use thiserror::Error;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;
use tracing_subscriber::EnvFilter;

/// Default filter directive when `RUST_LOG` is unset
pub const DEFAULT_FILTER: &str = "info";

/// Errors that can occur during logging initialization
#[derive(Debug, Error)]
pub enum TelemetryError {
    /// The filter directive did not parse
    #[error("invalid log filter: {0}")]
    Filter(String),

    /// Failed to initialize tracing subscriber
    #[error("failed to initialize tracing subscriber: {0}")]
    SubscriberInit(String),
}

/// Output format for log lines
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum LogFormat {
    /// Human readable single-line output
    #[default]
    Text,
    /// JSON structured output
    Json,
}

impl FromStr for LogFormat {
    type Err = TelemetryError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "text" => Ok(Self::Text),
            "json" => Ok(Self::Json),
            other => Err(TelemetryError::Filter(format!(
                "unknown log format: {other}, expected one of: text, json"
            ))),
        }
    }
}

impl std::fmt::Display for LogFormat {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Text => write!(f, "text"),
            Self::Json => write!(f, "json"),
        }
    }
}

/// Configuration for logging initialization
#[derive(Debug, Clone, Default)]
pub struct LogConfig {
    /// Filter directive; `None` falls back to `RUST_LOG`, then [`DEFAULT_FILTER`]
    pub filter: Option<String>,
    /// Line format
    pub format: LogFormat,
}

impl LogConfig {
    fn env_filter(&self) -> Result<EnvFilter, TelemetryError> {
        match &self.filter {
            Some(directive) => {
                EnvFilter::try_new(directive).map_err(|e| TelemetryError::Filter(e.to_string()))
            }
            None => Ok(EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new(DEFAULT_FILTER))),
        }
    }
}

/// Install the global tracing subscriber.
pub fn init_logging(config: &LogConfig) -> Result<(), TelemetryError> {
    let filter = config.env_filter()?;
    let registry = tracing_subscriber::registry().with(filter);

    let result = match config.format {
        LogFormat::Text => registry
            .with(
                tracing_subscriber::fmt::layer()
                    .with_target(false)
                    .with_writer(std::io::stderr),
            )
            .try_init(),
        LogFormat::Json => registry
            .with(
                tracing_subscriber::fmt::layer()
                    .json()
                    .with_current_span(true)
                    .with_span_list(false)
                    .with_target(true)
                    .with_writer(std::io::stderr),
            )
            .try_init(),
    };

    result.map_err(|e| TelemetryError::SubscriberInit(e.to_string()))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn log_format_parses_case_insensitively() {
        assert_eq!("json".parse::<LogFormat>().unwrap(), LogFormat::Json);
        assert_eq!("TEXT".parse::<LogFormat>().unwrap(), LogFormat::Text);
        assert!("yaml".parse::<LogFormat>().is_err());
    }

    #[test]
    fn default_config_is_text() {
        let config = LogConfig::default();
        assert_eq!(config.format, LogFormat::Text);
        assert!(config.filter.is_none());
    }

    #[test]
    fn explicit_filter_is_validated() {
        let config = LogConfig {
            filter: Some("ciliumform=debug".to_string()),
            format: LogFormat::Json,
        };
        assert!(config.env_filter().is_ok());

        let bad = LogConfig {
            filter: Some("ciliumform=notalevel".to_string()),
            format: LogFormat::Text,
        };
        assert!(matches!(bad.env_filter(), Err(TelemetryError::Filter(_))));
    }
}
