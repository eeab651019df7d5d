//! Error types for ciliumform
//!
//! Errors carry the resource kind or data source type name when known so a
//! diagnostic shown to the host can point at the resource that failed.

use thiserror::Error;

use crate::yaml::YamlError;

/// Main error type for ciliumform operations
#[derive(Debug, Error)]
pub enum Error {
    /// Rendering a manifest to YAML failed
    #[error("serialization error for {kind}: {message}")]
    Serialization {
        /// Description of what failed
        message: String,
        /// The resource kind being serialized
        kind: String,
    },

    /// A configuration value did not decode into the resource model
    #[error("decode error for {kind}: {message}")]
    Decode {
        /// Description of what failed
        message: String,
        /// The resource kind being decoded
        kind: String,
    },

    /// A data source schema could not be built
    #[error("schema error for {type_name}: {message}")]
    Schema {
        /// Data source type name
        type_name: String,
        /// Description of what failed
        message: String,
    },

    /// No data source is registered under the requested type name
    #[error("unknown data source type: {type_name}")]
    UnknownDataSource {
        /// The requested type name
        type_name: String,
    },

    /// Input YAML could not be parsed
    #[error("yaml parse error: {0}")]
    Yaml(#[from] YamlError),

    /// Filesystem error
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),
}

impl Error {
    /// Create a serialization error with resource kind context
    pub fn serialization_for_kind(kind: impl Into<String>, msg: impl Into<String>) -> Self {
        Self::Serialization {
            message: msg.into(),
            kind: kind.into(),
        }
    }

    /// Create a decode error with resource kind context
    pub fn decode_for_kind(kind: impl Into<String>, msg: impl Into<String>) -> Self {
        Self::Decode {
            message: msg.into(),
            kind: kind.into(),
        }
    }

    /// Create a schema error for a data source
    pub fn schema(type_name: impl Into<String>, msg: impl Into<String>) -> Self {
        Self::Schema {
            type_name: type_name.into(),
            message: msg.into(),
        }
    }

    /// Create an unknown data source error
    pub fn unknown_data_source(type_name: impl Into<String>) -> Self {
        Self::UnknownDataSource {
            type_name: type_name.into(),
        }
    }

    /// Short summary line suitable for a diagnostic
    ///
    /// The `Display` output is used as the detail.
    pub fn summary(&self) -> &'static str {
        match self {
            Error::Serialization { .. } => "Unable to marshal manifest to YAML",
            Error::Decode { .. } => "Unable to decode configuration",
            Error::Schema { .. } => "Invalid data source schema",
            Error::UnknownDataSource { .. } => "Unknown data source",
            Error::Yaml(_) => "Unable to parse YAML",
            Error::Io(_) => "Unable to read input",
        }
    }

    /// Get the resource kind if this error is associated with one
    pub fn kind(&self) -> Option<&str> {
        match self {
            Error::Serialization { kind, .. } | Error::Decode { kind, .. } => Some(kind),
            _ => None,
        }
    }
}
