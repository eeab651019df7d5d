//! Common types for ciliumform: errors, YAML helpers, and Kubernetes identity

#![deny(missing_docs)]

pub mod error;
pub mod kube_utils;
pub mod telemetry;
pub mod yaml;

pub use error::Error;
pub use kube_utils::HasApiResource;

/// Result type alias using our custom Error type
pub type Result<T> = std::result::Result<T, Error>;

/// Provider type name, used as the prefix of every data source type name
pub const PROVIDER_TYPE_NAME: &str = "k8s";

/// Name of the computed attribute holding the rendered manifest
pub const YAML_ATTRIBUTE: &str = "yaml";
