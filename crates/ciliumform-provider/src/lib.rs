//! Manifest data sources for Cilium policy resources
//!
//! A data source takes a configuration value, checks it against a schema
//! derived from the resource model, and renders the resource as YAML with its
//! `apiVersion` and `kind` filled in.
//!
//! - [`schema`] - attribute trees with help text and validators
//! - [`validate`] - configuration checks run before any read
//! - [`data_source`] - the read handler shared by every kind
//! - [`provider`] - registry of data sources by type name
//! - [`protocol`] - line-delimited JSON request/response loop for a host

#![deny(missing_docs)]

pub mod data_source;
pub mod diagnostic;
pub mod protocol;
pub mod provider;
pub mod schema;
pub mod validate;

pub use ciliumform_common::{Error, Result};
pub use data_source::{DataSource, ManifestDataSource};
pub use diagnostic::{AttributePath, Diagnostic, Severity};
pub use provider::{Provider, ProviderMetadata, ReadResult};
pub use schema::{Attribute, AttributeKind, Schema, Validator};
