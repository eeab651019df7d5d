//! Object metadata accepted by the manifest data sources

use std::collections::BTreeMap;

use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

/// Metadata for namespaced resources
#[derive(Clone, Debug, Default, Serialize, Deserialize, JsonSchema, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct NamespacedMetadata {
    /// Unique identifier for this object within its namespace. Must be a DNS subdomain.
    #[schemars(length(min = 1, max = 253))]
    #[schemars(regex = "crate::patterns::DNS_SUBDOMAIN")]
    pub name: String,
    /// Namespace the object belongs to. Must be a DNS label.
    #[schemars(length(min = 1, max = 63))]
    #[schemars(regex = "crate::patterns::DNS_LABEL")]
    pub namespace: String,
    /// Map of string keys and values used to organize and categorize objects.
    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    pub labels: BTreeMap<String, String>,
    /// Unstructured key/value map stored with the object, not used for selection.
    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    pub annotations: BTreeMap<String, String>,
}

impl NamespacedMetadata {
    /// Create metadata with a name and namespace
    pub fn new(name: impl Into<String>, namespace: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            namespace: namespace.into(),
            ..Default::default()
        }
    }
}

/// Metadata for cluster-scoped resources (no namespace)
#[derive(Clone, Debug, Default, Serialize, Deserialize, JsonSchema, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct ClusterMetadata {
    /// Unique identifier for this object in the cluster. Must be a DNS subdomain.
    #[schemars(length(min = 1, max = 253))]
    #[schemars(regex = "crate::patterns::DNS_SUBDOMAIN")]
    pub name: String,
    /// Map of string keys and values used to organize and categorize objects.
    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    pub labels: BTreeMap<String, String>,
    /// Unstructured key/value map stored with the object, not used for selection.
    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    pub annotations: BTreeMap<String, String>,
}

impl ClusterMetadata {
    /// Create metadata with a name
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            ..Default::default()
        }
    }
}
