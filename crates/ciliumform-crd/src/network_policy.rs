//! CiliumNetworkPolicy (`cilium.io/v2`)

use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

use crate::metadata::NamespacedMetadata;
use crate::rule::Rule;
use crate::{HasApiResource, Manifest};

/// Namespaced Cilium network policy
#[derive(Clone, Debug, Serialize, Deserialize, JsonSchema, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct CiliumNetworkPolicy {
    /// API version
    #[serde(default = "CiliumNetworkPolicy::api_version")]
    #[schemars(skip)]
    pub api_version: String,
    /// Kind
    #[serde(default = "CiliumNetworkPolicy::kind")]
    #[schemars(skip)]
    pub kind: String,
    /// Standard object metadata.
    pub metadata: NamespacedMetadata,
    /// Single rule of the policy.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub spec: Option<Rule>,
    /// List of rules of the policy.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub specs: Vec<Rule>,
}

impl HasApiResource for CiliumNetworkPolicy {
    const API_VERSION: &'static str = "cilium.io/v2";
    const KIND: &'static str = "CiliumNetworkPolicy";
    const NAMESPACED: bool = true;
}

impl CiliumNetworkPolicy {
    fn api_version() -> String {
        <Self as HasApiResource>::API_VERSION.to_string()
    }
    fn kind() -> String {
        <Self as HasApiResource>::KIND.to_string()
    }

    /// Create a new CiliumNetworkPolicy with a single rule
    pub fn new(metadata: NamespacedMetadata, spec: Rule) -> Self {
        Self {
            api_version: Self::api_version(),
            kind: Self::kind(),
            metadata,
            spec: Some(spec),
            specs: Vec::new(),
        }
    }
}

impl Manifest for CiliumNetworkPolicy {
    fn stamp(&mut self) {
        self.api_version = Self::api_version();
        self.kind = Self::kind();
    }

    fn name(&self) -> &str {
        &self.metadata.name
    }
}
