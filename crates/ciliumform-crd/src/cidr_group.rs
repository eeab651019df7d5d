//! CiliumCIDRGroup (`cilium.io/v2alpha1`)

use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

use crate::metadata::ClusterMetadata;
use crate::{HasApiResource, Manifest};

/// Named list of external CIDRs that policies reference through `cidrGroupRef`
#[derive(Clone, Debug, Serialize, Deserialize, JsonSchema, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct CiliumCidrGroup {
    /// API version
    #[serde(default = "CiliumCidrGroup::api_version")]
    #[schemars(skip)]
    pub api_version: String,
    /// Kind
    #[serde(default = "CiliumCidrGroup::kind")]
    #[schemars(skip)]
    pub kind: String,
    /// Standard object metadata.
    pub metadata: ClusterMetadata,
    /// CIDR group contents.
    pub spec: CiliumCidrGroupSpec,
}

/// CiliumCIDRGroup spec
#[derive(Clone, Debug, Default, Serialize, Deserialize, JsonSchema, PartialEq)]
pub struct CiliumCidrGroupSpec {
    /// CIDRs outside the cluster that belong to this group.
    #[serde(rename = "externalCIDRs")]
    #[schemars(inner(regex = "crate::patterns::CIDR"))]
    pub external_cidrs: Vec<String>,
}

impl HasApiResource for CiliumCidrGroup {
    const API_VERSION: &'static str = "cilium.io/v2alpha1";
    const KIND: &'static str = "CiliumCIDRGroup";
    const NAMESPACED: bool = false;
}

impl CiliumCidrGroup {
    fn api_version() -> String {
        <Self as HasApiResource>::API_VERSION.to_string()
    }
    fn kind() -> String {
        <Self as HasApiResource>::KIND.to_string()
    }

    /// Create a new CiliumCIDRGroup
    pub fn new(metadata: ClusterMetadata, spec: CiliumCidrGroupSpec) -> Self {
        Self {
            api_version: Self::api_version(),
            kind: Self::kind(),
            metadata,
            spec,
        }
    }
}

impl Manifest for CiliumCidrGroup {
    fn stamp(&mut self) {
        self.api_version = Self::api_version();
        self.kind = Self::kind();
    }

    fn name(&self) -> &str {
        &self.metadata.name
    }
}
