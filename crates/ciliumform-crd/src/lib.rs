//! Cilium custom resource models
//!
//! Each top-level kind is a plain serde record mirroring the CRD's JSON shape.
//! Field doc comments become schema help text and `#[schemars(...)]` attributes
//! declare the syntactic constraints (patterns, ranges, lengths, enumerations).
//!
//! - [`CiliumNetworkPolicy`] - namespaced L3-L7 policy (`cilium.io/v2`)
//! - [`CiliumClusterwideNetworkPolicy`] - cluster-scoped policy (`cilium.io/v2`)
//! - [`CiliumCidrGroup`] - named CIDR set (`cilium.io/v2alpha1`)
//! - [`CiliumEgressGatewayPolicy`] - egress gateway routing (`cilium.io/v2`)

#![deny(missing_docs)]

pub mod cidr_group;
pub mod clusterwide;
pub mod egress_gateway;
pub mod metadata;
pub mod network_policy;
pub mod patterns;
pub mod port;
pub mod rule;
pub mod selector;

use schemars::JsonSchema;
use serde::de::DeserializeOwned;
use serde::Serialize;

pub use ciliumform_common::HasApiResource;

pub use cidr_group::{CiliumCidrGroup, CiliumCidrGroupSpec};
pub use clusterwide::CiliumClusterwideNetworkPolicy;
pub use egress_gateway::{CiliumEgressGatewayPolicy, EgressGateway, EgressGatewayPolicySpec};
pub use metadata::{ClusterMetadata, NamespacedMetadata};
pub use network_policy::CiliumNetworkPolicy;
pub use rule::Rule;
pub use selector::{LabelSelector, MatchExpression, SelectorOperator};

/// A renderable Kubernetes manifest with a compile-time identity.
///
/// `stamp` overwrites `apiVersion` and `kind` with the type's constants so a
/// decoded record always renders with its own identity, whatever the input held.
pub trait Manifest: HasApiResource + Serialize + DeserializeOwned + JsonSchema {
    /// Set `apiVersion` and `kind` to the type's constants.
    fn stamp(&mut self);

    /// Name from the object metadata.
    fn name(&self) -> &str;
}
