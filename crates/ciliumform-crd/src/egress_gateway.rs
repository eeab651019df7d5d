//! CiliumEgressGatewayPolicy (`cilium.io/v2`)

use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

use crate::metadata::ClusterMetadata;
use crate::selector::LabelSelector;
use crate::{HasApiResource, Manifest};

/// Routes traffic from selected pods to given destinations through gateway nodes
#[derive(Clone, Debug, Serialize, Deserialize, JsonSchema, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct CiliumEgressGatewayPolicy {
    /// API version
    #[serde(default = "CiliumEgressGatewayPolicy::api_version")]
    #[schemars(skip)]
    pub api_version: String,
    /// Kind
    #[serde(default = "CiliumEgressGatewayPolicy::kind")]
    #[schemars(skip)]
    pub kind: String,
    /// Standard object metadata.
    pub metadata: ClusterMetadata,
    /// Egress gateway policy spec.
    pub spec: EgressGatewayPolicySpec,
}

/// CiliumEgressGatewayPolicy spec
#[derive(Clone, Debug, Default, Serialize, Deserialize, JsonSchema, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct EgressGatewayPolicySpec {
    /// Source pods whose traffic is redirected.
    pub selectors: Vec<EgressSelector>,
    /// Destinations that are routed through the gateway.
    #[serde(rename = "destinationCIDRs")]
    #[schemars(inner(regex = "crate::patterns::CIDR"))]
    pub destination_cidrs: Vec<String>,
    /// Destinations excluded from `destinationCIDRs`.
    #[serde(default, skip_serializing_if = "Vec::is_empty", rename = "excludedCIDRs")]
    #[schemars(inner(regex = "crate::patterns::CIDR"))]
    pub excluded_cidrs: Vec<String>,
    /// Gateway node and source address.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub egress_gateway: Option<EgressGateway>,
    /// Several gateways; traffic is spread across them.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub egress_gateways: Vec<EgressGateway>,
}

/// Source pod selection
#[derive(Clone, Debug, Default, Serialize, Deserialize, JsonSchema, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct EgressSelector {
    /// Namespaces of the source pods.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub namespace_selector: Option<LabelSelector>,
    /// Source pods.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub pod_selector: Option<LabelSelector>,
    /// Nodes the source pods run on.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub node_selector: Option<LabelSelector>,
}

/// Gateway node selection and source address
#[derive(Clone, Debug, Default, Serialize, Deserialize, JsonSchema, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct EgressGateway {
    /// Node acting as the gateway.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub node_selector: Option<LabelSelector>,
    /// Interface on the gateway node whose first IPv4 address is used.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub interface: Option<String>,
    /// Source IPv4 address for the redirected traffic.
    #[serde(default, skip_serializing_if = "Option::is_none", rename = "egressIP")]
    #[schemars(regex = "crate::patterns::IPV4")]
    pub egress_ip: Option<String>,
}

impl HasApiResource for CiliumEgressGatewayPolicy {
    const API_VERSION: &'static str = "cilium.io/v2";
    const KIND: &'static str = "CiliumEgressGatewayPolicy";
    const NAMESPACED: bool = false;
}

impl CiliumEgressGatewayPolicy {
    fn api_version() -> String {
        <Self as HasApiResource>::API_VERSION.to_string()
    }
    fn kind() -> String {
        <Self as HasApiResource>::KIND.to_string()
    }

    /// Create a new CiliumEgressGatewayPolicy
    pub fn new(metadata: ClusterMetadata, spec: EgressGatewayPolicySpec) -> Self {
        Self {
            api_version: Self::api_version(),
            kind: Self::kind(),
            metadata,
            spec,
        }
    }
}

impl Manifest for CiliumEgressGatewayPolicy {
    fn stamp(&mut self) {
        self.api_version = Self::api_version();
        self.kind = Self::kind();
    }

    fn name(&self) -> &str {
        &self.metadata.name
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn gateway_fields_use_cilium_names() {
        let policy = CiliumEgressGatewayPolicy::new(
            ClusterMetadata::new("egress-sample"),
            EgressGatewayPolicySpec {
                selectors: vec![EgressSelector {
                    pod_selector: Some(LabelSelector::from_label("app", "billing")),
                    ..Default::default()
                }],
                destination_cidrs: vec!["0.0.0.0/0".to_string()],
                excluded_cidrs: vec!["10.0.0.0/8".to_string()],
                egress_gateway: Some(EgressGateway {
                    node_selector: Some(LabelSelector::from_label("egress-node", "true")),
                    interface: None,
                    egress_ip: Some("192.0.2.10".to_string()),
                }),
                egress_gateways: Vec::new(),
            },
        );

        let value = serde_json::to_value(&policy).unwrap();
        assert_eq!(
            value["spec"],
            json!({
                "selectors": [{"podSelector": {"matchLabels": {"app": "billing"}}}],
                "destinationCIDRs": ["0.0.0.0/0"],
                "excludedCIDRs": ["10.0.0.0/8"],
                "egressGateway": {
                    "nodeSelector": {"matchLabels": {"egress-node": "true"}},
                    "egressIP": "192.0.2.10"
                }
            })
        );
    }

    #[test]
    fn selectors_and_destinations_are_required() {
        let missing: Result<CiliumEgressGatewayPolicy, _> = serde_json::from_value(json!({
            "metadata": {"name": "e"},
            "spec": {"destinationCIDRs": ["0.0.0.0/0"]}
        }));
        assert!(missing.is_err());
    }
}
