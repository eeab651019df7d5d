//! CiliumClusterwideNetworkPolicy (`cilium.io/v2`)

use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

use crate::metadata::ClusterMetadata;
use crate::rule::Rule;
use crate::{HasApiResource, Manifest};

/// Cluster-scoped Cilium network policy.
///
/// Same rule shape as CiliumNetworkPolicy; rules may use `nodeSelector` to
/// target hosts.
#[derive(Clone, Debug, Serialize, Deserialize, JsonSchema, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct CiliumClusterwideNetworkPolicy {
    /// API version
    #[serde(default = "CiliumClusterwideNetworkPolicy::api_version")]
    #[schemars(skip)]
    pub api_version: String,
    /// Kind
    #[serde(default = "CiliumClusterwideNetworkPolicy::kind")]
    #[schemars(skip)]
    pub kind: String,
    /// Standard object metadata.
    pub metadata: ClusterMetadata,
    /// Single rule of the policy.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub spec: Option<Rule>,
    /// List of rules of the policy.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub specs: Vec<Rule>,
}

impl HasApiResource for CiliumClusterwideNetworkPolicy {
    const API_VERSION: &'static str = "cilium.io/v2";
    const KIND: &'static str = "CiliumClusterwideNetworkPolicy";
    const NAMESPACED: bool = false;
}

impl CiliumClusterwideNetworkPolicy {
    fn api_version() -> String {
        <Self as HasApiResource>::API_VERSION.to_string()
    }
    fn kind() -> String {
        <Self as HasApiResource>::KIND.to_string()
    }

    /// Create a new CiliumClusterwideNetworkPolicy with a single rule
    pub fn new(metadata: ClusterMetadata, spec: Rule) -> Self {
        Self {
            api_version: Self::api_version(),
            kind: Self::kind(),
            metadata,
            spec: Some(spec),
            specs: Vec::new(),
        }
    }
}

impl Manifest for CiliumClusterwideNetworkPolicy {
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
    use crate::rule::{DefaultDeny, EgressRule, Entity};
    use crate::selector::LabelSelector;

    #[test]
    fn host_policy_with_node_selector() {
        let policy = CiliumClusterwideNetworkPolicy::new(
            ClusterMetadata::new("host-egress"),
            Rule {
                node_selector: Some(LabelSelector::from_label("node-role", "worker")),
                egress: vec![EgressRule {
                    to_entities: vec![Entity::Cluster],
                    ..Default::default()
                }],
                enable_default_deny: Some(DefaultDeny {
                    ingress: Some(false),
                    egress: Some(true),
                }),
                ..Default::default()
            },
        );

        let yaml = serde_yaml::to_string(&policy).unwrap();
        let expected = "\
apiVersion: cilium.io/v2
kind: CiliumClusterwideNetworkPolicy
metadata:
  name: host-egress
spec:
  nodeSelector:
    matchLabels:
      node-role: worker
  egress:
  - toEntities:
    - cluster
  enableDefaultDeny:
    ingress: false
    egress: true
";
        assert_eq!(yaml, expected);
    }

    #[test]
    fn multiple_specs() {
        let mut policy =
            CiliumClusterwideNetworkPolicy::new(ClusterMetadata::new("multi"), Rule::default());
        policy.spec = None;
        policy.specs = vec![Rule::default(), Rule::default()];
        let value = serde_json::to_value(&policy).unwrap();
        assert!(value.get("spec").is_none());
        assert_eq!(value["specs"].as_array().unwrap().len(), 2);
    }
}
