//! Cilium policy rule
//!
//! A [`Rule`] selects endpoints (or nodes) and lists the ingress and egress
//! peers they may or may not talk to. Both network policy kinds carry rules in
//! `spec` and `specs`.

use std::collections::BTreeMap;

use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

use crate::port::{IcmpRule, PortDenyRule, PortRule};
use crate::selector::LabelSelector;

/// Policy rule. Exactly one of `endpointSelector` or `nodeSelector` must be set.
#[derive(Clone, Debug, Default, Serialize, Deserialize, JsonSchema, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Rule {
    /// Endpoints this rule applies to.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub endpoint_selector: Option<LabelSelector>,
    /// Nodes this rule applies to (host policies).
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub node_selector: Option<LabelSelector>,
    /// Allowed ingress. Empty with no ingressDeny means ingress is not restricted.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub ingress: Vec<IngressRule>,
    /// Denied ingress; takes precedence over ingress.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub ingress_deny: Vec<IngressDenyRule>,
    /// Allowed egress. Empty with no egressDeny means egress is not restricted.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub egress: Vec<EgressRule>,
    /// Denied egress; takes precedence over egress.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub egress_deny: Vec<EgressDenyRule>,
    /// Labels identifying this rule, used to find and delete it.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub labels: Vec<RuleLabel>,
    /// Whether selected endpoints switch to default-deny in each direction.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub enable_default_deny: Option<DefaultDeny>,
    /// Free-form description of the rule.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    /// Policy verdict logging configuration.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub log: Option<LogConfig>,
}

/// Default deny toggles per direction
#[derive(Clone, Debug, Default, Serialize, Deserialize, JsonSchema, PartialEq)]
pub struct DefaultDeny {
    /// Ingress default deny. Defaults to true when the rule has ingress rules.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub ingress: Option<bool>,
    /// Egress default deny. Defaults to true when the rule has egress rules.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub egress: Option<bool>,
}

/// Policy verdict logging
#[derive(Clone, Debug, Default, Serialize, Deserialize, JsonSchema, PartialEq)]
pub struct LogConfig {
    /// Value attached to policy verdict log entries for this rule.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    #[schemars(length(max = 32))]
    pub value: Option<String>,
}

/// Rule label
#[derive(Clone, Debug, Serialize, Deserialize, JsonSchema, PartialEq)]
pub struct RuleLabel {
    /// Label key.
    pub key: String,
    /// Origin of the label.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub source: Option<String>,
    /// Label value.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub value: Option<String>,
}

/// CIDR with optional exceptions, or a reference to a CIDR group
#[derive(Clone, Debug, Default, Serialize, Deserialize, JsonSchema, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct CidrRule {
    /// CIDR prefix.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    #[schemars(regex = "crate::patterns::CIDR")]
    pub cidr: Option<String>,
    /// Name of a CiliumCIDRGroup.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    #[schemars(length(max = 253))]
    #[schemars(regex = "crate::patterns::DNS_SUBDOMAIN")]
    pub cidr_group_ref: Option<String>,
    /// Selects CiliumCIDRGroups by label.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub cidr_group_selector: Option<LabelSelector>,
    /// CIDRs inside `cidr` that are excluded.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    #[schemars(inner(regex = "crate::patterns::CIDR"))]
    pub except: Vec<String>,
}

/// Special Cilium entity
#[derive(Clone, Copy, Debug, Serialize, Deserialize, JsonSchema, PartialEq, Eq)]
#[serde(rename_all = "kebab-case")]
pub enum Entity {
    /// Every endpoint and every address
    All,
    /// Everything outside the cluster
    World,
    /// Everything inside the cluster
    Cluster,
    /// The local host
    Host,
    /// Endpoints still resolving their identity
    Init,
    /// The ingress proxy identity
    Ingress,
    /// Pods not managed by Cilium
    Unmanaged,
    /// Other nodes in the cluster
    RemoteNode,
    /// Health check endpoints
    Health,
    /// Nothing
    None,
    /// The Kubernetes API server
    KubeApiserver,
}

/// Cloud provider group reference
#[derive(Clone, Debug, Default, Serialize, Deserialize, JsonSchema, PartialEq)]
pub struct Groups {
    /// AWS security group lookup.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub aws: Option<AwsGroup>,
}

/// AWS security group lookup
#[derive(Clone, Debug, Default, Serialize, Deserialize, JsonSchema, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct AwsGroup {
    /// Instance tags to match.
    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    pub labels: BTreeMap<String, String>,
    /// AWS region.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub region: Option<String>,
    /// Security group IDs.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub security_groups_ids: Vec<String>,
    /// Security group names.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub security_groups_names: Vec<String>,
}

/// Mutual authentication requirement
#[derive(Clone, Debug, Serialize, Deserialize, JsonSchema, PartialEq)]
pub struct Authentication {
    /// Required authentication mode.
    pub mode: AuthenticationMode,
}

/// Authentication mode
#[derive(Clone, Copy, Debug, Serialize, Deserialize, JsonSchema, PartialEq, Eq)]
#[serde(rename_all = "kebab-case")]
pub enum AuthenticationMode {
    /// No authentication
    Disabled,
    /// Mutual authentication required
    Required,
    /// Always fail authentication (testing)
    TestAlwaysFail,
}

/// Allowed ingress peers and ports
#[derive(Clone, Debug, Default, Serialize, Deserialize, JsonSchema, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct IngressRule {
    /// Endpoints allowed to connect.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub from_endpoints: Vec<LabelSelector>,
    /// Additional requirements every peer in this rule must meet.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub from_requires: Vec<LabelSelector>,
    /// CIDRs allowed to connect.
    #[serde(default, skip_serializing_if = "Vec::is_empty", rename = "fromCIDR")]
    #[schemars(inner(regex = "crate::patterns::CIDR"))]
    pub from_cidr: Vec<String>,
    /// CIDRs with exceptions, or CIDR groups, allowed to connect.
    #[serde(default, skip_serializing_if = "Vec::is_empty", rename = "fromCIDRSet")]
    pub from_cidr_set: Vec<CidrRule>,
    /// Special entities allowed to connect.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub from_entities: Vec<Entity>,
    /// Cloud provider groups allowed to connect.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub from_groups: Vec<Groups>,
    /// Nodes allowed to connect.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub from_nodes: Vec<LabelSelector>,
    /// Destination ports and L7 rules.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub to_ports: Vec<PortRule>,
    /// ICMP types allowed.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub icmps: Vec<IcmpRule>,
    /// Authentication required from peers.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub authentication: Option<Authentication>,
}

/// Denied ingress peers and ports
#[derive(Clone, Debug, Default, Serialize, Deserialize, JsonSchema, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct IngressDenyRule {
    /// Endpoints denied.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub from_endpoints: Vec<LabelSelector>,
    /// Additional requirements every peer in this rule must meet.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub from_requires: Vec<LabelSelector>,
    /// CIDRs denied.
    #[serde(default, skip_serializing_if = "Vec::is_empty", rename = "fromCIDR")]
    #[schemars(inner(regex = "crate::patterns::CIDR"))]
    pub from_cidr: Vec<String>,
    /// CIDRs with exceptions, or CIDR groups, denied.
    #[serde(default, skip_serializing_if = "Vec::is_empty", rename = "fromCIDRSet")]
    pub from_cidr_set: Vec<CidrRule>,
    /// Special entities denied.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub from_entities: Vec<Entity>,
    /// Cloud provider groups denied.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub from_groups: Vec<Groups>,
    /// Nodes denied.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub from_nodes: Vec<LabelSelector>,
    /// Destination ports denied.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub to_ports: Vec<PortDenyRule>,
    /// ICMP types denied.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub icmps: Vec<IcmpRule>,
}

/// Kubernetes service reference
#[derive(Clone, Debug, Default, Serialize, Deserialize, JsonSchema, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct K8sServiceNamespace {
    /// Service name.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub service_name: Option<String>,
    /// Service namespace.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub namespace: Option<String>,
}

/// Kubernetes services selected by label
#[derive(Clone, Debug, Default, Serialize, Deserialize, JsonSchema, PartialEq)]
pub struct K8sServiceSelectorNamespace {
    /// Service label selector.
    pub selector: LabelSelector,
    /// Namespace to select services in.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub namespace: Option<String>,
}

/// Service egress peer
#[derive(Clone, Debug, Default, Serialize, Deserialize, JsonSchema, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Service {
    /// Service by name.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub k8s_service: Option<K8sServiceNamespace>,
    /// Services by label.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub k8s_service_selector: Option<K8sServiceSelectorNamespace>,
}

/// DNS name egress peer
#[derive(Clone, Debug, Default, Serialize, Deserialize, JsonSchema, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct FqdnSelector {
    /// Exact name.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    #[schemars(length(max = 255))]
    #[schemars(regex = "crate::patterns::FQDN_NAME")]
    pub match_name: Option<String>,
    /// Wildcard name; `*` matches within a single label.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    #[schemars(length(max = 255))]
    #[schemars(regex = "crate::patterns::FQDN_PATTERN")]
    pub match_pattern: Option<String>,
}

/// Allowed egress peers and ports
#[derive(Clone, Debug, Default, Serialize, Deserialize, JsonSchema, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct EgressRule {
    /// Endpoints that may be reached.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub to_endpoints: Vec<LabelSelector>,
    /// Additional requirements every peer in this rule must meet.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub to_requires: Vec<LabelSelector>,
    /// CIDRs that may be reached.
    #[serde(default, skip_serializing_if = "Vec::is_empty", rename = "toCIDR")]
    #[schemars(inner(regex = "crate::patterns::CIDR"))]
    pub to_cidr: Vec<String>,
    /// CIDRs with exceptions, or CIDR groups, that may be reached.
    #[serde(default, skip_serializing_if = "Vec::is_empty", rename = "toCIDRSet")]
    pub to_cidr_set: Vec<CidrRule>,
    /// Special entities that may be reached.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub to_entities: Vec<Entity>,
    /// Services that may be reached.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub to_services: Vec<Service>,
    /// Cloud provider groups that may be reached.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub to_groups: Vec<Groups>,
    /// Nodes that may be reached.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub to_nodes: Vec<LabelSelector>,
    /// DNS names that may be reached.
    #[serde(default, skip_serializing_if = "Vec::is_empty", rename = "toFQDNs")]
    pub to_fqdns: Vec<FqdnSelector>,
    /// Destination ports and L7 rules.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub to_ports: Vec<PortRule>,
    /// ICMP types allowed.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub icmps: Vec<IcmpRule>,
    /// Authentication required toward peers.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub authentication: Option<Authentication>,
}

/// Denied egress peers and ports
#[derive(Clone, Debug, Default, Serialize, Deserialize, JsonSchema, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct EgressDenyRule {
    /// Endpoints denied.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub to_endpoints: Vec<LabelSelector>,
    /// Additional requirements every peer in this rule must meet.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub to_requires: Vec<LabelSelector>,
    /// CIDRs denied.
    #[serde(default, skip_serializing_if = "Vec::is_empty", rename = "toCIDR")]
    #[schemars(inner(regex = "crate::patterns::CIDR"))]
    pub to_cidr: Vec<String>,
    /// CIDRs with exceptions, or CIDR groups, denied.
    #[serde(default, skip_serializing_if = "Vec::is_empty", rename = "toCIDRSet")]
    pub to_cidr_set: Vec<CidrRule>,
    /// Special entities denied.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub to_entities: Vec<Entity>,
    /// Services denied.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub to_services: Vec<Service>,
    /// Cloud provider groups denied.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub to_groups: Vec<Groups>,
    /// Nodes denied.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub to_nodes: Vec<LabelSelector>,
    /// Destination ports denied.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub to_ports: Vec<PortDenyRule>,
    /// ICMP types denied.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub icmps: Vec<IcmpRule>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::port::PortProtocol;
    use serde_json::json;

    #[test]
    fn egress_rule_uses_cilium_acronyms() {
        let rule = EgressRule {
            to_cidr: vec!["10.0.0.0/8".to_string()],
            to_cidr_set: vec![CidrRule {
                cidr: Some("0.0.0.0/0".to_string()),
                except: vec!["169.254.169.254/32".to_string()],
                ..Default::default()
            }],
            to_fqdns: vec![FqdnSelector {
                match_pattern: Some("*.example.com".to_string()),
                match_name: None,
            }],
            to_entities: vec![Entity::KubeApiserver],
            to_ports: vec![PortRule {
                ports: vec![PortProtocol::tcp(443)],
                ..Default::default()
            }],
            ..Default::default()
        };

        let value = serde_json::to_value(&rule).unwrap();
        assert_eq!(
            value,
            json!({
                "toCIDR": ["10.0.0.0/8"],
                "toCIDRSet": [{"cidr": "0.0.0.0/0", "except": ["169.254.169.254/32"]}],
                "toEntities": ["kube-apiserver"],
                "toFQDNs": [{"matchPattern": "*.example.com"}],
                "toPorts": [{"ports": [{"port": "443", "protocol": "TCP"}]}]
            })
        );
    }

    #[test]
    fn entities_use_kebab_case() {
        let entities: Vec<Entity> =
            serde_json::from_value(json!(["remote-node", "world", "kube-apiserver"])).unwrap();
        assert_eq!(
            entities,
            vec![Entity::RemoteNode, Entity::World, Entity::KubeApiserver]
        );
    }

    #[test]
    fn services_keep_k8s_prefix() {
        let service: Service = serde_json::from_value(json!({
            "k8sService": {"serviceName": "kube-dns", "namespace": "kube-system"}
        }))
        .unwrap();
        assert_eq!(
            service.k8s_service.unwrap().service_name.as_deref(),
            Some("kube-dns")
        );
    }

    #[test]
    fn default_deny_keeps_explicit_false() {
        let rule: Rule = serde_json::from_value(json!({
            "endpointSelector": {},
            "enableDefaultDeny": {"ingress": false}
        }))
        .unwrap();
        let value = serde_json::to_value(&rule).unwrap();
        assert_eq!(value["enableDefaultDeny"], json!({"ingress": false}));
        assert_eq!(value["endpointSelector"], json!({}));
    }

    #[test]
    fn deny_rule_ports_have_no_l7() {
        let rule: IngressDenyRule = serde_json::from_value(json!({
            "fromEntities": ["world"],
            "toPorts": [{"ports": [{"port": "22"}]}]
        }))
        .unwrap();
        assert_eq!(rule.to_ports[0].ports[0].port, "22");
        assert!(rule.to_ports[0].ports[0].protocol.is_none());
    }

    #[test]
    fn authentication_mode_names() {
        let auth: Authentication =
            serde_json::from_value(json!({"mode": "test-always-fail"})).unwrap();
        assert_eq!(auth.mode, AuthenticationMode::TestAlwaysFail);
    }
}
