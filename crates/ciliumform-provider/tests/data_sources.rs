//! End-to-end reads through the provider for every Cilium kind

use ciliumform_provider::{Provider, Severity};
use rstest::rstest;
use serde_json::{json, Value};

fn provider() -> Provider {
    Provider::new().expect("provider builds")
}

fn read_yaml(type_name: &str, config: Value) -> serde_yaml::Value {
    let result = provider().read_data_source(type_name, config);
    assert!(result.diagnostics.is_empty(), "{:?}", result.diagnostics);
    let state = result.state.expect("state");
    serde_yaml::from_str(state["yaml"].as_str().expect("yaml string")).expect("valid yaml")
}

#[test]
fn network_policy_with_l7_rules() {
    let yaml = read_yaml(
        "k8s_cilium_io_cilium_network_policy_v2_manifest",
        json!({
            "metadata": {"name": "api", "namespace": "shop"},
            "spec": {
                "endpointSelector": {"matchLabels": {"app": "api"}},
                "ingress": [{
                    "fromEndpoints": [{"matchLabels": {"app": "frontend"}}],
                    "toPorts": [{
                        "ports": [{"port": "8080", "protocol": "TCP"}],
                        "rules": {"http": [{"method": "GET", "path": "/v1/.*"}]}
                    }]
                }]
            }
        }),
    );
    assert_eq!(yaml["apiVersion"], "cilium.io/v2");
    assert_eq!(yaml["kind"], "CiliumNetworkPolicy");
    assert_eq!(yaml["metadata"]["namespace"], "shop");
    let port_rule = &yaml["spec"]["ingress"][0]["toPorts"][0];
    assert_eq!(port_rule["ports"][0]["port"], "8080");
    assert_eq!(port_rule["rules"]["http"][0]["path"], "/v1/.*");
}

#[test]
fn cidr_group() {
    let yaml = read_yaml(
        "k8s_cilium_io_cilium_cidr_group_v2alpha1_manifest",
        json!({
            "metadata": {"name": "office"},
            "spec": {"externalCIDRs": ["203.0.113.0/24", "2001:db8::/48"]}
        }),
    );
    assert_eq!(yaml["apiVersion"], "cilium.io/v2alpha1");
    assert_eq!(yaml["kind"], "CiliumCIDRGroup");
    assert_eq!(yaml["spec"]["externalCIDRs"][1], "2001:db8::/48");
}

#[test]
fn egress_gateway_policy() {
    let yaml = read_yaml(
        "k8s_cilium_io_cilium_egress_gateway_policy_v2_manifest",
        json!({
            "metadata": {"name": "egress"},
            "spec": {
                "selectors": [{"podSelector": {"matchLabels": {"app": "batch"}}}],
                "destinationCIDRs": ["0.0.0.0/0"],
                "egressGateway": {
                    "nodeSelector": {"matchLabels": {"role": "gateway"}},
                    "egressIP": "192.0.2.10"
                }
            }
        }),
    );
    assert_eq!(yaml["kind"], "CiliumEgressGatewayPolicy");
    assert_eq!(yaml["spec"]["egressGateway"]["egressIP"], "192.0.2.10");
}

#[rstest]
#[case(
    "k8s_cilium_io_cilium_cidr_group_v2alpha1_manifest",
    json!({"metadata": {"name": "g"}, "spec": {"externalCIDRs": ["10.1.0.0"]}}),
    "spec.externalCIDRs[0]"
)]
#[case(
    "k8s_cilium_io_cilium_egress_gateway_policy_v2_manifest",
    json!({
        "metadata": {"name": "e"},
        "spec": {
            "selectors": [{}],
            "destinationCIDRs": ["0.0.0.0/0"],
            "egressGateway": {"nodeSelector": {}, "egressIP": "300.0.0.1"}
        }
    }),
    "spec.egressGateway.egressIP"
)]
#[case(
    "k8s_cilium_io_cilium_network_policy_v2_manifest",
    json!({"metadata": {"name": "n", "namespace": "default"}, "spec": {"log": {"value": "x".repeat(33)}}}),
    "spec.log.value"
)]
fn out_of_pattern_input_never_renders(
    #[case] type_name: &str,
    #[case] config: Value,
    #[case] path: &str,
) {
    let result = provider().read_data_source(type_name, config);
    assert!(result.state.is_none());
    assert_eq!(result.diagnostics.len(), 1, "{:?}", result.diagnostics);
    let diagnostic = &result.diagnostics[0];
    assert_eq!(diagnostic.severity, Severity::Error);
    assert_eq!(diagnostic.attribute.as_ref().unwrap().to_string(), path);
}

#[test]
fn output_keeps_config_alongside_yaml() {
    let config = json!({
        "metadata": {"name": "policy-1"},
        "spec": {"endpointSelector": {"matchLabels": {"app": "web"}}}
    });
    let result = provider().read_data_source(
        "k8s_cilium_io_cilium_clusterwide_network_policy_v2_manifest",
        config.clone(),
    );
    let mut state = result.state.unwrap();
    let yaml = state
        .as_object_mut()
        .unwrap()
        .remove("yaml")
        .unwrap();
    assert_eq!(state, config);
    assert!(yaml.as_str().unwrap().contains("name: policy-1"));
}
