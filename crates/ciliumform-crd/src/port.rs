//! Port-level rules: L4 ports, TLS interception, Envoy listeners, and L7 rules

use std::collections::BTreeMap;

use k8s_openapi::apimachinery::pkg::util::intstr::IntOrString;
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

/// L4 port and protocol, optionally with L7 rules, that traffic must match
#[derive(Clone, Debug, Default, Serialize, Deserialize, JsonSchema, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct PortRule {
    /// List of L4 port/protocol. If omitted or empty but rules are set, all ports match.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub ports: Vec<PortProtocol>,
    /// TLS context for connections terminated by the L7 proxy.
    #[serde(
        default,
        skip_serializing_if = "Option::is_none",
        rename = "terminatingTLS"
    )]
    pub terminating_tls: Option<TlsContext>,
    /// TLS context for connections originated by the L7 proxy.
    #[serde(
        default,
        skip_serializing_if = "Option::is_none",
        rename = "originatingTLS"
    )]
    pub originating_tls: Option<TlsContext>,
    /// TLS SNI server names to match. Only valid with TCP ports.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub server_names: Vec<String>,
    /// Envoy listener that traffic on these ports is redirected to.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub listener: Option<Listener>,
    /// L7 rules. If omitted, all L7 traffic on the ports is allowed.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub rules: Option<L7Rules>,
}

/// L4 port list for deny rules; deny rules cannot carry L7 rules
#[derive(Clone, Debug, Default, Serialize, Deserialize, JsonSchema, PartialEq)]
pub struct PortDenyRule {
    /// List of L4 port/protocol.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub ports: Vec<PortProtocol>,
}

/// L4 port with an optional transport protocol
#[derive(Clone, Debug, Serialize, Deserialize, JsonSchema, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct PortProtocol {
    /// Port number or IANA service name. 0 means all ports.
    #[schemars(regex = "crate::patterns::PORT")]
    pub port: String,
    /// End of a port range starting at `port`.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    #[schemars(range(min = 0, max = 65535))]
    pub end_port: Option<i64>,
    /// L4 protocol. Defaults to ANY.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub protocol: Option<Protocol>,
}

impl PortProtocol {
    /// TCP port
    pub fn tcp(port: u16) -> Self {
        Self {
            port: port.to_string(),
            end_port: None,
            protocol: Some(Protocol::Tcp),
        }
    }
}

/// L4 protocol
#[derive(Clone, Copy, Debug, Serialize, Deserialize, JsonSchema, PartialEq, Eq)]
#[serde(rename_all = "UPPERCASE")]
pub enum Protocol {
    /// Transmission Control Protocol
    Tcp,
    /// User Datagram Protocol
    Udp,
    /// Stream Control Transmission Protocol
    Sctp,
    /// Any protocol
    Any,
}

/// TLS configuration for the L7 proxy
#[derive(Clone, Debug, Default, Serialize, Deserialize, JsonSchema, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct TlsContext {
    /// Secret holding the certificate, key, and CA. Without it the proxy's defaults apply.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub secret: Option<SecretReference>,
    /// Key in the secret holding the trusted CA bundle. Defaults to `ca.crt`.
    #[serde(default, skip_serializing_if = "Option::is_none", rename = "trustedCA")]
    pub trusted_ca: Option<String>,
    /// Key in the secret holding the certificate chain. Defaults to `tls.crt`.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub certificate: Option<String>,
    /// Key in the secret holding the private key. Defaults to `tls.key`.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub private_key: Option<String>,
}

/// Reference to a Kubernetes secret
#[derive(Clone, Debug, Default, Serialize, Deserialize, JsonSchema, PartialEq)]
pub struct SecretReference {
    /// Name of the secret.
    pub name: String,
    /// Namespace of the secret. Defaults to the policy's namespace.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub namespace: Option<String>,
}

/// Envoy listener reference
#[derive(Clone, Debug, Serialize, Deserialize, JsonSchema, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Listener {
    /// Envoy config resource defining the listener.
    pub envoy_config: EnvoyConfig,
    /// Name of the listener.
    #[schemars(length(min = 1))]
    pub name: String,
    /// Listener priority; lower wins when several listeners apply. 1 to 100.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    #[schemars(range(min = 1, max = 100))]
    pub priority: Option<i64>,
}

/// Envoy config resource reference
#[derive(Clone, Debug, Serialize, Deserialize, JsonSchema, PartialEq)]
pub struct EnvoyConfig {
    /// Kind of the envoy config resource.
    pub kind: EnvoyConfigKind,
    /// Name of the envoy config resource.
    #[schemars(length(min = 1))]
    pub name: String,
}

/// Envoy config resource kind
#[derive(Clone, Copy, Debug, Serialize, Deserialize, JsonSchema, PartialEq, Eq)]
pub enum EnvoyConfigKind {
    /// Namespaced envoy config
    CiliumEnvoyConfig,
    /// Cluster-scoped envoy config
    CiliumClusterwideEnvoyConfig,
}

/// L7 rules; only one protocol family may be set per port rule
#[derive(Clone, Debug, Default, Serialize, Deserialize, JsonSchema, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct L7Rules {
    /// HTTP rules.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub http: Vec<HttpRule>,
    /// Kafka rules.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub kafka: Vec<KafkaRule>,
    /// DNS rules; responses matching them populate the FQDN cache.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub dns: Vec<DnsRule>,
    /// Name of a generic L7 protocol parser.
    #[serde(default, skip_serializing_if = "Option::is_none", rename = "l7proto")]
    pub l7_proto: Option<String>,
    /// Generic key/value rules for the `l7proto` parser.
    #[serde(default, skip_serializing_if = "Vec::is_empty", rename = "l7")]
    pub l7: Vec<BTreeMap<String, String>>,
}

/// HTTP request match; all set fields must match
#[derive(Clone, Debug, Default, Serialize, Deserialize, JsonSchema, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct HttpRule {
    /// Extended POSIX regex matched against the request path.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub path: Option<String>,
    /// Extended POSIX regex matched against the request method.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub method: Option<String>,
    /// Extended POSIX regex matched against the host header.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub host: Option<String>,
    /// Headers that must be present, as `Name: value` or `Name`.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub headers: Vec<String>,
    /// Header matches with an action taken on mismatch.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub header_matches: Vec<HeaderMatch>,
}

/// Header match with mismatch handling
#[derive(Clone, Debug, Serialize, Deserialize, JsonSchema, PartialEq)]
pub struct HeaderMatch {
    /// Action on mismatch. Without it a mismatch denies the request.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub mismatch: Option<MismatchAction>,
    /// Name of the header.
    #[schemars(length(min = 1))]
    pub name: String,
    /// Secret holding the expected value; takes precedence over `value`.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub secret: Option<SecretReference>,
    /// Expected value of the header.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub value: Option<String>,
}

/// Action taken when a header does not match
#[derive(Clone, Copy, Debug, Serialize, Deserialize, JsonSchema, PartialEq, Eq)]
#[serde(rename_all = "UPPERCASE")]
pub enum MismatchAction {
    /// Log the mismatch and allow
    Log,
    /// Add the expected header value
    Add,
    /// Remove the header
    Delete,
    /// Replace the header value
    Replace,
}

/// Kafka request match
#[derive(Clone, Debug, Default, Serialize, Deserialize, JsonSchema, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct KafkaRule {
    /// Shorthand for a set of API keys. Mutually exclusive with `apiKey`.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub role: Option<KafkaRole>,
    /// Kafka API key name (e.g. `produce`, `fetch`).
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub api_key: Option<String>,
    /// Kafka API version.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub api_version: Option<String>,
    /// Client identifier.
    #[serde(default, skip_serializing_if = "Option::is_none", rename = "clientID")]
    pub client_id: Option<String>,
    /// Topic name.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    #[schemars(length(max = 255))]
    #[schemars(regex = "crate::patterns::KAFKA_TOPIC")]
    pub topic: Option<String>,
}

/// Kafka role shorthand
#[derive(Clone, Copy, Debug, Serialize, Deserialize, JsonSchema, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum KafkaRole {
    /// Producer API keys
    Produce,
    /// Consumer API keys
    Consume,
}

/// DNS query match
#[derive(Clone, Debug, Default, Serialize, Deserialize, JsonSchema, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct DnsRule {
    /// Fully qualified name to allow.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    #[schemars(regex = "crate::patterns::FQDN_NAME")]
    pub match_name: Option<String>,
    /// Wildcard name to allow; `*` alone allows every name.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    #[schemars(regex = "crate::patterns::FQDN_PATTERN")]
    pub match_pattern: Option<String>,
}

/// ICMP match
#[derive(Clone, Debug, Default, Serialize, Deserialize, JsonSchema, PartialEq)]
pub struct IcmpRule {
    /// ICMP type and family pairs.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub fields: Vec<IcmpField>,
}

/// ICMP type for one address family
#[derive(Clone, Debug, Serialize, Deserialize, JsonSchema, PartialEq)]
pub struct IcmpField {
    /// Address family. Defaults to IPv4.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub family: Option<IcmpFamily>,
    /// ICMP message type, as a number or a name such as `EchoRequest`.
    #[serde(rename = "type")]
    pub icmp_type: IntOrString,
}

/// ICMP address family
#[derive(Clone, Copy, Debug, Serialize, Deserialize, JsonSchema, PartialEq, Eq)]
pub enum IcmpFamily {
    /// ICMPv4
    IPv4,
    /// ICMPv6
    IPv6,
}
