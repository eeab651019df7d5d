//! Kubernetes identity helpers built on kube-rs
//!
//! Every manifest type has an apiVersion and kind known at compile time. The
//! [`HasApiResource`] trait carries those constants and derives the rest of the
//! resource identity (group, version, plural, data source type name) from them.

use kube::core::ApiResource;

/// Trait for types that have a known API group, version, and kind.
///
/// # Example
/// ```ignore
/// impl HasApiResource for CiliumNetworkPolicy {
///     const API_VERSION: &'static str = "cilium.io/v2";
///     const KIND: &'static str = "CiliumNetworkPolicy";
/// }
///
/// let ar = CiliumNetworkPolicy::api_resource();
/// assert_eq!(ar.plural, "ciliumnetworkpolicies");
/// ```
pub trait HasApiResource {
    /// Full API version (e.g., "cilium.io/v2")
    const API_VERSION: &'static str;
    /// Resource kind (e.g., "CiliumNetworkPolicy")
    const KIND: &'static str;
    /// Whether objects of this kind live in a namespace
    const NAMESPACED: bool;

    /// Build an ApiResource from the type's constants.
    fn api_resource() -> ApiResource {
        build_api_resource(Self::API_VERSION, Self::KIND)
    }

    /// Data source type name for this kind, e.g.
    /// `k8s_cilium_io_cilium_network_policy_v2_manifest`.
    fn data_source_type_name() -> String {
        data_source_type_name(Self::API_VERSION, Self::KIND)
    }
}

/// Build an ApiResource from an apiVersion string and kind.
pub fn build_api_resource(api_version: &str, kind: &str) -> ApiResource {
    let (group, version) = parse_api_version(api_version);
    ApiResource {
        group,
        version,
        kind: kind.to_string(),
        api_version: api_version.to_string(),
        plural: pluralize_kind(kind),
    }
}

/// Split an apiVersion into (group, version). Core resources have an empty group.
pub fn parse_api_version(api_version: &str) -> (String, String) {
    match api_version.split_once('/') {
        Some((group, version)) => (group.to_string(), version.to_string()),
        None => (String::new(), api_version.to_string()),
    }
}

/// Lowercase plural of a kind, following the Kubernetes naming convention.
pub fn pluralize_kind(kind: &str) -> String {
    let lower = kind.to_lowercase();
    if lower.ends_with('s') || lower.ends_with("ch") || lower.ends_with("sh") {
        format!("{}es", lower)
    } else if lower.ends_with('y') && !lower.ends_with("ay") && !lower.ends_with("ey") {
        format!("{}ies", &lower[..lower.len() - 1])
    } else {
        format!("{}s", lower)
    }
}

/// Convert a CamelCase kind to snake_case, keeping acronyms together
/// (`CiliumCIDRGroup` -> `cilium_cidr_group`).
pub fn snake_case_kind(kind: &str) -> String {
    let chars: Vec<char> = kind.chars().collect();
    let mut out = String::with_capacity(kind.len() + 4);
    for (i, c) in chars.iter().enumerate() {
        if c.is_uppercase() && i > 0 {
            let prev = chars[i - 1];
            let next_is_lower = chars.get(i + 1).is_some_and(|n| n.is_lowercase());
            if prev.is_lowercase() || prev.is_ascii_digit() || (prev.is_uppercase() && next_is_lower)
            {
                out.push('_');
            }
        }
        out.extend(c.to_lowercase());
    }
    out
}

/// Data source type name: `<provider>_<group>_<kind>_<version>_manifest`,
/// with dots in the group replaced by underscores.
pub fn data_source_type_name(api_version: &str, kind: &str) -> String {
    let (group, version) = parse_api_version(api_version);
    let mut parts = vec![crate::PROVIDER_TYPE_NAME.to_string()];
    if !group.is_empty() {
        parts.push(group.replace(['.', '-'], "_"));
    }
    parts.push(snake_case_kind(kind));
    parts.push(version);
    parts.push("manifest".to_string());
    parts.join("_")
}
