//! Label selectors
//!
//! Cilium uses the Kubernetes label selector shape for endpoint, node, service,
//! namespace, pod, and CIDR group selection.

use std::collections::BTreeMap;

use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

/// A label query over a set of resources.
///
/// An empty selector (`{}`) selects everything.
#[derive(Clone, Debug, Default, Serialize, Deserialize, JsonSchema, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct LabelSelector {
    /// Map of {key,value} pairs. Each pair is equivalent to a matchExpressions entry
    /// with operator In and a single value.
    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    pub match_labels: BTreeMap<String, String>,
    /// List of label selector requirements. All requirements are ANDed.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub match_expressions: Vec<MatchExpression>,
}

impl LabelSelector {
    /// Selector matching a single label
    pub fn from_label(key: impl Into<String>, value: impl Into<String>) -> Self {
        let mut match_labels = BTreeMap::new();
        match_labels.insert(key.into(), value.into());
        Self {
            match_labels,
            match_expressions: Vec::new(),
        }
    }
}

/// Label selector requirement
#[derive(Clone, Debug, Serialize, Deserialize, JsonSchema, PartialEq)]
pub struct MatchExpression {
    /// Label key that the selector applies to.
    pub key: String,
    /// Relationship of the key to the set of values.
    pub operator: SelectorOperator,
    /// Values for In and NotIn. Must be empty for Exists and DoesNotExist.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub values: Vec<String>,
}

/// Selector operator
#[derive(Clone, Copy, Debug, Serialize, Deserialize, JsonSchema, PartialEq, Eq)]
pub enum SelectorOperator {
    /// Label value is one of the listed values
    In,
    /// Label value is none of the listed values
    NotIn,
    /// Label key is present
    Exists,
    /// Label key is absent
    DoesNotExist,
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn empty_selector_serializes_as_empty_map() {
        let yaml = serde_yaml::to_string(&LabelSelector::default()).unwrap();
        assert_eq!(yaml.trim(), "{}");
    }

    #[test]
    fn expression_round_trips_operator_names() {
        let selector: LabelSelector = serde_json::from_value(json!({
            "matchExpressions": [
                {"key": "tier", "operator": "NotIn", "values": ["db"]},
                {"key": "canary", "operator": "DoesNotExist"}
            ]
        }))
        .unwrap();
        assert_eq!(selector.match_expressions[0].operator, SelectorOperator::NotIn);
        assert_eq!(selector.match_expressions[1].operator, SelectorOperator::DoesNotExist);
        assert!(selector.match_expressions[1].values.is_empty());

        let back = serde_json::to_value(&selector).unwrap();
        assert_eq!(back["matchExpressions"][1], json!({"key": "canary", "operator": "DoesNotExist"}));
    }

    #[test]
    fn unknown_operator_is_rejected() {
        let result: Result<MatchExpression, _> =
            serde_json::from_value(json!({"key": "a", "operator": "Matches"}));
        assert!(result.is_err());
    }

    #[test]
    fn from_label_builds_match_labels() {
        let selector = LabelSelector::from_label("app", "web");
        assert_eq!(selector.match_labels.get("app").map(String::as_str), Some("web"));
    }
}
