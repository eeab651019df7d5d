//! YAML input parsing and manifest rendering
//!
//! Configuration files are parsed with yaml-rust2 into `serde_json::Value` so the
//! same value can be validated against a schema and then decoded into a typed
//! model. Rendering goes the other way through serde_yaml.

use serde::Serialize;
use serde_json::{Map, Number, Value};
use yaml_rust2::{Yaml, YamlLoader};

use crate::Error;

/// Error type for YAML parsing
#[derive(Debug, Clone)]
pub struct YamlError(String);

impl std::fmt::Display for YamlError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl std::error::Error for YamlError {}

/// Parse a YAML (or JSON) string into a serde_json::Value.
///
/// Only the first document is returned. Empty input yields `Value::Null`.
/// Anchors and aliases are resolved by the loader, so an alias reads as a copy
/// of the anchored node.
pub fn parse_yaml(input: &str) -> Result<Value, YamlError> {
    let docs = YamlLoader::load_from_str(input).map_err(|e| YamlError(e.to_string()))?;
    match docs.into_iter().next() {
        Some(doc) => yaml_to_json(doc),
        None => Ok(Value::Null),
    }
}

fn yaml_to_json(yaml: Yaml) -> Result<Value, YamlError> {
    match yaml {
        Yaml::Null => Ok(Value::Null),
        Yaml::Boolean(b) => Ok(Value::Bool(b)),
        Yaml::Integer(i) => Ok(Value::Number(i.into())),
        Yaml::Real(s) => {
            let f: f64 = s
                .parse()
                .map_err(|e: std::num::ParseFloatError| YamlError(e.to_string()))?;
            Number::from_f64(f)
                .map(Value::Number)
                .ok_or_else(|| YamlError(format!("non-finite number: {s}")))
        }
        Yaml::String(s) => Ok(Value::String(s)),
        Yaml::Array(arr) => arr
            .into_iter()
            .map(yaml_to_json)
            .collect::<Result<Vec<_>, _>>()
            .map(Value::Array),
        Yaml::Hash(map) => map
            .into_iter()
            .map(|(k, v)| {
                let key = match k {
                    Yaml::String(s) => s,
                    Yaml::Integer(i) => i.to_string(),
                    Yaml::Real(r) => r,
                    Yaml::Boolean(b) => b.to_string(),
                    _ => return Err(YamlError("map keys must be scalars".to_string())),
                };
                yaml_to_json(v).map(|v| (key, v))
            })
            .collect::<Result<Map<String, Value>, _>>()
            .map(Value::Object),
        Yaml::Alias(_) => Err(YamlError("unresolved YAML alias".to_string())),
        Yaml::BadValue => Err(YamlError("bad YAML value".to_string())),
    }
}

/// Drop every `null` object member, recursively.
///
/// The host encodes unset attributes as `null`; the models treat a missing key
/// as unset, so nulls are removed before decoding. Nulls inside arrays are kept
/// and left for the decoder to reject.
pub fn prune_nulls(value: Value) -> Value {
    match value {
        Value::Object(map) => Value::Object(
            map.into_iter()
                .filter(|(_, v)| !v.is_null())
                .map(|(k, v)| (k, prune_nulls(v)))
                .collect(),
        ),
        Value::Array(items) => Value::Array(items.into_iter().map(prune_nulls).collect()),
        other => other,
    }
}

/// Render a manifest to YAML text.
pub fn to_yaml<T: Serialize>(manifest: &T, kind: &str) -> crate::Result<String> {
    serde_yaml::to_string(manifest).map_err(|e| Error::serialization_for_kind(kind, e.to_string()))
}
