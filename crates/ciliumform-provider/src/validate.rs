//! Configuration validation
//!
//! Runs before a read so out-of-pattern input never reaches the renderer.
//! Every problem is reported; validation does not stop at the first one.

use std::collections::BTreeMap;

use serde_json::{Map, Value};

use crate::diagnostic::{AttributePath, Diagnostic};
use crate::schema::{Attribute, AttributeKind, Schema};

/// Convert numbers and booleans given for string attributes into strings.
///
/// YAML leaves `port: 80` or `version: 1` unquoted; the value is kept as the
/// text it was written as. Unknown attributes and other kinds are left alone
/// for validation to report.
pub fn coerce_config(schema: &Schema, config: Value) -> Value {
    match config {
        Value::Object(map) => Value::Object(coerce_object(&schema.attributes, map)),
        other => other,
    }
}

fn coerce_object(
    attributes: &BTreeMap<String, Attribute>,
    map: Map<String, Value>,
) -> Map<String, Value> {
    map.into_iter()
        .map(|(name, value)| {
            let value = match attributes.get(&name) {
                Some(attribute) => coerce_value(attribute, value),
                None => value,
            };
            (name, value)
        })
        .collect()
}

fn coerce_value(attribute: &Attribute, value: Value) -> Value {
    match (&attribute.kind, value) {
        (AttributeKind::String, Value::Number(n)) => Value::String(n.to_string()),
        (AttributeKind::String, Value::Bool(b)) => Value::String(b.to_string()),
        (AttributeKind::List { element }, Value::Array(items)) => Value::Array(
            items
                .into_iter()
                .map(|item| coerce_value(element, item))
                .collect(),
        ),
        (AttributeKind::Map { element }, Value::Object(entries)) => Value::Object(
            entries
                .into_iter()
                .map(|(key, item)| (key, coerce_value(element, item)))
                .collect(),
        ),
        (AttributeKind::Object { attributes }, Value::Object(map)) => {
            Value::Object(coerce_object(attributes, map))
        }
        (_, other) => other,
    }
}

/// Validate a configuration value against a schema.
///
/// `null` anywhere stands for "unset". The returned list is empty when the
/// configuration is valid.
pub fn validate_config(schema: &Schema, config: &Value) -> Vec<Diagnostic> {
    let mut diagnostics = Vec::new();
    let root = AttributePath::root();
    match config {
        Value::Object(map) => validate_object(&schema.attributes, map, &root, &mut diagnostics),
        Value::Null => {
            validate_object(&schema.attributes, &Map::new(), &root, &mut diagnostics)
        }
        other => diagnostics.push(type_mismatch(&root, "object", other)),
    }
    diagnostics
}

fn validate_object(
    attributes: &BTreeMap<String, Attribute>,
    values: &Map<String, Value>,
    path: &AttributePath,
    diagnostics: &mut Vec<Diagnostic>,
) {
    for name in values.keys().filter(|k| !attributes.contains_key(*k)) {
        diagnostics.push(Diagnostic::attribute_error(
            &path.attribute(name),
            "Unsupported argument",
            format!("An argument named {name:?} is not expected here."),
        ));
    }

    for (name, attribute) in attributes {
        let child = path.attribute(name);
        match values.get(name).filter(|v| !v.is_null()) {
            None if attribute.required => diagnostics.push(Diagnostic::attribute_error(
                &child,
                "Missing required argument",
                format!("The argument {name:?} is required, but no definition was found."),
            )),
            None => {}
            Some(_) if attribute.computed && !attribute.optional => {
                diagnostics.push(Diagnostic::attribute_error(
                    &child,
                    "Invalid configuration for computed attribute",
                    format!("The attribute {name:?} is set by the data source and cannot be configured."),
                ))
            }
            Some(value) => validate_value(attribute, value, &child, diagnostics),
        }
    }
}

fn validate_value(
    attribute: &Attribute,
    value: &Value,
    path: &AttributePath,
    diagnostics: &mut Vec<Diagnostic>,
) {
    let type_ok = match (&attribute.kind, value) {
        (AttributeKind::String, Value::String(_)) => true,
        (AttributeKind::Bool, Value::Bool(_)) => true,
        (AttributeKind::Int64, Value::Number(n)) => {
            if n.as_i64().is_none() {
                diagnostics.push(Diagnostic::attribute_error(
                    path,
                    "Invalid attribute value",
                    format!("Value must be a whole number that fits in 64 bits, got: {n}"),
                ));
                return;
            }
            true
        }
        (AttributeKind::Float64, Value::Number(_)) => true,
        (AttributeKind::IntOrString, Value::String(_)) => true,
        (AttributeKind::IntOrString, Value::Number(n)) => {
            if !n.as_i64().is_some_and(|i| i32::try_from(i).is_ok()) {
                diagnostics.push(Diagnostic::attribute_error(
                    path,
                    "Invalid attribute value",
                    format!("Value must be a string or a whole number that fits in 32 bits, got: {n}"),
                ));
                return;
            }
            true
        }
        (AttributeKind::List { element }, Value::Array(items)) => {
            for (i, item) in items.iter().enumerate() {
                validate_element(element, item, &path.index(i), diagnostics);
            }
            true
        }
        (AttributeKind::Map { element }, Value::Object(entries)) => {
            for (key, item) in entries {
                validate_element(element, item, &path.key(key), diagnostics);
            }
            true
        }
        (AttributeKind::Object { attributes }, Value::Object(map)) => {
            validate_object(attributes, map, path, diagnostics);
            true
        }
        _ => false,
    };

    if !type_ok {
        diagnostics.push(type_mismatch(path, attribute.kind.type_name(), value));
        return;
    }

    for validator in &attribute.validators {
        if let Err(reason) = validator.check(value) {
            diagnostics.push(Diagnostic::attribute_error(
                path,
                "Invalid attribute value",
                format!("Attribute {path} {reason}"),
            ));
        }
    }
}

fn validate_element(
    element: &Attribute,
    value: &Value,
    path: &AttributePath,
    diagnostics: &mut Vec<Diagnostic>,
) {
    if value.is_null() {
        diagnostics.push(Diagnostic::attribute_error(
            path,
            "Null value found in collection",
            "Collection elements must not be null.",
        ));
        return;
    }
    validate_value(element, value, path, diagnostics);
}

fn type_mismatch(path: &AttributePath, expected: &str, value: &Value) -> Diagnostic {
    Diagnostic::attribute_error(
        path,
        "Incorrect attribute value type",
        format!("Expected {expected}, got {}.", json_type(value)),
    )
}

fn json_type(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "bool",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "list",
        Value::Object(_) => "object",
    }
}
