//! JSON schema to attribute tree conversion

use std::collections::BTreeMap;

use schemars::schema::{InstanceType, Schema, SchemaObject, SingleOrVec};
use serde_json::Value;

use super::{Attribute, AttributeKind, Validator};

const INT_OR_STRING: &str = "x-kubernetes-int-or-string";

pub(super) struct Converter<'a> {
    definitions: &'a schemars::Map<String, Schema>,
}

impl<'a> Converter<'a> {
    pub(super) fn new(definitions: &'a schemars::Map<String, Schema>) -> Self {
        Self { definitions }
    }

    /// Attributes of an object schema
    pub(super) fn object_attributes(
        &self,
        schema: &SchemaObject,
        path: &str,
    ) -> Result<BTreeMap<String, Attribute>, String> {
        let schema = self.resolve(schema, path)?;
        let Some(object) = schema.object.as_ref() else {
            return Err(format!("{}: expected an object schema", display(path)));
        };

        object
            .properties
            .iter()
            .map(|(name, property)| {
                let child = join(path, name);
                let required = object.required.contains(name);
                self.attribute(property, required, &child)
                    .map(|attr| (name.clone(), attr))
            })
            .collect()
    }

    fn attribute(&self, schema: &Schema, required: bool, path: &str) -> Result<Attribute, String> {
        let Schema::Object(outer) = schema else {
            return Err(format!("{}: boolean schemas are not supported", display(path)));
        };
        let description = describe(outer);
        let inner = self.resolve(outer, path)?;

        let mut validators = Vec::new();
        let kind = self.kind(inner, path, &mut validators)?;

        let mut attr = Attribute::new(kind, required);
        attr.description = description.or_else(|| describe(inner)).unwrap_or_default();
        attr.validators = validators;
        Ok(attr)
    }

    fn kind(
        &self,
        schema: &SchemaObject,
        path: &str,
        validators: &mut Vec<Validator>,
    ) -> Result<AttributeKind, String> {
        if schema.extensions.get(INT_OR_STRING) == Some(&Value::Bool(true)) {
            return Ok(AttributeKind::IntOrString);
        }

        if let Some(values) = enum_values(schema) {
            validators.push(Validator::OneOf { values });
            return Ok(AttributeKind::String);
        }

        let instance_type = match &schema.instance_type {
            Some(SingleOrVec::Single(t)) => Some(**t),
            Some(SingleOrVec::Vec(types)) => {
                types.iter().copied().find(|t| *t != InstanceType::Null)
            }
            None => None,
        };

        match instance_type {
            Some(InstanceType::String) => {
                string_validators(schema, validators).map_err(|e| format!("{}: {e}", display(path)))?;
                Ok(AttributeKind::String)
            }
            Some(InstanceType::Boolean) => Ok(AttributeKind::Bool),
            Some(InstanceType::Integer) => {
                number_validators(schema, validators);
                Ok(AttributeKind::Int64)
            }
            Some(InstanceType::Number) => {
                number_validators(schema, validators);
                Ok(AttributeKind::Float64)
            }
            Some(InstanceType::Array) => {
                let items = schema.array.as_ref().and_then(|a| a.items.as_ref());
                let Some(SingleOrVec::Single(item)) = items else {
                    return Err(format!("{}: list without a single item schema", display(path)));
                };
                let element = self.attribute(item, false, path)?;
                Ok(AttributeKind::List {
                    element: Box::new(element),
                })
            }
            Some(InstanceType::Object) => {
                let object = schema.object.as_ref();
                let has_properties = object.is_some_and(|o| !o.properties.is_empty());
                let additional = object.and_then(|o| o.additional_properties.as_deref());
                match additional {
                    Some(value_schema) if !has_properties => {
                        let element = self.attribute(value_schema, false, path)?;
                        Ok(AttributeKind::Map {
                            element: Box::new(element),
                        })
                    }
                    _ => Ok(AttributeKind::Object {
                        attributes: self.object_attributes(schema, path)?,
                    }),
                }
            }
            Some(InstanceType::Null) | None => {
                Err(format!("{}: schema has no usable type", display(path)))
            }
        }
    }

    /// Follow `$ref` and single-element `allOf` wrappers to the concrete schema
    fn resolve<'s>(&'s self, schema: &'s SchemaObject, path: &str) -> Result<&'s SchemaObject, String>
    where
        'a: 's,
    {
        if let Some(reference) = &schema.reference {
            let name = reference.rsplit('/').next().unwrap_or(reference);
            return match self.definitions.get(name) {
                Some(Schema::Object(target)) => self.resolve(target, path),
                _ => Err(format!("{}: unresolved reference {reference}", display(path))),
            };
        }

        if let Some(all_of) = schema.subschemas.as_ref().and_then(|s| s.all_of.as_ref()) {
            if let [Schema::Object(single)] = all_of.as_slice() {
                return self.resolve(single, path);
            }
        }

        Ok(schema)
    }
}

fn describe(schema: &SchemaObject) -> Option<String> {
    let metadata = schema.metadata.as_ref()?;
    metadata
        .description
        .clone()
        .or_else(|| metadata.title.clone())
}

/// String values of an enumeration, either inline or as a `oneOf` of
/// single-value enumerations (the shape used when variants are documented).
fn enum_values(schema: &SchemaObject) -> Option<Vec<String>> {
    if let Some(values) = &schema.enum_values {
        return values.iter().map(|v| v.as_str().map(str::to_string)).collect();
    }

    let one_of = schema.subschemas.as_ref()?.one_of.as_ref()?;
    let mut values = Vec::new();
    for variant in one_of {
        let Schema::Object(variant) = variant else {
            return None;
        };
        for value in variant.enum_values.as_ref()? {
            values.push(value.as_str()?.to_string());
        }
    }
    Some(values)
}

fn string_validators(schema: &SchemaObject, validators: &mut Vec<Validator>) -> Result<(), String> {
    let Some(string) = schema.string.as_ref() else {
        return Ok(());
    };
    if string.min_length.is_some() || string.max_length.is_some() {
        validators.push(Validator::LengthBetween {
            min: string.min_length,
            max: string.max_length,
        });
    }
    if let Some(pattern) = &string.pattern {
        validators.push(Validator::regex(pattern.as_str()).map_err(|e| e.to_string())?);
    }
    Ok(())
}

fn number_validators(schema: &SchemaObject, validators: &mut Vec<Validator>) {
    if let Some(number) = schema.number.as_ref() {
        if number.minimum.is_some() || number.maximum.is_some() {
            validators.push(Validator::Between {
                min: number.minimum,
                max: number.maximum,
            });
        }
    }
}

fn join(path: &str, name: &str) -> String {
    if path.is_empty() {
        name.to_string()
    } else {
        format!("{path}.{name}")
    }
}

fn display(path: &str) -> &str {
    if path.is_empty() {
        "<root>"
    } else {
        path
    }
}
