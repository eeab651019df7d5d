//! Data source schemas
//!
//! A schema is a tree of typed attributes with help text and validators. The
//! tree for a manifest is derived from the model's JSON schema, so the model's
//! field docs and `#[schemars(...)]` constraints are the single source of both.

mod convert;
mod validator;

use std::collections::BTreeMap;

use ciliumform_common::YAML_ATTRIBUTE;
use ciliumform_crd::Manifest;
use schemars::gen::SchemaSettings;
use serde::Serialize;

pub use validator::Validator;

use crate::{Error, Result};

/// Value type of an attribute
#[derive(Clone, Debug, Serialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum AttributeKind {
    /// UTF-8 string
    String,
    /// Boolean
    Bool,
    /// 64-bit signed integer
    Int64,
    /// Floating point number
    Float64,
    /// Integer or string (`x-kubernetes-int-or-string`)
    IntOrString,
    /// Ordered list
    List {
        /// Element attribute
        element: Box<Attribute>,
    },
    /// String-keyed map
    Map {
        /// Value attribute
        element: Box<Attribute>,
    },
    /// Object with named attributes
    Object {
        /// Nested attributes
        attributes: BTreeMap<String, Attribute>,
    },
}

impl AttributeKind {
    /// Short type name for messages
    pub fn type_name(&self) -> &'static str {
        match self {
            Self::String => "string",
            Self::Bool => "bool",
            Self::Int64 => "int64",
            Self::Float64 => "float64",
            Self::IntOrString => "int or string",
            Self::List { .. } => "list",
            Self::Map { .. } => "map",
            Self::Object { .. } => "object",
        }
    }
}

/// One attribute in a schema
#[derive(Clone, Debug, Serialize)]
pub struct Attribute {
    /// Value type
    #[serde(flatten)]
    pub kind: AttributeKind,
    /// Help text
    #[serde(skip_serializing_if = "String::is_empty")]
    pub description: String,
    /// Must be set in configuration
    pub required: bool,
    /// May be set in configuration
    pub optional: bool,
    /// Set by the data source
    pub computed: bool,
    /// Constraints on the value
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub validators: Vec<Validator>,
}

impl Attribute {
    /// Configurable attribute
    pub fn new(kind: AttributeKind, required: bool) -> Self {
        Self {
            kind,
            description: String::new(),
            required,
            optional: !required,
            computed: false,
            validators: Vec::new(),
        }
    }

    /// Attribute only the data source sets
    pub fn computed(kind: AttributeKind) -> Self {
        Self {
            kind,
            description: String::new(),
            required: false,
            optional: false,
            computed: true,
            validators: Vec::new(),
        }
    }

    /// Set the help text
    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = description.into();
        self
    }

    /// Nested attributes, when this is an object
    pub fn attributes(&self) -> Option<&BTreeMap<String, Attribute>> {
        match &self.kind {
            AttributeKind::Object { attributes } => Some(attributes),
            _ => None,
        }
    }

    /// Element attribute, when this is a list or map
    pub fn element(&self) -> Option<&Attribute> {
        match &self.kind {
            AttributeKind::List { element } | AttributeKind::Map { element } => Some(element),
            _ => None,
        }
    }
}

/// Schema of one data source
#[derive(Clone, Debug, Serialize)]
pub struct Schema {
    /// Schema version
    pub version: i64,
    /// Help text for the data source
    pub description: String,
    /// Top-level attributes
    pub attributes: BTreeMap<String, Attribute>,
}

impl Schema {
    /// Build the schema of a manifest data source.
    ///
    /// Attributes come from the model's JSON schema; the computed `yaml`
    /// attribute holding the rendered manifest is added on top.
    pub fn for_manifest<T: Manifest>() -> Result<Self> {
        let type_name = T::data_source_type_name();
        let root = SchemaSettings::openapi3()
            .with(|s| {
                s.inline_subschemas = true;
                s.meta_schema = None;
            })
            .into_generator()
            .into_root_schema_for::<T>();

        let converter = convert::Converter::new(&root.definitions);
        let mut attributes = converter
            .object_attributes(&root.schema, "")
            .map_err(|message| Error::schema(&type_name, message))?;

        attributes.insert(
            YAML_ATTRIBUTE.to_string(),
            Attribute::computed(AttributeKind::String)
                .with_description("The generated manifest in YAML format."),
        );

        let description = format!(
            "Creates a YAML manifest for a {} ({}) object. {}",
            T::KIND,
            T::API_VERSION,
            root.schema
                .metadata
                .as_ref()
                .and_then(|m| m.description.clone())
                .unwrap_or_default()
        );

        Ok(Self {
            version: 0,
            description: description.trim_end().to_string(),
            attributes,
        })
    }

    /// Look up an attribute by dotted path (`spec.ingress.fromCIDR`).
    ///
    /// List and map elements are stepped through transparently.
    pub fn attribute(&self, path: &str) -> Option<&Attribute> {
        let mut segments = path.split('.');
        let mut current = self.attributes.get(segments.next()?)?;
        for segment in segments {
            while let Some(element) = current.element() {
                current = element;
            }
            current = current.attributes()?.get(segment)?;
        }
        Some(current)
    }
}
