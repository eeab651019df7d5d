//! Manifest data sources
//!
//! Every Cilium kind shares one read handler, parameterized over the model
//! type. Reading decodes the configuration into the model, stamps `apiVersion`
//! and `kind`, and stores the rendered YAML in the computed `yaml` attribute.

use std::marker::PhantomData;

use ciliumform_common::yaml::{prune_nulls, to_yaml};
use ciliumform_common::YAML_ATTRIBUTE;
use ciliumform_crd::Manifest;
use kube::core::ApiResource;
use serde_json::{Map, Value};
use tracing::debug;

use crate::schema::Schema;
use crate::{Error, Result};

/// A read-only data source
pub trait DataSource: Send + Sync {
    /// Type name the host addresses this data source by
    fn type_name(&self) -> &str;

    /// Schema of the configuration and state
    fn schema(&self) -> &Schema;

    /// Kubernetes identity of the rendered resource
    fn resource(&self) -> &ApiResource;

    /// Whether the rendered resource lives in a namespace
    fn namespaced(&self) -> bool;

    /// Compute the state for a configuration.
    ///
    /// The configuration is expected to have passed validation; decode
    /// failures are still reported as errors rather than panics.
    fn read(&self, config: Value) -> Result<Value>;
}

/// Data source rendering one manifest kind
pub struct ManifestDataSource<T> {
    type_name: String,
    schema: Schema,
    resource: ApiResource,
    _manifest: PhantomData<fn() -> T>,
}

impl<T: Manifest> ManifestDataSource<T> {
    /// Build the data source, deriving its schema from the model
    pub fn new() -> Result<Self> {
        Ok(Self {
            type_name: T::data_source_type_name(),
            schema: Schema::for_manifest::<T>()?,
            resource: T::api_resource(),
            _manifest: PhantomData,
        })
    }

    /// Decode a configuration into the model and render it.
    pub fn render(&self, config: &Map<String, Value>) -> Result<String> {
        let mut input = config.clone();
        input.remove(YAML_ATTRIBUTE);
        let input = prune_nulls(Value::Object(input));

        let mut manifest: T = serde_json::from_value(input)
            .map_err(|e| Error::decode_for_kind(T::KIND, e.to_string()))?;
        manifest.stamp();
        let yaml = to_yaml(&manifest, T::KIND)?;

        debug!(
            data_source = %self.type_name,
            name = manifest.name(),
            bytes = yaml.len(),
            "rendered manifest"
        );
        Ok(yaml)
    }
}

impl<T: Manifest> DataSource for ManifestDataSource<T> {
    fn type_name(&self) -> &str {
        &self.type_name
    }

    fn schema(&self) -> &Schema {
        &self.schema
    }

    fn resource(&self) -> &ApiResource {
        &self.resource
    }

    fn namespaced(&self) -> bool {
        T::NAMESPACED
    }

    fn read(&self, config: Value) -> Result<Value> {
        let mut state = match config {
            Value::Object(map) => map,
            Value::Null => Map::new(),
            other => {
                return Err(Error::decode_for_kind(
                    T::KIND,
                    format!("configuration must be an object, got: {other}"),
                ))
            }
        };
        let yaml = self.render(&state)?;
        state.insert(YAML_ATTRIBUTE.to_string(), Value::String(yaml));
        Ok(Value::Object(state))
    }
}
