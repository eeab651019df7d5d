//! Data source registry
//!
//! The provider owns one data source per Cilium kind and routes metadata,
//! schema, validation and read requests to them by type name.

use std::collections::BTreeMap;

use ciliumform_common::PROVIDER_TYPE_NAME;
use ciliumform_crd::{
    CiliumCidrGroup, CiliumClusterwideNetworkPolicy, CiliumEgressGatewayPolicy,
    CiliumNetworkPolicy,
};
use serde::Serialize;
use serde_json::Value;
use tracing::{debug, info, warn};

use crate::data_source::{DataSource, ManifestDataSource};
use crate::diagnostic::{has_errors, Diagnostic};
use crate::schema::Schema;
use crate::validate::{coerce_config, validate_config};
use crate::{Error, Result};

/// Provider description returned to the host
#[derive(Clone, Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ProviderMetadata {
    /// Provider type name
    pub type_name: String,
    /// Registered data source type names, sorted
    pub data_sources: Vec<String>,
}

/// Outcome of a read
#[derive(Clone, Debug, Default, Serialize)]
pub struct ReadResult {
    /// New state; absent when the read failed
    #[serde(skip_serializing_if = "Option::is_none")]
    pub state: Option<Value>,
    /// Problems found
    pub diagnostics: Vec<Diagnostic>,
}

impl ReadResult {
    fn failed(diagnostics: Vec<Diagnostic>) -> Self {
        Self {
            state: None,
            diagnostics,
        }
    }
}

/// Registry of data sources
#[derive(Default)]
pub struct Provider {
    data_sources: BTreeMap<String, Box<dyn DataSource>>,
}

impl Provider {
    /// Provider with every Cilium manifest data source registered
    pub fn new() -> Result<Self> {
        let mut provider = Self::empty();
        provider.register(ManifestDataSource::<CiliumNetworkPolicy>::new()?);
        provider.register(ManifestDataSource::<CiliumClusterwideNetworkPolicy>::new()?);
        provider.register(ManifestDataSource::<CiliumCidrGroup>::new()?);
        provider.register(ManifestDataSource::<CiliumEgressGatewayPolicy>::new()?);
        info!(data_sources = provider.data_sources.len(), "provider ready");
        Ok(provider)
    }

    /// Provider with no data sources
    pub fn empty() -> Self {
        Self::default()
    }

    /// Register a data source, replacing any with the same type name
    pub fn register(&mut self, data_source: impl DataSource + 'static) {
        let type_name = data_source.type_name().to_string();
        if self
            .data_sources
            .insert(type_name.clone(), Box::new(data_source))
            .is_some()
        {
            warn!(data_source = %type_name, "replaced existing data source");
        }
    }

    /// Provider type name and registered data sources
    pub fn metadata(&self) -> ProviderMetadata {
        ProviderMetadata {
            type_name: PROVIDER_TYPE_NAME.to_string(),
            data_sources: self.data_sources.keys().cloned().collect(),
        }
    }

    /// Look up a data source
    pub fn data_source(&self, type_name: &str) -> Result<&dyn DataSource> {
        self.data_sources
            .get(type_name)
            .map(|ds| &**ds)
            .ok_or_else(|| Error::unknown_data_source(type_name))
    }

    /// Every data source, sorted by type name
    pub fn data_sources(&self) -> impl Iterator<Item = &dyn DataSource> {
        self.data_sources.values().map(|ds| &**ds)
    }

    /// Schema of one data source
    pub fn data_source_schema(&self, type_name: &str) -> Result<&Schema> {
        Ok(self.data_source(type_name)?.schema())
    }

    /// Schemas of every data source, by type name
    pub fn schemas(&self) -> BTreeMap<&str, &Schema> {
        self.data_sources
            .iter()
            .map(|(name, ds)| (name.as_str(), ds.schema()))
            .collect()
    }

    /// Validate a configuration without reading
    pub fn validate_data_source_config(&self, type_name: &str, config: &Value) -> Vec<Diagnostic> {
        match self.data_source(type_name) {
            Ok(ds) => {
                let config = coerce_config(ds.schema(), config.clone());
                let diagnostics = validate_config(ds.schema(), &config);
                debug!(
                    data_source = type_name,
                    diagnostics = diagnostics.len(),
                    "validated configuration"
                );
                diagnostics
            }
            Err(err) => vec![err.into()],
        }
    }

    /// Validate a configuration and, when it is valid, read the data source
    pub fn read_data_source(&self, type_name: &str, config: Value) -> ReadResult {
        let ds = match self.data_source(type_name) {
            Ok(ds) => ds,
            Err(err) => return ReadResult::failed(vec![err.into()]),
        };

        let config = coerce_config(ds.schema(), config);
        let diagnostics = validate_config(ds.schema(), &config);
        if has_errors(&diagnostics) {
            debug!(
                data_source = type_name,
                diagnostics = diagnostics.len(),
                "configuration rejected"
            );
            return ReadResult::failed(diagnostics);
        }

        match ds.read(config) {
            Ok(state) => ReadResult {
                state: Some(state),
                diagnostics,
            },
            Err(err) => {
                warn!(data_source = type_name, error = %err, "read failed");
                let mut diagnostics = diagnostics;
                diagnostics.push(err.into());
                ReadResult::failed(diagnostics)
            }
        }
    }
}
