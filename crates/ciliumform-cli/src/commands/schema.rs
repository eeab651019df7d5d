//! Schema command

use clap::Args;

use super::provider;
use crate::Result;

#[derive(Args, Debug)]
pub struct SchemaArgs {
    /// Data source type name (prints every schema when omitted)
    pub type_name: Option<String>,
}

pub fn run(args: SchemaArgs) -> Result<()> {
    println!("{}", schema_json(&provider()?, args.type_name.as_deref())?);
    Ok(())
}

/// Pretty JSON of one schema, or of every schema keyed by type name
pub fn schema_json(
    provider: &ciliumform_provider::Provider,
    type_name: Option<&str>,
) -> Result<String> {
    let json = match type_name {
        Some(name) => serde_json::to_string_pretty(provider.data_source_schema(name)?)?,
        None => serde_json::to_string_pretty(&provider.schemas())?,
    };
    Ok(json)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::Error;
    use serde_json::Value;

    #[test]
    fn one_schema() {
        let json = schema_json(
            &provider().unwrap(),
            Some("k8s_cilium_io_cilium_egress_gateway_policy_v2_manifest"),
        )
        .unwrap();
        let value: Value = serde_json::from_str(&json).unwrap();
        assert!(value["description"]
            .as_str()
            .unwrap()
            .contains("CiliumEgressGatewayPolicy"));
        assert_eq!(value["attributes"]["spec"]["required"], true);
    }

    #[test]
    fn every_schema() {
        let json = schema_json(&provider().unwrap(), None).unwrap();
        let value: Value = serde_json::from_str(&json).unwrap();
        assert_eq!(value.as_object().unwrap().len(), 4);
    }

    #[test]
    fn unknown_type_name() {
        let err = schema_json(&provider().unwrap(), Some("k8s_v1_pod_manifest")).unwrap_err();
        assert!(matches!(err, Error::Provider(_)));
        assert!(err.to_string().contains("k8s_v1_pod_manifest"));
    }
}
