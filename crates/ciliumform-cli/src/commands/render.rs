//! Render command

use std::path::PathBuf;

use ciliumform_common::YAML_ATTRIBUTE;
use ciliumform_provider::Provider;
use clap::Args;
use tracing::info;

use super::{load_config, provider, report};
use crate::{Error, Result};

#[derive(Args, Debug)]
pub struct RenderArgs {
    /// Data source type name
    pub type_name: String,

    /// Configuration file (YAML or JSON); `-` reads stdin
    #[arg(long, short)]
    pub config: PathBuf,
}

pub fn run(args: RenderArgs) -> Result<()> {
    let yaml = render(&provider()?, &args)?;
    print!("{yaml}");
    Ok(())
}

/// Validate and read the configuration, returning the rendered manifest
pub fn render(provider: &Provider, args: &RenderArgs) -> Result<String> {
    let config = load_config(&args.config)?;
    let result = provider.read_data_source(&args.type_name, config);
    report(&result.diagnostics)?;

    let yaml = result
        .state
        .as_ref()
        .and_then(|state| state.get(YAML_ATTRIBUTE))
        .and_then(|yaml| yaml.as_str())
        .ok_or_else(|| Error::validation("read produced no manifest"))?;
    info!(data_source = %args.type_name, "manifest rendered");
    Ok(yaml.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    fn args(type_name: &str, content: &str) -> (tempfile::NamedTempFile, RenderArgs) {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        file.write_all(content.as_bytes()).unwrap();
        let args = RenderArgs {
            type_name: type_name.to_string(),
            config: file.path().to_path_buf(),
        };
        (file, args)
    }

    #[test]
    fn renders_cidr_group() {
        let (_file, args) = args(
            "k8s_cilium_io_cilium_cidr_group_v2alpha1_manifest",
            "metadata:\n  name: office\nspec:\n  externalCIDRs:\n    - 203.0.113.0/24\n",
        );
        let yaml = render(&provider().unwrap(), &args).unwrap();
        assert_eq!(
            yaml,
            "apiVersion: cilium.io/v2alpha1\nkind: CiliumCIDRGroup\nmetadata:\n  name: office\nspec:\n  externalCIDRs:\n  - 203.0.113.0/24\n"
        );
    }

    #[test]
    fn unquoted_numbers_become_strings() {
        let (_file, args) = args(
            "k8s_cilium_io_cilium_network_policy_v2_manifest",
            "metadata:\n  name: web\n  namespace: default\n  labels:\n    version: 2\nspec:\n  ingress:\n    - toPorts:\n        - ports:\n            - port: 8080\n",
        );
        let yaml = render(&provider().unwrap(), &args).unwrap();
        assert!(yaml.contains("version: '2'"), "{yaml}");
        assert!(yaml.contains("port: '8080'"), "{yaml}");
    }

    #[test]
    fn invalid_config_does_not_render() {
        let (_file, args) = args(
            "k8s_cilium_io_cilium_cidr_group_v2alpha1_manifest",
            "metadata:\n  name: office\nspec:\n  externalCIDRs: [\"203.0.113.0/40\"]\n",
        );
        let err = render(&provider().unwrap(), &args).unwrap_err();
        assert!(matches!(err, Error::Validation { .. }));
    }

    #[test]
    fn unknown_type_fails() {
        let (_file, args) = args("k8s_nothing_v1_manifest", "metadata:\n  name: x\n");
        assert!(render(&provider().unwrap(), &args).is_err());
    }
}
