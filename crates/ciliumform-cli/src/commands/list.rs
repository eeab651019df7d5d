//! List command

use clap::Args;

use super::provider;
use crate::Result;

#[derive(Args, Debug)]
pub struct ListArgs {
    /// Print only data source type names
    #[arg(long, short)]
    pub quiet: bool,
}

pub fn run(args: ListArgs) -> Result<()> {
    print!("{}", listing(&provider()?, args.quiet));
    Ok(())
}

/// Table of data sources with the resource each one renders
pub fn listing(provider: &ciliumform_provider::Provider, quiet: bool) -> String {
    let mut out = String::new();
    if quiet {
        for ds in provider.data_sources() {
            out.push_str(ds.type_name());
            out.push('\n');
        }
        return out;
    }

    let width = provider
        .data_sources()
        .map(|ds| ds.type_name().len())
        .max()
        .unwrap_or(0);
    out.push_str(&format!(
        "{:<width$}  {:<32}  {:<20}  {}\n",
        "DATA SOURCE", "KIND", "API VERSION", "SCOPE"
    ));
    for ds in provider.data_sources() {
        let resource = ds.resource();
        let scope = if ds.namespaced() { "Namespaced" } else { "Cluster" };
        out.push_str(&format!(
            "{:<width$}  {:<32}  {:<20}  {}\n",
            ds.type_name(),
            resource.kind,
            resource.api_version,
            scope
        ));
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn quiet_lists_type_names() {
        let out = listing(&provider().unwrap(), true);
        let names: Vec<&str> = out.lines().collect();
        assert_eq!(names.len(), 4);
        assert_eq!(names[0], "k8s_cilium_io_cilium_cidr_group_v2alpha1_manifest");
    }

    #[test]
    fn table_shows_kind_and_scope() {
        let out = listing(&provider().unwrap(), false);
        assert!(out.starts_with("DATA SOURCE"));
        let line = out
            .lines()
            .find(|l| l.starts_with("k8s_cilium_io_cilium_network_policy_v2_manifest"))
            .unwrap();
        assert!(line.contains("CiliumNetworkPolicy"));
        assert!(line.contains("cilium.io/v2"));
        assert!(line.ends_with("Namespaced"));
    }
}
