//! Runs the ciliumform binary end to end

use std::io::Write;
use std::process::{Command, Output, Stdio};

use rstest::rstest;

const CCNP: &str = "k8s_cilium_io_cilium_clusterwide_network_policy_v2_manifest";

fn ciliumform(args: &[&str], stdin: &str) -> Output {
    let mut child = Command::new(env!("CARGO_BIN_EXE_ciliumform"))
        .args(args)
        .env("RUST_LOG", "warn")
        .stdin(Stdio::piped())
        .stdout(Stdio::piped())
        .stderr(Stdio::piped())
        .spawn()
        .expect("spawn ciliumform");
    child
        .stdin
        .take()
        .expect("stdin")
        .write_all(stdin.as_bytes())
        .expect("write stdin");
    child.wait_with_output().expect("wait for ciliumform")
}

fn config_file(content: &str) -> tempfile::NamedTempFile {
    let mut file = tempfile::NamedTempFile::new().expect("temp file");
    file.write_all(content.as_bytes()).expect("write config");
    file
}

#[test]
fn render_prints_manifest() {
    let file = config_file(
        "metadata:\n  name: policy-1\nspec:\n  endpointSelector:\n    matchLabels:\n      app: web\n",
    );
    let path = file.path().to_str().expect("utf-8 path");
    let output = ciliumform(&["render", CCNP, "--config", path], "");
    assert!(output.status.success(), "{}", String::from_utf8_lossy(&output.stderr));

    let manifest: serde_yaml::Value =
        serde_yaml::from_slice(&output.stdout).expect("yaml on stdout");
    assert_eq!(manifest["apiVersion"], "cilium.io/v2");
    assert_eq!(manifest["kind"], "CiliumClusterwideNetworkPolicy");
    assert_eq!(manifest["metadata"]["name"], "policy-1");
    assert_eq!(manifest["spec"]["endpointSelector"]["matchLabels"]["app"], "web");
}

#[test]
fn render_reads_stdin() {
    let output = ciliumform(
        &["render", CCNP, "--config", "-"],
        r#"{"metadata": {"name": "from-stdin"}}"#,
    );
    assert!(output.status.success());
    assert!(String::from_utf8_lossy(&output.stdout).contains("name: from-stdin"));
}

#[rstest]
#[case::render("render")]
#[case::validate("validate")]
fn bad_cidr_exits_non_zero(#[case] command: &str) {
    let file = config_file("metadata:\n  name: p\nspec:\n  egress:\n    - toCIDR: [\"10.0.0.0/33\"]\n");
    let path = file.path().to_str().expect("utf-8 path");
    let output = ciliumform(&[command, CCNP, "--config", path], "");
    assert!(!output.status.success());
    assert!(output.stdout.is_empty());
    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(stderr.contains("spec.egress[0].toCIDR[0]"), "{stderr}");
}

#[test]
fn list_is_quiet_friendly() {
    let output = ciliumform(&["list", "--quiet"], "");
    assert!(output.status.success());
    let stdout = String::from_utf8_lossy(&output.stdout);
    assert_eq!(stdout.lines().count(), 4);
    assert!(stdout.lines().any(|l| l == CCNP));
}

#[test]
fn serve_answers_requests() {
    let input = concat!(
        r#"{"method": "GetMetadata"}"#,
        "\n",
        r#"{"method": "ReadDataSource", "typeName": "k8s_cilium_io_cilium_clusterwide_network_policy_v2_manifest", "config": {"metadata": {"name": "p"}}}"#,
        "\n",
    );
    let output = ciliumform(&["serve"], input);
    assert!(output.status.success());

    let responses: Vec<serde_json::Value> = String::from_utf8_lossy(&output.stdout)
        .lines()
        .map(|line| serde_json::from_str(line).expect("json response"))
        .collect();
    assert_eq!(responses.len(), 2);
    assert_eq!(responses[0]["metadata"]["typeName"], "k8s");
    assert!(responses[1]["state"]["yaml"]
        .as_str()
        .expect("yaml")
        .contains("kind: CiliumClusterwideNetworkPolicy"));
}
