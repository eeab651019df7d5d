//! Line-delimited JSON request loop
//!
//! Each input line is one request tagged by `method`; each output line is one
//! response. A line that does not parse gets an error response and the loop
//! keeps going. End of input ends the loop.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};
use serde_json::Value;
use tokio::io::{self, AsyncBufRead, AsyncBufReadExt, AsyncWrite, AsyncWriteExt};
use tracing::{debug, info};

use crate::diagnostic::Diagnostic;
use crate::provider::{Provider, ProviderMetadata};
use crate::schema::Schema;

/// Request from the host
#[derive(Clone, Debug, Deserialize)]
#[serde(tag = "method")]
pub enum Request {
    /// Provider type name and data source names
    GetMetadata,
    /// One schema, or every schema when `typeName` is omitted
    GetSchema {
        /// Data source type name
        #[serde(rename = "typeName", default)]
        type_name: Option<String>,
    },
    /// Check a configuration without reading
    ValidateDataSourceConfig {
        /// Data source type name
        #[serde(rename = "typeName")]
        type_name: String,
        /// Configuration value
        #[serde(default)]
        config: Value,
    },
    /// Validate and read
    ReadDataSource {
        /// Data source type name
        #[serde(rename = "typeName")]
        type_name: String,
        /// Configuration value
        #[serde(default)]
        config: Value,
    },
}

impl Request {
    fn method(&self) -> &'static str {
        match self {
            Self::GetMetadata => "GetMetadata",
            Self::GetSchema { .. } => "GetSchema",
            Self::ValidateDataSourceConfig { .. } => "ValidateDataSourceConfig",
            Self::ReadDataSource { .. } => "ReadDataSource",
        }
    }
}

/// Response to one request
#[derive(Debug, Default, Serialize)]
pub struct Response<'a> {
    /// Set for `GetMetadata`
    #[serde(skip_serializing_if = "Option::is_none")]
    pub metadata: Option<ProviderMetadata>,
    /// Set for `GetSchema`
    #[serde(skip_serializing_if = "Option::is_none")]
    pub schemas: Option<BTreeMap<String, &'a Schema>>,
    /// Set for a successful `ReadDataSource`
    #[serde(skip_serializing_if = "Option::is_none")]
    pub state: Option<Value>,
    /// Problems found; always present
    pub diagnostics: Vec<Diagnostic>,
}

impl Response<'_> {
    fn from_diagnostics(diagnostics: Vec<Diagnostic>) -> Self {
        Self {
            diagnostics,
            ..Self::default()
        }
    }
}

/// Answer one request
pub fn handle(provider: &Provider, request: Request) -> Response<'_> {
    match request {
        Request::GetMetadata => Response {
            metadata: Some(provider.metadata()),
            ..Response::default()
        },
        Request::GetSchema { type_name: None } => Response {
            schemas: Some(
                provider
                    .schemas()
                    .into_iter()
                    .map(|(name, schema)| (name.to_string(), schema))
                    .collect(),
            ),
            ..Response::default()
        },
        Request::GetSchema {
            type_name: Some(type_name),
        } => match provider.data_source_schema(&type_name) {
            Ok(schema) => Response {
                schemas: Some(BTreeMap::from([(type_name, schema)])),
                ..Response::default()
            },
            Err(err) => Response::from_diagnostics(vec![err.into()]),
        },
        Request::ValidateDataSourceConfig { type_name, config } => {
            Response::from_diagnostics(provider.validate_data_source_config(&type_name, &config))
        }
        Request::ReadDataSource { type_name, config } => {
            let result = provider.read_data_source(&type_name, config);
            Response {
                state: result.state,
                diagnostics: result.diagnostics,
                ..Response::default()
            }
        }
    }
}

/// Parse and answer one request line, returning the response line
pub fn handle_line(provider: &Provider, line: &str) -> String {
    let response = match serde_json::from_str::<Request>(line) {
        Ok(request) => {
            debug!(method = request.method(), "handling request");
            handle(provider, request)
        }
        Err(err) => return invalid_request(format!("request could not be parsed: {err}")),
    };
    encode(&response)
}

fn invalid_request(detail: String) -> String {
    encode(&Response::from_diagnostics(vec![Diagnostic::error(
        "Invalid request",
        detail,
    )]))
}

fn encode(response: &Response<'_>) -> String {
    serde_json::to_string(response).unwrap_or_else(|err| {
        serde_json::json!({
            "diagnostics": [Diagnostic::error("Unable to encode response", err.to_string())]
        })
        .to_string()
    })
}

/// Serve requests from `reader` until end of input, writing responses to `writer`
pub async fn serve<R, W>(provider: &Provider, mut reader: R, mut writer: W) -> io::Result<()>
where
    R: AsyncBufRead + Unpin,
    W: AsyncWrite + Unpin,
{
    let mut buf = Vec::new();
    let mut handled = 0usize;
    loop {
        buf.clear();
        if reader.read_until(b'\n', &mut buf).await? == 0 {
            break;
        }
        let response = match std::str::from_utf8(&buf) {
            Ok(line) if line.trim().is_empty() => continue,
            Ok(line) => handle_line(provider, line.trim_end_matches(['\n', '\r'])),
            Err(err) => invalid_request(format!("request is not valid UTF-8: {err}")),
        };
        writer.write_all(response.as_bytes()).await?;
        writer.write_all(b"\n").await?;
        writer.flush().await?;
        handled += 1;
    }
    info!(requests = handled, "input closed");
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    const CNP: &str = "k8s_cilium_io_cilium_network_policy_v2_manifest";

    fn call(provider: &Provider, request: Value) -> Value {
        serde_json::from_str(&handle_line(provider, &request.to_string())).unwrap()
    }

    #[test]
    fn get_metadata() {
        let provider = Provider::new().unwrap();
        let response = call(&provider, json!({"method": "GetMetadata"}));
        assert_eq!(response["metadata"]["typeName"], "k8s");
        assert_eq!(response["metadata"]["dataSources"].as_array().unwrap().len(), 4);
        assert_eq!(response["diagnostics"], json!([]));
    }

    #[test]
    fn get_one_schema() {
        let provider = Provider::new().unwrap();
        let response = call(&provider, json!({"method": "GetSchema", "typeName": CNP}));
        let schemas = response["schemas"].as_object().unwrap();
        assert_eq!(schemas.len(), 1);
        assert_eq!(schemas[CNP]["attributes"]["yaml"]["computed"], true);
    }

    #[test]
    fn get_all_schemas() {
        let provider = Provider::new().unwrap();
        let response = call(&provider, json!({"method": "GetSchema"}));
        assert_eq!(response["schemas"].as_object().unwrap().len(), 4);
    }

    #[test]
    fn unknown_schema_is_diagnostic() {
        let provider = Provider::new().unwrap();
        let response = call(&provider, json!({"method": "GetSchema", "typeName": "nope"}));
        assert!(response.get("schemas").is_none());
        assert_eq!(response["diagnostics"][0]["severity"], "error");
    }

    #[test]
    fn read_and_validate() {
        let provider = Provider::new().unwrap();
        let config = json!({"metadata": {"name": "web", "namespace": "prod"}});

        let response = call(
            &provider,
            json!({"method": "ValidateDataSourceConfig", "typeName": CNP, "config": config}),
        );
        assert_eq!(response, json!({"diagnostics": []}));

        let response = call(
            &provider,
            json!({"method": "ReadDataSource", "typeName": CNP, "config": config}),
        );
        let yaml = response["state"]["yaml"].as_str().unwrap();
        assert!(yaml.contains("kind: CiliumNetworkPolicy"));
        assert!(yaml.contains("namespace: prod"));
    }

    #[test]
    fn malformed_line_is_diagnostic() {
        let provider = Provider::empty();
        let response: Value =
            serde_json::from_str(&handle_line(&provider, "{not json")).unwrap();
        assert_eq!(response["diagnostics"][0]["summary"], "Invalid request");

        let response = call(&provider, json!({"method": "Apply"}));
        assert_eq!(response["diagnostics"][0]["summary"], "Invalid request");
    }

    #[tokio::test]
    async fn serve_survives_non_utf8_lines() {
        let provider = Provider::new().unwrap();
        let mut input = b"\xff\xfe\n".to_vec();
        input.extend_from_slice(b"{\"method\": \"GetMetadata\"}\r\n");
        let mut output = Vec::new();
        serve(&provider, input.as_slice(), &mut output).await.unwrap();

        let lines: Vec<Value> = String::from_utf8(output)
            .unwrap()
            .lines()
            .map(|l| serde_json::from_str(l).unwrap())
            .collect();
        assert_eq!(lines.len(), 2);
        assert_eq!(lines[0]["diagnostics"][0]["summary"], "Invalid request");
        assert!(lines[0]["diagnostics"][0]["detail"]
            .as_str()
            .unwrap()
            .contains("UTF-8"));
        assert_eq!(lines[1]["metadata"]["typeName"], "k8s");
    }

    #[tokio::test]
    async fn serve_answers_each_line() {
        let provider = Provider::new().unwrap();
        let input = format!(
            "{}\n\ngarbage\n{}\n",
            json!({"method": "GetMetadata"}),
            json!({"method": "ReadDataSource", "typeName": CNP, "config": {"metadata": {"name": "x"}}})
        );
        let mut output = Vec::new();
        serve(&provider, input.as_bytes(), &mut output).await.unwrap();

        let lines: Vec<Value> = String::from_utf8(output)
            .unwrap()
            .lines()
            .map(|l| serde_json::from_str(l).unwrap())
            .collect();
        assert_eq!(lines.len(), 3);
        assert!(lines[0].get("metadata").is_some());
        assert_eq!(lines[1]["diagnostics"][0]["summary"], "Invalid request");
        assert!(lines[2].get("state").is_none());
        assert_eq!(
            lines[2]["diagnostics"][0]["attribute"],
            "metadata.namespace"
        );
    }
}
