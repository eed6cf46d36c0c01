//! Parsing an external model's lineage answer.
//!
//! The answer is free text that should contain JSON, usually inside a
//! ```` ```json ```` fence. Nothing in it is trusted: the mapping entries are
//! handed to the normalizer unchanged.

use std::sync::LazyLock;

use regex::Regex;
use serde_json::Value;

static JSON_FENCE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?s)```json\r?\n(.*?)\r?\n```").unwrap());

/// Errors from parsing an oracle response.
#[derive(Debug, thiserror::Error)]
pub enum OracleError {
    /// The response holds no parseable JSON. `raw` is the full response text.
    #[error("Could not parse valid JSON from oracle response: {source}")]
    Unparseable {
        raw: String,
        #[source]
        source: serde_json::Error,
    },
}

impl OracleError {
    /// The offending response text.
    pub fn raw(&self) -> &str {
        match self {
            OracleError::Unparseable { raw, .. } => raw,
        }
    }
}

/// Structured content of an oracle response.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct OracleResponse {
    /// Raw mapping entries, in response order.
    pub mappings: Vec<Value>,
    /// A ready-made diagram document, if the oracle supplied one.
    pub diagram: Option<String>,
}

/// Parse an oracle response.
///
/// A top-level object contributes its `mappings` array and optional
/// `diagram`; a top-level array is the mapping list itself. Any other JSON
/// value yields no mappings.
pub fn parse_response(text: &str) -> Result<OracleResponse, OracleError> {
    let body = JSON_FENCE
        .captures(text)
        .and_then(|cap| cap.get(1))
        .map_or(text, |m| m.as_str());

    let data: Value = serde_json::from_str(body.trim()).map_err(|source| {
        tracing::error!(error = %source, "failed to decode JSON from oracle response");
        tracing::debug!(response = text, "unparseable oracle response");
        OracleError::Unparseable {
            raw: text.to_string(),
            source,
        }
    })?;

    let response = match data {
        Value::Array(items) => OracleResponse {
            mappings: items,
            diagram: None,
        },
        Value::Object(mut object) => {
            let mappings = match object.remove("mappings") {
                Some(Value::Array(items)) => items,
                Some(other) => {
                    tracing::warn!(value = %other, "oracle 'mappings' is not a list, ignoring");
                    Vec::new()
                }
                None => Vec::new(),
            };
            OracleResponse {
                mappings,
                diagram: object.remove("diagram").and_then(diagram_text),
            }
        }
        other => {
            tracing::warn!(value = %other, "oracle response is neither an object nor a list");
            OracleResponse::default()
        }
    };

    tracing::info!(
        mappings = response.mappings.len(),
        diagram = response.diagram.is_some(),
        "parsed oracle response"
    );
    Ok(response)
}

fn diagram_text(value: Value) -> Option<String> {
    let text = match value {
        Value::String(s) => s,
        Value::Array(parts) => parts
            .iter()
            .map(|part| match part {
                Value::String(s) => s.clone(),
                other => other.to_string(),
            })
            .collect::<Vec<_>>()
            .join("\n"),
        Value::Null => return None,
        other => other.to_string(),
    };
    (!text.is_empty()).then_some(text)
}
