//! Wire types of the SQL question-answering backend and the decode step that
//! turns its result fields into a JSON row grid.

use model::core::column::ColumnKind;
use pyrepr_syntax::parse_repr;
use serde::{Deserialize, Serialize};
use serde_json::{Value as JsonValue, json};
use tracing::{debug, error, warn};

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct QueryRequest {
    pub question: String,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct QueryResponse {
    pub session_id: Option<String>,
    pub query: String,
    #[serde(default)]
    pub message: String,
}

impl QueryResponse {
    /// The backend answers refused questions with a SQL comment instead of a
    /// statement; those have nothing to approve.
    pub fn needs_approval(&self) -> bool {
        self.session_id.is_some() && !self.query.trim_start().starts_with("--")
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ApproveRequest {
    pub session_id: String,
    pub approve: bool,
}

/// Result envelope returned on approval. Also accepted as input by the
/// renderer, with the optional `query` carrying the SQL text.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct ApproveResponse {
    #[serde(default)]
    pub result: JsonValue,
    #[serde(default)]
    pub answer: Option<String>,
    /// JSON-encoded row grid, preferred over `result` when present.
    #[serde(default)]
    pub result_data: Option<String>,
    #[serde(default)]
    pub query: Option<String>,
    /// Database type names per column, when the backend reports them.
    #[serde(default)]
    pub column_types: Option<Vec<String>>,
}

impl ApproveResponse {
    /// Accepts either an envelope object or a bare row grid.
    pub fn from_body(body: JsonValue) -> Self {
        match body {
            JsonValue::Object(_) => match serde_json::from_value::<ApproveResponse>(body.clone()) {
                Ok(response) => response,
                Err(err) => {
                    warn!("Unrecognized response envelope, treating it as the result: {err}");
                    ApproveResponse {
                        result: body,
                        ..Default::default()
                    }
                }
            },
            other => ApproveResponse {
                result: other,
                ..Default::default()
            },
        }
    }

    pub fn rows(&self) -> JsonValue {
        decode_result_payload(self.result_data.as_deref(), &self.result)
    }

    pub fn column_kinds(&self) -> Vec<ColumnKind> {
        self.column_types
            .as_deref()
            .unwrap_or_default()
            .iter()
            .map(|name| ColumnKind::from_sql_type(name))
            .collect()
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ErrorResponse {
    pub detail: String,
}

/// Chooses and decodes the result grid of a response. Never fails.
///
/// `result_data` wins when it parses as JSON; a non-array there means no
/// rows. Otherwise `raw` is decoded by [`decode_raw_result`].
pub fn decode_result_payload(result_data: Option<&str>, raw: &JsonValue) -> JsonValue {
    match result_data {
        Some(data) => match serde_json::from_str::<JsonValue>(data) {
            Ok(parsed @ JsonValue::Array(_)) => {
                debug!("Using structured result_data");
                return parsed;
            }
            Ok(_) => {
                warn!("result_data is not an array, showing no rows");
                return json!([]);
            }
            Err(err) => {
                error!("Error parsing result_data: {err}");
                debug!("Falling back to parsing raw result");
            }
        },
        None => debug!("No result_data available, parsing raw result"),
    }

    decode_raw_result(raw)
}

/// Decodes the free-form `result` field: arrays as-is, bracketed strings as
/// JSON or else as a Python repr, other scalars wrapped as a single cell.
pub fn decode_raw_result(raw: &JsonValue) -> JsonValue {
    match raw {
        JsonValue::Array(_) => raw.clone(),
        JsonValue::Null => json!([]),
        JsonValue::String(text) if text.trim_start().starts_with('[') => {
            if let Ok(parsed) = serde_json::from_str::<JsonValue>(text) {
                return parsed;
            }
            match parse_repr(text.trim()) {
                Ok(parsed) => parsed,
                Err(err) => {
                    error!("Error parsing result data: {err}");
                    json!([])
                }
            }
        }
        other => json!([[other]]),
    }
}
