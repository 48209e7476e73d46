use crate::error::CliError;
use formatter::payload::{
    ApproveRequest, ApproveResponse, ErrorResponse, QueryRequest, QueryResponse,
};
use serde::Serialize;
use serde_json::Value as JsonValue;
use tracing::{debug, info, warn};

/// Client of the question-answering backend: `/query` turns a question into
/// SQL, `/approve` runs (or discards) it.
pub struct QaClient {
    http: reqwest::Client,
    base_url: String,
}

impl QaClient {
    pub fn new(base_url: &str) -> Self {
        Self {
            http: reqwest::Client::new(),
            base_url: base_url.trim_end_matches('/').to_string(),
        }
    }

    pub fn endpoint(&self, path: &str) -> String {
        format!("{}/{}", self.base_url, path.trim_start_matches('/'))
    }

    pub async fn submit_question(&self, question: &str) -> Result<QueryResponse, CliError> {
        info!("Submitting question to {}", self.base_url);
        let body = self
            .post(
                "query",
                &QueryRequest {
                    question: question.to_string(),
                },
            )
            .await?;
        serde_json::from_value(body).map_err(CliError::InputParse)
    }

    pub async fn approve(
        &self,
        session_id: &str,
        approve: bool,
    ) -> Result<ApproveResponse, CliError> {
        info!("Sending decision for session {session_id}: approve={approve}");
        let body = self
            .post(
                "approve",
                &ApproveRequest {
                    session_id: session_id.to_string(),
                    approve,
                },
            )
            .await?;
        Ok(ApproveResponse::from_body(body))
    }

    async fn post<T: Serialize>(&self, path: &str, payload: &T) -> Result<JsonValue, CliError> {
        let url = self.endpoint(path);
        debug!("POST {url}");

        let response = self.http.post(&url).json(payload).send().await?;
        let status = response.status();
        let text = response.text().await?;

        if !status.is_success() {
            warn!("Backend request to {url} failed with status: {status}");
            return Err(CliError::Backend {
                status: status.as_u16(),
                detail: error_detail(&text),
            });
        }

        Ok(serde_json::from_str(&text)?)
    }
}

/// Extracts `detail` from an error body, falling back to the raw text.
fn error_detail(body: &str) -> String {
    match serde_json::from_str::<ErrorResponse>(body) {
        Ok(err) => err.detail,
        Err(_) if body.trim().is_empty() => "no details provided".to_string(),
        Err(_) => body.trim().to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_endpoint_joins_paths() {
        let client = QaClient::new("http://localhost:8000/");
        assert_eq!(client.endpoint("query"), "http://localhost:8000/query");
        assert_eq!(client.endpoint("/approve"), "http://localhost:8000/approve");
    }

    #[test]
    fn test_error_detail() {
        assert_eq!(error_detail(r#"{"detail": "Session not found"}"#), "Session not found");
        assert_eq!(error_detail("Bad Gateway\n"), "Bad Gateway");
        assert_eq!(error_detail(""), "no details provided");
    }
}
