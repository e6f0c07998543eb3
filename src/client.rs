//! HTTP transport client for an OpenAI-compatible endpoint root.
//!
//! One `ApiClient` per endpoint root; the harness builds two (default and
//! CLI) and shares them read-only across scenarios. Requests authenticate
//! with a bearer API key. Only a connect timeout is configured — streamed
//! responses are never re-bounded by the harness.

use std::time::Duration;

use futures::Stream;
use reqwest::Client as HttpClient;

use crate::errors::CheckError;
use crate::streaming::parse_sse_stream;
use crate::types::{ChatCompletion, ChatCompletionChunk, ChatCompletionRequest, ModelInfo, ModelList};

/// TCP connection timeout.
const CONNECT_TIMEOUT: Duration = Duration::from_secs(5);

/// Client for one endpoint root of the service under test.
#[derive(Debug, Clone)]
pub struct ApiClient {
    http: HttpClient,
    base_url: String,
    api_key: String,
}

impl ApiClient {
    /// Build a client for the given endpoint root, e.g.
    /// `http://localhost:3000/v1`.
    pub fn new(base_url: impl Into<String>, api_key: impl Into<String>) -> Result<Self, CheckError> {
        let base_url = base_url.into();

        let http = HttpClient::builder()
            .connect_timeout(CONNECT_TIMEOUT)
            .build()
            .map_err(|e| CheckError::Connection {
                endpoint: base_url.clone(),
                reason: format!("failed to build HTTP client: {e}"),
            })?;

        Ok(Self {
            http,
            base_url,
            api_key: api_key.into(),
        })
    }

    /// The endpoint root this client talks to.
    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// `GET {base}/models` — list the models the endpoint serves.
    pub async fn list_models(&self) -> Result<Vec<ModelInfo>, CheckError> {
        let url = format!("{}/models", self.base_url);

        let response = self
            .http
            .get(&url)
            .bearer_auth(&self.api_key)
            .send()
            .await
            .map_err(|e| connection_error(&url, e))?;

        let body = read_success_body(response).await?;
        let list: ModelList = serde_json::from_str(&body).map_err(|e| CheckError::Shape {
            reason: format!("failed to parse model list: {e}"),
        })?;

        Ok(list.data)
    }

    /// `POST {base}/chat/completions` with `stream: false` — a single
    /// completed response.
    pub async fn chat_completion(
        &self,
        request: &ChatCompletionRequest,
    ) -> Result<ChatCompletion, CheckError> {
        let url = format!("{}/chat/completions", self.base_url);
        log_request(&url, request);

        let response = self
            .http
            .post(&url)
            .bearer_auth(&self.api_key)
            .json(request)
            .send()
            .await
            .map_err(|e| connection_error(&url, e))?;

        let body = read_success_body(response).await?;
        serde_json::from_str(&body).map_err(|e| CheckError::Shape {
            reason: format!("failed to parse chat completion: {e}"),
        })
    }

    /// `POST {base}/chat/completions` with `stream: true` — a lazy sequence
    /// of incremental chunks.
    pub async fn chat_completion_stream(
        &self,
        request: &ChatCompletionRequest,
    ) -> Result<impl Stream<Item = Result<ChatCompletionChunk, CheckError>> + Unpin, CheckError>
    {
        let url = format!("{}/chat/completions", self.base_url);
        log_request(&url, request);

        let response = self
            .http
            .post(&url)
            .bearer_auth(&self.api_key)
            .json(request)
            .header("Accept", "text/event-stream")
            .send()
            .await
            .map_err(|e| connection_error(&url, e))?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(CheckError::Http {
                status: status.as_u16(),
                body,
            });
        }

        Ok(parse_sse_stream(response))
    }
}

/// Map a reqwest send error onto the harness taxonomy.
fn connection_error(url: &str, e: reqwest::Error) -> CheckError {
    let reason = if e.is_connect() {
        format!("connect error: {e}")
    } else if e.is_timeout() {
        format!("timed out: {e}")
    } else {
        e.to_string()
    };
    CheckError::Connection {
        endpoint: url.to_string(),
        reason,
    }
}

/// Read the body of a 2xx response, or map a non-2xx status to `Http`.
async fn read_success_body(response: reqwest::Response) -> Result<String, CheckError> {
    let status = response.status();
    let body = response.text().await.unwrap_or_default();
    if !status.is_success() {
        return Err(CheckError::Http {
            status: status.as_u16(),
            body,
        });
    }
    Ok(body)
}

fn log_request(url: &str, request: &ChatCompletionRequest) {
    tracing::info!(
        url = %url,
        model = %request.model,
        message_count = request.messages.len(),
        max_tokens = request.max_tokens,
        stream = request.stream,
        has_tools = request.tools.is_some(),
        "chat completion request"
    );
}

// ─── Tests ───────────────────────────────────────────────────────────────────
