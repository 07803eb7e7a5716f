//! LLM Client: the single point of entry for all model API calls.
//!
//! ARCHITECTURAL RULE: No other module may call the Gemini API directly.
//! All LLM interactions MUST go through this module.
//!
//! The credential is handed in through `LlmSettings` and checked before every
//! request; a missing key never reaches the network.
use std::pin::Pin;
use std::time::Duration;

use futures::{Stream, StreamExt};
use reqwest::{Client, Response};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use thiserror::Error;
use tracing::{debug, warn};

use crate::config::Config;

pub mod prompts;
pub mod sse;

const API_KEY_HEADER: &str = "x-goog-api-key";
const CONNECT_TIMEOUT: Duration = Duration::from_secs(10);

/// Fixed diagnostic for a server started without a model credential.
pub const MISSING_CREDENTIAL_MESSAGE: &str =
    "API_KEY environment variable is not set on the server.";

#[derive(Debug, Error)]
pub enum LlmError {
    #[error("{}", MISSING_CREDENTIAL_MESSAGE)]
    MissingCredential,

    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("API error (status {status}): {message}")]
    Api { status: u16, message: String },

    #[error("JSON parse error: {0}")]
    Parse(#[from] serde_json::Error),

    #[error("No data received from the model for {0:?}")]
    Timeout(Duration),

    #[error("LLM returned empty content")]
    EmptyContent,
}

/// Ordered text fragments of one streamed generation.
pub type TextStream = Pin<Box<dyn Stream<Item = Result<String, LlmError>> + Send>>;

/// Everything the client needs to reach the backend.
#[derive(Clone)]
pub struct LlmSettings {
    pub api_key: Option<String>,
    pub base_url: String,
    pub model: String,
    pub temperature: f32,
    /// Whole-request limit for blocking calls; idle limit between streamed chunks.
    pub timeout: Duration,
}

impl LlmSettings {
    pub fn from_config(config: &Config) -> Self {
        Self {
            api_key: config.api_key.clone(),
            base_url: config.base_url.clone(),
            model: config.model.clone(),
            temperature: config.temperature,
            timeout: Duration::from_secs(config.request_timeout_secs),
        }
    }
}

// ────────────────────────────────────────────────────────────────────────────
// Wire types
// ────────────────────────────────────────────────────────────────────────────

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct GenerateContentRequest<'a> {
    system_instruction: Content<'a>,
    contents: Vec<Content<'a>>,
    generation_config: GenerationConfig<'a>,
}

#[derive(Debug, Serialize)]
struct Content<'a> {
    #[serde(skip_serializing_if = "Option::is_none")]
    role: Option<&'a str>,
    parts: Vec<Part<'a>>,
}

#[derive(Debug, Serialize)]
struct Part<'a> {
    text: &'a str,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct GenerationConfig<'a> {
    temperature: f32,
    response_mime_type: &'a str,
    #[serde(skip_serializing_if = "Option::is_none")]
    response_schema: Option<&'a Value>,
}

impl<'a> GenerateContentRequest<'a> {
    fn new(prompt: &'a str, system: &'a str, temperature: f32, schema: Option<&'a Value>) -> Self {
        Self {
            system_instruction: Content {
                role: None,
                parts: vec![Part { text: system }],
            },
            contents: vec![Content {
                role: Some("user"),
                parts: vec![Part { text: prompt }],
            }],
            generation_config: GenerationConfig {
                temperature,
                response_mime_type: "application/json",
                response_schema: schema,
            },
        }
    }
}

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GenerateContentResponse {
    #[serde(default)]
    pub candidates: Vec<Candidate>,
    #[serde(default)]
    pub usage_metadata: Option<UsageMetadata>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Candidate {
    #[serde(default)]
    pub content: Option<CandidateContent>,
    #[serde(default)]
    pub finish_reason: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct CandidateContent {
    #[serde(default)]
    pub parts: Vec<CandidatePart>,
}

#[derive(Debug, Deserialize)]
pub struct CandidatePart {
    #[serde(default)]
    pub text: Option<String>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UsageMetadata {
    #[serde(default)]
    pub prompt_token_count: u32,
    #[serde(default)]
    pub candidates_token_count: u32,
}

impl GenerateContentResponse {
    /// Concatenated text parts of the first candidate.
    pub fn text(&self) -> Option<String> {
        let parts = &self.candidates.first()?.content.as_ref()?.parts;
        let text: String = parts.iter().filter_map(|p| p.text.as_deref()).collect();
        if parts.iter().all(|p| p.text.is_none()) {
            return None;
        }
        Some(text)
    }
}

#[derive(Debug, Deserialize)]
struct ApiErrorEnvelope {
    error: ApiErrorBody,
}

#[derive(Debug, Deserialize)]
pub(crate) struct ApiErrorBody {
    #[serde(default)]
    pub code: Option<u16>,
    #[serde(default)]
    pub message: String,
}

// ────────────────────────────────────────────────────────────────────────────
// Client
// ────────────────────────────────────────────────────────────────────────────

/// The single LLM client used by the service.
/// Wraps the Gemini `generateContent` / `streamGenerateContent` endpoints.
#[derive(Clone)]
pub struct LlmClient {
    client: Client,
    settings: LlmSettings,
}

impl LlmClient {
    pub fn new(settings: LlmSettings) -> Result<Self, LlmError> {
        let client = Client::builder().connect_timeout(CONNECT_TIMEOUT).build()?;
        Ok(Self { client, settings })
    }

    pub fn model(&self) -> &str {
        &self.settings.model
    }

    /// Returns the credential, or the fixed diagnostic when none was configured.
    pub fn ensure_credential(&self) -> Result<&str, LlmError> {
        self.settings
            .api_key
            .as_deref()
            .filter(|key| !key.trim().is_empty())
            .ok_or(LlmError::MissingCredential)
    }

    fn endpoint(&self, method: &str) -> String {
        format!(
            "{}/models/{}:{}",
            self.settings.base_url.trim_end_matches('/'),
            self.settings.model,
            method
        )
    }

    /// Single schema-constrained call. Returns the raw text of the first
    /// candidate; extracting and validating the JSON is the caller's job.
    pub async fn generate(&self, prompt: &str, system: &str, schema: &Value) -> Result<String, LlmError> {
        let api_key = self.ensure_credential()?;
        let body = GenerateContentRequest::new(prompt, system, self.settings.temperature, Some(schema));

        let response = self
            .client
            .post(self.endpoint("generateContent"))
            .header(API_KEY_HEADER, api_key)
            .timeout(self.settings.timeout)
            .json(&body)
            .send()
            .await?;

        if !response.status().is_success() {
            return Err(api_error(response).await);
        }

        let parsed: GenerateContentResponse = response.json().await?;

        if let Some(usage) = &parsed.usage_metadata {
            debug!(
                "LLM call succeeded: prompt_tokens={}, candidate_tokens={}",
                usage.prompt_token_count, usage.candidates_token_count
            );
        }
        if let Some(reason) = parsed
            .candidates
            .first()
            .and_then(|c| c.finish_reason.as_deref())
            .filter(|r| *r != "STOP")
        {
            warn!("LLM call finished with reason {reason}");
        }

        parsed.text().ok_or(LlmError::EmptyContent)
    }

    /// Streaming call without a response schema. Connection and status
    /// failures are reported here; failures after the first byte arrive
    /// through the returned stream.
    pub async fn stream(&self, prompt: &str, system: &str) -> Result<TextStream, LlmError> {
        let api_key = self.ensure_credential()?;
        let body = GenerateContentRequest::new(prompt, system, self.settings.temperature, None);

        let response = self
            .client
            .post(self.endpoint("streamGenerateContent"))
            .query(&[("alt", "sse")])
            .header(API_KEY_HEADER, api_key)
            .json(&body)
            .send()
            .await?;

        if !response.status().is_success() {
            return Err(api_error(response).await);
        }

        Ok(sse::text_fragments(
            response.bytes_stream().boxed(),
            self.settings.timeout,
        ))
    }
}

/// Builds an `Api` error, preferring the backend's own message.
async fn api_error(response: Response) -> LlmError {
    let status = response.status();
    let body = response.text().await.unwrap_or_default();
    warn!("LLM API returned {}: {}", status, body);

    let message = serde_json::from_str::<ApiErrorEnvelope>(&body)
        .map(|e| e.error.message)
        .unwrap_or(body);

    LlmError::Api {
        status: status.as_u16(),
        message,
    }
}

#[cfg(test)]
pub(crate) mod tests {
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::Arc;

    use axum::body::Body;
    use axum::http::{StatusCode, Uri};
    use axum::response::{IntoResponse, Response as AxumResponse};
    use axum::Router;
    use tokio::net::TcpListener;

    use super::*;

    /// A canned reply from the stub backend.
    #[derive(Clone)]
    pub(crate) enum StubReply {
        Json(StatusCode, Value),
        Sse(Vec<Vec<u8>>),
    }

    /// Local stand-in for the model backend. Counts every request it sees.
    pub(crate) struct StubBackend {
        pub base_url: String,
        pub hits: Arc<AtomicUsize>,
        pub last_uri: Arc<std::sync::Mutex<Option<Uri>>>,
    }

    impl StubBackend {
        pub fn hit_count(&self) -> usize {
            self.hits.load(Ordering::SeqCst)
        }
    }

    pub(crate) async fn start_stub(reply: StubReply) -> StubBackend {
        let hits = Arc::new(AtomicUsize::new(0));
        let last_uri = Arc::new(std::sync::Mutex::new(None));

        let app = {
            let hits = Arc::clone(&hits);
            let last_uri = Arc::clone(&last_uri);
            Router::new().fallback(move |uri: Uri| {
                let reply = reply.clone();
                let hits = Arc::clone(&hits);
                let last_uri = Arc::clone(&last_uri);
                async move {
                    hits.fetch_add(1, Ordering::SeqCst);
                    *last_uri.lock().unwrap() = Some(uri);
                    let response: AxumResponse = match reply {
                        StubReply::Json(status, body) => {
                            (status, axum::Json(body)).into_response()
                        }
                        StubReply::Sse(chunks) => {
                            let stream = futures::stream::iter(
                                chunks.into_iter().map(Ok::<_, std::io::Error>),
                            );
                            axum::http::Response::builder()
                                .header("content-type", "text/event-stream")
                                .body(Body::from_stream(stream))
                                .unwrap()
                        }
                    };
                    response
                }
            })
        };

        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let port = listener.local_addr().unwrap().port();
        tokio::spawn(async move {
            axum::serve(listener, app).await.unwrap();
        });

        StubBackend {
            base_url: format!("http://127.0.0.1:{port}/v1beta"),
            hits,
            last_uri,
        }
    }

    pub(crate) fn settings(base_url: &str, api_key: Option<&str>) -> LlmSettings {
        LlmSettings {
            api_key: api_key.map(str::to_string),
            base_url: base_url.to_string(),
            model: "gemini-test".to_string(),
            temperature: 0.7,
            timeout: Duration::from_secs(5),
        }
    }

    pub(crate) fn candidate_body(text: &str) -> Value {
        serde_json::json!({
            "candidates": [{"content": {"role": "model", "parts": [{"text": text}]}, "finishReason": "STOP"}],
            "usageMetadata": {"promptTokenCount": 12, "candidatesTokenCount": 34}
        })
    }

    #[test]
    fn test_request_serializes_in_backend_shape() {
        let schema = serde_json::json!({"type": "OBJECT"});
        let body = GenerateContentRequest::new("hello", "system", 0.7, Some(&schema));
        let value = serde_json::to_value(&body).unwrap();

        assert_eq!(value["contents"][0]["role"], "user");
        assert_eq!(value["contents"][0]["parts"][0]["text"], "hello");
        assert_eq!(value["systemInstruction"]["parts"][0]["text"], "system");
        assert_eq!(value["generationConfig"]["responseMimeType"], "application/json");
        assert_eq!(value["generationConfig"]["responseSchema"]["type"], "OBJECT");
    }

    #[test]
    fn test_streaming_request_omits_schema() {
        let body = GenerateContentRequest::new("hello", "system", 0.7, None);
        let value = serde_json::to_value(&body).unwrap();
        assert!(value["generationConfig"].get("responseSchema").is_none());
    }

    #[test]
    fn test_response_text_joins_parts_of_first_candidate() {
        let response: GenerateContentResponse = serde_json::from_value(serde_json::json!({
            "candidates": [
                {"content": {"parts": [{"text": "{\"a\":"}, {"text": "1}"}]}},
                {"content": {"parts": [{"text": "ignored"}]}}
            ]
        }))
        .unwrap();
        assert_eq!(response.text().as_deref(), Some("{\"a\":1}"));
    }

    #[test]
    fn test_response_without_candidates_has_no_text() {
        let response: GenerateContentResponse =
            serde_json::from_value(serde_json::json!({"candidates": []})).unwrap();
        assert!(response.text().is_none());
    }

    #[tokio::test]
    async fn test_missing_credential_makes_no_outbound_call() {
        let stub = start_stub(StubReply::Json(StatusCode::OK, candidate_body("{}"))).await;
        let client = LlmClient::new(settings(&stub.base_url, None)).unwrap();

        let err = client
            .generate("prompt", "system", &serde_json::json!({}))
            .await
            .unwrap_err();
        assert!(matches!(err, LlmError::MissingCredential));
        assert_eq!(err.to_string(), MISSING_CREDENTIAL_MESSAGE);

        let err = client.stream("prompt", "system").await.err().unwrap();
        assert!(matches!(err, LlmError::MissingCredential));

        assert_eq!(stub.hit_count(), 0);
    }

    #[tokio::test]
    async fn test_generate_returns_candidate_text() {
        let stub = start_stub(StubReply::Json(StatusCode::OK, candidate_body("{\"ok\":true}"))).await;
        let client = LlmClient::new(settings(&stub.base_url, Some("key"))).unwrap();

        let text = client
            .generate("prompt", "system", &serde_json::json!({}))
            .await
            .unwrap();
        assert_eq!(text, "{\"ok\":true}");
        assert_eq!(stub.hit_count(), 1);

        let uri = stub.last_uri.lock().unwrap().clone().unwrap();
        assert_eq!(uri.path(), "/v1beta/models/gemini-test:generateContent");
    }

    #[tokio::test]
    async fn test_generate_surfaces_backend_error_message() {
        let stub = start_stub(StubReply::Json(
            StatusCode::BAD_REQUEST,
            serde_json::json!({"error": {"code": 400, "message": "API key not valid.", "status": "INVALID_ARGUMENT"}}),
        ))
        .await;
        let client = LlmClient::new(settings(&stub.base_url, Some("bad"))).unwrap();

        match client.generate("p", "s", &serde_json::json!({})).await {
            Err(LlmError::Api { status, message }) => {
                assert_eq!(status, 400);
                assert_eq!(message, "API key not valid.");
            }
            other => panic!("expected API error, got {other:?}"),
        }
    }

    #[tokio::test]
    async fn test_generate_without_candidates_is_empty_content() {
        let stub = start_stub(StubReply::Json(StatusCode::OK, serde_json::json!({"candidates": []}))).await;
        let client = LlmClient::new(settings(&stub.base_url, Some("key"))).unwrap();
        let err = client.generate("p", "s", &serde_json::json!({})).await.unwrap_err();
        assert!(matches!(err, LlmError::EmptyContent));
    }

    #[tokio::test]
    async fn test_stream_yields_fragments_from_sse_body() {
        let body = ["{\"meta\":", "{},\"layout\":[]}"]
            .iter()
            .map(|t| format!("data: {}\r\n\r\n", candidate_body(t)))
            .collect::<String>()
            .into_bytes();
        // Split the body mid-event to exercise buffering.
        let chunks = body.chunks(7).map(<[u8]>::to_vec).collect();
        let stub = start_stub(StubReply::Sse(chunks)).await;
        let client = LlmClient::new(settings(&stub.base_url, Some("key"))).unwrap();

        let fragments: Vec<String> = client
            .stream("p", "s")
            .await
            .unwrap()
            .map(Result::unwrap)
            .collect()
            .await;
        assert_eq!(fragments, vec!["{\"meta\":", "{},\"layout\":[]}"]);

        let uri = stub.last_uri.lock().unwrap().clone().unwrap();
        assert_eq!(uri.path(), "/v1beta/models/gemini-test:streamGenerateContent");
        assert_eq!(uri.query(), Some("alt=sse"));
    }

    #[tokio::test]
    async fn test_unreachable_backend_is_http_error() {
        // Bind and drop to obtain a port nothing listens on.
        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let port = listener.local_addr().unwrap().port();
        drop(listener);

        let client = LlmClient::new(settings(&format!("http://127.0.0.1:{port}"), Some("key"))).unwrap();
        let err = client.generate("p", "s", &serde_json::json!({})).await.unwrap_err();
        assert!(matches!(err, LlmError::Http(_)));
    }
}
