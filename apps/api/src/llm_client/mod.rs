/// LLM Client — the single point of entry for all completion calls.
///
/// ARCHITECTURAL RULE: No other module may call the Gemini API directly.
/// Everything downstream depends on the `CompletionClient` trait, never on `GeminiClient`.
///
/// Model: gemini-2.0-flash (hardcoded — do not make configurable to prevent drift)
use async_trait::async_trait;
use reqwest::Client;
use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::debug;

pub mod prompts;

/// Default base URL; overridable through `GEMINI_API_BASE`.
pub const GEMINI_API_BASE: &str = "https://generativelanguage.googleapis.com";
/// The model used for every completion call.
pub const MODEL: &str = "gemini-2.0-flash";

#[derive(Debug, Error)]
pub enum LlmError {
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("API error (status {status}): {message}")]
    Api { status: u16, message: String },

    #[error("JSON parse error: {0}")]
    Parse(#[from] serde_json::Error),

    #[error("Prompt blocked by the completion service: {reason}")]
    Blocked { reason: String },

    #[error("LLM returned empty content")]
    EmptyContent,
}

/// Opaque text-completion boundary: one prompt in, one text blob out.
///
/// Carried in `AppState` as `Arc<dyn CompletionClient>`.
#[async_trait]
pub trait CompletionClient: Send + Sync {
    async fn complete(&self, prompt: &str) -> Result<String, LlmError>;

    fn model_name(&self) -> &str;
}

#[derive(Debug, Serialize)]
struct GenerateContentRequest<'a> {
    contents: Vec<RequestContent<'a>>,
}

#[derive(Debug, Serialize)]
struct RequestContent<'a> {
    role: &'a str,
    parts: Vec<RequestPart<'a>>,
}

#[derive(Debug, Serialize)]
struct RequestPart<'a> {
    text: &'a str,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GenerateContentResponse {
    #[serde(default)]
    pub candidates: Vec<Candidate>,
    pub prompt_feedback: Option<PromptFeedback>,
    pub usage_metadata: Option<UsageMetadata>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Candidate {
    pub content: Option<CandidateContent>,
    pub finish_reason: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct CandidateContent {
    #[serde(default)]
    pub parts: Vec<CandidatePart>,
}

#[derive(Debug, Deserialize)]
pub struct CandidatePart {
    pub text: Option<String>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PromptFeedback {
    pub block_reason: Option<String>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UsageMetadata {
    pub prompt_token_count: Option<u32>,
    pub candidates_token_count: Option<u32>,
}

impl GenerateContentResponse {
    /// Concatenates the text parts of the first candidate.
    pub fn text(&self) -> Option<String> {
        let parts = &self.candidates.first()?.content.as_ref()?.parts;
        let text: String = parts.iter().filter_map(|p| p.text.as_deref()).collect();
        if text.is_empty() {
            None
        } else {
            Some(text)
        }
    }

    fn block_reason(&self) -> Option<&str> {
        self.prompt_feedback
            .as_ref()
            .and_then(|f| f.block_reason.as_deref())
    }
}

#[derive(Debug, Deserialize)]
struct GeminiError {
    error: GeminiErrorBody,
}

#[derive(Debug, Deserialize)]
struct GeminiErrorBody {
    message: String,
}

/// Wraps the Gemini `generateContent` endpoint.
/// One request per prompt: no retry and no client-side timeout.
#[derive(Clone)]
pub struct GeminiClient {
    client: Client,
    api_base: String,
    api_key: String,
}

impl GeminiClient {
    pub fn new(api_key: String, api_base: String) -> Self {
        Self {
            client: Client::new(),
            api_base,
            api_key,
        }
    }

    fn endpoint(&self) -> String {
        format!(
            "{}/v1beta/models/{}:generateContent",
            self.api_base.trim_end_matches('/'),
            MODEL
        )
    }
}

#[async_trait]
impl CompletionClient for GeminiClient {
    async fn complete(&self, prompt: &str) -> Result<String, LlmError> {
        let request_body = GenerateContentRequest {
            contents: vec![RequestContent {
                role: "user",
                parts: vec![RequestPart { text: prompt }],
            }],
        };

        let response = self
            .client
            .post(self.endpoint())
            .header("x-goog-api-key", &self.api_key)
            .json(&request_body)
            .send()
            .await?;

        let status = response.status();
        let body = response.text().await?;

        if !status.is_success() {
            return Err(LlmError::Api {
                status: status.as_u16(),
                message: api_error_message(body),
            });
        }

        let parsed: GenerateContentResponse = serde_json::from_str(&body)?;

        let usage = parsed.usage_metadata.as_ref();
        debug!(
            "LLM call succeeded: prompt_tokens={:?}, candidate_tokens={:?}, finish_reason={:?}",
            usage.and_then(|u| u.prompt_token_count),
            usage.and_then(|u| u.candidates_token_count),
            parsed.candidates.first().and_then(|c| c.finish_reason.as_deref())
        );

        extract_text(parsed)
    }

    fn model_name(&self) -> &str {
        MODEL
    }
}

/// Pulls the service's own error message out of an error body, falling back to the raw body.
fn api_error_message(body: String) -> String {
    serde_json::from_str::<GeminiError>(&body)
        .map(|e| e.error.message)
        .unwrap_or(body)
}

fn extract_text(response: GenerateContentResponse) -> Result<String, LlmError> {
    if let Some(text) = response.text() {
        return Ok(text);
    }
    if let Some(reason) = response.block_reason() {
        return Err(LlmError::Blocked {
            reason: reason.to_string(),
        });
    }
    Err(LlmError::EmptyContent)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parse(json: &str) -> GenerateContentResponse {
        serde_json::from_str(json).unwrap()
    }

    #[test]
    fn test_text_joins_parts_of_first_candidate() {
        let response = parse(
            r#"{
                "candidates": [
                    {"content": {"role": "model", "parts": [{"text": "1. A.5 "}, {"text": "– Policies"}]},
                     "finishReason": "STOP"},
                    {"content": {"parts": [{"text": "ignored"}]}}
                ],
                "usageMetadata": {"promptTokenCount": 120, "candidatesTokenCount": 40}
            }"#,
        );
        assert_eq!(response.text().as_deref(), Some("1. A.5 – Policies"));
        assert_eq!(response.candidates[0].finish_reason.as_deref(), Some("STOP"));
        assert_eq!(
            response.usage_metadata.unwrap().prompt_token_count,
            Some(120)
        );
    }

    #[test]
    fn test_blocked_prompt_maps_to_blocked_error() {
        let response = parse(r#"{"promptFeedback": {"blockReason": "SAFETY"}}"#);
        match extract_text(response) {
            Err(LlmError::Blocked { reason }) => assert_eq!(reason, "SAFETY"),
            other => panic!("expected Blocked, got {other:?}"),
        }
    }

    #[test]
    fn test_missing_text_is_empty_content() {
        let response = parse(r#"{"candidates": [{"content": {"parts": []}}]}"#);
        assert!(matches!(extract_text(response), Err(LlmError::EmptyContent)));
    }

    #[test]
    fn test_api_error_message_prefers_service_message() {
        let body = r#"{"error": {"code": 400, "message": "API key not valid.", "status": "INVALID_ARGUMENT"}}"#;
        assert_eq!(api_error_message(body.to_string()), "API key not valid.");
    }

    #[test]
    fn test_api_error_message_falls_back_to_raw_body() {
        assert_eq!(api_error_message("upstream down".to_string()), "upstream down");
    }

    mod http {
        use axum::{
            http::{HeaderMap, StatusCode, Uri},
            Json, Router,
        };
        use serde_json::{json, Value};

        use super::*;

        const GOOD_KEY: &str = "test-key";

        /// Minimal stand-in for `generateContent`: checks path and key, echoes the prompt.
        async fn fake_generate(
            uri: Uri,
            headers: HeaderMap,
            Json(body): Json<Value>,
        ) -> (StatusCode, Json<Value>) {
            if uri.path() != "/v1beta/models/gemini-2.0-flash:generateContent" {
                return (
                    StatusCode::NOT_FOUND,
                    Json(json!({"error": {"code": 404, "message": "unknown model path"}})),
                );
            }
            if headers.get("x-goog-api-key").and_then(|v| v.to_str().ok()) != Some(GOOD_KEY) {
                return (
                    StatusCode::FORBIDDEN,
                    Json(json!({"error": {"code": 403, "message": "API key not valid.", "status": "PERMISSION_DENIED"}})),
                );
            }
            let prompt = body["contents"][0]["parts"][0]["text"]
                .as_str()
                .unwrap_or_default();
            (
                StatusCode::OK,
                Json(json!({
                    "candidates": [{
                        "content": {"role": "model", "parts": [{"text": format!("echo: {prompt}")}]},
                        "finishReason": "STOP"
                    }],
                    "usageMetadata": {"promptTokenCount": 3, "candidatesTokenCount": 2}
                })),
            )
        }

        async fn spawn_fake_gemini() -> String {
            let app = Router::new().fallback(fake_generate);
            let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
            let addr = listener.local_addr().unwrap();
            tokio::spawn(async move {
                axum::serve(listener, app).await.unwrap();
            });
            format!("http://{addr}")
        }

        #[tokio::test]
        async fn test_complete_sends_key_and_returns_text() {
            let base = spawn_fake_gemini().await;
            let client = GeminiClient::new(GOOD_KEY.to_string(), base);

            let text = client.complete("hello").await.unwrap();

            assert_eq!(text, "echo: hello");
        }

        #[tokio::test]
        async fn test_complete_maps_rejection_to_api_error() {
            let base = spawn_fake_gemini().await;
            let client = GeminiClient::new("wrong-key".to_string(), format!("{base}/"));

            match client.complete("hello").await {
                Err(LlmError::Api { status, message }) => {
                    assert_eq!(status, 403);
                    assert_eq!(message, "API key not valid.");
                }
                other => panic!("expected Api error, got {other:?}"),
            }
        }
    }

    #[test]
    fn test_endpoint_uses_fixed_model() {
        let client = GeminiClient::new("k".into(), "http://localhost:9000/".into());
        assert_eq!(
            client.endpoint(),
            "http://localhost:9000/v1beta/models/gemini-2.0-flash:generateContent"
        );
        assert_eq!(client.model_name(), MODEL);
    }
}
