/// Image generation client: the single point of entry for calls to the
/// external generative-image API (Gemini `generateContent`).
///
/// No other module talks to the image API directly. Handlers depend on the
/// `TryOnGenerator` trait carried in `AppState`.
use std::future::Future;

use async_trait::async_trait;
use reqwest::Client;
use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::{debug, warn};

use crate::media::InlineImage;

pub mod prompts;

const GEMINI_API_BASE: &str = "https://generativelanguage.googleapis.com/v1beta/models";
const MAX_RETRIES: u32 = 3;
const REQUEST_TIMEOUT_SECS: u64 = 120;

#[derive(Debug, Error)]
pub enum ImageGenError {
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("API error (status {status}): {message}")]
    Api { status: u16, message: String },

    #[error("rate limited after {retries} attempts: {message}")]
    RateLimited { retries: u32, message: String },

    #[error("model returned no image")]
    NoImage,

    #[error("generation did not finish within {secs}s")]
    TimedOut { secs: u64 },
}

/// Dresses the person in the first image with the garment in the second.
#[async_trait]
pub trait TryOnGenerator: Send + Sync {
    async fn generate(
        &self,
        person: &InlineImage,
        garment: &InlineImage,
    ) -> Result<InlineImage, ImageGenError>;
}

// ────────────────────────────────────────────────────────────────────────────
// Wire types
// ────────────────────────────────────────────────────────────────────────────

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct GenerateContentRequest<'a> {
    contents: Vec<Content<'a>>,
    generation_config: GenerationConfig,
}

#[derive(Debug, Serialize)]
struct Content<'a> {
    role: &'a str,
    parts: Vec<RequestPart<'a>>,
}

#[derive(Debug, Serialize)]
#[serde(untagged)]
enum RequestPart<'a> {
    Text {
        text: &'a str,
    },
    Image {
        #[serde(rename = "inlineData")]
        inline_data: InlineDataRef<'a>,
    },
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct InlineDataRef<'a> {
    mime_type: &'a str,
    data: &'a str,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct GenerationConfig {
    response_modalities: Vec<&'static str>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GenerateContentResponse {
    #[serde(default)]
    pub candidates: Vec<Candidate>,
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
    pub parts: Vec<ResponsePart>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ResponsePart {
    pub text: Option<String>,
    pub inline_data: Option<InlineData>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct InlineData {
    pub mime_type: String,
    pub data: String,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UsageMetadata {
    pub prompt_token_count: Option<u32>,
    pub candidates_token_count: Option<u32>,
}

impl GenerateContentResponse {
    /// Extracts the first inline image of the first candidate.
    pub fn image(&self) -> Option<InlineImage> {
        self.candidates
            .first()
            .and_then(|c| c.content.as_ref())
            .and_then(|content| {
                content
                    .parts
                    .iter()
                    .find_map(|p| p.inline_data.as_ref().filter(|d| !d.data.is_empty()))
            })
            .map(|d| InlineImage {
                mime_type: d.mime_type.clone(),
                data: d.data.clone(),
            })
    }

    /// Finish reason and text of the first candidate, for logging a refusal.
    pub fn diagnostics(&self) -> String {
        let Some(candidate) = self.candidates.first() else {
            return "no candidates".to_string();
        };
        let reason = candidate.finish_reason.as_deref().unwrap_or("unknown");
        let text: Vec<&str> = candidate
            .content
            .iter()
            .flat_map(|c| c.parts.iter())
            .filter_map(|p| p.text.as_deref())
            .collect();
        if text.is_empty() {
            format!("finish_reason={reason}")
        } else {
            format!("finish_reason={reason}, text={:?}", text.join(" "))
        }
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

// ────────────────────────────────────────────────────────────────────────────
// Client
// ────────────────────────────────────────────────────────────────────────────

/// Gemini image client with per-call retries and a one-shot model fallback.
#[derive(Clone)]
pub struct GeminiImageClient {
    client: Client,
    api_key: String,
    model: String,
    fallback_model: Option<String>,
}

impl GeminiImageClient {
    pub fn new(
        api_key: String,
        model: String,
        fallback_model: Option<String>,
    ) -> Result<Self, ImageGenError> {
        Ok(Self {
            client: Client::builder()
                .timeout(std::time::Duration::from_secs(REQUEST_TIMEOUT_SECS))
                .build()?,
            api_key,
            model,
            fallback_model,
        })
    }

    pub fn model(&self) -> &str {
        &self.model
    }

    /// Primary model first, then the fallback when it is set and different.
    fn models(&self) -> Vec<&str> {
        let mut models = vec![self.model.as_str()];
        if let Some(fallback) = self.fallback_model.as_deref() {
            if fallback != self.model {
                models.push(fallback);
            }
        }
        models
    }

    /// Makes a raw `generateContent` call against one model.
    /// Retries on 429 (rate limit) and 5xx errors with exponential backoff.
    pub async fn call(
        &self,
        model: &str,
        prompt: &str,
        images: &[&InlineImage],
    ) -> Result<GenerateContentResponse, ImageGenError> {
        let mut parts = vec![RequestPart::Text { text: prompt }];
        parts.extend(images.iter().map(|img| RequestPart::Image {
            inline_data: InlineDataRef {
                mime_type: &img.mime_type,
                data: &img.data,
            },
        }));

        let request_body = GenerateContentRequest {
            contents: vec![Content {
                role: "user",
                parts,
            }],
            generation_config: GenerationConfig {
                response_modalities: vec!["IMAGE"],
            },
        };

        let url = format!("{GEMINI_API_BASE}/{model}:generateContent");
        let mut attempt = 0;

        loop {
            let response = self
                .client
                .post(&url)
                .header("x-goog-api-key", &self.api_key)
                .json(&request_body)
                .send()
                .await;

            let error = match response {
                Err(e) => ImageGenError::Http(e),
                Ok(response) => {
                    let status = response.status();

                    if status.as_u16() == 429 || status.is_server_error() {
                        let body = response.text().await.unwrap_or_default();
                        warn!("Image API returned {}: {}", status, body);
                        retryable_error(status.as_u16(), body)
                    } else if !status.is_success() {
                        let body = response.text().await.unwrap_or_default();
                        let message = serde_json::from_str::<GeminiError>(&body)
                            .map(|e| e.error.message)
                            .unwrap_or(body);
                        return Err(ImageGenError::Api {
                            status: status.as_u16(),
                            message,
                        });
                    } else {
                        let parsed: GenerateContentResponse = response.json().await?;

                        if let Some(usage) = &parsed.usage_metadata {
                            debug!(
                                "Image call to {model} succeeded: prompt_tokens={:?}, candidate_tokens={:?}",
                                usage.prompt_token_count, usage.candidates_token_count
                            );
                        }

                        return Ok(parsed);
                    }
                }
            };

            attempt += 1;
            if attempt >= MAX_RETRIES {
                return Err(error);
            }

            // Exponential backoff: 1s, 2s
            let delay = std::time::Duration::from_millis(1000 * (1 << (attempt - 1)));
            warn!(
                "Image call to {model} attempt {} failed ({error}), retrying after {}ms...",
                attempt,
                delay.as_millis()
            );
            tokio::time::sleep(delay).await;
        }
    }

    async fn generate_with(
        &self,
        model: &str,
        person: &InlineImage,
        garment: &InlineImage,
    ) -> Result<InlineImage, ImageGenError> {
        let response = self
            .call(model, prompts::TRY_ON_INSTRUCTION, &[person, garment])
            .await?;
        response.image().ok_or_else(|| {
            warn!("Model {model} returned no image: {}", response.diagnostics());
            ImageGenError::NoImage
        })
    }
}

#[async_trait]
impl TryOnGenerator for GeminiImageClient {
    async fn generate(
        &self,
        person: &InlineImage,
        garment: &InlineImage,
    ) -> Result<InlineImage, ImageGenError> {
        first_success(&self.models(), |model| {
            self.generate_with(model, person, garment)
        })
        .await
    }
}

/// Error for a retryable status once its body has been read.
fn retryable_error(status: u16, message: String) -> ImageGenError {
    if status == 429 {
        ImageGenError::RateLimited {
            retries: MAX_RETRIES,
            message,
        }
    } else {
        ImageGenError::Api { status, message }
    }
}

/// Runs `attempt` for each model in order and returns the first success.
/// The error of the last attempt is surfaced when every model fails.
pub async fn first_success<'m, T, F, Fut>(
    models: &[&'m str],
    mut attempt: F,
) -> Result<T, ImageGenError>
where
    F: FnMut(&'m str) -> Fut,
    Fut: Future<Output = Result<T, ImageGenError>>,
{
    let mut last_error = ImageGenError::NoImage;
    for (i, &model) in models.iter().enumerate() {
        match attempt(model).await {
            Ok(value) => return Ok(value),
            Err(e) => {
                if i + 1 < models.len() {
                    warn!("Model {model} failed ({e}), falling back to {}", models[i + 1]);
                }
                last_error = e;
            }
        }
    }
    Err(last_error)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicUsize, Ordering};

    #[test]
    fn test_request_serializes_gemini_shape() {
        let person = InlineImage {
            mime_type: "image/png".into(),
            data: "AAAA".into(),
        };
        let body = GenerateContentRequest {
            contents: vec![Content {
                role: "user",
                parts: vec![
                    RequestPart::Text { text: "hi" },
                    RequestPart::Image {
                        inline_data: InlineDataRef {
                            mime_type: &person.mime_type,
                            data: &person.data,
                        },
                    },
                ],
            }],
            generation_config: GenerationConfig {
                response_modalities: vec!["IMAGE"],
            },
        };
        let json = serde_json::to_value(&body).unwrap();
        assert_eq!(json["contents"][0]["role"], "user");
        assert_eq!(json["contents"][0]["parts"][0]["text"], "hi");
        assert_eq!(json["contents"][0]["parts"][1]["inlineData"]["mimeType"], "image/png");
        assert_eq!(json["contents"][0]["parts"][1]["inlineData"]["data"], "AAAA");
        assert_eq!(json["generationConfig"]["responseModalities"][0], "IMAGE");
    }

    #[test]
    fn test_response_image_skips_text_parts() {
        let raw = r#"{
            "candidates": [{
                "content": {"parts": [
                    {"text": "Here is the edited photo"},
                    {"inlineData": {"mimeType": "image/png", "data": "iVBORw0KGgo="}}
                ]},
                "finishReason": "STOP"
            }],
            "usageMetadata": {"promptTokenCount": 10, "candidatesTokenCount": 1290}
        }"#;
        let parsed: GenerateContentResponse = serde_json::from_str(raw).unwrap();
        let img = parsed.image().unwrap();
        assert_eq!(img.mime_type, "image/png");
        assert_eq!(img.data, "iVBORw0KGgo=");
    }

    #[test]
    fn test_response_without_image() {
        let raw = r#"{"candidates": [{"content": {"parts": [{"text": "I can't do that"}]}}]}"#;
        let parsed: GenerateContentResponse = serde_json::from_str(raw).unwrap();
        assert!(parsed.image().is_none());

        let empty: GenerateContentResponse = serde_json::from_str("{}").unwrap();
        assert!(empty.image().is_none());
    }

    #[test]
    fn test_diagnostics_report_refusal() {
        let raw = r#"{"candidates": [{
            "content": {"parts": [{"text": "I can't edit"}, {"text": "this photo"}]},
            "finishReason": "IMAGE_SAFETY"
        }]}"#;
        let parsed: GenerateContentResponse = serde_json::from_str(raw).unwrap();
        assert_eq!(
            parsed.diagnostics(),
            r#"finish_reason=IMAGE_SAFETY, text="I can't edit this photo""#
        );

        let raw = r#"{"candidates": [{"finishReason": "PROHIBITED_CONTENT"}]}"#;
        let parsed: GenerateContentResponse = serde_json::from_str(raw).unwrap();
        assert_eq!(parsed.diagnostics(), "finish_reason=PROHIBITED_CONTENT");

        let empty: GenerateContentResponse = serde_json::from_str("{}").unwrap();
        assert_eq!(empty.diagnostics(), "no candidates");
    }

    #[test]
    fn test_retryable_error_kinds() {
        match retryable_error(429, "quota".into()) {
            ImageGenError::RateLimited { retries, message } => {
                assert_eq!(retries, MAX_RETRIES);
                assert_eq!(message, "quota");
            }
            other => panic!("unexpected error: {other:?}"),
        }
        assert!(matches!(
            retryable_error(503, "busy".into()),
            ImageGenError::Api { status: 503, .. }
        ));
    }

    #[test]
    fn test_models_skip_duplicate_fallback() {
        let client =
            GeminiImageClient::new("k".into(), "a".into(), Some("a".into())).unwrap();
        assert_eq!(client.models(), vec!["a"]);
        let client =
            GeminiImageClient::new("k".into(), "a".into(), Some("b".into())).unwrap();
        assert_eq!(client.models(), vec!["a", "b"]);
        let client = GeminiImageClient::new("k".into(), "a".into(), None).unwrap();
        assert_eq!(client.models(), vec!["a"]);
    }

    #[tokio::test]
    async fn test_first_success_falls_back_once() {
        let calls = AtomicUsize::new(0);
        let result = first_success(&["primary", "fallback"], |model| {
            calls.fetch_add(1, Ordering::SeqCst);
            async move {
                if model == "primary" {
                    Err(ImageGenError::NoImage)
                } else {
                    Ok(model.to_string())
                }
            }
        })
        .await;
        assert_eq!(result.unwrap(), "fallback");
        assert_eq!(calls.load(Ordering::SeqCst), 2);
    }

    #[tokio::test]
    async fn test_first_success_stops_at_primary() {
        let calls = AtomicUsize::new(0);
        let result = first_success(&["primary", "fallback"], |model| {
            calls.fetch_add(1, Ordering::SeqCst);
            async move { Ok::<_, ImageGenError>(model.to_string()) }
        })
        .await;
        assert_eq!(result.unwrap(), "primary");
        assert_eq!(calls.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn test_first_success_surfaces_last_error() {
        let result: Result<(), _> = first_success(&["primary", "fallback"], |model| async move {
            Err(ImageGenError::Api {
                status: 400,
                message: format!("{model} refused"),
            })
        })
        .await;
        match result {
            Err(ImageGenError::Api { message, .. }) => assert_eq!(message, "fallback refused"),
            other => panic!("unexpected result: {other:?}"),
        }
    }
}
