//! GeminiImageClient - Direct REST API implementation for Gemini image
//! generation.
//!
//! Calls the Gemini `generateContent` endpoint with the IMAGE response
//! modality. Configuration (API key, model override) comes from secret.json
//! via the core `SecretService`.

use base64::engine::general_purpose::STANDARD as BASE64_STANDARD;
use base64::Engine;
use reqwest::{header::HeaderValue, Client, StatusCode};
use serde::{Deserialize, Serialize};

use pixshop_core::generation::{
    GeneratedImage, GenerationBackend, GenerationOptions, SourceImage,
};
use pixshop_core::history::GroundingReference;
use pixshop_core::secret::SecretService;
use pixshop_core::{PixshopError, Result};

use crate::prompts::compose_prompt;

const DEFAULT_IMAGE_MODEL: &str = "gemini-2.5-flash-image-preview";
const BASE_URL: &str = "https://generativelanguage.googleapis.com/v1beta/models";

/// Client that talks to the Gemini HTTP API for image synthesis.
#[derive(Clone)]
pub struct GeminiImageClient {
    client: Client,
    api_key: String,
    model: String,
}

impl GeminiImageClient {
    /// Creates a new client with the provided API key and model.
    pub fn new(api_key: impl Into<String>, model: impl Into<String>) -> Self {
        Self {
            client: Client::new(),
            api_key: api_key.into(),
            model: model.into(),
        }
    }

    /// Loads configuration from the secret service.
    ///
    /// Model name defaults to `gemini-2.5-flash-image-preview` unless
    /// secret.json overrides it. Fails with `AuthenticationRequired` when
    /// no API key is configured.
    pub async fn try_from_secrets(service: &dyn SecretService) -> Result<Self> {
        let secrets = service.load_secrets().await?;
        let api_key = secrets
            .gemini_api_key()
            .ok_or_else(|| {
                PixshopError::authentication_required(
                    "No Gemini API key configured in secret.json",
                )
            })?
            .to_string();

        let model = secrets
            .gemini
            .as_ref()
            .and_then(|g| g.model.clone())
            .unwrap_or_else(|| DEFAULT_IMAGE_MODEL.to_string());

        Ok(Self::new(api_key, model))
    }

    /// Builds a client from an already-loaded secret config.
    ///
    /// Unlike [`try_from_secrets`](Self::try_from_secrets) this tolerates a
    /// missing API key so the application can be wired before credentials
    /// exist; the request controller's auth check keeps an unconfigured
    /// client from ever being called.
    pub fn from_config(config: &pixshop_core::config::SecretConfig) -> Self {
        let api_key = config.gemini_api_key().unwrap_or_default().to_string();
        let model = config
            .gemini
            .as_ref()
            .and_then(|g| g.model.clone())
            .unwrap_or_else(|| DEFAULT_IMAGE_MODEL.to_string());
        Self::new(api_key, model)
    }

    /// Overrides the model after construction.
    pub fn with_model(mut self, model: impl Into<String>) -> Self {
        self.model = model.into();
        self
    }

    fn build_request(
        parts: Vec<Part>,
        options: &GenerationOptions,
    ) -> GenerateContentRequest {
        let system_instruction = options.system_instruction.as_ref().map(|text| Content {
            role: "system".to_string(),
            parts: vec![Part::Text { text: text.clone() }],
        });

        GenerateContentRequest {
            contents: vec![Content {
                role: "user".to_string(),
                parts,
            }],
            system_instruction,
            generation_config: GenerationConfig {
                response_modalities: vec!["IMAGE".to_string(), "TEXT".to_string()],
            },
        }
    }

    async fn send_request(&self, body: &GenerateContentRequest) -> Result<GeneratedImage> {
        let url = format!(
            "{}/{model}:generateContent?key={api_key}",
            BASE_URL,
            model = self.model,
            api_key = self.api_key
        );

        tracing::debug!(model = %self.model, "Dispatching generateContent request");

        let response = self
            .client
            .post(url)
            .json(body)
            .send()
            .await
            .map_err(|err| PixshopError::Service {
                status: None,
                message: format!("Gemini API request failed: {err}"),
                retryable: err.is_connect() || err.is_timeout(),
            })?;

        if !response.status().is_success() {
            let status = response.status();
            let retry_after = parse_retry_after(response.headers().get("retry-after"));
            let body_text = response
                .text()
                .await
                .unwrap_or_else(|_| "Failed to read Gemini error body".to_string());
            return Err(map_http_error(status, body_text, retry_after));
        }

        let parsed: GenerateContentResponse = response.json().await.map_err(|err| {
            PixshopError::service(format!("Failed to parse Gemini response: {err}"))
        })?;

        extract_image_response(parsed)
    }
}

#[async_trait::async_trait]
impl GenerationBackend for GeminiImageClient {
    async fn generate_from_text(
        &self,
        prompt: &str,
        options: &GenerationOptions,
    ) -> Result<GeneratedImage> {
        let text = compose_prompt(prompt, options.negative_prompt.as_deref());
        let request = Self::build_request(vec![Part::Text { text }], options);
        self.send_request(&request).await
    }

    async fn edit_image(
        &self,
        source: SourceImage<'_>,
        prompt: &str,
        options: &GenerationOptions,
    ) -> Result<GeneratedImage> {
        let text = compose_prompt(prompt, options.negative_prompt.as_deref());
        let parts = vec![
            Part::InlineData {
                inline_data: InlineDataPayload {
                    mime_type: source.mime_type.to_string(),
                    data: BASE64_STANDARD.encode(source.data),
                },
            },
            Part::Text { text },
        ];
        let request = Self::build_request(parts, options);
        self.send_request(&request).await
    }
}

// --- Wire format -----------------------------------------------------------

#[derive(Serialize)]
struct GenerateContentRequest {
    contents: Vec<Content>,
    #[serde(rename = "systemInstruction", skip_serializing_if = "Option::is_none")]
    system_instruction: Option<Content>,
    #[serde(rename = "generationConfig")]
    generation_config: GenerationConfig,
}

#[derive(Serialize)]
struct Content {
    role: String,
    parts: Vec<Part>,
}

#[derive(Serialize)]
#[serde(untagged)]
enum Part {
    Text {
        text: String,
    },
    InlineData {
        #[serde(rename = "inlineData")]
        inline_data: InlineDataPayload,
    },
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct InlineDataPayload {
    mime_type: String,
    data: String,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct GenerationConfig {
    response_modalities: Vec<String>,
}

#[derive(Deserialize)]
struct GenerateContentResponse {
    candidates: Option<Vec<Candidate>>,
}

#[derive(Deserialize)]
struct Candidate {
    content: Option<ContentResponse>,
    #[serde(rename = "groundingMetadata")]
    grounding_metadata: Option<GroundingMetadata>,
}

#[derive(Deserialize)]
struct ContentResponse {
    parts: Vec<PartResponse>,
}

#[derive(Deserialize)]
struct PartResponse {
    text: Option<String>,
    #[serde(rename = "inlineData")]
    inline_data: Option<InlineDataResponse>,
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct InlineDataResponse {
    mime_type: String,
    data: String,
}

#[derive(Deserialize)]
struct GroundingMetadata {
    #[serde(rename = "groundingChunks", default)]
    grounding_chunks: Vec<GroundingChunk>,
}

#[derive(Deserialize)]
struct GroundingChunk {
    web: Option<WebChunk>,
}

#[derive(Deserialize)]
struct WebChunk {
    uri: Option<String>,
    title: Option<String>,
}

#[derive(Deserialize)]
struct ErrorWrapper {
    error: ErrorBody,
}

#[derive(Deserialize)]
struct ErrorBody {
    #[allow(dead_code)]
    code: Option<i32>,
    message: Option<String>,
    status: Option<String>,
}

fn extract_image_response(response: GenerateContentResponse) -> Result<GeneratedImage> {
    let candidate = response
        .candidates
        .and_then(|mut candidates| {
            if candidates.is_empty() {
                None
            } else {
                Some(candidates.remove(0))
            }
        })
        .ok_or_else(|| {
            PixshopError::service("Gemini API returned no candidates in the response")
        })?;

    let grounding = candidate
        .grounding_metadata
        .map(|meta| {
            meta.grounding_chunks
                .into_iter()
                .filter_map(|chunk| chunk.web)
                .filter_map(|web| {
                    web.uri.map(|uri| GroundingReference {
                        uri,
                        title: web.title,
                    })
                })
                .collect()
        })
        .unwrap_or_default();

    let parts = candidate
        .content
        .map(|content| content.parts)
        .unwrap_or_default();

    let mut image: Option<(Vec<u8>, String)> = None;
    let mut texts: Vec<String> = Vec::new();

    for part in parts {
        if let Some(inline) = part.inline_data {
            if image.is_none() {
                let bytes = BASE64_STANDARD.decode(inline.data.as_bytes()).map_err(|e| {
                    PixshopError::service(format!("Gemini returned undecodable image data: {e}"))
                })?;
                image = Some((bytes, inline.mime_type));
            }
        } else if let Some(text) = part.text {
            if !text.trim().is_empty() {
                texts.push(text);
            }
        }
    }

    let (bytes, mime_type) = image.ok_or_else(|| {
        PixshopError::service("Gemini API returned no image in the response candidates")
    })?;

    let model_text = if texts.is_empty() {
        None
    } else {
        Some(texts.join("\n"))
    };

    Ok(GeneratedImage {
        bytes,
        mime_type,
        grounding,
        model_text,
    })
}

fn map_http_error(
    status: StatusCode,
    body: String,
    retry_after_secs: Option<u64>,
) -> PixshopError {
    let mut message = serde_json::from_str::<ErrorWrapper>(&body)
        .map(|wrapper| {
            let status_text = wrapper.error.status.unwrap_or_default();
            let msg = wrapper.error.message.unwrap_or_else(|| body.clone());
            if status_text.is_empty() {
                msg
            } else {
                format!("{status_text}: {msg}")
            }
        })
        .unwrap_or_else(|_| body.clone());

    let retryable = matches!(
        status,
        StatusCode::TOO_MANY_REQUESTS
            | StatusCode::INTERNAL_SERVER_ERROR
            | StatusCode::BAD_GATEWAY
            | StatusCode::SERVICE_UNAVAILABLE
            | StatusCode::GATEWAY_TIMEOUT
    );

    if let Some(seconds) = retry_after_secs {
        message = format!("{message} (retry after {seconds}s)");
    }

    PixshopError::Service {
        status: Some(status.as_u16()),
        message,
        retryable,
    }
}

fn parse_retry_after(header: Option<&HeaderValue>) -> Option<u64> {
    // Retry-After HTTP-date parsing is omitted; only delta-seconds.
    header?.to_str().ok()?.parse::<u64>().ok()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_extract_image_with_grounding() {
        let json = r#"{
            "candidates": [{
                "content": {
                    "parts": [
                        { "text": "Here is your relit photo." },
                        { "inlineData": { "mimeType": "image/png", "data": "3q2+7w==" } }
                    ]
                },
                "groundingMetadata": {
                    "groundingChunks": [
                        { "web": { "uri": "https://example.com/a", "title": "A" } },
                        { "web": { "uri": "https://example.com/b" } },
                        { "web": null }
                    ]
                }
            }]
        }"#;
        let parsed: GenerateContentResponse = serde_json::from_str(json).unwrap();
        let image = extract_image_response(parsed).unwrap();

        assert_eq!(image.bytes, vec![0xde, 0xad, 0xbe, 0xef]);
        assert_eq!(image.mime_type, "image/png");
        assert_eq!(image.model_text.as_deref(), Some("Here is your relit photo."));
        assert_eq!(image.grounding.len(), 2);
        assert_eq!(image.grounding[0].uri, "https://example.com/a");
        assert_eq!(image.grounding[0].title.as_deref(), Some("A"));
        assert_eq!(image.grounding[1].title, None);
    }

    #[test]
    fn test_extract_without_image_is_service_error() {
        let json = r#"{
            "candidates": [{
                "content": { "parts": [ { "text": "I cannot edit this image." } ] }
            }]
        }"#;
        let parsed: GenerateContentResponse = serde_json::from_str(json).unwrap();
        let err = extract_image_response(parsed).unwrap_err();
        assert!(err.is_service());
        assert!(err.to_string().contains("no image"));
    }

    #[test]
    fn test_extract_without_candidates() {
        let parsed: GenerateContentResponse = serde_json::from_str("{}").unwrap();
        let err = extract_image_response(parsed).unwrap_err();
        assert!(err.is_service());
    }

    #[test]
    fn test_map_http_error_parses_error_body() {
        let body = r#"{ "error": { "code": 429, "message": "Quota exceeded", "status": "RESOURCE_EXHAUSTED" } }"#;
        let err = map_http_error(StatusCode::TOO_MANY_REQUESTS, body.to_string(), Some(30));

        match err {
            PixshopError::Service {
                status,
                message,
                retryable,
            } => {
                assert_eq!(status, Some(429));
                assert!(retryable);
                assert!(message.contains("RESOURCE_EXHAUSTED: Quota exceeded"));
                assert!(message.contains("retry after 30s"));
            }
            other => panic!("expected Service error, got {other:?}"),
        }
    }

    #[test]
    fn test_map_http_error_plain_body() {
        let err = map_http_error(StatusCode::BAD_REQUEST, "nope".to_string(), None);
        match err {
            PixshopError::Service {
                status, retryable, ..
            } => {
                assert_eq!(status, Some(400));
                assert!(!retryable);
            }
            other => panic!("expected Service error, got {other:?}"),
        }
    }

    #[test]
    fn test_request_serialization_shape() {
        let request = GeminiImageClient::build_request(
            vec![
                Part::InlineData {
                    inline_data: InlineDataPayload {
                        mime_type: "image/png".to_string(),
                        data: "QUJD".to_string(),
                    },
                },
                Part::Text {
                    text: "make it vintage".to_string(),
                },
            ],
            &GenerationOptions {
                system_instruction: Some("You are a photo editor.".to_string()),
                negative_prompt: None,
            },
        );

        let json = serde_json::to_value(&request).unwrap();
        assert_eq!(json["contents"][0]["role"], "user");
        assert_eq!(
            json["contents"][0]["parts"][0]["inlineData"]["mimeType"],
            "image/png"
        );
        assert_eq!(json["contents"][0]["parts"][1]["text"], "make it vintage");
        assert_eq!(
            json["systemInstruction"]["parts"][0]["text"],
            "You are a photo editor."
        );
        assert_eq!(
            json["generationConfig"]["responseModalities"][0],
            "IMAGE"
        );
    }
}
