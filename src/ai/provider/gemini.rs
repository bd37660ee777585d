//! Google Gemini Provider
//!
//! LLM provider using the Generative Language `generateContent` endpoint.
//! Chat turns carry the persona as `systemInstruction`; vision calls send the
//! image inline and declare a JSON response schema.

use async_trait::async_trait;
use secrecy::{ExposeSecret, SecretString};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::time::{Duration, Instant};
use tracing::{debug, info, warn};

use super::{
    ChatRequest, LlmProvider, LlmResponse, ProviderConfig, ResponseMetadata, ResponseTiming,
    TokenUsage, VisionRequest,
};
use crate::constants::{model, network};
use crate::types::{ErrorClassifier, NutriError, Result};

const PROVIDER_NAME: &str = "gemini";

/// Gemini API provider with secure API key handling
pub struct GeminiProvider {
    /// API key stored securely - never exposed in logs or debug output
    api_key: SecretString,
    api_base: String,
    chat_model: String,
    vision_model: String,
    client: reqwest::Client,
}

impl std::fmt::Debug for GeminiProvider {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("GeminiProvider")
            .field("api_key", &"[REDACTED]")
            .field("api_base", &self.api_base)
            .field("chat_model", &self.chat_model)
            .field("vision_model", &self.vision_model)
            .finish()
    }
}

impl GeminiProvider {
    pub fn new(config: ProviderConfig) -> Result<Self> {
        let api_key_str = config
            .api_key
            .filter(|k| !k.trim().is_empty())
            .or_else(|| {
                model::API_KEY_ENV_VARS
                    .iter()
                    .find_map(|var| std::env::var(var).ok().filter(|k| !k.trim().is_empty()))
            })
            .ok_or_else(|| {
                NutriError::Config(
                    "Gemini API key not found. Set GEMINI_API_KEY env var or llm.api_key in config"
                        .to_string(),
                )
            })?;

        let api_base = config
            .api_base
            .unwrap_or_else(|| model::API_BASE.to_string())
            .trim_end_matches('/')
            .to_string();

        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .connect_timeout(Duration::from_secs(network::CONNECTION_TIMEOUT_SECS))
            .build()
            .map_err(|e| NutriError::Config(format!("Failed to create HTTP client: {}", e)))?;

        Ok(Self {
            api_key: SecretString::from(api_key_str),
            api_base,
            chat_model: config.chat_model,
            vision_model: config.vision_model,
            client,
        })
    }

    fn build_url(&self, model: &str) -> String {
        format!("{}/models/{}:generateContent", self.api_base, model)
    }

    fn build_chat_request(request: &ChatRequest<'_>) -> GenerateContentRequest {
        let mut contents: Vec<Content> = request
            .history
            .iter()
            .map(|m| Content {
                role: Some(m.role.as_str().to_string()),
                parts: vec![Part::Text {
                    text: m.text.clone(),
                }],
            })
            .collect();

        contents.push(Content {
            role: Some("user".to_string()),
            parts: vec![Part::Text {
                text: request.message.to_string(),
            }],
        });

        GenerateContentRequest {
            contents,
            system_instruction: Some(Content {
                role: None,
                parts: vec![Part::Text {
                    text: request.system_instruction.to_string(),
                }],
            }),
            generation_config: Some(GenerationConfig {
                temperature: Some(request.temperature),
                response_mime_type: None,
                response_schema: None,
            }),
        }
    }

    fn build_vision_request(request: &VisionRequest<'_>) -> GenerateContentRequest {
        GenerateContentRequest {
            contents: vec![Content {
                role: Some("user".to_string()),
                parts: vec![
                    Part::InlineData {
                        inline_data: InlineData {
                            mime_type: request.image.mime_type.clone(),
                            data: request.image.data.clone(),
                        },
                    },
                    Part::Text {
                        text: request.prompt.to_string(),
                    },
                ],
            }],
            system_instruction: None,
            generation_config: Some(GenerationConfig {
                temperature: None,
                response_mime_type: Some("application/json".to_string()),
                response_schema: Some(request.schema.clone()),
            }),
        }
    }

    async fn send(&self, model: &str, body: &GenerateContentRequest) -> Result<LlmResponse> {
        let start_time = Instant::now();
        let url = self.build_url(model);

        debug!(model, "Sending request to Gemini API");

        let response = self
            .client
            .post(&url)
            .header("x-goog-api-key", self.api_key.expose_secret())
            .json(body)
            .send()
            .await
            .map_err(|e| ErrorClassifier::classify_transport(&e, PROVIDER_NAME))?;

        let elapsed = start_time.elapsed();
        let status = response.status();
        let response_text = response
            .text()
            .await
            .map_err(|e| ErrorClassifier::classify_transport(&e, PROVIDER_NAME))?;

        if !status.is_success() {
            let message = serde_json::from_str::<GenerateContentResponse>(&response_text)
                .ok()
                .and_then(|r| r.error)
                .map_or(response_text, |e| e.message);
            return Err(ErrorClassifier::classify_http_status(
                status.as_u16(),
                &format!("Gemini API error ({}): {}", status, message),
                PROVIDER_NAME,
            )
            .into());
        }

        let parsed: GenerateContentResponse = serde_json::from_str(&response_text)
            .map_err(|e| NutriError::Parse(format!("Failed to parse Gemini response: {}", e)))?;

        if let Some(error) = parsed.error {
            return Err(ErrorClassifier::classify_http_status(
                error.code.unwrap_or(500),
                &format!("Gemini API error: {}", error.message),
                PROVIDER_NAME,
            )
            .into());
        }

        let usage = parsed
            .usage_metadata
            .as_ref()
            .map(|u| TokenUsage {
                input_tokens: u.prompt_token_count.unwrap_or(0),
                output_tokens: u.candidates_token_count.unwrap_or(0),
            })
            .unwrap_or_default();

        let candidate = parsed.candidates.unwrap_or_default().into_iter().next();
        let finish_reason = candidate.as_ref().and_then(|c| c.finish_reason.clone());
        let text = candidate
            .and_then(|c| c.content)
            .map(|content| {
                content
                    .parts
                    .into_iter()
                    .filter_map(|p| p.text)
                    .collect::<String>()
            })
            .filter(|t| !t.is_empty());

        if text.is_none() {
            warn!(model, ?finish_reason, "Gemini returned no text");
        }

        debug!(
            model,
            elapsed_ms = elapsed.as_millis() as u64,
            tokens = usage.total(),
            "Received Gemini response"
        );

        Ok(LlmResponse {
            text,
            usage,
            timing: ResponseTiming::from_duration(elapsed),
            metadata: ResponseMetadata {
                model: model.to_string(),
                provider: PROVIDER_NAME.to_string(),
                finish_reason,
            },
        })
    }
}

#[async_trait]
impl LlmProvider for GeminiProvider {
    async fn chat(&self, request: ChatRequest<'_>) -> Result<LlmResponse> {
        info!(
            "Chatting with Gemini (model: {}, history: {}, temperature: {})",
            self.chat_model,
            request.history.len(),
            request.temperature
        );
        let body = Self::build_chat_request(&request);
        self.send(&self.chat_model, &body).await
    }

    async fn generate_with_image(&self, request: VisionRequest<'_>) -> Result<LlmResponse> {
        info!(
            "Analyzing image with Gemini (model: {}, mime: {})",
            self.vision_model, request.image.mime_type
        );
        let body = Self::build_vision_request(&request);
        self.send(&self.vision_model, &body).await
    }

    fn name(&self) -> &str {
        PROVIDER_NAME
    }

    async fn health_check(&self) -> Result<bool> {
        let url = format!("{}/models/{}", self.api_base, self.chat_model);

        let response = self
            .client
            .get(&url)
            .header("x-goog-api-key", self.api_key.expose_secret())
            .send()
            .await;

        match response {
            Ok(resp) if resp.status().is_success() => {
                info!("Gemini API is available");
                Ok(true)
            }
            Ok(resp) => {
                warn!("Gemini API check failed: {}", resp.status());
                Ok(false)
            }
            Err(e) => {
                warn!("Gemini API check failed: {}", e);
                Ok(false)
            }
        }
    }
}

// Request/Response types

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct GenerateContentRequest {
    contents: Vec<Content>,
    #[serde(skip_serializing_if = "Option::is_none")]
    system_instruction: Option<Content>,
    #[serde(skip_serializing_if = "Option::is_none")]
    generation_config: Option<GenerationConfig>,
}

#[derive(Debug, Serialize)]
struct Content {
    #[serde(skip_serializing_if = "Option::is_none")]
    role: Option<String>,
    parts: Vec<Part>,
}

#[derive(Debug, Serialize)]
#[serde(untagged)]
enum Part {
    Text {
        text: String,
    },
    InlineData {
        #[serde(rename = "inlineData")]
        inline_data: InlineData,
    },
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct InlineData {
    mime_type: String,
    data: String,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct GenerationConfig {
    #[serde(skip_serializing_if = "Option::is_none")]
    temperature: Option<f32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    response_mime_type: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    response_schema: Option<Value>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct GenerateContentResponse {
    candidates: Option<Vec<Candidate>>,
    usage_metadata: Option<UsageMetadata>,
    error: Option<ApiError>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct Candidate {
    content: Option<ResponseContent>,
    finish_reason: Option<String>,
}

#[derive(Debug, Deserialize)]
struct ResponseContent {
    #[serde(default)]
    parts: Vec<ResponsePart>,
}

#[derive(Debug, Deserialize)]
struct ResponsePart {
    text: Option<String>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct UsageMetadata {
    prompt_token_count: Option<u32>,
    candidates_token_count: Option<u32>,
}

#[derive(Debug, Deserialize)]
struct ApiError {
    code: Option<u16>,
    message: String,
}
