//! LLM Provider Abstraction
//!
//! Defines the LlmProvider trait used by the coach. A provider performs exactly
//! one round-trip per call and never retries; fallbacks are decided by the
//! caller.

mod gemini;
#[cfg(test)]
pub(crate) mod scripted;

pub use gemini::GeminiProvider;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::sync::Arc;

use crate::constants::{model, network};
use crate::image::InlineImage;
use crate::types::{ChatMessage, NutriError, Result};

// =============================================================================
// Requests
// =============================================================================

/// One chat turn: persona, prior conversation and the new message
#[derive(Debug, Clone, Copy)]
pub struct ChatRequest<'a> {
    pub system_instruction: &'a str,
    pub history: &'a [ChatMessage],
    pub message: &'a str,
    pub temperature: f32,
}

/// One multimodal call with a declared output schema
#[derive(Debug, Clone, Copy)]
pub struct VisionRequest<'a> {
    pub image: &'a InlineImage,
    pub prompt: &'a str,
    pub schema: &'a Value,
}

// =============================================================================
// LLM Response with Usage Metrics
// =============================================================================

/// Raw model response before any parsing
#[derive(Debug, Clone, Default)]
pub struct LlmResponse {
    /// Concatenated text parts; `None` when the model produced no text
    pub text: Option<String>,
    /// Token usage metrics
    pub usage: TokenUsage,
    /// Response timing
    pub timing: ResponseTiming,
    /// Provider and model info
    pub metadata: ResponseMetadata,
}

impl LlmResponse {
    /// Create response with text only (usage unknown)
    pub fn text_only(text: impl Into<String>) -> Self {
        Self {
            text: Some(text.into()),
            ..Self::default()
        }
    }

    /// Text with surrounding whitespace removed, if any remains
    pub fn non_empty_text(&self) -> Option<&str> {
        self.text
            .as_deref()
            .map(str::trim)
            .filter(|t| !t.is_empty())
    }
}

/// Token usage metrics
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct TokenUsage {
    pub input_tokens: u32,
    pub output_tokens: u32,
}

impl TokenUsage {
    pub fn total(&self) -> u32 {
        self.input_tokens + self.output_tokens
    }
}

/// Response timing metrics
#[derive(Debug, Clone, Default)]
pub struct ResponseTiming {
    /// Total response time in milliseconds (wall clock)
    pub total_ms: u64,
}

impl ResponseTiming {
    pub fn from_duration(duration: std::time::Duration) -> Self {
        Self {
            total_ms: duration.as_millis() as u64,
        }
    }
}

/// Response metadata
#[derive(Debug, Clone, Default)]
pub struct ResponseMetadata {
    pub model: String,
    pub provider: String,
    /// Why generation stopped, as reported by the provider
    pub finish_reason: Option<String>,
}

/// Shared provider handle
pub type SharedProvider = Arc<dyn LlmProvider>;

// =============================================================================
// Provider Configuration
// =============================================================================

/// Configuration for LLM providers
///
/// The API key is never serialized and is redacted in debug output.
#[derive(Clone, Serialize, Deserialize)]
pub struct ProviderConfig {
    /// Provider type: "gemini"
    pub provider: String,
    /// Model used for conversation
    pub chat_model: String,
    /// Model used for image analysis
    pub vision_model: String,
    /// Request timeout in seconds
    pub timeout_secs: u64,
    #[serde(default, skip_serializing)]
    pub api_key: Option<String>,
    /// API base URL (for proxies and tests)
    #[serde(default)]
    pub api_base: Option<String>,
}

impl std::fmt::Debug for ProviderConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ProviderConfig")
            .field("provider", &self.provider)
            .field("chat_model", &self.chat_model)
            .field("vision_model", &self.vision_model)
            .field("timeout_secs", &self.timeout_secs)
            .field("api_key", &self.api_key.as_ref().map(|_| "[REDACTED]"))
            .field("api_base", &self.api_base)
            .finish()
    }
}

impl Default for ProviderConfig {
    fn default() -> Self {
        Self {
            provider: "gemini".to_string(),
            chat_model: model::CHAT_MODEL.to_string(),
            vision_model: model::VISION_MODEL.to_string(),
            timeout_secs: network::DEFAULT_TIMEOUT_SECS,
            api_key: None,
            api_base: None,
        }
    }
}

// =============================================================================
// LLM Provider Trait
// =============================================================================

#[async_trait]
pub trait LlmProvider: Send + Sync {
    /// Send one message in a fresh session seeded with the given history
    async fn chat(&self, request: ChatRequest<'_>) -> Result<LlmResponse>;

    /// Analyze an inline image, asking for JSON matching `request.schema`
    async fn generate_with_image(&self, request: VisionRequest<'_>) -> Result<LlmResponse>;

    /// Provider name for logging
    fn name(&self) -> &str;

    /// Check if the provider is reachable with the configured key
    async fn health_check(&self) -> Result<bool>;
}

/// Create a shared provider from configuration
pub fn create_provider(config: &ProviderConfig) -> Result<SharedProvider> {
    match config.provider.as_str() {
        "gemini" => Ok(Arc::new(GeminiProvider::new(config.clone())?)),
        _ => Err(NutriError::Config(format!(
            "Unknown provider: {}. Supported: gemini",
            config.provider
        ))),
    }
}
