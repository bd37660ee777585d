//! AI Integration Layer
//!
//! Prompt construction, the hosted-model provider, response schemas and
//! validation of what comes back.

pub mod prompt;
pub mod provider;
pub mod schema;
pub mod timeout;
pub mod validation;

pub use prompt::{PromptBuilder, PromptSection, PromptTemplates};
pub use provider::{
    ChatRequest, GeminiProvider, LlmProvider, LlmResponse, ProviderConfig, ResponseMetadata,
    ResponseTiming, SharedProvider, TokenUsage, VisionRequest, create_provider,
};
pub use timeout::{TimeoutConfig, with_timeout};
pub use validation::{
    JsonRepairer, ValidationPolicy, chat_reply, extract_json, parse_meal_analysis,
    parse_shopping_verdict,
};
