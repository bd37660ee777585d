//! NutriGPT coach
//!
//! The three model-backed operations: chat, meal-photo analysis and label
//! analysis. Each is exactly one round-trip bounded by the configured
//! timeout. Failures never escape [`NutriCoach::chat`],
//! [`NutriCoach::analyze_meal`] or [`NutriCoach::analyze_label`]; they are
//! logged and replaced by a fallback tagged with the error category.
//!
//! The `try_*` variants return the raw `Result` for callers that want to
//! handle errors themselves.

use tracing::{error, info, instrument, warn};

use crate::ai::{
    ChatRequest, PromptTemplates, SharedProvider, TimeoutConfig, ValidationPolicy, VisionRequest,
    chat_reply, parse_meal_analysis, parse_shopping_verdict, schema, with_timeout,
};
use crate::constants::{fallback, model};
use crate::image::InlineImage;
use crate::types::{
    ChatMessage, ErrorCategory, MealAnalysis, NutriError, Result, ShoppingVerdict, UserProfile,
};

/// Result of a coach call: either what the model said or a fallback
#[derive(Debug, Clone, PartialEq)]
pub enum Outcome<T> {
    Model(T),
    Fallback { value: T, category: ErrorCategory },
}

impl<T> Outcome<T> {
    pub fn value(&self) -> &T {
        match self {
            Outcome::Model(value) | Outcome::Fallback { value, .. } => value,
        }
    }

    pub fn into_value(self) -> T {
        match self {
            Outcome::Model(value) | Outcome::Fallback { value, .. } => value,
        }
    }

    pub fn is_fallback(&self) -> bool {
        matches!(self, Outcome::Fallback { .. })
    }

    /// Category of the failure that produced a fallback
    pub fn fallback_category(&self) -> Option<ErrorCategory> {
        match self {
            Outcome::Model(_) => None,
            Outcome::Fallback { category, .. } => Some(*category),
        }
    }

    pub fn map<U>(self, f: impl FnOnce(T) -> U) -> Outcome<U> {
        match self {
            Outcome::Model(value) => Outcome::Model(f(value)),
            Outcome::Fallback { value, category } => Outcome::Fallback {
                value: f(value),
                category,
            },
        }
    }
}

/// Model-backed nutrition coach
#[derive(Clone)]
pub struct NutriCoach {
    provider: SharedProvider,
    timeouts: TimeoutConfig,
    policy: ValidationPolicy,
    temperature: f32,
    persona: String,
}

impl std::fmt::Debug for NutriCoach {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("NutriCoach")
            .field("provider", &self.provider.name())
            .field("timeouts", &self.timeouts)
            .field("policy", &self.policy)
            .field("temperature", &self.temperature)
            .finish()
    }
}

impl NutriCoach {
    pub fn new(provider: SharedProvider) -> Self {
        Self {
            provider,
            timeouts: TimeoutConfig::default(),
            policy: ValidationPolicy::default(),
            temperature: model::CHAT_TEMPERATURE,
            persona: PromptTemplates::persona(),
        }
    }

    pub fn with_timeouts(mut self, timeouts: TimeoutConfig) -> Self {
        self.timeouts = timeouts;
        self
    }

    pub fn with_policy(mut self, policy: ValidationPolicy) -> Self {
        self.policy = policy;
        self
    }

    pub fn with_temperature(mut self, temperature: f32) -> Self {
        self.temperature = temperature;
        self
    }

    pub fn policy(&self) -> ValidationPolicy {
        self.policy
    }

    // =========================================================================
    // Chat
    // =========================================================================

    /// Reply to `message` given the prior conversation
    pub async fn chat(&self, history: &[ChatMessage], message: &str) -> Outcome<String> {
        match self.try_chat(history, message).await {
            Ok(reply) => Outcome::Model(reply),
            Err(e) => {
                let category = e.category();
                let value = if matches!(e, NutriError::NoOutput { .. }) {
                    fallback::EMPTY_CHAT_REPLY
                } else {
                    error!(%category, "Chat error: {}", e);
                    fallback::CHAT_ERROR_REPLY
                };
                warn!(%category, "Returning fallback chat reply");
                Outcome::Fallback {
                    value: value.to_string(),
                    category,
                }
            }
        }
    }

    #[instrument(skip_all, fields(history = history.len()))]
    pub async fn try_chat(&self, history: &[ChatMessage], message: &str) -> Result<String> {
        let request = ChatRequest {
            system_instruction: &self.persona,
            history,
            message,
            temperature: self.temperature,
        };
        let response = with_timeout(
            self.timeouts.llm_request,
            self.provider.chat(request),
            "chat",
        )
        .await?;

        info!(
            tokens = response.usage.total(),
            elapsed_ms = response.timing.total_ms,
            "Chat reply received"
        );
        chat_reply(response.text.as_deref())
    }

    // =========================================================================
    // Vision
    // =========================================================================

    /// Analyze a meal photo for the given profile
    pub async fn analyze_meal(
        &self,
        image: &InlineImage,
        profile: &UserProfile,
    ) -> Outcome<MealAnalysis> {
        match self.try_analyze_meal(image, profile).await {
            Ok(analysis) => Outcome::Model(analysis),
            Err(e) => {
                let category = e.category();
                error!(%category, "Meal analysis error: {}", e);
                warn!(%category, "Returning fallback meal analysis");
                Outcome::Fallback {
                    value: MealAnalysis::fallback(),
                    category,
                }
            }
        }
    }

    #[instrument(skip_all, fields(mime = %image.mime_type, goal = %profile.goal))]
    pub async fn try_analyze_meal(
        &self,
        image: &InlineImage,
        profile: &UserProfile,
    ) -> Result<MealAnalysis> {
        let prompt = PromptTemplates::meal_analysis(profile);
        let text = self
            .vision(image, &prompt, &schema::meal_analysis(), "meal analysis")
            .await?;
        parse_meal_analysis(&text, self.policy)
    }

    /// Analyze a nutrition label or product photo
    pub async fn analyze_label(&self, image: &InlineImage) -> Outcome<ShoppingVerdict> {
        match self.try_analyze_label(image).await {
            Ok(verdict) => Outcome::Model(verdict),
            Err(e) => {
                let category = e.category();
                error!(%category, "Label analysis error: {}", e);
                warn!(%category, "Returning fallback label verdict");
                Outcome::Fallback {
                    value: ShoppingVerdict::fallback(),
                    category,
                }
            }
        }
    }

    #[instrument(skip_all, fields(mime = %image.mime_type))]
    pub async fn try_analyze_label(&self, image: &InlineImage) -> Result<ShoppingVerdict> {
        let prompt = PromptTemplates::label_analysis();
        let text = self
            .vision(image, &prompt, &schema::label_analysis(), "label analysis")
            .await?;
        parse_shopping_verdict(&text, self.policy)
    }

    async fn vision(
        &self,
        image: &InlineImage,
        prompt: &str,
        schema: &serde_json::Value,
        task: &str,
    ) -> Result<String> {
        let request = VisionRequest {
            image,
            prompt,
            schema,
        };
        let response = with_timeout(
            self.timeouts.llm_request,
            self.provider.generate_with_image(request),
            task,
        )
        .await?;

        info!(
            task,
            tokens = response.usage.total(),
            elapsed_ms = response.timing.total_ms,
            "Vision response received"
        );
        response
            .non_empty_text()
            .map(str::to_string)
            .ok_or_else(|| NutriError::no_output(task))
    }
}
