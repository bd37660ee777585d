//! Configuration Types
//!
//! All configuration structures with sensible defaults.
//! Supports global (~/.config/nutrigpt/) and project (.nutrigpt/) level configuration.

use serde::{Deserialize, Serialize};

use crate::ai::{ProviderConfig, TimeoutConfig, ValidationPolicy};
use crate::app::PlanSettings;
use crate::constants::{model, network};
use crate::types::{NutriError, Result, UserProfile};

/// Root configuration structure
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct Config {
    /// Configuration version
    pub version: String,

    /// Hosted model settings
    pub llm: LlmConfig,

    /// Post-parse coercion of model results
    pub validation: ValidationConfig,

    /// Plan visualizer targets
    pub plan: PlanSettings,

    /// Profile the session starts with
    pub profile: UserProfile,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            version: "1.0".to_string(),
            llm: LlmConfig::default(),
            validation: ValidationConfig::default(),
            plan: PlanSettings::default(),
            profile: UserProfile::default(),
        }
    }
}

impl Config {
    /// Validate configuration values are within acceptable ranges.
    /// Returns `NutriError::Config` on validation failure.
    pub fn validate(&self) -> Result<()> {
        if !(0.0..=2.0).contains(&self.llm.temperature) {
            return Err(NutriError::Config(format!(
                "LLM temperature must be between 0.0 and 2.0, got {}",
                self.llm.temperature
            )));
        }

        if self.llm.timeout_secs == 0 {
            return Err(NutriError::Config(
                "LLM timeout_secs must be greater than 0".to_string(),
            ));
        }

        if self.llm.chat_model.trim().is_empty() || self.llm.vision_model.trim().is_empty() {
            return Err(NutriError::Config(
                "LLM chat_model and vision_model must not be empty".to_string(),
            ));
        }

        if self.plan.macro_total() != 100 {
            return Err(NutriError::Config(format!(
                "Plan macro percentages must add up to 100, got {}",
                self.plan.macro_total()
            )));
        }

        self.profile
            .validate()
            .map_err(|e| NutriError::Config(format!("Invalid [profile] section: {}", e)))?;

        Ok(())
    }

    /// Provider settings for [`crate::ai::create_provider`]
    pub fn provider_config(&self) -> ProviderConfig {
        ProviderConfig {
            provider: self.llm.provider.clone(),
            chat_model: self.llm.chat_model.clone(),
            vision_model: self.llm.vision_model.clone(),
            timeout_secs: self.llm.timeout_secs,
            api_key: self.llm.api_key.clone(),
            api_base: self.llm.api_base.clone(),
        }
    }

    pub fn timeouts(&self) -> TimeoutConfig {
        TimeoutConfig::from_secs(self.llm.timeout_secs)
    }
}

// =============================================================================
// LLM Configuration
// =============================================================================

#[derive(Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct LlmConfig {
    /// Provider name
    pub provider: String,

    /// Model used for conversation
    pub chat_model: String,

    /// Model used for meal and label photos
    pub vision_model: String,

    /// Request timeout in seconds
    pub timeout_secs: u64,

    /// Chat temperature (vision calls use the service default)
    pub temperature: f32,

    /// API base URL override
    pub api_base: Option<String>,

    /// API key; GEMINI_API_KEY / API_KEY are used when unset
    #[serde(skip_serializing)]
    pub api_key: Option<String>,
}

impl std::fmt::Debug for LlmConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("LlmConfig")
            .field("provider", &self.provider)
            .field("chat_model", &self.chat_model)
            .field("vision_model", &self.vision_model)
            .field("timeout_secs", &self.timeout_secs)
            .field("temperature", &self.temperature)
            .field("api_base", &self.api_base)
            .field("api_key", &self.api_key.as_ref().map(|_| "[REDACTED]"))
            .finish()
    }
}

impl Default for LlmConfig {
    fn default() -> Self {
        Self {
            provider: "gemini".to_string(),
            chat_model: model::CHAT_MODEL.to_string(),
            vision_model: model::VISION_MODEL.to_string(),
            timeout_secs: network::DEFAULT_TIMEOUT_SECS,
            temperature: model::CHAT_TEMPERATURE,
            api_base: None,
            api_key: None,
        }
    }
}

// =============================================================================
// Validation Configuration
// =============================================================================

#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct ValidationConfig {
    /// clamp, strict or passthrough
    pub policy: ValidationPolicy,
}

// =============================================================================
// Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = Config::default();
        assert_eq!(config.version, "1.0");
        assert_eq!(config.llm.provider, "gemini");
        assert_eq!(config.llm.chat_model, "gemini-3-flash-preview");
        assert_eq!(config.validation.policy, ValidationPolicy::Clamp);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_validate_rejects_bad_values() {
        let mut config = Config::default();
        config.llm.temperature = 3.0;
        assert!(matches!(config.validate(), Err(NutriError::Config(_))));

        let mut config = Config::default();
        config.plan.carbs_pct = 50;
        assert!(matches!(config.validate(), Err(NutriError::Config(_))));

        let mut config = Config::default();
        config.profile.age = 0;
        assert!(matches!(config.validate(), Err(NutriError::Config(_))));
    }

    #[test]
    fn test_api_key_hidden() {
        let mut config = Config::default();
        config.llm.api_key = Some("top-secret".into());

        assert!(!format!("{:?}", config).contains("top-secret"));
        let rendered = toml::to_string_pretty(&config).unwrap();
        assert!(!rendered.contains("top-secret"));
        assert_eq!(
            config.provider_config().api_key.as_deref(),
            Some("top-secret")
        );
    }

    #[test]
    fn test_timeouts_follow_llm_settings() {
        let mut config = Config::default();
        config.llm.timeout_secs = 15;
        assert_eq!(config.timeouts().llm_request.as_secs(), 15);
        assert_eq!(config.provider_config().timeout_secs, 15);
    }
}
