//! CLI Common Utilities
//!
//! Shared initialization for command handlers: load config once, apply CLI
//! overrides, and build the coach only for commands that talk to the model.

use std::sync::Arc;

use crate::ai::{SharedProvider, TimeoutConfig, ValidationPolicy, create_provider};
use crate::app::{App, Plan};
use crate::coach::NutriCoach;
use crate::config::{Config, ConfigLoader};
use crate::types::Result;

/// Overrides taken from global CLI flags
#[derive(Debug, Clone, Default)]
pub struct Overrides {
    pub timeout_secs: Option<u64>,
    pub policy: Option<ValidationPolicy>,
}

/// Command execution context
#[derive(Debug, Clone)]
pub struct CommandContext {
    /// Effective configuration after CLI overrides
    pub config: Config,
}

impl CommandContext {
    /// Load config from all layers and apply `overrides` on top
    pub fn load(overrides: &Overrides) -> Result<Self> {
        let config = ConfigLoader::load()?;
        Self::from_config(config, overrides)
    }

    pub fn from_config(mut config: Config, overrides: &Overrides) -> Result<Self> {
        if let Some(secs) = overrides.timeout_secs {
            config.llm.timeout_secs = secs;
        }
        if let Some(policy) = overrides.policy {
            config.validation.policy = policy;
        }
        config.validate()?;
        Ok(Self { config })
    }

    /// Build the configured provider; fails when no API key is configured
    pub fn provider(&self) -> Result<SharedProvider> {
        create_provider(&self.config.provider_config())
    }

    /// Build the coach; fails when no API key is configured
    pub fn coach(&self) -> Result<NutriCoach> {
        Ok(NutriCoach::new(self.provider()?)
            .with_timeouts(self.timeouts())
            .with_policy(self.config.validation.policy)
            .with_temperature(self.config.llm.temperature))
    }

    /// Build a fresh session seeded with the configured profile
    pub fn app(&self) -> Result<Arc<App>> {
        let coach = self.coach()?;
        Ok(Arc::new(App::new(coach, self.config.profile.clone())))
    }

    pub fn timeouts(&self) -> TimeoutConfig {
        self.config.timeouts()
    }

    /// Plan for the configured profile with no logged meals
    pub fn plan(&self) -> Plan {
        Plan::for_profile(&self.config.profile, &[], &self.config.plan)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::NutriError;

    #[test]
    fn test_overrides_applied() {
        let overrides = Overrides {
            timeout_secs: Some(5),
            policy: Some(ValidationPolicy::Strict),
        };
        let ctx = CommandContext::from_config(Config::default(), &overrides).unwrap();
        assert_eq!(ctx.config.llm.timeout_secs, 5);
        assert_eq!(ctx.timeouts().llm_request.as_secs(), 5);
        assert_eq!(ctx.config.validation.policy, ValidationPolicy::Strict);
    }

    #[test]
    fn test_zero_timeout_rejected() {
        let overrides = Overrides {
            timeout_secs: Some(0),
            policy: None,
        };
        let err = CommandContext::from_config(Config::default(), &overrides).unwrap_err();
        assert!(matches!(err, NutriError::Config(_)));
    }

    #[test]
    fn test_plan_uses_config() {
        let mut config = Config::default();
        config.plan.daily_calories = 1800;
        let ctx = CommandContext::from_config(config, &Overrides::default()).unwrap();
        assert_eq!(ctx.plan().daily_calories, 1800);
    }
}
