//! Configuration Loader (Figment-based)
//!
//! Loads and merges configuration from multiple sources using Figment:
//! 1. Built-in defaults (Serialized)
//! 2. Global config (~/.config/nutrigpt/config.toml)
//! 3. Project config (.nutrigpt/config.toml)
//! 4. Environment variables (NUTRIGPT_* prefix, `__` between section and key)

use figment::{
    Figment,
    providers::{Env, Format, Serialized, Toml},
};
use std::env;
use std::fs;
use std::path::{Path, PathBuf};

use tracing::{debug, info};

use super::types::Config;
use crate::types::{NutriError, Result};

/// Configuration loader
pub struct ConfigLoader;

impl ConfigLoader {
    /// Load configuration with full resolution chain using Figment:
    /// defaults → global → project → env vars
    pub fn load() -> Result<Config> {
        Self::load_from(
            Self::global_config_path().as_deref(),
            &Self::project_config_path(),
        )
    }

    /// Load with explicit global and project files; missing files are skipped
    pub fn load_from(global: Option<&Path>, project: &Path) -> Result<Config> {
        let mut figment = Figment::new().merge(Serialized::defaults(Config::default()));

        if let Some(global_path) = global
            && global_path.exists()
        {
            debug!("Loading global config from: {}", global_path.display());
            figment = figment.merge(Toml::file(global_path));
        }

        if project.exists() {
            debug!("Loading project config from: {}", project.display());
            figment = figment.merge(Toml::file(project));
        }

        // e.g. NUTRIGPT_LLM__CHAT_MODEL -> llm.chat_model
        figment = figment.merge(Env::prefixed("NUTRIGPT_").split("__"));

        let config: Config = figment
            .extract()
            .map_err(|e| NutriError::Config(format!("Configuration error: {}", e)))?;

        config.validate()?;

        Ok(config)
    }

    // =========================================================================
    // Path Management
    // =========================================================================

    /// Get path to global config directory (~/.config/nutrigpt/)
    pub fn global_dir() -> Option<PathBuf> {
        env::var("XDG_CONFIG_HOME")
            .ok()
            .map(PathBuf::from)
            .or_else(|| {
                env::var("HOME")
                    .ok()
                    .map(|home| PathBuf::from(home).join(".config"))
            })
            .map(|p| p.join("nutrigpt"))
    }

    /// Get path to global config file
    pub fn global_config_path() -> Option<PathBuf> {
        Self::global_dir().map(|dir| dir.join("config.toml"))
    }

    /// Get path to project config file
    pub fn project_config_path() -> PathBuf {
        PathBuf::from(".nutrigpt/config.toml")
    }

    // =========================================================================
    // Config Commands
    // =========================================================================

    /// Config file locations and whether they exist
    pub fn paths() -> Vec<(&'static str, Option<PathBuf>)> {
        vec![
            ("Global", Self::global_config_path()),
            ("Project", Some(Self::project_config_path())),
        ]
    }

    /// Current effective configuration, rendered as TOML or JSON
    pub fn render(config: &Config, as_json: bool) -> Result<String> {
        if as_json {
            Ok(serde_json::to_string_pretty(config)?)
        } else {
            toml::to_string_pretty(config).map_err(|e| NutriError::Config(e.to_string()))
        }
    }

    // =========================================================================
    // Initialization
    // =========================================================================

    /// Write a default config file; returns its path
    ///
    /// An existing file is kept unless `force` is set.
    pub fn init(global: bool, force: bool) -> Result<(PathBuf, bool)> {
        let path = if global {
            Self::global_config_path().ok_or_else(|| {
                NutriError::Config("Cannot determine global config directory".to_string())
            })?
        } else {
            Self::project_config_path()
        };
        let written = Self::write_default(&path, force)?;
        Ok((path, written))
    }

    /// Write the default config to `path`; returns false if it already existed
    pub fn write_default(path: &Path, force: bool) -> Result<bool> {
        if path.exists() && !force {
            info!("Config exists: {}", path.display());
            return Ok(false);
        }
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)?;
        }
        fs::write(path, Self::default_config())?;
        info!("Created config: {}", path.display());
        Ok(true)
    }

    // =========================================================================
    // Internal
    // =========================================================================

    /// Default config file content (TOML)
    fn default_config() -> String {
        r#"# NutriGPT Configuration
# Project settings in .nutrigpt/config.toml override ~/.config/nutrigpt/config.toml.
# Environment variables override both, e.g. NUTRIGPT_LLM__TIMEOUT_SECS=30.

version = "1.0"

[llm]
provider = "gemini"
chat_model = "gemini-3-flash-preview"
vision_model = "gemini-2.5-flash-image"
timeout_secs = 60
temperature = 0.9
# api_key = "..."   # or set GEMINI_API_KEY

[validation]
# clamp | strict | passthrough
policy = "clamp"

[plan]
daily_calories = 2400
protein_pct = 30
fats_pct = 25
carbs_pct = 45

[profile]
name = "Alex"
age = 28
height = 175.0
weight = 70.0
target_weight = 65.0
goal = "Weight Loss"
allergies = ["Peanuts"]
wellness_goals = ["Better Skin", "Energy"]
"#
        .to_string()
    }
}
