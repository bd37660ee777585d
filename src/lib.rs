//! NutriGPT - Pocket Nutrition Coach
//!
//! Orchestration layer between a user and a hosted multimodal model: free-form
//! coaching chat, meal photo analysis, and nutrition label verdicts, with a
//! terminal front end.
//!
//! ## Core Features
//!
//! - **Coach**: three model-backed operations that never fail the caller;
//!   any error becomes a tagged fallback value
//! - **Structured Output**: vision calls request JSON against a response
//!   schema, then repair, parse and coerce what comes back
//! - **Session State**: a single reducer owns the view, profile, chat and
//!   meal log; one request per component at a time
//! - **Plan**: calorie and macro targets with a weekly consistency chart
//!
//! ## Quick Start
//!
//! ```ignore
//! use nutrigpt::{App, ConfigLoader, NutriCoach, create_provider};
//!
//! let config = ConfigLoader::load()?;
//! let coach = NutriCoach::new(create_provider(&config.provider_config())?)
//!     .with_timeouts(config.timeouts());
//! let app = App::new(coach, config.profile.clone());
//! let reply = app.send_message("Give me a snack idea!").await?;
//! println!("{}", reply.value());
//! ```
//!
//! ## Modules
//!
//! - [`ai`]: model provider, prompts, response schemas, validation
//! - [`coach`]: chat, meal and label operations with fallbacks
//! - [`app`]: session state, busy tracking, plan
//! - [`config`]: layered configuration
//! - [`cli`]: terminal views and commands

pub mod ai;
pub mod app;
pub mod cli;
pub mod coach;
pub mod config;
pub mod constants;
pub mod image;
pub mod types;

// =============================================================================
// Core Re-exports
// =============================================================================

// Configuration
pub use config::{Config, ConfigLoader};

// Error Types
pub use types::error::{ErrorCategory, NutriError, Result};

// Domain
pub use types::{
    ChatMessage, Goal, Meal, MealAnalysis, ProfileUpdate, ShoppingVerdict, UserProfile, Verdict,
    View,
};

// =============================================================================
// Session Re-exports
// =============================================================================

pub use app::{App, AppState, Command, Plan, PlanSettings};
pub use coach::{NutriCoach, Outcome};
pub use image::InlineImage;

// =============================================================================
// AI Re-exports
// =============================================================================

pub use ai::{
    GeminiProvider, LlmProvider, LlmResponse, SharedProvider, TimeoutConfig, ValidationPolicy,
    create_provider, with_timeout,
};
