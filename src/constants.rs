//! Global Constants
//!
//! Centralized constants for configuration and tuning.
//! User-visible fallback strings live here so views and tests agree on them.

/// Values returned in place of a failed model call
pub mod fallback {
    /// Chat reply when the model answered with no text
    pub const EMPTY_CHAT_REPLY: &str = "Oops, my brain is buffering! 🧠⚡";

    /// Chat reply when the request failed
    pub const CHAT_ERROR_REPLY: &str = "Something went wrong connecting to the nutrition matrix! 🍓";

    pub const MEAL_NAME: &str = "Mystery Meal";
    pub const MEAL_SCORE: f64 = 5.0;
    pub const MEAL_VIBE_CHECK: &str = "Couldn't analyze this one, but looks tasty! 😋";

    pub const LABEL_SCORE: f64 = 0.0;
    pub const LABEL_EXPLANATION: &str = "I couldn't read that label clearly! 🕵️‍♀️";
}

/// Hosted model defaults
pub mod model {
    /// Model used for conversation
    pub const CHAT_MODEL: &str = "gemini-3-flash-preview";

    /// Model used for image analysis
    pub const VISION_MODEL: &str = "gemini-2.5-flash-image";

    /// Base URL of the Generative Language API
    pub const API_BASE: &str = "https://generativelanguage.googleapis.com/v1beta";

    /// Creative, playful replies
    pub const CHAT_TEMPERATURE: f32 = 0.9;

    /// Environment variables checked for the API key, in order
    pub const API_KEY_ENV_VARS: [&str; 2] = ["GEMINI_API_KEY", "API_KEY"];

    /// MIME type assumed for images of unknown type
    pub const DEFAULT_IMAGE_MIME: &str = "image/jpeg";
}

/// Network constants
pub mod network {
    /// Default timeout for one model round-trip (seconds)
    pub const DEFAULT_TIMEOUT_SECS: u64 = 60;

    /// Connection timeout (seconds)
    pub const CONNECTION_TIMEOUT_SECS: u64 = 10;
}

/// Score bounds enforced by the clamp policy
pub mod score {
    pub const MIN: f64 = 1.0;
    pub const MAX: f64 = 10.0;

    /// Replacement for NaN/inf scores
    pub const NEUTRAL: f64 = 5.0;
}

/// Plan visualizer defaults
pub mod plan {
    pub const DAILY_CALORIES: u32 = 2400;
    pub const PROTEIN_PCT: u8 = 30;
    pub const FATS_PCT: u8 = 25;
    pub const CARBS_PCT: u8 = 45;

    /// Badges always shown under wellness power-ups
    pub const POWER_UPS: [&str; 4] = ["Brain Fuel", "Strong Bones", "Heart Happy", "Energy Max"];
}

/// Dashboard quick chips: (label, message sent)
pub const QUICK_CHIPS: [(&str, &str); 3] = [
    (
        "How am I doing today?",
        "How am I doing today based on my logs?",
    ),
    (
        "Give me a snack idea! 🍎",
        "I need a healthy snack idea that fits my plan!",
    ),
    (
        "Explain Macro splits",
        "Can you explain my macro splits simply?",
    ),
];
