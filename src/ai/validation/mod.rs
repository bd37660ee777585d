//! AI Response Validation
//!
//! Turns raw model output text into typed results:
//! - JSON repair for fenced or prose-wrapped responses
//! - Strict field presence (missing fields are a parse failure, never a
//!   partially filled record)
//! - Range and enum coercion governed by [`ValidationPolicy`]

mod coerce;
mod json_repair;

pub use coerce::ValidationPolicy;
pub use json_repair::{JsonRepairer, extract_json};

use serde::de::DeserializeOwned;
use tracing::debug;

use crate::types::{MealAnalysis, NutriError, Result, ShoppingVerdict};

/// Chat reply text; a blank reply is the no-output condition
pub fn chat_reply(text: Option<&str>) -> Result<String> {
    text.map(str::trim)
        .filter(|t| !t.is_empty())
        .map(str::to_string)
        .ok_or_else(|| NutriError::no_output("chat"))
}

/// Parse a meal-analysis response and apply the policy
pub fn parse_meal_analysis(text: &str, policy: ValidationPolicy) -> Result<MealAnalysis> {
    let analysis: MealAnalysis = parse_record(text, "meal analysis")?;
    policy.apply_meal(analysis)
}

/// Parse a label-analysis response and apply the policy
pub fn parse_shopping_verdict(text: &str, policy: ValidationPolicy) -> Result<ShoppingVerdict> {
    let verdict: ShoppingVerdict = parse_record(text, "label analysis")?;
    policy.apply_verdict(verdict)
}

fn parse_record<T: DeserializeOwned>(text: &str, task: &str) -> Result<T> {
    let value = extract_json(text)?;
    debug!(task, "Parsed model JSON");
    serde_json::from_value(value)
        .map_err(|e| NutriError::Parse(format!("{} response has wrong shape: {}", task, e)))
}
