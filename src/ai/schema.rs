//! Response schemas declared to the hosted model
//!
//! Gemini accepts an OpenAPI-style subset with upper-case type names.

use serde_json::{Value, json};

/// Schema for meal-photo analysis
pub fn meal_analysis() -> Value {
    json!({
        "type": "OBJECT",
        "properties": {
            "name": { "type": "STRING" },
            "calories": { "type": "NUMBER" },
            "macros": {
                "type": "OBJECT",
                "properties": {
                    "protein": { "type": "NUMBER" },
                    "carbs": { "type": "NUMBER" },
                    "fat": { "type": "NUMBER" }
                },
                "required": ["protein", "carbs", "fat"]
            },
            "score": { "type": "NUMBER" },
            "vibeCheck": { "type": "STRING" }
        },
        "required": ["name", "calories", "macros", "score", "vibeCheck"]
    })
}

/// Schema for nutrition-label analysis
pub fn label_analysis() -> Value {
    json!({
        "type": "OBJECT",
        "properties": {
            "score": { "type": "NUMBER" },
            "verdict": { "type": "STRING", "enum": ["GO", "STOP", "CAUTION"] },
            "explanation": { "type": "STRING" }
        },
        "required": ["score", "verdict", "explanation"]
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_label_schema_enumerates_verdicts() {
        let schema = label_analysis();
        let verdicts = schema["properties"]["verdict"]["enum"].as_array().unwrap();
        assert_eq!(verdicts.len(), 3);
        assert!(verdicts.contains(&json!("CAUTION")));
    }

    #[test]
    fn test_meal_schema_requires_every_field() {
        let schema = meal_analysis();
        let required = schema["required"].as_array().unwrap();
        for field in ["name", "calories", "macros", "score", "vibeCheck"] {
            assert!(required.contains(&json!(field)), "missing {}", field);
        }
    }
}
