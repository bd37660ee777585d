//! JSON Extraction
//!
//! Extraction of the JSON object a vision call returns.
//!
//! Handles the usual hosted-model output issues:
//! - Markdown code fence wrapping (```json ... ```)
//! - JSON embedded in explanatory text
//!
//! Only a complete object is accepted. Truncated or malformed bodies are a
//! parse error, never a partially-filled record.

use serde_json::Value;
use tracing::{debug, warn};

use crate::types::{NutriError, Result};

/// Extract and parse the JSON object in a model response
pub fn extract_json(content: &str) -> Result<Value> {
    JsonRepairer.parse_or_repair(content).map(|(value, _)| value)
}

/// Lenient JSON extraction
#[derive(Debug, Clone, Copy, Default)]
pub struct JsonRepairer;

impl JsonRepairer {
    /// Parse JSON, falling back to the first complete object in the text
    ///
    /// Returns (Value, was_extracted)
    pub fn parse_or_repair(&self, raw: &str) -> Result<(Value, bool)> {
        let cleaned = preprocess(raw);
        if cleaned.is_empty() {
            return Err(NutriError::Parse("response is empty".to_string()));
        }

        if let Ok(value) = serde_json::from_str::<Value>(&cleaned) {
            return Ok((value, false));
        }

        debug!("Direct JSON parse failed, looking for an embedded object");

        if let Some(candidate) = extract_object(&cleaned)
            && let Ok(value) = serde_json::from_str::<Value>(candidate)
        {
            warn!("JSON extracted from mixed content");
            return Ok((value, true));
        }

        Err(NutriError::Parse(format!(
            "response is not JSON. Content preview: {}...",
            cleaned.chars().take(120).collect::<String>()
        )))
    }
}

fn preprocess(raw: &str) -> String {
    let s = raw.trim().trim_start_matches('\u{feff}');
    strip_code_fences(s).trim().to_string()
}

fn strip_code_fences(s: &str) -> &str {
    let mut result = s;
    if result.starts_with("```")
        && let Some(first_newline) = result.find('\n')
    {
        result = &result[first_newline + 1..];
    }
    if let Some(stripped) = result.trim_end().strip_suffix("```") {
        result = stripped;
    }
    result
}

/// First complete `{ ... }` span; `None` if the object never closes
fn extract_object(s: &str) -> Option<&str> {
    let start = s.find('{')?;
    let mut depth = 0usize;
    let mut in_string = false;
    let mut escape = false;

    for (i, ch) in s[start..].char_indices() {
        if escape {
            escape = false;
            continue;
        }
        match ch {
            '\\' if in_string => escape = true,
            '"' => in_string = !in_string,
            '{' if !in_string => depth += 1,
            '}' if !in_string => {
                depth -= 1;
                if depth == 0 {
                    return Some(&s[start..start + i + 1]);
                }
            }
            _ => {}
        }
    }

    None
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_valid_json() {
        let (value, repaired) = JsonRepairer.parse_or_repair(r#"{"score": 7}"#).unwrap();
        assert!(!repaired);
        assert_eq!(value["score"], 7);
    }

    #[test]
    fn test_strip_code_fences() {
        let input = "```json\n{\"name\": \"Salad\"}\n```";
        assert_eq!(extract_json(input).unwrap()["name"], "Salad");
    }

    #[test]
    fn test_extract_from_prose() {
        let input = r#"Here's what I see:
{"score": 4, "verdict": "STOP", "explanation": "So much sugar {wow}"}
Stay healthy!"#;
        let (value, repaired) = JsonRepairer.parse_or_repair(input).unwrap();
        assert!(repaired);
        assert_eq!(value["verdict"], "STOP");
        assert_eq!(value["explanation"], "So much sugar {wow}");
    }

    #[test]
    fn test_truncated_object_fails() {
        let err = extract_json(r#"{"macros": {"protein": 40, "carbs": 5}, "name": "Salm"#)
            .unwrap_err();
        assert!(matches!(err, NutriError::Parse(_)));

        let fenced = "```json\n{\"score\": 9, \"verdict\": \"GO\"\n```";
        assert!(matches!(extract_json(fenced), Err(NutriError::Parse(_))));
    }

    #[test]
    fn test_trailing_comma_fails() {
        let err = extract_json(r#"{"score": 4, "verdict": "STOP",}"#).unwrap_err();
        assert!(matches!(err, NutriError::Parse(_)));
    }

    #[test]
    fn test_prose_without_json_fails() {
        let err = extract_json("Sorry, I can't read this label.").unwrap_err();
        assert!(matches!(err, NutriError::Parse(_)));
    }

    #[test]
    fn test_empty_fails() {
        assert!(matches!(extract_json("   "), Err(NutriError::Parse(_))));
        assert!(matches!(extract_json("```\n```"), Err(NutriError::Parse(_))));
    }
}
