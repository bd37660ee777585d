//! Shopping-label verdict types

use serde::{Deserialize, Serialize};
use std::fmt;

use crate::constants::fallback;

/// Traffic-light classification of a scanned product
///
/// Unknown wire values are kept in [`Verdict::Other`] so that the validation
/// policy decides what happens to them, not the deserializer.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum Verdict {
    /// Green: proceed
    Go,
    /// Yellow
    Caution,
    /// Red
    Stop,
    Other(String),
}

impl Verdict {
    pub fn as_str(&self) -> &str {
        match self {
            Verdict::Go => "GO",
            Verdict::Caution => "CAUTION",
            Verdict::Stop => "STOP",
            Verdict::Other(s) => s,
        }
    }

    pub fn is_known(&self) -> bool {
        !matches!(self, Verdict::Other(_))
    }

    /// Lenient lookup accepting case variants and colour/action aliases
    pub fn recognize(raw: &str) -> Option<Verdict> {
        match raw.trim().to_lowercase().as_str() {
            "go" | "green" | "proceed" => Some(Verdict::Go),
            "caution" | "yellow" => Some(Verdict::Caution),
            "stop" | "red" => Some(Verdict::Stop),
            _ => None,
        }
    }
}

impl From<String> for Verdict {
    fn from(s: String) -> Self {
        match s.as_str() {
            "GO" => Verdict::Go,
            "CAUTION" => Verdict::Caution,
            "STOP" => Verdict::Stop,
            _ => Verdict::Other(s),
        }
    }
}

impl From<Verdict> for String {
    fn from(v: Verdict) -> Self {
        v.as_str().to_string()
    }
}

impl fmt::Display for Verdict {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Result of one label scan; discarded on reset or the next scan
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ShoppingVerdict {
    pub score: f64,
    pub verdict: Verdict,
    pub explanation: String,
}

impl ShoppingVerdict {
    /// Neutral verdict shown when the label could not be read
    pub fn fallback() -> Self {
        Self {
            score: fallback::LABEL_SCORE,
            verdict: Verdict::Caution,
            explanation: fallback::LABEL_EXPLANATION.to_string(),
        }
    }
}
