//! Meal log types

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::constants::fallback;

/// Macro breakdown in grams
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize, PartialEq)]
pub struct Macros {
    pub protein: f64,
    pub carbs: f64,
    pub fat: f64,
}

/// What the model says about one food photo
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct MealAnalysis {
    pub name: String,
    pub calories: f64,
    pub macros: Macros,
    /// 1-10 alignment with the user's goal
    pub score: f64,
    pub vibe_check: String,
}

impl MealAnalysis {
    /// Placeholder returned when the photo could not be analyzed
    pub fn fallback() -> Self {
        Self {
            name: fallback::MEAL_NAME.to_string(),
            calories: 0.0,
            macros: Macros::default(),
            score: fallback::MEAL_SCORE,
            vibe_check: fallback::MEAL_VIBE_CHECK.to_string(),
        }
    }
}

/// A logged meal
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Meal {
    pub id: Uuid,
    pub timestamp: DateTime<Utc>,
    /// `data:` URL of the uploaded photo
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub image_url: Option<String>,
    #[serde(flatten)]
    pub analysis: MealAnalysis,
}

impl Meal {
    pub fn new(analysis: MealAnalysis, image_url: Option<String>) -> Self {
        Self {
            id: Uuid::new_v4(),
            timestamp: Utc::now(),
            image_url,
            analysis,
        }
    }

    pub fn name(&self) -> &str {
        &self.analysis.name
    }

    pub fn score(&self) -> f64 {
        self.analysis.score
    }

    pub fn band(&self) -> ScoreBand {
        ScoreBand::from_score(self.analysis.score)
    }

    /// Gold-star stamp for near-perfect meals
    pub fn has_star(&self) -> bool {
        self.analysis.score >= 9.0
    }
}

/// Colour band of a meal score badge
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ScoreBand {
    /// 8 and above
    Mint,
    /// 5 up to 8
    Sunshine,
    /// below 5
    Coral,
}

impl ScoreBand {
    pub fn from_score(score: f64) -> Self {
        if score >= 8.0 {
            ScoreBand::Mint
        } else if score >= 5.0 {
            ScoreBand::Sunshine
        } else {
            ScoreBand::Coral
        }
    }
}
