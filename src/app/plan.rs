//! Plan visualizer data
//!
//! Daily target and macro split come from configuration; the weekly chart is
//! derived from the meal log. Days are bucketed in UTC.

use chrono::{DateTime, Datelike, Duration, Utc, Weekday};
use serde::{Deserialize, Serialize};

use crate::constants::plan as defaults;
use crate::types::{Meal, UserProfile};

/// Configurable plan targets
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct PlanSettings {
    pub daily_calories: u32,
    pub protein_pct: u8,
    pub fats_pct: u8,
    pub carbs_pct: u8,
}

impl Default for PlanSettings {
    fn default() -> Self {
        Self {
            daily_calories: defaults::DAILY_CALORIES,
            protein_pct: defaults::PROTEIN_PCT,
            fats_pct: defaults::FATS_PCT,
            carbs_pct: defaults::CARBS_PCT,
        }
    }
}

impl PlanSettings {
    pub fn macro_total(&self) -> u32 {
        u32::from(self.protein_pct) + u32::from(self.fats_pct) + u32::from(self.carbs_pct)
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct MacroShare {
    pub name: &'static str,
    pub percent: u8,
}

#[derive(Debug, Clone, PartialEq)]
pub struct DayCalories {
    pub day: Weekday,
    pub calories: f64,
}

/// Everything the plan view shows
#[derive(Debug, Clone, PartialEq)]
pub struct Plan {
    pub daily_calories: u32,
    pub target_weight: f64,
    pub current_weight: f64,
    /// Absolute distance to the target weight
    pub kg_to_go: f64,
    pub macros: Vec<MacroShare>,
    /// Monday first
    pub weekly: Vec<DayCalories>,
    pub power_ups: Vec<String>,
}

impl Plan {
    pub fn for_profile(profile: &UserProfile, meals: &[Meal], settings: &PlanSettings) -> Self {
        Self::for_profile_at(profile, meals, settings, Utc::now())
    }

    /// Build the plan as seen at `now`; only meals from the last seven days count
    pub fn for_profile_at(
        profile: &UserProfile,
        meals: &[Meal],
        settings: &PlanSettings,
        now: DateTime<Utc>,
    ) -> Self {
        let mut totals = [0.0f64; 7];
        let window_start = now - Duration::days(7);
        for meal in meals
            .iter()
            .filter(|m| m.timestamp > window_start && m.timestamp <= now)
        {
            totals[meal.timestamp.weekday().num_days_from_monday() as usize] +=
                meal.analysis.calories;
        }

        let weekly = WEEK
            .iter()
            .zip(totals)
            .map(|(&day, calories)| DayCalories { day, calories })
            .collect();

        let power_ups = profile
            .wellness_goals
            .iter()
            .cloned()
            .chain(defaults::POWER_UPS.iter().map(|s| s.to_string()))
            .collect();

        Self {
            daily_calories: settings.daily_calories,
            target_weight: profile.target_weight,
            current_weight: profile.weight,
            kg_to_go: profile.kg_to_target().abs(),
            macros: vec![
                MacroShare {
                    name: "Protein",
                    percent: settings.protein_pct,
                },
                MacroShare {
                    name: "Fats",
                    percent: settings.fats_pct,
                },
                MacroShare {
                    name: "Carbs",
                    percent: settings.carbs_pct,
                },
            ],
            weekly,
            power_ups,
        }
    }

    pub fn week_total(&self) -> f64 {
        self.weekly.iter().map(|d| d.calories).sum()
    }
}

const WEEK: [Weekday; 7] = [
    Weekday::Mon,
    Weekday::Tue,
    Weekday::Wed,
    Weekday::Thu,
    Weekday::Fri,
    Weekday::Sat,
    Weekday::Sun,
];
