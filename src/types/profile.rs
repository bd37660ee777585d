//! User profile types
//!
//! The profile is read by every view and every analysis call. It is only ever
//! replaced through a [`ProfileUpdate`], never mutated in place.

use serde::{Deserialize, Serialize};
use std::fmt;

use super::error::{NutriError, Result, ValidationError, ValidationErrorKind};

/// Dietary goal driving the meal-analysis prompt
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Default)]
pub enum Goal {
    #[default]
    #[serde(rename = "Weight Loss")]
    WeightLoss,
    #[serde(rename = "Maintenance")]
    Maintenance,
    #[serde(rename = "Muscle Gain")]
    MuscleGain,
}

impl Goal {
    pub fn as_str(&self) -> &'static str {
        match self {
            Goal::WeightLoss => "Weight Loss",
            Goal::Maintenance => "Maintenance",
            Goal::MuscleGain => "Muscle Gain",
        }
    }
}

impl fmt::Display for Goal {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl std::str::FromStr for Goal {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        let normalized: String = s
            .chars()
            .filter(|c| c.is_ascii_alphanumeric())
            .collect::<String>()
            .to_lowercase();
        match normalized.as_str() {
            "weightloss" => Ok(Goal::WeightLoss),
            "maintenance" => Ok(Goal::Maintenance),
            "musclegain" => Ok(Goal::MuscleGain),
            _ => Err(format!(
                "Unknown goal: {}. Valid values: weight-loss, maintenance, muscle-gain",
                s
            )),
        }
    }
}

/// Who the coach is talking to
///
/// Field names match the `[profile]` section of the config file.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct UserProfile {
    pub name: String,
    pub age: u32,
    /// Height in centimetres
    pub height: f64,
    /// Weight in kilograms
    pub weight: f64,
    /// Target weight in kilograms
    pub target_weight: f64,
    pub goal: Goal,
    #[serde(default)]
    pub allergies: Vec<String>,
    #[serde(default)]
    pub wellness_goals: Vec<String>,
}

impl Default for UserProfile {
    fn default() -> Self {
        Self {
            name: "Alex".to_string(),
            age: 28,
            height: 175.0,
            weight: 70.0,
            target_weight: 65.0,
            goal: Goal::WeightLoss,
            allergies: vec!["Peanuts".to_string()],
            wellness_goals: vec!["Better Skin".to_string(), "Energy".to_string()],
        }
    }
}

impl UserProfile {
    /// Kilograms between current and target weight (positive means to lose)
    pub fn kg_to_target(&self) -> f64 {
        self.weight - self.target_weight
    }

    /// Check every field against the same rules [`Self::with_update`] applies
    pub fn validate(&self) -> Result<()> {
        [
            ProfileUpdate::Name(self.name.clone()),
            ProfileUpdate::Age(self.age),
            ProfileUpdate::Height(self.height),
            ProfileUpdate::Weight(self.weight),
            ProfileUpdate::TargetWeight(self.target_weight),
        ]
        .into_iter()
        .try_fold(self.clone(), |profile, update| profile.with_update(update))
        .map(|_| ())
    }

    /// Produce a new profile with one field replaced
    pub fn with_update(&self, update: ProfileUpdate) -> Result<UserProfile> {
        let mut next = self.clone();
        match update {
            ProfileUpdate::Name(name) => {
                let name = name.trim();
                if name.is_empty() {
                    return Err(ValidationError::new(
                        ValidationErrorKind::MissingField,
                        "name must not be empty",
                    )
                    .with_field("name")
                    .into());
                }
                next.name = name.to_string();
            }
            ProfileUpdate::Age(age) => {
                if !(1..=130).contains(&age) {
                    return Err(ValidationError::out_of_range("age", "1..=130", age).into());
                }
                next.age = age;
            }
            ProfileUpdate::Height(cm) => next.height = positive("height", cm)?,
            ProfileUpdate::Weight(kg) => next.weight = positive("weight", kg)?,
            ProfileUpdate::TargetWeight(kg) => next.target_weight = positive("target_weight", kg)?,
            ProfileUpdate::Goal(goal) => next.goal = goal,
            ProfileUpdate::Allergies(items) => next.allergies = items,
            ProfileUpdate::WellnessGoals(items) => next.wellness_goals = items,
        }
        Ok(next)
    }
}

fn positive(field: &str, value: f64) -> Result<f64> {
    if value.is_finite() && value > 0.0 {
        Ok(value)
    } else {
        Err(ValidationError::out_of_range(field, "> 0", value).into())
    }
}

/// A single-field edit of the profile
#[derive(Debug, Clone, PartialEq)]
pub enum ProfileUpdate {
    Name(String),
    Age(u32),
    Height(f64),
    Weight(f64),
    TargetWeight(f64),
    Goal(Goal),
    Allergies(Vec<String>),
    WellnessGoals(Vec<String>),
}

impl ProfileUpdate {
    /// Parse a `field value` pair as typed in the shell
    ///
    /// List fields take a comma-separated value; an empty value clears them.
    pub fn parse(field: &str, value: &str) -> Result<Self> {
        let value = value.trim();
        let bad = |expected: &str| -> NutriError {
            ValidationError::new(ValidationErrorKind::Format, "could not parse value")
                .with_field(field)
                .with_comparison(expected, value)
                .into()
        };

        let update = match field.to_lowercase().replace(['-', '_'], "").as_str() {
            "name" => ProfileUpdate::Name(value.to_string()),
            "age" => ProfileUpdate::Age(value.parse().map_err(|_| bad("whole number"))?),
            "height" => ProfileUpdate::Height(value.parse().map_err(|_| bad("centimetres"))?),
            "weight" => ProfileUpdate::Weight(value.parse().map_err(|_| bad("kilograms"))?),
            "targetweight" | "target" => {
                ProfileUpdate::TargetWeight(value.parse().map_err(|_| bad("kilograms"))?)
            }
            "goal" => ProfileUpdate::Goal(value.parse().map_err(|_| bad("goal"))?),
            "allergies" => ProfileUpdate::Allergies(split_list(value)),
            "wellness" | "wellnessgoals" => ProfileUpdate::WellnessGoals(split_list(value)),
            _ => {
                return Err(ValidationError::new(
                    ValidationErrorKind::Format,
                    format!("unknown profile field '{}'", field),
                )
                .into());
            }
        };
        Ok(update)
    }
}

fn split_list(value: &str) -> Vec<String> {
    value
        .split(',')
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(String::from)
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_goal_parse_and_display() {
        assert_eq!("weight-loss".parse::<Goal>().unwrap(), Goal::WeightLoss);
        assert_eq!("Muscle Gain".parse::<Goal>().unwrap(), Goal::MuscleGain);
        assert_eq!("MAINTENANCE".parse::<Goal>().unwrap(), Goal::Maintenance);
        assert!("bulking".parse::<Goal>().is_err());
        assert_eq!(Goal::MuscleGain.to_string(), "Muscle Gain");
    }

    #[test]
    fn test_goal_serde_uses_display_names() {
        let json = serde_json::to_string(&Goal::WeightLoss).unwrap();
        assert_eq!(json, "\"Weight Loss\"");
    }

    #[test]
    fn test_default_profile() {
        let profile = UserProfile::default();
        assert_eq!(profile.name, "Alex");
        assert_eq!(profile.goal, Goal::WeightLoss);
        assert_eq!(profile.allergies, vec!["Peanuts"]);
        assert_eq!(profile.kg_to_target(), 5.0);
    }

    #[test]
    fn test_update_replaces_single_field() {
        let profile = UserProfile::default();
        let next = profile
            .with_update(ProfileUpdate::parse("weight", "68.5").unwrap())
            .unwrap();
        assert_eq!(next.weight, 68.5);
        assert_eq!(next.name, profile.name);
        assert_eq!(profile.weight, 70.0);
    }

    #[test]
    fn test_update_lists() {
        let update = ProfileUpdate::parse("allergies", "Peanuts, Shellfish ,").unwrap();
        assert_eq!(
            update,
            ProfileUpdate::Allergies(vec!["Peanuts".into(), "Shellfish".into()])
        );
        assert_eq!(
            ProfileUpdate::parse("allergies", "").unwrap(),
            ProfileUpdate::Allergies(vec![])
        );
    }

    #[test]
    fn test_invalid_updates_rejected() {
        let profile = UserProfile::default();
        assert!(ProfileUpdate::parse("age", "old").is_err());
        assert!(ProfileUpdate::parse("shoe_size", "42").is_err());
        assert!(profile.with_update(ProfileUpdate::Weight(-3.0)).is_err());
        assert!(profile.with_update(ProfileUpdate::Name("  ".into())).is_err());
        assert!(profile.with_update(ProfileUpdate::Age(0)).is_err());
    }

    #[test]
    fn test_validate() {
        assert!(UserProfile::default().validate().is_ok());
        let bad = UserProfile {
            height: 0.0,
            ..UserProfile::default()
        };
        assert!(matches!(bad.validate(), Err(NutriError::Validation(_))));
    }

    #[test]
    fn test_deserialize_partial_lists() {
        let profile: UserProfile = serde_json::from_str(
            r#"{"name": "Jo", "age": 40, "height": 160, "weight": 60,
                "target_weight": 58, "goal": "Maintenance", "wellness_goals": ["Sleep"]}"#,
        )
        .unwrap();
        assert_eq!(profile.target_weight, 58.0);
        assert_eq!(profile.wellness_goals, vec!["Sleep"]);
        assert!(profile.allergies.is_empty());
    }
}
