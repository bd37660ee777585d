//! Post-parse coercion of model results
//!
//! The model is asked for scores in 1-10 and a three-value verdict, but
//! nothing guarantees either. [`ValidationPolicy`] decides what happens to
//! values outside those sets.

use serde::{Deserialize, Serialize};
use std::str::FromStr;

use crate::constants::score;
use crate::types::{
    MealAnalysis, Result, ShoppingVerdict, ValidationError, ValidationErrorKind, Verdict,
};

/// How out-of-range scores and unknown verdicts are handled
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ValidationPolicy {
    /// Pull values into range; unknown verdicts become CAUTION
    #[default]
    Clamp,
    /// Reject the result, which routes the call to its fallback
    Strict,
    /// Keep values exactly as received
    Passthrough,
}

impl ValidationPolicy {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Clamp => "clamp",
            Self::Strict => "strict",
            Self::Passthrough => "passthrough",
        }
    }

    /// Apply the policy to a parsed meal analysis
    pub fn apply_meal(&self, mut analysis: MealAnalysis) -> Result<MealAnalysis> {
        match self {
            Self::Passthrough => Ok(analysis),
            Self::Clamp => {
                analysis.score = clamp_score(analysis.score);
                analysis.calories = non_negative(analysis.calories);
                analysis.macros.protein = non_negative(analysis.macros.protein);
                analysis.macros.carbs = non_negative(analysis.macros.carbs);
                analysis.macros.fat = non_negative(analysis.macros.fat);
                Ok(analysis)
            }
            Self::Strict => {
                check_score(analysis.score)?;
                check_non_negative("calories", analysis.calories)?;
                check_non_negative("macros.protein", analysis.macros.protein)?;
                check_non_negative("macros.carbs", analysis.macros.carbs)?;
                check_non_negative("macros.fat", analysis.macros.fat)?;
                Ok(analysis)
            }
        }
    }

    /// Apply the policy to a parsed label verdict
    pub fn apply_verdict(&self, mut verdict: ShoppingVerdict) -> Result<ShoppingVerdict> {
        match self {
            Self::Passthrough => Ok(verdict),
            Self::Clamp => {
                verdict.score = clamp_score(verdict.score);
                if let Verdict::Other(raw) = &verdict.verdict {
                    verdict.verdict = Verdict::recognize(raw).unwrap_or(Verdict::Caution);
                }
                Ok(verdict)
            }
            Self::Strict => {
                check_score(verdict.score)?;
                if let Verdict::Other(raw) = &verdict.verdict {
                    return Err(ValidationError::new(
                        ValidationErrorKind::Enum,
                        "unknown verdict",
                    )
                    .with_field("verdict")
                    .with_comparison("GO | CAUTION | STOP", raw.as_str())
                    .into());
                }
                Ok(verdict)
            }
        }
    }
}

impl FromStr for ValidationPolicy {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "clamp" => Ok(Self::Clamp),
            "strict" => Ok(Self::Strict),
            "passthrough" => Ok(Self::Passthrough),
            other => Err(format!(
                "unknown validation policy '{}'. Expected clamp, strict or passthrough",
                other
            )),
        }
    }
}

impl std::fmt::Display for ValidationPolicy {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

fn clamp_score(value: f64) -> f64 {
    if value.is_finite() {
        value.clamp(score::MIN, score::MAX)
    } else {
        score::NEUTRAL
    }
}

fn non_negative(value: f64) -> f64 {
    if value.is_finite() && value > 0.0 {
        value
    } else {
        0.0
    }
}

fn check_score(value: f64) -> Result<()> {
    if value.is_finite() && (score::MIN..=score::MAX).contains(&value) {
        Ok(())
    } else {
        Err(ValidationError::out_of_range("score", "1..=10", value).into())
    }
}

fn check_non_negative(field: &str, value: f64) -> Result<()> {
    if value.is_finite() && value >= 0.0 {
        Ok(())
    } else {
        Err(ValidationError::out_of_range(field, ">= 0", value).into())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::{Macros, NutriError};
    use proptest::prelude::*;

    fn meal(score: f64, calories: f64) -> MealAnalysis {
        MealAnalysis {
            name: "Toast".into(),
            calories,
            macros: Macros {
                protein: -1.0,
                carbs: 30.0,
                fat: 2.0,
            },
            score,
            vibe_check: "Crunchy.".into(),
        }
    }

    fn label(score: f64, verdict: &str) -> ShoppingVerdict {
        ShoppingVerdict {
            score,
            verdict: Verdict::from(verdict.to_string()),
            explanation: "ok".into(),
        }
    }

    #[test]
    fn test_clamp_meal() {
        let clamped = ValidationPolicy::Clamp.apply_meal(meal(12.0, -50.0)).unwrap();
        assert_eq!(clamped.score, 10.0);
        assert_eq!(clamped.calories, 0.0);
        assert_eq!(clamped.macros.protein, 0.0);
        assert_eq!(clamped.macros.carbs, 30.0);

        let low = ValidationPolicy::Clamp.apply_meal(meal(0.0, 100.0)).unwrap();
        assert_eq!(low.score, 1.0);

        let nan = ValidationPolicy::Clamp.apply_meal(meal(f64::NAN, 100.0)).unwrap();
        assert_eq!(nan.score, 5.0);
    }

    #[test]
    fn test_clamp_verdict() {
        let policy = ValidationPolicy::Clamp;
        assert_eq!(
            policy.apply_verdict(label(7.0, "go")).unwrap().verdict,
            Verdict::Go
        );
        assert_eq!(
            policy.apply_verdict(label(7.0, "Red")).unwrap().verdict,
            Verdict::Stop
        );
        let unknown = policy.apply_verdict(label(-3.0, "maybe?")).unwrap();
        assert_eq!(unknown.verdict, Verdict::Caution);
        assert_eq!(unknown.score, 1.0);
    }

    #[test]
    fn test_strict_rejects() {
        let policy = ValidationPolicy::Strict;
        let err = policy.apply_meal(meal(11.0, 10.0)).unwrap_err();
        assert!(matches!(err, NutriError::Validation(ref v) if v.kind == ValidationErrorKind::Range));

        let err = policy.apply_verdict(label(5.0, "go")).unwrap_err();
        assert!(matches!(err, NutriError::Validation(ref v) if v.kind == ValidationErrorKind::Enum));

        assert!(policy.apply_verdict(label(5.0, "STOP")).is_ok());
    }

    #[test]
    fn test_passthrough_keeps_values() {
        let policy = ValidationPolicy::Passthrough;
        let kept = policy.apply_meal(meal(42.0, -1.0)).unwrap();
        assert_eq!(kept.score, 42.0);
        assert_eq!(kept.calories, -1.0);

        let verdict = policy.apply_verdict(label(0.0, "maybe")).unwrap();
        assert_eq!(verdict.verdict, Verdict::Other("maybe".into()));
    }

    #[test]
    fn test_policy_from_str() {
        assert_eq!("STRICT".parse::<ValidationPolicy>(), Ok(ValidationPolicy::Strict));
        assert_eq!(" clamp ".parse::<ValidationPolicy>(), Ok(ValidationPolicy::Clamp));
        assert!("lenient".parse::<ValidationPolicy>().is_err());
    }

    proptest! {
        #[test]
        fn clamp_always_in_range(score in any::<f64>(), calories in any::<f64>()) {
            let result = ValidationPolicy::Clamp.apply_meal(meal(score, calories)).unwrap();
            prop_assert!((1.0..=10.0).contains(&result.score));
            prop_assert!(result.calories >= 0.0);
            prop_assert!(result.macros.protein >= 0.0);
        }

        #[test]
        fn clamp_keeps_valid_scores(score in 1.0f64..=10.0) {
            let result = ValidationPolicy::Clamp.apply_meal(meal(score, 100.0)).unwrap();
            prop_assert_eq!(result.score, score);
        }

        #[test]
        fn clamped_verdict_is_always_known(raw in ".*") {
            let result = ValidationPolicy::Clamp.apply_verdict(label(5.0, &raw)).unwrap();
            prop_assert!(result.verdict.is_known());
        }

        #[test]
        fn strict_accepts_only_in_range(score in any::<f64>()) {
            let ok = ValidationPolicy::Strict.apply_verdict(label(score, "GO")).is_ok();
            prop_assert_eq!(ok, score.is_finite() && (1.0..=10.0).contains(&score));
        }
    }
}
