pub mod chat;
pub mod error;
pub mod meal;
pub mod profile;
pub mod verdict;
pub mod view;

pub use chat::{ChatMessage, Role, WidgetHint};
pub use error::{
    ErrorCategory, ErrorClassifier, LlmError, NutriError, Result, ValidationError,
    ValidationErrorKind,
};
pub use meal::{Macros, Meal, MealAnalysis, ScoreBand};
pub use profile::{Goal, ProfileUpdate, UserProfile};
pub use verdict::{ShoppingVerdict, Verdict};
pub use view::View;
