//! Application state
//!
//! [`AppState`] owns everything a session holds: the current view, the
//! profile, the conversation, the meal log and the shopping scan. It changes
//! only through [`AppState::apply`].
//!
//! [`App`] wires the state to the coach. Chat, meals and shopping each carry
//! their own in-progress flag; a second request from a busy component is
//! rejected with [`NutriError::Busy`]. Navigation never waits for, cancels or
//! clears another component's work.

pub mod plan;

pub use plan::{DayCalories, MacroShare, Plan, PlanSettings};

use std::path::Path;
use std::sync::atomic::{AtomicBool, Ordering};
use tokio::sync::Mutex;
use tracing::{debug, info};

use crate::coach::{NutriCoach, Outcome};
use crate::constants::QUICK_CHIPS;
use crate::image::InlineImage;
use crate::types::{
    ChatMessage, Meal, NutriError, ProfileUpdate, Result, ShoppingVerdict, UserProfile,
    ValidationError, ValidationErrorKind, View,
};

/// The shopping view's current scan
#[derive(Debug, Clone, PartialEq)]
pub struct ScanState {
    /// `data:` URL of the scanned photo
    pub preview: String,
    /// `None` while the analysis is running
    pub verdict: Option<Outcome<ShoppingVerdict>>,
}

/// State transitions
#[derive(Debug, Clone)]
pub enum Command {
    Navigate(View),
    UpdateProfile(ProfileUpdate),
    PushMessage(ChatMessage),
    LogMeal(Meal),
    BeginScan { preview: String },
    FinishScan(Outcome<ShoppingVerdict>),
    ResetScan,
}

#[derive(Debug, Clone, PartialEq)]
pub struct AppState {
    pub view: View,
    pub profile: UserProfile,
    /// Oldest first
    pub messages: Vec<ChatMessage>,
    /// Most recent first
    pub meals: Vec<Meal>,
    pub scan: Option<ScanState>,
}

impl AppState {
    /// Fresh session on the dashboard, seeded with the greeting
    pub fn new(profile: UserProfile) -> Self {
        let greeting = ChatMessage::model(greeting(&profile));
        Self {
            view: View::Dashboard,
            profile,
            messages: vec![greeting],
            meals: Vec::new(),
            scan: None,
        }
    }

    pub fn apply(&mut self, command: Command) -> Result<()> {
        match command {
            Command::Navigate(view) => {
                debug!(from = %self.view, to = %view, "Navigate");
                self.view = view;
            }
            Command::UpdateProfile(update) => {
                self.profile = self.profile.with_update(update)?;
            }
            Command::PushMessage(message) => self.messages.push(message),
            Command::LogMeal(meal) => self.meals.insert(0, meal),
            Command::BeginScan { preview } => {
                self.scan = Some(ScanState {
                    preview,
                    verdict: None,
                });
            }
            Command::FinishScan(verdict) => match &mut self.scan {
                Some(scan) => scan.verdict = Some(verdict),
                None => debug!("Scan was reset before its verdict arrived"),
            },
            Command::ResetScan => self.scan = None,
        }
        Ok(())
    }
}

/// Dashboard opening line
pub fn greeting(profile: &UserProfile) -> String {
    format!(
        "Hey {}! 👋 NutriGPT here. Ready to crush your {} goals today? What's on your mind? 🥗",
        profile.name, profile.goal
    )
}

/// Message sent by quick chip `n` (1-based)
pub fn quick_chip(n: usize) -> Option<&'static str> {
    n.checked_sub(1)
        .and_then(|i| QUICK_CHIPS.get(i))
        .map(|(_, message)| *message)
}

// =============================================================================
// Busy flags
// =============================================================================

#[derive(Debug, Default)]
struct BusyFlags {
    chat: AtomicBool,
    meals: AtomicBool,
    shopping: AtomicBool,
}

/// Clears its flag when dropped
struct BusyGuard<'a>(&'a AtomicBool);

impl<'a> BusyGuard<'a> {
    fn acquire(flag: &'a AtomicBool, component: &str) -> Result<Self> {
        flag.compare_exchange(false, true, Ordering::AcqRel, Ordering::Acquire)
            .map_err(|_| NutriError::Busy(component.to_string()))?;
        Ok(Self(flag))
    }
}

impl Drop for BusyGuard<'_> {
    fn drop(&mut self) {
        self.0.store(false, Ordering::Release);
    }
}

// =============================================================================
// App
// =============================================================================

/// A running session
#[derive(Debug)]
pub struct App {
    coach: NutriCoach,
    state: Mutex<AppState>,
    busy: BusyFlags,
}

impl App {
    pub fn new(coach: NutriCoach, profile: UserProfile) -> Self {
        Self {
            coach,
            state: Mutex::new(AppState::new(profile)),
            busy: BusyFlags::default(),
        }
    }

    /// Copy of the current state for rendering
    pub async fn snapshot(&self) -> AppState {
        self.state.lock().await.clone()
    }

    pub async fn view(&self) -> View {
        self.state.lock().await.view
    }

    pub async fn navigate(&self, view: View) {
        // Navigation cannot fail
        let _ = self.state.lock().await.apply(Command::Navigate(view));
    }

    pub async fn update_profile(&self, update: ProfileUpdate) -> Result<UserProfile> {
        let mut state = self.state.lock().await;
        state.apply(Command::UpdateProfile(update))?;
        info!(name = %state.profile.name, "Profile updated");
        Ok(state.profile.clone())
    }

    /// Whether a component has a request in flight
    pub fn is_busy(&self, view: View) -> bool {
        let flag = match view {
            View::Dashboard => &self.busy.chat,
            View::Meals => &self.busy.meals,
            View::Shopping => &self.busy.shopping,
            View::Plan | View::Profile => return false,
        };
        flag.load(Ordering::Acquire)
    }

    // -------------------------------------------------------------------------
    // Chat
    // -------------------------------------------------------------------------

    /// Send a chat message; the reply (or fallback) is appended after it
    pub async fn send_message(&self, text: &str) -> Result<Outcome<String>> {
        if text.trim().is_empty() {
            return Err(
                ValidationError::new(ValidationErrorKind::MissingField, "message is empty")
                    .with_field("message")
                    .into(),
            );
        }
        let _busy = BusyGuard::acquire(&self.busy.chat, "chat")?;

        let history = {
            let mut state = self.state.lock().await;
            let history = state.messages.clone();
            state.apply(Command::PushMessage(ChatMessage::user(text)))?;
            history
        };

        let outcome = self.coach.chat(&history, text).await;

        self.state
            .lock()
            .await
            .apply(Command::PushMessage(ChatMessage::model(outcome.value())))?;
        Ok(outcome)
    }

    // -------------------------------------------------------------------------
    // Meals
    // -------------------------------------------------------------------------

    /// Analyze a meal photo from disk and log it
    pub async fn log_meal(&self, path: &Path) -> Result<Outcome<Meal>> {
        let _busy = BusyGuard::acquire(&self.busy.meals, "meal logger")?;
        let image = InlineImage::load(path).await?;
        self.log_meal_locked(image).await
    }

    /// Analyze an already loaded meal photo and log it
    pub async fn log_meal_image(&self, image: InlineImage) -> Result<Outcome<Meal>> {
        let _busy = BusyGuard::acquire(&self.busy.meals, "meal logger")?;
        self.log_meal_locked(image).await
    }

    async fn log_meal_locked(&self, image: InlineImage) -> Result<Outcome<Meal>> {
        let profile = self.state.lock().await.profile.clone();
        let outcome = self
            .coach
            .analyze_meal(&image, &profile)
            .await
            .map(|analysis| Meal::new(analysis, Some(image.data_url())));

        self.state
            .lock()
            .await
            .apply(Command::LogMeal(outcome.value().clone()))?;
        info!(
            meal = %outcome.value().name(),
            score = outcome.value().score(),
            fallback = outcome.is_fallback(),
            "Meal logged"
        );
        Ok(outcome)
    }

    // -------------------------------------------------------------------------
    // Shopping
    // -------------------------------------------------------------------------

    /// Scan a label photo from disk
    ///
    /// `None` when the scan was reset before the verdict arrived; the verdict
    /// is dropped and must not be shown.
    pub async fn scan_label(&self, path: &Path) -> Result<Option<Outcome<ShoppingVerdict>>> {
        let _busy = BusyGuard::acquire(&self.busy.shopping, "shopping assist")?;
        let image = InlineImage::load(path).await?;
        self.scan_locked(image).await
    }

    /// Scan an already loaded label photo
    pub async fn scan_label_image(
        &self,
        image: InlineImage,
    ) -> Result<Option<Outcome<ShoppingVerdict>>> {
        let _busy = BusyGuard::acquire(&self.busy.shopping, "shopping assist")?;
        self.scan_locked(image).await
    }

    async fn scan_locked(&self, image: InlineImage) -> Result<Option<Outcome<ShoppingVerdict>>> {
        self.state.lock().await.apply(Command::BeginScan {
            preview: image.data_url(),
        })?;

        let outcome = self.coach.analyze_label(&image).await;

        let mut state = self.state.lock().await;
        let still_scanning = state.scan.is_some();
        state.apply(Command::FinishScan(outcome.clone()))?;
        Ok(still_scanning.then_some(outcome))
    }

    /// Discard the preview and verdict
    pub async fn reset_scan(&self) {
        // Reset cannot fail
        let _ = self.state.lock().await.apply(Command::ResetScan);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ai::TimeoutConfig;
    use crate::ai::provider::scripted::{Reply, ScriptedProvider};
    use crate::types::{ErrorCategory, Goal, Role, Verdict};
    use std::sync::Arc;
    use std::time::Duration;

    const SALMON: &str = r#"{"name": "Grilled Salmon", "calories": 420,
        "macros": {"protein": 40, "carbs": 5, "fat": 22},
        "score": 9, "vibeCheck": "Omega-3 royalty 🐟"}"#;

    fn app(replies: Vec<Reply>) -> App {
        let coach = NutriCoach::new(Arc::new(ScriptedProvider::new(replies)));
        App::new(coach, UserProfile::default())
    }

    fn photo() -> InlineImage {
        InlineImage::from_bytes(b"photo", "image/jpeg")
    }

    #[test]
    fn test_initial_state() {
        let state = AppState::new(UserProfile::default());
        assert_eq!(state.view, View::Dashboard);
        assert_eq!(state.messages.len(), 1);
        assert_eq!(state.messages[0].role, Role::Model);
        assert_eq!(
            state.messages[0].text,
            "Hey Alex! 👋 NutriGPT here. Ready to crush your Weight Loss goals today? What's on your mind? 🥗"
        );
        assert!(state.meals.is_empty());
        assert!(state.scan.is_none());
    }

    #[test]
    fn test_update_profile_rejects_invalid() {
        let mut state = AppState::new(UserProfile::default());
        state
            .apply(Command::UpdateProfile(ProfileUpdate::Goal(Goal::Maintenance)))
            .unwrap();
        assert_eq!(state.profile.goal, Goal::Maintenance);

        let before = state.profile.clone();
        let err = state
            .apply(Command::UpdateProfile(ProfileUpdate::Weight(-4.0)))
            .unwrap_err();
        assert!(matches!(err, NutriError::Validation(_)));
        assert_eq!(state.profile, before);
    }

    #[test]
    fn test_quick_chips() {
        assert_eq!(
            quick_chip(2),
            Some("I need a healthy snack idea that fits my plan!")
        );
        assert_eq!(quick_chip(0), None);
        assert_eq!(quick_chip(4), None);
    }

    #[tokio::test]
    async fn test_chat_appends_in_order() {
        let app = app(vec![Reply::delayed(
            Duration::from_millis(5),
            Reply::text("Greek yogurt with berries! 🫐"),
        )]);

        let outcome = app.send_message("What's a good snack?").await.unwrap();
        assert!(!outcome.is_fallback());

        let state = app.snapshot().await;
        assert_eq!(state.messages.len(), 3);
        let (user, model) = (&state.messages[1], &state.messages[2]);
        assert_eq!(user.role, Role::User);
        assert_eq!(user.text, "What's a good snack?");
        assert_eq!(model.role, Role::Model);
        assert_eq!(model.text, "Greek yogurt with berries! 🫐");
        assert!(state.messages[0].timestamp <= user.timestamp);
        assert!(user.timestamp < model.timestamp);
    }

    #[tokio::test]
    async fn test_chat_failure_appends_fallback() {
        let app = app(vec![Reply::Fail(ErrorCategory::Auth)]);
        let outcome = app.send_message("hello").await.unwrap();
        assert_eq!(outcome.fallback_category(), Some(ErrorCategory::Auth));

        let state = app.snapshot().await;
        assert_eq!(
            state.messages.last().unwrap().text,
            crate::constants::fallback::CHAT_ERROR_REPLY
        );
    }

    #[tokio::test]
    async fn test_blank_message_is_rejected() {
        let app = app(vec![]);
        assert!(app.send_message("   ").await.is_err());
        assert_eq!(app.snapshot().await.messages.len(), 1);
    }

    #[tokio::test]
    async fn test_meal_prepended_with_star() {
        let app = app(vec![
            Reply::text(r#"{"name": "Donut", "calories": 300, "macros": {"protein": 3, "carbs": 40, "fat": 15}, "score": 2, "vibeCheck": "Sweet tooth!"}"#),
            Reply::text(SALMON),
        ]);

        app.log_meal_image(photo()).await.unwrap();
        let outcome = app.log_meal_image(photo()).await.unwrap();
        assert!(outcome.value().has_star());

        let state = app.snapshot().await;
        assert_eq!(state.meals.len(), 2);
        assert_eq!(state.meals[0].name(), "Grilled Salmon");
        assert_eq!(state.meals[0].score(), 9.0);
        assert!(state.meals[0].has_star());
        assert_eq!(state.meals[1].name(), "Donut");
        assert!(
            state.meals[0]
                .image_url
                .as_deref()
                .unwrap()
                .starts_with("data:image/jpeg;base64,")
        );
    }

    #[tokio::test]
    async fn test_meal_failure_logs_mystery_meal() {
        let app = app(vec![Reply::Fail(ErrorCategory::Transient)]);
        let outcome = app.log_meal_image(photo()).await.unwrap();
        assert!(outcome.is_fallback());

        let state = app.snapshot().await;
        let meal = &state.meals[0];
        assert_eq!(meal.name(), "Mystery Meal");
        assert_eq!(meal.analysis.calories, 0.0);
        assert_eq!(meal.score(), 5.0);
    }

    #[tokio::test]
    async fn test_log_meal_from_missing_file() {
        let app = app(vec![]);
        let dir = tempfile::tempdir().unwrap();
        let err = app.log_meal(&dir.path().join("missing.jpg")).await.unwrap_err();
        assert!(matches!(err, NutriError::Image { .. }));
        assert!(app.snapshot().await.meals.is_empty());
        assert!(!app.is_busy(View::Meals));
    }

    #[tokio::test]
    async fn test_label_non_json_is_caution() {
        let app = app(vec![Reply::text("Can't tell, sorry!")]);
        let outcome = app.scan_label_image(photo()).await.unwrap().unwrap();

        let verdict = outcome.value();
        assert_eq!(verdict.verdict, Verdict::Caution);
        assert_eq!(verdict.score, 0.0);
        assert!(verdict.explanation.starts_with("I couldn't read that label clearly!"));

        let scan = app.snapshot().await.scan.unwrap();
        assert!(scan.preview.starts_with("data:image/jpeg"));
        assert_eq!(scan.verdict, Some(outcome));

        app.reset_scan().await;
        assert!(app.snapshot().await.scan.is_none());
    }

    #[tokio::test]
    async fn test_reset_while_scanning_drops_verdict() {
        let app = app(vec![Reply::delayed(
            Duration::from_millis(50),
            Reply::text(r#"{"score": 9, "verdict": "GO", "explanation": "Clean label"}"#),
        )]);

        let (outcome, _) = tokio::join!(app.scan_label_image(photo()), async {
            tokio::time::sleep(Duration::from_millis(10)).await;
            assert!(app.snapshot().await.scan.is_some());
            app.reset_scan().await;
        });

        assert_eq!(outcome.unwrap(), None);
        assert!(app.snapshot().await.scan.is_none());
        assert!(!app.is_busy(View::Shopping));
    }

    #[tokio::test]
    async fn test_busy_component_rejects_second_request() {
        let app = app(vec![
            Reply::delayed(Duration::from_millis(50), Reply::text("first")),
            Reply::text("second"),
        ]);

        let (first, second) = tokio::join!(app.send_message("one"), app.send_message("two"));
        assert!(first.is_ok());
        assert!(matches!(second, Err(NutriError::Busy(_))));
        assert!(!app.is_busy(View::Dashboard));

        // Other components stay available while chat is busy
        let (chat, meal) = tokio::join!(
            app.send_message("three"),
            app.log_meal_image(photo())
        );
        assert!(chat.is_ok());
        assert!(meal.is_ok());
    }

    #[tokio::test]
    async fn test_navigation_during_request_keeps_data() {
        let app = app(vec![
            Reply::text(SALMON),
            Reply::delayed(Duration::from_millis(30), Reply::text("Keep going! 💪")),
        ]);
        app.log_meal_image(photo()).await.unwrap();
        app.update_profile(ProfileUpdate::Name("Sam".into()))
            .await
            .unwrap();

        let (reply, _) = tokio::join!(app.send_message("How am I doing?"), async {
            for view in View::ALL {
                app.navigate(view).await;
            }
            app.navigate(View::Plan).await;
        });

        assert_eq!(reply.unwrap().value(), "Keep going! 💪");
        let state = app.snapshot().await;
        assert_eq!(state.view, View::Plan);
        assert_eq!(state.messages.len(), 3);
        assert_eq!(state.meals.len(), 1);
        assert_eq!(state.profile.name, "Sam");
    }

    #[tokio::test]
    async fn test_timeout_is_reported_as_fallback() {
        let provider = Arc::new(ScriptedProvider::new(vec![Reply::delayed(
            Duration::from_millis(200),
            Reply::text("too late"),
        )]));
        let coach = NutriCoach::new(provider)
            .with_timeouts(TimeoutConfig::with_request(Duration::from_millis(10)));
        let app = App::new(coach, UserProfile::default());

        let outcome = app.send_message("hi").await.unwrap();
        assert_eq!(outcome.fallback_category(), Some(ErrorCategory::Network));
        assert!(!app.is_busy(View::Dashboard));
    }
}
