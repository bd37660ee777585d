//! Terminal views
//!
//! Each function renders one view of the session into a styled string.
//! Nothing here talks to the model or mutates state.

use chrono::Local;
use console::{Style, style};

use crate::app::{AppState, Plan, ScanState};
use crate::coach::Outcome;
use crate::constants::QUICK_CHIPS;
use crate::types::{
    ChatMessage, ErrorCategory, Meal, Role, ScoreBand, ShoppingVerdict, UserProfile, Verdict, View,
};

const BAR_WIDTH: usize = 30;

/// Render whichever view is current
pub fn view(state: &AppState, plan: &Plan) -> String {
    match state.view {
        View::Dashboard => dashboard(&state.messages),
        View::Plan => self::plan(plan),
        View::Shopping => shopping(state.scan.as_ref()),
        View::Meals => meals(&state.meals),
        View::Profile => profile(&state.profile),
    }
}

/// Sidebar-style navigation line with the current view highlighted
pub fn nav(current: View) -> String {
    View::ALL
        .iter()
        .map(|v| {
            if *v == current {
                style(format!("[{}]", v.label())).green().bold().to_string()
            } else {
                style(v.label()).dim().to_string()
            }
        })
        .collect::<Vec<_>>()
        .join("  ")
}

// =============================================================================
// Dashboard
// =============================================================================

pub fn dashboard(messages: &[ChatMessage]) -> String {
    let mut out = title("Dashboard", "Let's talk nutrition!");
    for message in messages {
        out.push_str(&chat_message(message));
        out.push('\n');
    }
    out.push('\n');
    out.push_str(&chips());
    out
}

pub fn chat_message(message: &ChatMessage) -> String {
    match message.role {
        Role::User => format!("{} {}", style("you ›").magenta().bold(), message.text),
        Role::Model => format!("{} {}", style("NutriGPT ›").green().bold(), message.text),
    }
}

pub fn chips() -> String {
    QUICK_CHIPS
        .iter()
        .enumerate()
        .map(|(i, (label, _))| format!("{} {}", style(format!("/{}", i + 1)).cyan(), label))
        .collect::<Vec<_>>()
        .join("   ")
}

// =============================================================================
// Meals
// =============================================================================

pub fn meals(meals: &[Meal]) -> String {
    let mut out = title("Meals 🍽", &format!("{} Logged", meals.len()));
    if meals.is_empty() {
        out.push_str(&style("No meals logged yet.").dim().to_string());
        out.push_str("\nSnap your food with /meal <photo>.");
        return out;
    }
    let cards: Vec<String> = meals.iter().map(meal_card).collect();
    out.push_str(&cards.join("\n\n"));
    out
}

pub fn meal_card(meal: &Meal) -> String {
    let star = if meal.has_star() { "⭐ " } else { "" };
    let badge = band_style(meal.band()).apply_to(format!(" {}/10 ", meal.score()));
    let time = meal.timestamp.with_timezone(&Local).format("%H:%M");
    let a = &meal.analysis;
    format!(
        "{}{}  {}\n  {} kcal · {}g protein · {}g carbs · {}\n  {}",
        star,
        style(meal.name()).bold(),
        badge,
        round(a.calories),
        round(a.macros.protein),
        round(a.macros.carbs),
        time,
        style(format!("\"{}\"", a.vibe_check)).italic()
    )
}

fn band_style(band: ScoreBand) -> Style {
    match band {
        ScoreBand::Mint => Style::new().black().on_green(),
        ScoreBand::Sunshine => Style::new().black().on_yellow(),
        ScoreBand::Coral => Style::new().white().on_red(),
    }
}

// =============================================================================
// Shopping
// =============================================================================

pub fn shopping(scan: Option<&ScanState>) -> String {
    let mut out = title("Shopping Assist 🛒", "Snap a label to get the NutriGPT verdict.");
    match scan {
        None => out.push_str("Scan a product with /scan <photo>."),
        Some(ScanState { verdict: None, .. }) => {
            out.push_str(&style("Analyzing label…").dim().to_string())
        }
        Some(ScanState {
            verdict: Some(outcome),
            ..
        }) => {
            out.push_str(&verdict(outcome.value()));
            out.push_str("\n\n");
            out.push_str(&style("/reset to scan another").dim().to_string());
        }
    }
    out
}

pub fn verdict(verdict: &ShoppingVerdict) -> String {
    let (icon, paint) = match verdict.verdict {
        Verdict::Go => ("✓", Style::new().green().bold()),
        Verdict::Stop => ("⛔", Style::new().red().bold()),
        Verdict::Caution | Verdict::Other(_) => ("⚠", Style::new().yellow().bold()),
    };
    format!(
        "{} {}  {}\n{}",
        icon,
        paint.apply_to(verdict.verdict.as_str()),
        style(format!("{}/10", verdict.score)).bold(),
        verdict.explanation
    )
}

/// One-line note shown under a fallback result
pub fn fallback_note<T>(outcome: &Outcome<T>) -> Option<String> {
    let category = outcome.fallback_category()?;
    let note = match category {
        ErrorCategory::Validation => format!(
            "Model answer rejected ({}); a value was out of range, showing a safe default.",
            category
        ),
        c if c.is_retryable() => format!("Model unavailable ({}); try again in a moment.", c),
        c => format!(
            "Model unavailable ({}); check your API key and configuration.",
            c
        ),
    };
    Some(note)
}

// =============================================================================
// Plan
// =============================================================================

pub fn plan(plan: &Plan) -> String {
    let mut out = title("Your Master Plan 🗺️", "");

    out.push_str(&format!(
        "{}  {} kcal\n",
        style("Daily Calories").bold(),
        thousands(plan.daily_calories)
    ));
    out.push_str(&format!(
        "{}     {} kg  (current {} kg, {} kg to go)\n",
        style("Weight Goal").bold(),
        plan.target_weight,
        plan.current_weight,
        round1(plan.kg_to_go)
    ));

    out.push_str(&format!("\n{}\n", style("Macro Split").bold()));
    for share in &plan.macros {
        out.push_str(&format!(
            "  {:<8} {} {}%\n",
            share.name,
            bar(f64::from(share.percent), 100.0),
            share.percent
        ));
    }

    out.push_str(&format!("\n{}\n", style("Calorie Consistency").bold()));
    let scale = plan
        .weekly
        .iter()
        .map(|d| d.calories)
        .fold(f64::from(plan.daily_calories), f64::max);
    for day in &plan.weekly {
        out.push_str(&format!(
            "  {:<3} {} {}\n",
            day.day,
            bar(day.calories, scale),
            round(day.calories)
        ));
    }

    out.push_str(&format!("\n{}\n", style("Wellness Power-Ups ⚡").bold()));
    out.push_str(
        &plan
            .power_ups
            .iter()
            .map(|p| format!("[{}]", p))
            .collect::<Vec<_>>()
            .join(" "),
    );
    out
}

fn bar(value: f64, max: f64) -> String {
    let filled = if max > 0.0 {
        ((value / max) * BAR_WIDTH as f64).round().clamp(0.0, BAR_WIDTH as f64) as usize
    } else {
        0
    };
    format!(
        "{}{}",
        style("█".repeat(filled)).magenta(),
        style("░".repeat(BAR_WIDTH - filled)).dim()
    )
}

// =============================================================================
// Profile
// =============================================================================

pub fn profile(profile: &UserProfile) -> String {
    let mut out = title(&profile.name, "Level 5 Nutritionist");
    let rows = [
        ("Current Weight", format!("{} kg", profile.weight)),
        ("Target", format!("{} kg", profile.target_weight)),
        ("Height", format!("{} cm", profile.height)),
        ("Age", profile.age.to_string()),
        ("Goal", profile.goal.to_string()),
        ("Allergies", list_or_none(&profile.allergies)),
        ("Wellness", list_or_none(&profile.wellness_goals)),
    ];
    for (label, value) in rows {
        out.push_str(&format!("  {:<15} {}\n", style(label).dim(), value));
    }
    out.push_str(&style("Edit with /set <field> <value>").dim().to_string());
    out
}

fn list_or_none(items: &[String]) -> String {
    if items.is_empty() {
        "none".to_string()
    } else {
        items.join(", ")
    }
}

// =============================================================================
// Help
// =============================================================================

pub fn help() -> String {
    let rows = [
        ("<message>", "chat with NutriGPT"),
        ("/1 /2 /3", "send a quick chip"),
        ("/dashboard /plan /shopping /meals /profile", "switch view"),
        ("/view <name>", "switch view by name"),
        ("/meal <photo>", "analyze and log a meal"),
        ("/scan <photo>", "scan a nutrition label"),
        ("/reset", "clear the current scan"),
        ("/set <field> <value>", "edit the profile (name, age, height, weight, target, goal, allergies, wellness)"),
        ("/chips", "list quick chips"),
        ("/help", "show this help"),
        ("/quit", "leave"),
    ];
    rows.iter()
        .map(|(cmd, what)| format!("  {:<44} {}", style(cmd).cyan(), what))
        .collect::<Vec<_>>()
        .join("\n")
}

// =============================================================================
// Helpers
// =============================================================================

fn title(heading: &str, subtitle: &str) -> String {
    if subtitle.is_empty() {
        format!("{}\n\n", style(heading).bold().underlined())
    } else {
        format!(
            "{}  {}\n\n",
            style(heading).bold().underlined(),
            style(subtitle).dim()
        )
    }
}

fn round(value: f64) -> i64 {
    value.round() as i64
}

fn round1(value: f64) -> f64 {
    (value * 10.0).round() / 10.0
}

fn thousands(value: u32) -> String {
    let digits = value.to_string();
    let mut out = String::with_capacity(digits.len() + digits.len() / 3);
    for (i, ch) in digits.chars().enumerate() {
        if i > 0 && (digits.len() - i) % 3 == 0 {
            out.push(',');
        }
        out.push(ch);
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::app::PlanSettings;
    use crate::types::{MealAnalysis, Macros};
    use console::strip_ansi_codes;

    fn plain(s: String) -> String {
        strip_ansi_codes(&s).to_string()
    }

    fn salmon() -> Meal {
        Meal::new(
            MealAnalysis {
                name: "Grilled Salmon".into(),
                calories: 420.0,
                macros: Macros {
                    protein: 40.0,
                    carbs: 5.0,
                    fat: 22.0,
                },
                score: 9.0,
                vibe_check: "Omega-3 royalty 🐟".into(),
            },
            None,
        )
    }

    #[test]
    fn test_thousands() {
        assert_eq!(thousands(2400), "2,400");
        assert_eq!(thousands(999), "999");
        assert_eq!(thousands(1234567), "1,234,567");
    }

    #[test]
    fn test_meal_card() {
        let card = plain(meal_card(&salmon()));
        assert!(card.starts_with("⭐ Grilled Salmon"));
        assert!(card.contains("9/10"));
        assert!(card.contains("420 kcal · 40g protein · 5g carbs"));
        assert!(card.contains("\"Omega-3 royalty 🐟\""));

        let mut plain_meal = salmon();
        plain_meal.analysis.score = 7.0;
        assert!(!plain(meal_card(&plain_meal)).contains('⭐'));
    }

    #[test]
    fn test_empty_meal_log() {
        let out = plain(meals(&[]));
        assert!(out.contains("0 Logged"));
        assert!(out.contains("No meals logged yet."));
    }

    #[test]
    fn test_verdict() {
        let out = plain(verdict(&ShoppingVerdict::fallback()));
        assert!(out.contains("CAUTION"));
        assert!(out.contains("0/10"));
        assert!(out.contains("I couldn't read that label clearly!"));
    }

    #[test]
    fn test_shopping_states() {
        assert!(plain(shopping(None)).contains("/scan <photo>"));
        let pending = ScanState {
            preview: "data:image/jpeg;base64,AA".into(),
            verdict: None,
        };
        assert!(plain(shopping(Some(&pending))).contains("Analyzing"));
    }

    #[test]
    fn test_fallback_note() {
        let model: Outcome<u8> = Outcome::Model(1);
        assert!(fallback_note(&model).is_none());

        let limited = Outcome::Fallback {
            value: 1,
            category: ErrorCategory::RateLimit,
        };
        let note = fallback_note(&limited).unwrap();
        assert!(note.contains("RATE_LIMIT"));
        assert!(note.contains("try again"));

        let out_of_range = Outcome::Fallback {
            value: 1,
            category: ErrorCategory::Validation,
        };
        let note = fallback_note(&out_of_range).unwrap();
        assert!(note.contains("out of range"));
        assert!(!note.contains("API key"));

        let auth = Outcome::Fallback {
            value: 1,
            category: ErrorCategory::Auth,
        };
        assert!(fallback_note(&auth).unwrap().contains("API key"));
    }

    #[test]
    fn test_plan_view() {
        let plan = Plan::for_profile(&UserProfile::default(), &[], &PlanSettings::default());
        let out = plain(self::plan(&plan));
        assert!(out.contains("2,400 kcal"));
        assert!(out.contains("65 kg  (current 70 kg, 5 kg to go)"));
        assert!(out.contains("Protein"));
        assert!(out.contains("45%"));
        assert!(out.contains("Mon"));
        assert!(out.contains("[Brain Fuel]"));
    }

    #[test]
    fn test_profile_view() {
        let out = plain(profile(&UserProfile::default()));
        assert!(out.starts_with("Alex"));
        assert!(out.contains("Level 5 Nutritionist"));
        assert!(out.contains("Peanuts"));
        assert!(out.contains("Weight Loss"));
    }

    #[test]
    fn test_dashboard_lists_chips() {
        let out = plain(dashboard(&[ChatMessage::model("Hi!")]));
        assert!(out.contains("NutriGPT › Hi!"));
        assert!(out.contains("/2 Give me a snack idea! 🍎"));
    }
}
