//! Prompt Builder System
//!
//! Standardized prompt construction for the coach's three model calls:
//! the chat persona, meal-photo analysis and label analysis.
//!
//! Profile fields are interpolated as-is; nothing here sanitizes user text.

use crate::types::UserProfile;

/// Prompt section types
#[derive(Debug, Clone)]
pub enum PromptSection {
    /// Identity statement
    Role(String),
    /// Numbered objectives
    Objectives(Vec<String>),
    /// Ordered key-value pairs
    Context(Vec<(String, String)>),
    /// Bulleted behaviour rules
    Guidelines(Vec<String>),
    /// Raw text section with optional header
    Text {
        header: Option<String>,
        content: String,
    },
}

/// Prompt builder for consistent prompt construction
#[derive(Debug, Clone, Default)]
pub struct PromptBuilder {
    sections: Vec<PromptSection>,
}

impl PromptBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add an identity statement
    pub fn role(mut self, identity: &str) -> Self {
        self.sections.push(PromptSection::Role(identity.to_string()));
        self
    }

    /// Add objectives section
    pub fn objectives(mut self, objectives: Vec<&str>) -> Self {
        self.sections.push(PromptSection::Objectives(
            objectives.into_iter().map(String::from).collect(),
        ));
        self
    }

    /// Add a context item, appending to the existing context section
    pub fn context_item(mut self, key: &str, value: &str) -> Self {
        let entry = (key.to_string(), value.to_string());
        for section in &mut self.sections {
            if let PromptSection::Context(ctx) = section {
                ctx.push(entry);
                return self;
            }
        }
        self.sections.push(PromptSection::Context(vec![entry]));
        self
    }

    /// Add bulleted guidelines
    pub fn guidelines(mut self, rules: Vec<&str>) -> Self {
        self.sections.push(PromptSection::Guidelines(
            rules.into_iter().map(String::from).collect(),
        ));
        self
    }

    /// Add text section
    pub fn text(mut self, content: &str) -> Self {
        self.sections.push(PromptSection::Text {
            header: None,
            content: content.to_string(),
        });
        self
    }

    /// Add text section with header
    pub fn section(mut self, header: &str, content: &str) -> Self {
        self.sections.push(PromptSection::Text {
            header: Some(header.to_string()),
            content: content.to_string(),
        });
        self
    }

    /// Build the final prompt string
    pub fn build(self) -> String {
        let mut prompt = String::new();

        for section in self.sections {
            match section {
                PromptSection::Role(identity) => {
                    prompt.push_str(&identity);
                    prompt.push_str("\n\n");
                }
                PromptSection::Objectives(objectives) => {
                    for (i, obj) in objectives.iter().enumerate() {
                        prompt.push_str(&format!("{}. {}\n", i + 1, obj));
                    }
                    prompt.push('\n');
                }
                PromptSection::Context(ctx) => {
                    for (key, value) in ctx {
                        prompt.push_str(&format!("{}: {}\n", key, value));
                    }
                    prompt.push('\n');
                }
                PromptSection::Guidelines(rules) => {
                    for rule in rules {
                        prompt.push_str(&format!("- {}\n", rule));
                    }
                    prompt.push('\n');
                }
                PromptSection::Text { header, content } => {
                    if let Some(h) = header {
                        prompt.push_str(&format!("{}:\n", h));
                    }
                    prompt.push_str(&content);
                    prompt.push_str("\n\n");
                }
            }
        }

        prompt.trim_end().to_string()
    }
}

/// The coach's prompts
pub struct PromptTemplates;

impl PromptTemplates {
    /// Persona sent as the system instruction of every chat session
    pub fn persona() -> String {
        PromptBuilder::new()
            .role("You are NutriGPT, a hyper-personalized, fun, and lighthearted AI nutritionist.")
            .guidelines(vec![
                "You are supportive, witty, and slightly gamified.",
                "You talk like a supportive friend, not a strict doctor.",
                "Use emojis liberally.",
                "Be scientifically accurate but deliver advice in a \"vibe check\" format.",
                "Never be judgmental.",
                "If a user eats something unhealthy, joke about it kindly and suggest a balance for the next meal.",
            ])
            .build()
    }

    /// Meal-photo analysis prompt tuned to the user's goal and allergies
    pub fn meal_analysis(profile: &UserProfile) -> String {
        let allergies = profile.allergies.join(", ");

        PromptBuilder::new()
            .text("Analyze this food image based on this user profile:")
            .context_item("Goal", profile.goal.as_str())
            .context_item("Allergies", &allergies)
            .objectives(vec![
                "Identify the main dish.",
                "Estimate calories and macros (protein, carbs and fat in grams).",
                "Give it a \"NutriGPT Score\" from 1-10 based on healthiness and alignment with the user's goal.",
                "Provide a \"vibeCheck\" which is a 1-sentence witty comment about the food.",
            ])
            .section(
                "Score bands",
                "- 1-3: Unhealthy/Conflict\n- 4-7: Okay/Moderate\n- 8-10: Super Food/Perfect Match",
            )
            .build()
    }

    /// Nutrition-label analysis prompt
    pub fn label_analysis() -> String {
        PromptBuilder::new()
            .text("Analyze this nutrition label or product.")
            .objectives(vec![
                "Give it a score (1-10).",
                "Verdict: GO (Green), STOP (Red), or CAUTION (Yellow).",
                "Explanation: A fun, short explanation why.",
            ])
            .build()
    }
}
