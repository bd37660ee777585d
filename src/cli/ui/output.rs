use console::style;

use crate::coach::Outcome;

use crate::cli::render;

pub struct Output;

impl Output {
    pub fn new() -> Self {
        Self
    }

    pub fn success(&self, message: &str) {
        println!("{} {}", style("✓").green(), message);
    }

    pub fn error(&self, message: &str) {
        eprintln!("{} {}", style("✗").red(), message);
    }

    pub fn warning(&self, message: &str) {
        println!("{} {}", style("⚠").yellow(), message);
    }

    pub fn info(&self, message: &str) {
        println!("{} {}", style("ℹ").blue(), message);
    }

    /// Print a pre-rendered block
    pub fn block(&self, content: &str) {
        println!("{}", content);
    }

    /// Dim note under a result that came from a fallback
    pub fn fallback_hint<T>(&self, outcome: &Outcome<T>) {
        if let Some(note) = render::fallback_note(outcome) {
            println!("{}", style(note).dim());
        }
    }
}

impl Default for Output {
    fn default() -> Self {
        Self::new()
    }
}
