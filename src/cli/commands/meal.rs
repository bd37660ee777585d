//! Meal Command
//!
//! Analyze a meal photo and print its card.
//!
//! Usage:
//!   nutrigpt meal <photo>

use std::path::Path;

use crate::cli::render;
use crate::cli::ui::Output;
use crate::cli::util::CommandContext;
use crate::types::Result;

pub async fn run(ctx: &CommandContext, image: &Path) -> Result<()> {
    let app = ctx.app()?;
    let output = Output::new();

    output.info(&format!("Analyzing {}...", image.display()));
    let outcome = app.log_meal(image).await?;
    output.block(&render::meal_card(outcome.value()));
    output.fallback_hint(&outcome);
    Ok(())
}
