//! Scan Command
//!
//! Judge a nutrition label photo.
//!
//! Usage:
//!   nutrigpt scan <photo>

use std::path::Path;

use crate::cli::render;
use crate::cli::ui::Output;
use crate::cli::util::CommandContext;
use crate::types::Result;

pub async fn run(ctx: &CommandContext, image: &Path) -> Result<()> {
    let app = ctx.app()?;
    let output = Output::new();

    output.info(&format!("Reading label {}...", image.display()));
    let Some(outcome) = app.scan_label(image).await? else {
        return Ok(());
    };
    output.block(&render::verdict(outcome.value()));
    output.fallback_hint(&outcome);
    Ok(())
}
