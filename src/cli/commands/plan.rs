//! Plan Command
//!
//! Print the plan for the configured profile. Needs no API key.

use crate::cli::render;
use crate::cli::ui::Output;
use crate::cli::util::CommandContext;
use crate::types::Result;

pub fn run(ctx: &CommandContext) -> Result<()> {
    Output::new().block(&render::plan(&ctx.plan()));
    Ok(())
}
