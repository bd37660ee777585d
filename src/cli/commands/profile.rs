//! Profile Command
//!
//! Print the configured profile, or check a single-field edit against it.
//!
//! Usage:
//!   nutrigpt profile
//!   nutrigpt profile --set <field> <value>

use crate::cli::render;
use crate::cli::ui::Output;
use crate::cli::util::CommandContext;
use crate::types::{ProfileUpdate, Result};

pub fn run(ctx: &CommandContext, set: Option<(&str, &str)>) -> Result<()> {
    let output = Output::new();
    let Some((field, value)) = set else {
        output.block(&render::profile(&ctx.config.profile));
        return Ok(());
    };

    let update = ProfileUpdate::parse(field, value)?;
    let profile = ctx.config.profile.with_update(update)?;
    output.block(&render::profile(&profile));
    output.info("Edits last for this run only; put them under [profile] in the config file to keep them.");
    Ok(())
}
