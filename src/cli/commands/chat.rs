//! Chat Command
//!
//! Send one message to the coach and print the reply.
//!
//! Usage:
//!   nutrigpt chat <message...>

use crate::cli::render;
use crate::cli::ui::Output;
use crate::cli::util::CommandContext;
use crate::types::{ChatMessage, Result};

pub async fn run(ctx: &CommandContext, message: &str) -> Result<()> {
    let app = ctx.app()?;
    let output = Output::new();

    let outcome = app.send_message(message).await?;
    output.block(&render::chat_message(&ChatMessage::model(outcome.value().as_str())));
    output.fallback_hint(&outcome);
    Ok(())
}
