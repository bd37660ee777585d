//! Config Command
//!
//! Manage NutriGPT configuration.
//!
//! Usage:
//!   nutrigpt config show [-f json]
//!   nutrigpt config path
//!   nutrigpt config init [-g] [--force]
//!   nutrigpt config check

use crate::cli::ui::Output;
use crate::cli::util::CommandContext;
use crate::config::ConfigLoader;
use crate::types::Result;

/// Show the merged effective configuration
pub fn show(ctx: &CommandContext, format: &str) -> Result<()> {
    let rendered = ConfigLoader::render(&ctx.config, format == "json")?;
    println!("{}", rendered);
    Ok(())
}

/// Show configuration paths
pub fn path() -> Result<()> {
    for (label, path) in ConfigLoader::paths() {
        match path {
            Some(path) => {
                let state = if path.exists() { "" } else { " (not found)" };
                println!("{:<8} {}{}", label, path.display(), state);
            }
            None => println!("{:<8} (cannot determine directory)", label),
        }
    }
    Ok(())
}

/// Write a default config file
pub fn init(global: bool, force: bool) -> Result<()> {
    let output = Output::new();
    let (path, written) = ConfigLoader::init(global, force)?;
    if written {
        output.success(&format!("Created {}", path.display()));
    } else {
        output.warning(&format!(
            "{} already exists; use --force to overwrite",
            path.display()
        ));
    }
    Ok(())
}

/// Check that the configured model is reachable with the configured key
pub async fn check(ctx: &CommandContext) -> Result<bool> {
    let output = Output::new();
    let provider = ctx.provider()?;
    let model = &ctx.config.llm.chat_model;

    let reachable = provider.health_check().await?;
    if reachable {
        output.success(&format!("{} is reachable ({})", provider.name(), model));
    } else {
        output.error(&format!(
            "{} did not accept the request for {}; check the API key and model name",
            provider.name(),
            model
        ));
    }
    Ok(reachable)
}
