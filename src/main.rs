use clap::{Parser, Subcommand};
use std::path::PathBuf;
use std::process::ExitCode;
use tokio::runtime::Runtime;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use nutrigpt::ai::ValidationPolicy;
use nutrigpt::cli::commands;
use nutrigpt::cli::{CommandContext, Overrides};

#[derive(Parser)]
#[command(name = "nutrigpt")]
#[command(version, about = "Pocket nutrition coach: chat, meal photos and label scans")]
struct Cli {
    /// Starts the interactive shell when omitted
    #[command(subcommand)]
    command: Option<Commands>,

    #[arg(long, global = true)]
    verbose: bool,

    #[arg(long, short, global = true)]
    quiet: bool,

    #[arg(long, global = true, help = "Model request timeout in seconds")]
    timeout: Option<u64>,

    #[arg(long, global = true, help = "Result validation: clamp, strict, passthrough")]
    policy: Option<ValidationPolicy>,
}

#[derive(Subcommand)]
enum Commands {
    /// Interactive session (default)
    Shell,

    /// Ask the coach one question
    Chat {
        #[arg(required = true, help = "Message to send")]
        message: Vec<String>,
    },

    /// Analyze a meal photo
    Meal {
        #[arg(help = "Path to the photo")]
        image: PathBuf,
    },

    /// Judge a nutrition label photo
    Scan {
        #[arg(help = "Path to the photo")]
        image: PathBuf,
    },

    /// Show the plan for the configured profile
    Plan,

    /// Show the configured profile
    Profile {
        #[arg(long, num_args = 2, value_names = ["FIELD", "VALUE"], help = "Preview a single-field edit")]
        set: Option<Vec<String>>,
    },

    /// Manage configuration
    Config {
        #[command(subcommand)]
        action: ConfigAction,
    },
}

#[derive(Subcommand)]
enum ConfigAction {
    /// Show current configuration (merged from all sources)
    Show {
        #[arg(
            short = 'f',
            long,
            default_value = "text",
            help = "Output format: text, json"
        )]
        format: String,
    },
    /// Show configuration file paths
    Path,
    /// Check that the configured model is reachable
    Check,
    /// Write a default configuration file
    Init {
        #[arg(long, short, help = "Initialize global config")]
        global: bool,
        #[arg(long, help = "Overwrite existing config")]
        force: bool,
    },
}

/// Set up panic handler for graceful error reporting
fn setup_panic_handler() {
    let default_hook = std::panic::take_hook();

    std::panic::set_hook(Box::new(move |panic_info| {
        let message = if let Some(s) = panic_info.payload().downcast_ref::<&str>() {
            s.to_string()
        } else if let Some(s) = panic_info.payload().downcast_ref::<String>() {
            s.clone()
        } else {
            "Unknown panic".to_string()
        };

        eprintln!("\n\x1b[1;31m━━━ PANIC ━━━\x1b[0m");
        eprintln!("\x1b[31mNutriGPT hit an unexpected error:\x1b[0m");
        eprintln!("  {}", message);

        if let Some(location) = panic_info.location() {
            eprintln!(
                "\x1b[90mLocation: {}:{}:{}\x1b[0m",
                location.file(),
                location.line(),
                location.column()
            );
        }
        eprintln!();

        // Backtrace when RUST_BACKTRACE=1
        default_hook(panic_info);
    }));
}

fn main() -> ExitCode {
    setup_panic_handler();

    match run_cli() {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("\x1b[31mError:\x1b[0m {}", e);
            ExitCode::FAILURE
        }
    }
}

fn run_cli() -> anyhow::Result<()> {
    let cli = Cli::parse();

    // Logs go to stderr so they never interleave with rendered views
    let filter = if cli.verbose {
        "debug"
    } else if cli.quiet {
        "error"
    } else {
        "warn"
    };

    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env().unwrap_or_else(|_| filter.into()),
        )
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    let overrides = Overrides {
        timeout_secs: cli.timeout,
        policy: cli.policy,
    };

    // Config commands must work even when the files on disk are invalid
    if let Some(Commands::Config { action }) = &cli.command {
        match action {
            ConfigAction::Path => commands::config::path()?,
            ConfigAction::Init { global, force } => commands::config::init(*global, *force)?,
            ConfigAction::Show { format } => {
                let ctx = CommandContext::load(&overrides)?;
                commands::config::show(&ctx, format)?;
            }
            ConfigAction::Check => {
                let ctx = CommandContext::load(&overrides)?;
                if !Runtime::new()?.block_on(commands::config::check(&ctx))? {
                    anyhow::bail!("model health check failed");
                }
            }
        }
        return Ok(());
    }

    let ctx = CommandContext::load(&overrides)?;

    match cli.command.unwrap_or(Commands::Shell) {
        Commands::Plan => commands::plan::run(&ctx)?,
        Commands::Profile { set } => {
            let set = set.as_deref().and_then(|pair| match pair {
                [field, value] => Some((field.as_str(), value.as_str())),
                _ => None,
            });
            commands::profile::run(&ctx, set)?;
        }
        Commands::Shell => Runtime::new()?.block_on(commands::shell::run(&ctx))?,
        Commands::Chat { message } => {
            Runtime::new()?.block_on(commands::chat::run(&ctx, &message.join(" ")))?
        }
        Commands::Meal { image } => Runtime::new()?.block_on(commands::meal::run(&ctx, &image))?,
        Commands::Scan { image } => Runtime::new()?.block_on(commands::scan::run(&ctx, &image))?,
        Commands::Config { .. } => {}
    }

    Ok(())
}
