//! Shell Command
//!
//! Interactive session. Plain lines are chat messages; lines starting with
//! `/` switch views, log meals, scan labels and edit the profile.
//!
//! Model requests run as background tasks so the view can change while a
//! reply is pending. Results are printed as they arrive.

use std::path::PathBuf;
use std::sync::Arc;

use tokio::io::{AsyncBufReadExt, BufReader};
use tokio::sync::mpsc;
use tracing::debug;

use crate::app::{App, Plan, PlanSettings, quick_chip};
use crate::cli::render;
use crate::cli::ui::Output;
use crate::cli::util::CommandContext;
use crate::coach::Outcome;
use crate::types::{ChatMessage, Meal, NutriError, ProfileUpdate, Result, ShoppingVerdict, View};

/// One parsed input line
#[derive(Debug, Clone, PartialEq)]
pub enum ShellCommand {
    Chat(String),
    Chip(usize),
    Navigate(View),
    Meal(PathBuf),
    Scan(PathBuf),
    Reset,
    Set { field: String, value: String },
    Chips,
    Help,
    Quit,
    Empty,
    Invalid(String),
}

pub fn parse_line(line: &str) -> ShellCommand {
    let line = line.trim();
    if line.is_empty() {
        return ShellCommand::Empty;
    }
    let Some(rest) = line.strip_prefix('/') else {
        return ShellCommand::Chat(line.to_string());
    };

    let (cmd, arg) = match rest.split_once(char::is_whitespace) {
        Some((cmd, arg)) => (cmd, arg.trim()),
        None => (rest, ""),
    };

    match cmd.to_lowercase().as_str() {
        "dashboard" | "plan" | "shopping" | "meals" | "profile" => {
            ShellCommand::Navigate(View::from_name(cmd))
        }
        "view" | "go" if !arg.is_empty() => ShellCommand::Navigate(View::from_name(arg)),
        "meal" | "snap" if !arg.is_empty() => ShellCommand::Meal(PathBuf::from(arg)),
        "scan" if !arg.is_empty() => ShellCommand::Scan(PathBuf::from(arg)),
        "reset" => ShellCommand::Reset,
        "set" => match arg.split_once(char::is_whitespace) {
            Some((field, value)) => ShellCommand::Set {
                field: field.to_string(),
                value: value.trim().to_string(),
            },
            // `/set allergies` clears a list
            None if !arg.is_empty() => ShellCommand::Set {
                field: arg.to_string(),
                value: String::new(),
            },
            None => ShellCommand::Invalid("usage: /set <field> <value>".to_string()),
        },
        "chips" => ShellCommand::Chips,
        "help" | "?" => ShellCommand::Help,
        "quit" | "exit" | "q" => ShellCommand::Quit,
        other => match other.parse::<usize>() {
            Ok(n) if quick_chip(n).is_some() => ShellCommand::Chip(n),
            _ => ShellCommand::Invalid(format!("unknown command '/{}'; try /help", cmd)),
        },
    }
}

/// Result of a background model request
enum Finished {
    Chat(Result<Outcome<String>>),
    Meal(Result<Outcome<Meal>>),
    Scan(Result<Option<Outcome<ShoppingVerdict>>>),
}

pub async fn run(ctx: &CommandContext) -> Result<()> {
    let app = ctx.app()?;
    let settings = ctx.config.plan.clone();
    let output = Output::new();
    let (tx, mut rx) = mpsc::unbounded_channel::<Finished>();

    show_view(&app, &settings, &output).await;
    output.info("Type a message, /help for commands, /quit to leave.");

    let mut lines = BufReader::new(tokio::io::stdin()).lines();
    loop {
        tokio::select! {
            line = lines.next_line() => {
                let Some(line) = line? else { break };
                match parse_line(&line) {
                    ShellCommand::Quit => break,
                    command => handle(command, &app, &settings, &output, &tx).await,
                }
            }
            Some(done) = rx.recv() => report(done, &output),
        }
    }

    // Let requests already in flight finish and print
    drop(tx);
    while let Some(done) = rx.recv().await {
        report(done, &output);
    }
    Ok(())
}

async fn handle(
    command: ShellCommand,
    app: &Arc<App>,
    settings: &PlanSettings,
    output: &Output,
    tx: &mpsc::UnboundedSender<Finished>,
) {
    match command {
        ShellCommand::Empty | ShellCommand::Quit => {}
        ShellCommand::Chat(text) => spawn_chat(app, text, output, tx),
        ShellCommand::Chip(n) => {
            if let Some(text) = quick_chip(n) {
                spawn_chat(app, text.to_string(), output, tx);
            }
        }
        ShellCommand::Navigate(view) => {
            app.navigate(view).await;
            show_view(app, settings, output).await;
        }
        ShellCommand::Meal(path) => {
            if app.is_busy(View::Meals) {
                output.warning("Still analyzing the last meal.");
                return;
            }
            output.info(&format!("Analyzing {}...", path.display()));
            let (app, tx) = (Arc::clone(app), tx.clone());
            tokio::spawn(async move {
                let _ = tx.send(Finished::Meal(app.log_meal(&path).await));
            });
        }
        ShellCommand::Scan(path) => {
            if app.is_busy(View::Shopping) {
                output.warning("Still reading the last label.");
                return;
            }
            output.info(&format!("Reading label {}...", path.display()));
            let (app, tx) = (Arc::clone(app), tx.clone());
            tokio::spawn(async move {
                let _ = tx.send(Finished::Scan(app.scan_label(&path).await));
            });
        }
        ShellCommand::Reset => {
            app.reset_scan().await;
            output.success("Scan cleared.");
        }
        ShellCommand::Set { field, value } => {
            let result = match ProfileUpdate::parse(&field, &value) {
                Ok(update) => app.update_profile(update).await,
                Err(e) => Err(e),
            };
            match result {
                Ok(profile) => {
                    output.success(&format!("Profile updated: {}", field));
                    if app.view().await == View::Profile {
                        output.block(&render::profile(&profile));
                    }
                }
                Err(e) => output.error(&e.to_string()),
            }
        }
        ShellCommand::Chips => output.block(&render::chips()),
        ShellCommand::Help => output.block(&render::help()),
        ShellCommand::Invalid(message) => output.warning(&message),
    }
}

fn spawn_chat(
    app: &Arc<App>,
    text: String,
    output: &Output,
    tx: &mpsc::UnboundedSender<Finished>,
) {
    if app.is_busy(View::Dashboard) {
        output.warning("NutriGPT is still typing; wait for the reply.");
        return;
    }
    output.block(&render::chat_message(&ChatMessage::user(text.as_str())));
    let (app, tx) = (Arc::clone(app), tx.clone());
    tokio::spawn(async move {
        let _ = tx.send(Finished::Chat(app.send_message(&text).await));
    });
}

fn report(done: Finished, output: &Output) {
    match done {
        Finished::Chat(Ok(outcome)) => {
            output.block(&render::chat_message(&ChatMessage::model(outcome.value().as_str())));
            output.fallback_hint(&outcome);
        }
        Finished::Meal(Ok(outcome)) => {
            output.success("Meal logged.");
            output.block(&render::meal_card(outcome.value()));
            output.fallback_hint(&outcome);
        }
        Finished::Scan(Ok(Some(outcome))) => {
            output.block(&render::verdict(outcome.value()));
            output.fallback_hint(&outcome);
        }
        Finished::Scan(Ok(None)) => debug!("Label verdict arrived after the scan was reset"),
        Finished::Chat(Err(e)) | Finished::Meal(Err(e)) | Finished::Scan(Err(e)) => {
            report_error(&e, output)
        }
    }
}

fn report_error(err: &NutriError, output: &Output) {
    match err {
        NutriError::Busy(_) => output.warning(&err.to_string()),
        _ => output.error(&err.to_string()),
    }
}

async fn show_view(app: &App, settings: &PlanSettings, output: &Output) {
    let state = app.snapshot().await;
    let plan = Plan::for_profile(&state.profile, &state.meals, settings);
    output.block(&format!("\n{}\n", render::nav(state.view)));
    output.block(&render::view(&state, &plan));
}
