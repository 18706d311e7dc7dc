use std::time::Instant;

use tracing::{info, warn};

use super::{animated_reply, reply};
use crate::commands::registry::CommandInvocation;
use crate::commands::{all_commands, CommandResult};
use crate::core::app::App;

const BOX_INNER: usize = 40;

pub(crate) fn handle_help(app: &mut App, _invocation: CommandInvocation<'_>) -> CommandResult {
    let width = all_commands()
        .iter()
        .map(|command| command.usage.len())
        .max()
        .unwrap_or(0);
    let mut text = String::from("AVAILABLE COMMANDS:\n═══════════════════\n");
    for command in all_commands() {
        text.push_str(&format!("{:<width$} - {}\n", command.usage, command.help));
    }
    let aliases: Vec<String> = all_commands()
        .iter()
        .flat_map(|command| command.aliases.iter())
        .map(|alias| alias.to_uppercase())
        .collect();
    if !aliases.is_empty() {
        text.push_str(&format!("\nALIASES: {}", aliases.join(", ")));
    }
    animated_reply(app, text)
}

pub(crate) fn handle_exit(app: &mut App, _invocation: CommandInvocation<'_>) -> CommandResult {
    app.print("DISCONNECTING FROM MATRIX...");
    if let Some(mut backend) = app.backend.take() {
        app.print("TERMINATING SERVER PROCESS...");
        if let Err(err) = backend.terminate() {
            warn!(error = %err, backend = %backend.describe(), "failed to terminate backend");
            app.print(format!("ERROR: SERVER TERMINATION FAILED: {err}"));
        }
    }
    let deadline = Instant::now() + app.settings.exit_grace;
    app.session.request_exit(deadline);
    info!(grace = ?app.settings.exit_grace, "exit requested");
    CommandResult::Continue
}

fn status_row(label: &str, value: &str) -> String {
    let value: String = value.chars().take(9).collect();
    format!("║ {label:.<28} {value:<9} ║")
}

pub(crate) fn handle_status(app: &mut App, _invocation: CommandInvocation<'_>) -> CommandResult {
    let crew_link = if app.crew.is_empty() { "OFFLINE" } else { "STABLE" };
    let tools = if app.tools.is_empty() {
        "N/A".to_string()
    } else {
        app.tools.len().to_string()
    };
    let rows = [
        status_row("QUANTUM CORE", "ONLINE"),
        status_row("NEURAL INTERFACE", "ACTIVE"),
        status_row("CREW CONNECTION", crew_link),
        status_row("ENCRYPTION PROTOCOLS", "SECURE"),
        status_row("LIFE SUPPORT", "NOMINAL"),
        status_row("MODEL TYPE", &app.settings.model.model_type),
        status_row("TOOLS", &tools),
        status_row("BACKGROUND TASKS", &app.session.pending_tasks.to_string()),
    ];

    let border = "═".repeat(BOX_INNER);
    let mut text = format!("╔{border}╗\n║ {:<38} ║\n╠{border}╣\n", "SYSTEM STATUS: ALL SYSTEMS OPERATIONAL");
    for row in rows {
        text.push_str(&row);
        text.push('\n');
    }
    text.push_str(&format!(
        "╚{border}╝\n\n  ACTIVE CREW: {}\n  SYSTEM STATE: {}",
        app.session
            .current_agent
            .as_deref()
            .map(str::to_uppercase)
            .unwrap_or_else(|| "NONE".to_string()),
        app.session.status_at_input.label()
    ));
    animated_reply(app, text)
}

pub(crate) fn handle_destination(app: &mut App, _invocation: CommandInvocation<'_>) -> CommandResult {
    let mission = &app.settings.mission;
    let text = format!(
        "TARGET: {}\nMISSION: {}\nETA: {}\nSTATUS: {}",
        mission.target, mission.objective, mission.eta, mission.status
    );
    animated_reply(app, text)
}

pub(crate) fn handle_model_info(app: &mut App, _invocation: CommandInvocation<'_>) -> CommandResult {
    let model = &app.settings.model;
    let max_tokens = model
        .max_tokens
        .map(|max| max.to_string())
        .unwrap_or_else(|| "SERVER DEFAULT".to_string());
    let server = app
        .backend
        .as_ref()
        .map(|backend| backend.describe())
        .unwrap_or_else(|| "NOT ATTACHED".to_string());
    let loaded = if app.crew.is_empty() { "NOT LOADED" } else { "LOADED" };
    let text = format!(
        "MODEL INFORMATION:\n══════════════════\nTYPE: {}\nMODEL: {}\nMAX TOKENS: {max_tokens}\nBACKEND: {}\nENDPOINT: {}\nSERVER PROCESS: {server}\nSTATUS: {loaded}",
        model.model_type, model.model, model.engine, model.endpoint
    );
    animated_reply(app, text)
}

pub(crate) fn handle_unrecognized(app: &mut App) -> CommandResult {
    app.print("COMMAND NOT RECOGNIZED");
    reply(app, "TYPE 'HELP' FOR COMMAND LIST")
}
