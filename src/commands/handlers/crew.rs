use tracing::info;

use super::reply;
use crate::commands::registry::CommandInvocation;
use crate::commands::CommandResult;
use crate::core::app::{App, AppCommand, SystemStatus};

pub(crate) fn handle_crew(app: &mut App, _invocation: CommandInvocation<'_>) -> CommandResult {
    if app.crew.is_empty() {
        return reply(app, "ERROR: CREW DATABASE EMPTY");
    }
    let active = app
        .session
        .current_agent
        .as_deref()
        .map(str::to_uppercase)
        .unwrap_or_else(|| "NONE".to_string());
    let mut lines = vec![
        "CREW MANIFEST:".to_string(),
        "══════════════".to_string(),
        format!("ACTIVE CREW: {active}"),
    ];
    for (index, name) in app.crew.names().enumerate() {
        let state = if app.session.is_active(name) { "ACTIVE" } else { "STANDBY" };
        lines.push(format!("[{}] {} - STATUS: {state}", index + 1, name.to_uppercase()));
    }
    reply(app, lines.join("\n"))
}

pub(crate) fn handle_use(app: &mut App, invocation: CommandInvocation<'_>) -> CommandResult {
    let requested = invocation.args;
    if requested.is_empty() {
        return reply(app, "ERROR: CREW MEMBER NAME REQUIRED");
    }
    let Some((name, agent)) = app
        .crew
        .resolve(requested)
        .map(|(name, agent)| (name.to_string(), agent.clone()))
    else {
        return reply(
            app,
            format!(
                "ERROR: CREW MEMBER '{}' NOT FOUND IN DATABASE",
                requested.to_uppercase()
            ),
        );
    };

    agent.reset();
    app.session.current_agent = Some(name.clone());
    app.session.clear_code();
    info!(agent = %name, "switched active crew member");
    reply(app, format!("SWITCHING NEURAL LINK: {}", name.to_uppercase()))
}

pub(crate) fn handle_reset(app: &mut App, _invocation: CommandInvocation<'_>) -> CommandResult {
    let Some((name, agent)) = app.current_agent() else {
        return reply(app, "ERROR: NO CREW MEMBER ACTIVE");
    };
    agent.reset();
    app.session.clear_code();
    reply(app, format!("MEMORY PURGE COMPLETE: {}", name.to_uppercase()))
}

pub(crate) fn handle_ask(app: &mut App, invocation: CommandInvocation<'_>) -> CommandResult {
    let query = invocation.args;
    if query.is_empty() {
        return reply(app, "ERROR: QUERY PARAMETER REQUIRED");
    }
    let Some((agent_name, agent)) = app.current_agent() else {
        return reply(app, "ERROR: NO ACTIVE CREW MEMBER");
    };

    app.print(format!("PROCESSING QUERY THROUGH {}...", agent_name.to_uppercase()));
    app.session.begin_task(SystemStatus::Processing);
    CommandResult::Background(AppCommand::AskAgent {
        agent_name,
        agent,
        query: query.to_string(),
    })
}
