use tracing::info;

use super::reply;
use crate::commands::registry::CommandInvocation;
use crate::commands::CommandResult;
use crate::core::app::{App, AppCommand, SystemStatus};
use crate::core::constants::SECURITY_WARNING;
use crate::core::gate::GateDecision;

pub(crate) fn handle_run_code(app: &mut App, _invocation: CommandInvocation<'_>) -> CommandResult {
    let code_agent_active = app.session.is_active(&app.settings.code_agent);
    if !code_agent_active || app.session.last_generated_code.trim().is_empty() {
        return reply(app, "ERROR: NO CODE SEQUENCE AVAILABLE");
    }

    let code = app.session.last_generated_code.clone();
    app.print("");
    for line in SECURITY_WARNING {
        app.print(line);
    }
    app.print("");
    app.print(&code);
    app.print("");
    let prompt = app.gate.arm(code);
    info!("code execution awaiting confirmation");
    reply(app, prompt)
}

/// Consumes the line that answers an armed gate.
pub(crate) fn handle_confirmation(app: &mut App, answer: &str) -> CommandResult {
    match app.gate.confirm(answer) {
        GateDecision::Approved(code) => {
            app.print("--- EXECUTING CODE SEQUENCE ---");
            app.session.begin_task(SystemStatus::Executing);
            CommandResult::Background(AppCommand::ExecuteCode { code })
        }
        GateDecision::Refused => reply(app, "CODE EXECUTION ABORTED"),
    }
}
