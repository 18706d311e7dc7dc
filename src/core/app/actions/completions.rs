use tracing::{debug, info};
use unicode_width::UnicodeWidthStr;

use super::App;
use crate::core::code::extract_code;
use crate::core::exec::ExecutionOutcome;
use crate::core::runner::TaskKind;

pub(super) fn handle_agent_replied(app: &mut App, agent: String, result: Result<String, String>) {
    app.session.finish_task();
    let reply = match result {
        Ok(reply) => reply,
        Err(err) => {
            app.print(format!("{} {err}", TaskKind::AgentQuery.error_label()));
            return;
        }
    };

    let header = format!("[{} RESPONSE]:", agent.to_uppercase());
    let underline = "═".repeat(header.width().saturating_sub(1));
    app.print("");
    app.print(&header);
    app.print(underline);
    app.print(&reply);

    // Code is only captured while the code agent is still the active one.
    if agent.eq_ignore_ascii_case(&app.settings.code_agent) && app.session.is_active(&agent) {
        app.session.last_generated_code = extract_code(&reply);
        debug!(bytes = app.session.last_generated_code.len(), "captured generated code");
    }
}

pub(super) fn handle_tool_completed(app: &mut App, tool: String, result: Result<String, String>) {
    app.session.finish_task();
    match result {
        Ok(output) => {
            info!(tool = %tool, "tool finished");
            app.print("TOOL EXECUTION COMPLETE");
            app.print(format!("RESULT: {output}"));
        }
        Err(err) => app.print(format!("{} {err}", TaskKind::ToolInvocation.error_label())),
    }
}

pub(super) fn handle_code_executed(app: &mut App, result: Result<ExecutionOutcome, String>) {
    app.session.finish_task();
    match result {
        Ok(outcome) if outcome.succeeded() => {
            app.print("--- EXECUTION SUCCESSFUL ---");
            app.print(outcome.stdout.trim_end());
        }
        Ok(outcome) => {
            app.print("--- EXECUTION ERROR ---");
            let stderr = outcome.stderr.trim_end();
            if stderr.is_empty() {
                match outcome.exit_code {
                    Some(code) => app.print(format!("EXIT CODE: {code}")),
                    None => app.print("PROCESS TERMINATED BY SIGNAL"),
                }
            } else {
                app.print(stderr);
            }
        }
        Err(err) => app.print(format!("{} {err}", TaskKind::CodeExecution.error_label())),
    }
}

pub(super) fn handle_initialized(app: &mut App, result: Result<Vec<String>, String>) {
    app.session.finish_task();
    match result {
        Ok(messages) => {
            for message in messages {
                app.print(message);
            }
            app.print("INITIALIZATION COMPLETE. SYSTEM READY.");
        }
        Err(err) => app.print(format!("{} {err}", TaskKind::Initialization.error_label())),
    }
}
