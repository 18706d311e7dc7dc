mod handlers;
mod registry;

pub use registry::{all_commands, parse, Command, CommandInvocation, Syntax};

use tracing::debug;

use crate::core::app::{App, AppCommand, SystemStatus};

pub enum CommandResult {
    Continue,
    /// The handler queued background work for the owner loop to submit.
    Background(AppCommand),
}

/// Dispatches one raw input line.
///
/// Blank lines are ignored without an echo. While the safety gate is armed the
/// line answers the gate instead of being parsed as a command.
pub fn process_input(app: &mut App, input: &str) -> CommandResult {
    let trimmed = input.trim();
    if trimmed.is_empty() {
        return CommandResult::Continue;
    }
    if app.session.exit_requested() {
        debug!("ignoring input after exit");
        return CommandResult::Continue;
    }

    app.print(format!("> {trimmed}"));
    app.session.status_at_input = app.session.status;
    let in_flight = app.session.pending_tasks;
    app.session.status = SystemStatus::Processing;

    let result = if app.gate.is_armed() {
        handlers::code::handle_confirmation(app, trimmed)
    } else {
        match registry::parse(trimmed) {
            Some(invocation) => {
                debug!(verb = invocation.command.name, "dispatching command");
                (invocation.command.handler)(app, invocation)
            }
            None => handlers::core::handle_unrecognized(app),
        }
    };

    // No new work: whatever was running keeps its status.
    if app.session.pending_tasks == in_flight {
        app.session.status = app.session.status_at_input;
    }
    app.session.settle();
    result
}
