use super::reply;
use crate::commands::registry::CommandInvocation;
use crate::commands::CommandResult;
use crate::core::app::{App, AppCommand, SystemStatus};

pub(crate) fn handle_tools(app: &mut App, _invocation: CommandInvocation<'_>) -> CommandResult {
    let listing = if app.tools.is_empty() {
        "NONE".to_string()
    } else {
        app.tools.names().collect::<Vec<_>>().join(", ")
    };
    reply(app, format!("TOOLS LIST: {listing}"))
}

pub(crate) fn handle_run_tool(app: &mut App, invocation: CommandInvocation<'_>) -> CommandResult {
    let requested = invocation.args;
    if requested.is_empty() {
        return reply(app, "ERROR: TOOL IDENTIFIER REQUIRED");
    }
    let Some((tool_name, tool)) = app
        .tools
        .resolve(requested)
        .map(|(name, tool)| (name.to_string(), tool.clone()))
    else {
        return reply(
            app,
            format!("ERROR: TOOL '{}' NOT FOUND", requested.to_uppercase()),
        );
    };

    app.print(format!("EXECUTING TOOL: '{}'", tool_name.to_uppercase()));
    let context = app.tool_context();
    app.session.begin_task(SystemStatus::RunningTool);
    CommandResult::Background(AppCommand::RunTool {
        tool_name,
        tool,
        context,
    })
}
