pub mod startup;

use std::sync::Arc;

use tracing::debug;

use crate::core::app::{App, AppAction, AppCommand};
use crate::core::runner::TaskKind;

/// Hands a handler's background request to the app's task runner. The
/// completion comes back to the owner loop as an [`AppAction`].
pub fn spawn_app_command(app: &App, command: AppCommand) {
    let runner = &app.runner;
    match command {
        AppCommand::AskAgent {
            agent_name,
            agent,
            query,
        } => {
            debug!(agent = %agent_name, "submitting agent query");
            runner.submit(
                TaskKind::AgentQuery,
                async move { agent.chat(&query).await },
                move |result| AppAction::AgentReplied {
                    agent: agent_name,
                    result,
                },
            );
        }
        AppCommand::RunTool {
            tool_name,
            tool,
            context,
        } => {
            debug!(tool = %tool_name, "submitting tool invocation");
            runner.submit(
                TaskKind::ToolInvocation,
                async move { tool.invoke(&context).await },
                move |result| AppAction::ToolCompleted {
                    tool: tool_name,
                    result,
                },
            );
        }
        AppCommand::ExecuteCode { code } => {
            let executor = Arc::clone(&app.executor);
            runner.submit(
                TaskKind::CodeExecution,
                async move { executor.execute(&code).await },
                |result| AppAction::CodeExecuted { result },
            );
        }
        AppCommand::Initialize {
            probe,
            crew_count,
            tool_count,
        } => {
            runner.submit(
                TaskKind::Initialization,
                startup::initialize(probe, crew_count, tool_count),
                |result| AppAction::Initialized { result },
            );
        }
    }
}
