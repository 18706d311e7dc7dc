mod completions;

use std::sync::Arc;

use tokio::sync::mpsc;

use super::App;
use crate::core::chat_stream::ChatEndpoint;
use crate::core::crew::Agent;
use crate::core::exec::ExecutionOutcome;
use crate::core::tools::{Tool, ToolContext};

/// State changes delivered to the owner loop, either from background tasks
/// or as animation continuations.
pub enum AppAction {
    Print {
        text: String,
    },
    AgentReplied {
        agent: String,
        result: Result<String, String>,
    },
    ToolCompleted {
        tool: String,
        result: Result<String, String>,
    },
    CodeExecuted {
        result: Result<ExecutionOutcome, String>,
    },
    Initialized {
        result: Result<Vec<String>, String>,
    },
}

#[derive(Clone)]
pub struct AppActionDispatcher {
    tx: mpsc::UnboundedSender<AppAction>,
}

impl AppActionDispatcher {
    pub fn new(tx: mpsc::UnboundedSender<AppAction>) -> Self {
        Self { tx }
    }

    pub fn dispatch(&self, action: AppAction) {
        let _ = self.tx.send(action);
    }
}

/// Background work requested by a command handler; the owner loop hands it
/// to the [`crate::core::runner::BackgroundTaskRunner`].
pub enum AppCommand {
    AskAgent {
        agent_name: String,
        agent: Arc<dyn Agent>,
        query: String,
    },
    RunTool {
        tool_name: String,
        tool: Arc<dyn Tool>,
        context: ToolContext,
    },
    ExecuteCode {
        code: String,
    },
    Initialize {
        probe: Option<ChatEndpoint>,
        crew_count: usize,
        tool_count: usize,
    },
}

pub fn apply_actions(app: &mut App, actions: impl IntoIterator<Item = AppAction>) {
    for action in actions {
        apply_action(app, action);
    }
}

pub fn apply_action(app: &mut App, action: AppAction) {
    match action {
        AppAction::Print { text } => app.print(text),
        AppAction::AgentReplied { agent, result } => {
            completions::handle_agent_replied(app, agent, result)
        }
        AppAction::ToolCompleted { tool, result } => {
            completions::handle_tool_completed(app, tool, result)
        }
        AppAction::CodeExecuted { result } => completions::handle_code_executed(app, result),
        AppAction::Initialized { result } => completions::handle_initialized(app, result),
    }
}
