use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;

use async_trait::async_trait;
use tokio::sync::mpsc;

use crate::core::app::actions::apply_action;
use crate::core::app::{App, AppAction, AppActionDispatcher, AppInit, AppSettings};
use crate::core::backend::BackendHandle;
use crate::core::config::data::Config;
use crate::core::crew::{Agent, AgentError, CrewRegistry};
use crate::core::exec::{CodeExecutor, ExecutionOutcome, ProcessError};
use crate::core::runner::BackgroundTaskRunner;
use crate::core::tools::{Tool, ToolContext, ToolError, ToolRegistry};
use crate::ui::animation::BusyPolicy;
use crate::ui::output::MemorySink;

pub const CODE_REPLY: &str = "Here you go:\n```python\nprint('hello europa')\n```";

/// Agent that answers `echo: <query>` unless given a fixed reply or
/// failure, and counts resets.
#[derive(Clone, Default)]
pub struct RecordingAgent {
    reply: Option<String>,
    failure: Option<String>,
    queries: Arc<Mutex<Vec<String>>>,
    resets: Arc<AtomicUsize>,
}

impl RecordingAgent {
    pub fn replying(reply: &str) -> Self {
        Self {
            reply: Some(reply.to_string()),
            ..Self::default()
        }
    }

    pub fn failing(message: &str) -> Self {
        Self {
            failure: Some(message.to_string()),
            ..Self::default()
        }
    }

    pub fn queries(&self) -> Vec<String> {
        self.queries.lock().unwrap().clone()
    }

    pub fn resets(&self) -> usize {
        self.resets.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl Agent for RecordingAgent {
    async fn chat(&self, query: &str) -> Result<String, AgentError> {
        self.queries.lock().unwrap().push(query.to_string());
        if let Some(message) = &self.failure {
            return Err(AgentError::Api(message.clone()));
        }
        Ok(self
            .reply
            .clone()
            .unwrap_or_else(|| format!("echo: {query}")))
    }

    fn reset(&self) {
        self.resets.fetch_add(1, Ordering::SeqCst);
    }
}

pub struct StaticTool {
    output: Result<String, String>,
}

impl StaticTool {
    pub fn ok(output: &str) -> Self {
        Self {
            output: Ok(output.to_string()),
        }
    }

    pub fn failing(message: &str) -> Self {
        Self {
            output: Err(message.to_string()),
        }
    }
}

#[async_trait]
impl Tool for StaticTool {
    fn description(&self) -> &str {
        "canned output"
    }

    async fn invoke(&self, _context: &ToolContext) -> Result<String, ToolError> {
        self.output.clone().map_err(ToolError::Other)
    }
}

#[derive(Clone)]
pub struct RecordingExecutor {
    calls: Arc<Mutex<Vec<String>>>,
    /// `None` fails every run as if the interpreter could not be started.
    outcome: Option<ExecutionOutcome>,
}

impl Default for RecordingExecutor {
    fn default() -> Self {
        Self {
            calls: Arc::default(),
            outcome: Some(ExecutionOutcome {
                exit_code: Some(0),
                stdout: "hello europa\n".to_string(),
                stderr: String::new(),
            }),
        }
    }
}

impl RecordingExecutor {
    pub fn with_outcome(outcome: ExecutionOutcome) -> Self {
        Self {
            calls: Arc::default(),
            outcome: Some(outcome),
        }
    }

    pub fn unspawnable() -> Self {
        Self {
            calls: Arc::default(),
            outcome: None,
        }
    }

    pub fn calls(&self) -> Vec<String> {
        self.calls.lock().unwrap().clone()
    }
}

#[async_trait]
impl CodeExecutor for RecordingExecutor {
    async fn execute(&self, code: &str) -> Result<ExecutionOutcome, ProcessError> {
        self.calls.lock().unwrap().push(code.to_string());
        self.outcome.clone().ok_or(ProcessError::EmptyCommand)
    }
}

#[derive(Clone, Default)]
pub struct RecordingBackend {
    terminations: Arc<AtomicUsize>,
}

impl RecordingBackend {
    pub fn terminations(&self) -> usize {
        self.terminations.load(Ordering::SeqCst)
    }
}

impl BackendHandle for RecordingBackend {
    fn describe(&self) -> String {
        "fake-server".to_string()
    }

    fn terminate(&mut self) -> std::io::Result<()> {
        self.terminations.fetch_add(1, Ordering::SeqCst);
        Ok(())
    }
}

pub struct TestApp {
    pub app: App,
    pub output: MemorySink,
    pub actions: mpsc::UnboundedReceiver<AppAction>,
    pub navigator: RecordingAgent,
    pub code_expert: RecordingAgent,
    pub executor: RecordingExecutor,
}

impl TestApp {
    /// Writes out any pending render and returns everything printed so far.
    pub fn transcript(&mut self) -> String {
        self.app.flush_output();
        self.output.transcript()
    }

    /// Waits for the next `count` background completions and applies them.
    pub async fn pump(&mut self, count: usize) {
        for _ in 0..count {
            let action = tokio::time::timeout(Duration::from_secs(5), self.actions.recv())
                .await
                .expect("timed out waiting for a background completion")
                .expect("action channel closed");
            apply_action(&mut self.app, action);
        }
    }
}

/// An app with instant pacing, crew `navigator` (active) and
/// `code_expert`, one tool `ping`, and recording collaborators.
pub fn create_test_app() -> TestApp {
    let (tx, actions) = mpsc::unbounded_channel();
    let navigator = RecordingAgent::default();
    let code_expert = RecordingAgent::replying(CODE_REPLY);
    let executor = RecordingExecutor::default();
    let output = MemorySink::new();

    let mut crew = CrewRegistry::new();
    crew.register("navigator", Arc::new(navigator.clone())).unwrap();
    crew.register("code_expert", Arc::new(code_expert.clone())).unwrap();
    let mut tools = ToolRegistry::new();
    tools.register("ping", Arc::new(StaticTool::ok("pong"))).unwrap();

    let mut settings = AppSettings::from_config(&Config::default(), false);
    settings.exit_grace = Duration::ZERO;

    let mut app = App::new(AppInit {
        settings,
        busy_policy: BusyPolicy::Drop,
        crew,
        tools,
        executor: Arc::new(executor.clone()),
        backend: None,
        runner: BackgroundTaskRunner::new(AppActionDispatcher::new(tx), 4, None),
        output: Box::new(output.clone()),
    });
    app.session.current_agent = Some("navigator".to_string());

    TestApp {
        app,
        output,
        actions,
        navigator,
        code_expert,
        executor,
    }
}
