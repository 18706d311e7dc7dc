//! Bounded background execution for agent queries, tool runs and code.
//!
//! Every submitted future runs on the tokio pool once a semaphore permit is
//! free. Its outcome, success or failure, is turned into an [`AppAction`] and
//! sent to the owner loop; panics and timeouts become error text so the
//! completion always arrives.

use std::fmt;
use std::future::Future;
use std::sync::Arc;
use std::time::Duration;

use tokio::sync::Semaphore;
use tracing::{debug, warn};

use crate::core::app::actions::{AppAction, AppActionDispatcher};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TaskKind {
    AgentQuery,
    ToolInvocation,
    CodeExecution,
    Initialization,
}

impl TaskKind {
    pub fn as_str(self) -> &'static str {
        match self {
            TaskKind::AgentQuery => "agent_query",
            TaskKind::ToolInvocation => "tool_invocation",
            TaskKind::CodeExecution => "code_execution",
            TaskKind::Initialization => "initialization",
        }
    }

    /// Prefix shown in front of a failure of this kind.
    pub fn error_label(self) -> &'static str {
        match self {
            TaskKind::AgentQuery => "ERROR IN NEURAL INTERFACE:",
            TaskKind::ToolInvocation => "ERROR IN TOOL EXECUTION:",
            TaskKind::CodeExecution => "FATAL ERROR:",
            TaskKind::Initialization => "ERROR IN SYSTEM INITIALIZATION:",
        }
    }
}

#[derive(Clone)]
pub struct BackgroundTaskRunner {
    dispatcher: AppActionDispatcher,
    permits: Arc<Semaphore>,
    timeout: Option<Duration>,
}

impl BackgroundTaskRunner {
    pub fn new(
        dispatcher: AppActionDispatcher,
        max_concurrent: usize,
        timeout: Option<Duration>,
    ) -> Self {
        Self {
            dispatcher,
            permits: Arc::new(Semaphore::new(max_concurrent.max(1))),
            timeout,
        }
    }

    /// Runs `task` in the background and dispatches `complete(outcome)`.
    /// Must be called from within a tokio runtime.
    pub fn submit<T, E, F, M>(&self, kind: TaskKind, task: F, complete: M)
    where
        T: Send + 'static,
        E: fmt::Display + Send + 'static,
        F: Future<Output = Result<T, E>> + Send + 'static,
        M: FnOnce(Result<T, String>) -> AppAction + Send + 'static,
    {
        let dispatcher = self.dispatcher.clone();
        let permits = Arc::clone(&self.permits);
        let timeout = self.timeout;
        debug!(task = kind.as_str(), "submitting background task");
        tokio::spawn(async move {
            let outcome = match permits.acquire_owned().await {
                Ok(_permit) => run_guarded(kind, task, timeout).await,
                Err(_) => Err("worker pool closed".to_string()),
            };
            debug!(task = kind.as_str(), ok = outcome.is_ok(), "background task finished");
            dispatcher.dispatch(complete(outcome));
        });
    }
}

async fn run_guarded<T, E, F>(kind: TaskKind, task: F, timeout: Option<Duration>) -> Result<T, String>
where
    T: Send + 'static,
    E: fmt::Display + Send + 'static,
    F: Future<Output = Result<T, E>> + Send + 'static,
{
    let mut handle = tokio::spawn(task);
    let joined = match timeout {
        Some(limit) => match tokio::time::timeout(limit, &mut handle).await {
            Ok(joined) => joined,
            Err(_) => {
                handle.abort();
                warn!(task = kind.as_str(), limit = ?limit, "background task timed out");
                return Err(format!("TIMED OUT AFTER {limit:?}"));
            }
        },
        None => handle.await,
    };
    match joined {
        Ok(Ok(value)) => Ok(value),
        Ok(Err(err)) => Err(err.to_string()),
        Err(join_err) => {
            warn!(task = kind.as_str(), error = %join_err, "background task aborted");
            Err(format!("task aborted: {join_err}"))
        }
    }
}
