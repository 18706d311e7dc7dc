use std::time::Instant;

use crate::core::app::App;
use crate::core::chat_stream::ChatEndpoint;

/// Coarse activity indicator shown by `status` and in logs.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SystemStatus {
    #[default]
    Ready,
    Processing,
    RunningTool,
    Executing,
}

impl SystemStatus {
    pub fn label(self) -> &'static str {
        match self {
            SystemStatus::Ready => "READY FOR COMMANDS",
            SystemStatus::Processing => "PROCESSING...",
            SystemStatus::RunningTool => "RUNNING TOOL...",
            SystemStatus::Executing => "EXECUTING CODE...",
        }
    }
}

/// Mutable per-session state. Only the owner loop touches it.
#[derive(Debug, Default)]
pub struct SessionContext {
    /// Canonical registry name of the active crew member.
    pub current_agent: Option<String>,
    pub last_generated_code: String,
    pub status: SystemStatus,
    /// Status in effect when the line being dispatched arrived.
    pub status_at_input: SystemStatus,
    /// Background tasks submitted but not yet completed.
    pub pending_tasks: usize,
    pub exit_deadline: Option<Instant>,
}

impl SessionContext {
    pub fn begin_task(&mut self, status: SystemStatus) {
        self.pending_tasks += 1;
        self.status = status;
    }

    pub fn finish_task(&mut self) {
        self.pending_tasks = self.pending_tasks.saturating_sub(1);
        self.settle();
    }

    /// Back to `Ready` unless background work is still in flight.
    pub fn settle(&mut self) {
        if self.pending_tasks == 0 {
            self.status = SystemStatus::Ready;
        }
    }

    pub fn clear_code(&mut self) {
        self.last_generated_code.clear();
    }

    pub fn request_exit(&mut self, deadline: Instant) {
        self.exit_deadline.get_or_insert(deadline);
    }

    pub fn exit_requested(&self) -> bool {
        self.exit_deadline.is_some()
    }

    pub fn exit_due(&self, now: Instant) -> bool {
        self.exit_deadline.is_some_and(|deadline| deadline <= now)
    }

    pub fn is_active(&self, name: &str) -> bool {
        self.current_agent
            .as_deref()
            .is_some_and(|current| current.eq_ignore_ascii_case(name))
    }
}

/// Everything built at startup besides the [`App`] itself.
pub struct SessionBootstrap {
    pub app: App,
    /// Problems worth showing once the banner is up; none are fatal.
    pub startup_errors: Vec<String>,
    /// Endpoint checked during initialization, when probing is enabled.
    pub probe: Option<ChatEndpoint>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::Duration;

    #[test]
    fn concurrent_tasks_keep_status_until_the_last_finishes() {
        let mut session = SessionContext::default();
        session.begin_task(SystemStatus::Processing);
        session.begin_task(SystemStatus::RunningTool);
        session.settle();
        assert_eq!(session.status, SystemStatus::RunningTool);

        session.finish_task();
        assert_eq!(session.status, SystemStatus::RunningTool);
        session.finish_task();
        assert_eq!(session.status, SystemStatus::Ready);
        assert_eq!(session.pending_tasks, 0);

        session.finish_task();
        assert_eq!(session.pending_tasks, 0);
    }

    #[test]
    fn first_exit_request_wins() {
        let mut session = SessionContext::default();
        let now = Instant::now();
        session.request_exit(now + Duration::from_secs(1));
        session.request_exit(now + Duration::from_secs(5));

        assert!(session.exit_requested());
        assert!(!session.exit_due(now));
        assert!(session.exit_due(now + Duration::from_secs(1)));
    }

    #[test]
    fn active_check_ignores_case() {
        let session = SessionContext {
            current_agent: Some("code_expert".to_string()),
            ..Default::default()
        };
        assert!(session.is_active("CODE_EXPERT"));
        assert!(!session.is_active("navigator"));
    }
}
