use std::sync::Arc;
use std::time::Instant;

use tracing::{debug, warn};

use crate::core::backend::BackendHandle;
use crate::core::crew::{Agent, CrewRegistry};
use crate::core::exec::CodeExecutor;
use crate::core::gate::SafetyGate;
use crate::core::runner::BackgroundTaskRunner;
use crate::core::tools::{ToolContext, ToolRegistry};
use crate::ui::animation::{AnimationEngine, AnimationJob, BusyPolicy, RenderOutcome};
use crate::ui::output::OutputSink;

pub mod actions;
pub mod session;
pub mod settings;

pub use actions::{apply_actions, AppAction, AppActionDispatcher, AppCommand};
pub use session::{SessionBootstrap, SessionContext, SystemStatus};
pub use settings::{AppSettings, ModelInfo, Pace, Pacing};

/// Parts an [`App`] is assembled from.
pub struct AppInit {
    pub settings: AppSettings,
    pub busy_policy: BusyPolicy,
    pub crew: CrewRegistry,
    pub tools: ToolRegistry,
    pub executor: Arc<dyn CodeExecutor>,
    pub backend: Option<Box<dyn BackendHandle>>,
    pub runner: BackgroundTaskRunner,
    pub output: Box<dyn OutputSink>,
}

pub struct App {
    pub session: SessionContext,
    pub settings: AppSettings,
    pub crew: CrewRegistry,
    pub tools: ToolRegistry,
    pub gate: SafetyGate,
    pub executor: Arc<dyn CodeExecutor>,
    pub backend: Option<Box<dyn BackendHandle>>,
    pub runner: BackgroundTaskRunner,
    pub animation: AnimationEngine<AppAction>,
    output: Box<dyn OutputSink>,
}

impl App {
    pub fn new(init: AppInit) -> Self {
        Self {
            session: SessionContext::default(),
            settings: init.settings,
            crew: init.crew,
            tools: init.tools,
            gate: SafetyGate::new(),
            executor: init.executor,
            backend: init.backend,
            runner: init.runner,
            animation: AnimationEngine::new(init.busy_policy),
            output: init.output,
        }
    }

    /// Writes `text` as plain lines, after any render in progress.
    pub fn print(&mut self, text: impl AsRef<str>) {
        if let Err(err) = self.animation.print(text.as_ref(), self.output.as_mut()) {
            warn!(error = %err, "failed to write to terminal");
        }
    }

    /// Types `text` out through the animation engine. `continuation` is
    /// applied when the render finishes; a dropped render drops it too.
    pub fn animate(&mut self, text: impl Into<String>, pace: Pace, continuation: Option<AppAction>) {
        let (char_delay, garble) = self.settings.delays(pace);
        let mut job = AnimationJob::new(text, char_delay, garble);
        if let Some(action) = continuation {
            job = job.then(action);
        }
        if self.animation.render(job, Instant::now()) == RenderOutcome::Dropped {
            debug!("renderer busy, animated text discarded");
        }
    }

    /// Advances the animation to `now`, applying each finished render's
    /// continuation before the next queued render starts.
    pub fn tick(&mut self, now: Instant) {
        loop {
            match self.animation.tick(now, self.output.as_mut()) {
                Ok(finished) if finished.is_empty() => return,
                Ok(finished) => actions::apply_actions(self, finished),
                Err(err) => {
                    warn!(error = %err, "failed to write to terminal");
                    return;
                }
            }
        }
    }

    /// Writes every pending render and line without pacing.
    pub fn flush_output(&mut self) {
        loop {
            match self.animation.fast_forward(self.output.as_mut()) {
                Ok(finished) if finished.is_empty() => return,
                Ok(finished) => actions::apply_actions(self, finished),
                Err(err) => {
                    warn!(error = %err, "failed to write to terminal");
                    return;
                }
            }
        }
    }

    /// The active crew member with its canonical name.
    pub fn current_agent(&self) -> Option<(String, Arc<dyn Agent>)> {
        let name = self.session.current_agent.as_deref()?;
        self.crew
            .resolve(name)
            .map(|(canonical, agent)| (canonical.to_string(), Arc::clone(agent)))
    }

    pub fn tool_context(&self) -> ToolContext {
        ToolContext {
            crew: self.crew.names().map(str::to_owned).collect(),
            active_agent: self.session.current_agent.clone(),
        }
    }

    /// Nothing left to show or wait for.
    pub fn is_idle(&self) -> bool {
        self.session.pending_tasks == 0 && !self.animation.is_animating() && !self.gate.is_armed()
    }
}
