use std::error::Error;
use std::sync::Arc;
use std::time::Duration;

use tracing::{info, warn};

use super::ChatOptions;
use crate::core::app::{App, AppActionDispatcher, AppCommand, AppInit, AppSettings, SessionBootstrap, SystemStatus};
use crate::core::backend::{BackendHandle, BackendProcess};
use crate::core::chat_stream::{ChatAgent, ChatEndpoint};
use crate::core::config::data::{BackendConfig, Config};
use crate::core::crew::CrewRegistry;
use crate::core::exec::SubprocessExecutor;
use crate::core::runner::BackgroundTaskRunner;
use crate::core::tools::build_registry;
use crate::ui::output::OutputSink;

/// Builds the application state for the chat loop. Configuration mistakes
/// in the crew or tool tables are fatal; a missing backend or crew member
/// is reported after the banner instead.
pub fn bootstrap_app(
    config: &Config,
    options: &ChatOptions,
    dispatcher: AppActionDispatcher,
    output: Box<dyn OutputSink>,
) -> Result<SessionBootstrap, Box<dyn Error>> {
    let client = reqwest::Client::new();
    let api_key = resolve_api_key(&config.backend);

    let mut crew = CrewRegistry::new();
    for member in &config.crew {
        let model = member.model.as_deref().unwrap_or(&config.backend.model);
        let endpoint = endpoint_for(&config.backend, &client, api_key.clone(), model);
        let agent = ChatAgent::new(endpoint, member.system_prompt.clone());
        crew.register(member.name.clone(), Arc::new(agent))
            .map_err(|err| format!("invalid crew configuration: {err}"))?;
    }

    let tools = build_registry(config.builtin_tools, &config.tools)
        .map_err(|err| format!("invalid tool configuration: {err}"))?;

    let mut startup_errors = Vec::new();
    let backend = start_backend(&config.backend, &mut startup_errors);

    let executor = Arc::new(SubprocessExecutor::new(
        config.execution.interpreter.clone(),
        config.execution.args.clone(),
        config.execution.timeout_secs.map(Duration::from_secs),
    ));
    let runner = BackgroundTaskRunner::new(
        dispatcher,
        config.runner.max_concurrent_tasks,
        config.runner.task_timeout_secs.map(Duration::from_secs),
    );

    let mut app = App::new(AppInit {
        settings: AppSettings::from_config(config, options.animate),
        busy_policy: config.animation.busy_policy,
        crew,
        tools,
        executor,
        backend,
        runner,
        output,
    });

    let wanted = options.crew.as_deref().or(config.default_crew.as_deref());
    match wanted {
        Some(name) => match app.crew.resolve(name) {
            Some((canonical, _)) => app.session.current_agent = Some(canonical.to_string()),
            None => startup_errors.push(format!(
                "ERROR: CREW MEMBER '{}' NOT FOUND IN DATABASE",
                name.to_uppercase()
            )),
        },
        None => app.session.current_agent = app.crew.names().next().map(str::to_owned),
    }
    info!(
        crew = app.crew.len(),
        tools = app.tools.len(),
        active = ?app.session.current_agent,
        "session assembled"
    );

    let probe = config
        .backend
        .probe_on_startup
        .then(|| endpoint_for(&config.backend, &client, api_key, &config.backend.model));

    Ok(SessionBootstrap {
        app,
        startup_errors,
        probe,
    })
}

/// Marks initialization as in flight and returns the work to submit.
pub fn startup_command(app: &mut App, probe: Option<ChatEndpoint>) -> AppCommand {
    app.session.begin_task(SystemStatus::Processing);
    AppCommand::Initialize {
        probe,
        crew_count: app.crew.len(),
        tool_count: app.tools.len(),
    }
}

fn resolve_api_key(backend: &BackendConfig) -> Option<String> {
    let var = backend.api_key_env.as_deref()?;
    std::env::var(var).ok().filter(|key| !key.trim().is_empty())
}

fn endpoint_for(
    backend: &BackendConfig,
    client: &reqwest::Client,
    api_key: Option<String>,
    model: &str,
) -> ChatEndpoint {
    ChatEndpoint {
        client: client.clone(),
        base_url: backend.base_url.clone(),
        api_key,
        model: model.to_string(),
        max_tokens: backend.max_tokens,
    }
}

fn start_backend(
    backend: &BackendConfig,
    startup_errors: &mut Vec<String>,
) -> Option<Box<dyn BackendHandle>> {
    if backend.server_command.is_empty() {
        return None;
    }
    match BackendProcess::spawn(&backend.server_command) {
        Ok(process) => Some(Box::new(process)),
        Err(err) => {
            warn!(error = %err, "backend server did not start");
            startup_errors.push(format!("ERROR: BACKEND SERVER FAILED TO START: {err}"));
            None
        }
    }
}
