use std::time::Duration;

use tracing::{debug, info};

use crate::api::models::fetch_models;
use crate::core::chat_stream::ChatEndpoint;
use crate::core::constants::STARTUP_STEPS;
use crate::core::crew::AgentError;

const PROBE_TIMEOUT: Duration = Duration::from_secs(5);

/// Produces the startup log. With a `probe` endpoint the backend's model
/// listing must answer before the system reports ready.
pub async fn initialize(
    probe: Option<ChatEndpoint>,
    crew_count: usize,
    tool_count: usize,
) -> Result<Vec<String>, AgentError> {
    let mut messages: Vec<String> = STARTUP_STEPS.iter().map(|step| step.to_string()).collect();
    messages.push(format!("LOADING AI CREW PROFILES... {crew_count} ONLINE"));
    messages.push(format!("TOOLS: {tool_count} LOADED"));

    if let Some(endpoint) = probe {
        debug!(base_url = %endpoint.base_url, "probing backend");
        let models = tokio::time::timeout(PROBE_TIMEOUT, fetch_models(&endpoint))
            .await
            .map_err(|_| {
                AgentError::Request(format!(
                    "BACKEND AT {} DID NOT ANSWER WITHIN {}s",
                    endpoint.base_url,
                    PROBE_TIMEOUT.as_secs()
                ))
            })??;
        info!(models = models.data.len(), "backend reachable");
        messages.push(format!(
            "NEURAL BACKEND ONLINE: {} MODEL(S) AVAILABLE",
            models.data.len()
        ));
    }

    Ok(messages)
}
