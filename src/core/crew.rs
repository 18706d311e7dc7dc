//! Crew members: named conversational agents with their own memory.

use async_trait::async_trait;
use thiserror::Error;

use super::registry::Registry;

#[derive(Debug, Error)]
pub enum AgentError {
    #[error("request failed: {0}")]
    Request(String),
    #[error("{0}")]
    Api(String),
    #[error("backend returned an empty response")]
    EmptyResponse,
}

#[async_trait]
pub trait Agent: Send + Sync {
    /// Sends `query` and returns the complete reply. Conversation memory is
    /// kept by the agent between calls.
    async fn chat(&self, query: &str) -> Result<String, AgentError>;

    /// Forgets all prior conversation.
    fn reset(&self);
}

pub type CrewRegistry = Registry<dyn Agent>;
