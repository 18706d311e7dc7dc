//! Named tools the crew can run on demand.

use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use chrono::Utc;
use thiserror::Error;
use tokio::process::Command;

use super::config::data::ToolConfig;
use super::exec::{capture_output, ProcessError};
use super::registry::{Registry, RegistryError};

/// Snapshot of the crew handed to a tool when it runs.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ToolContext {
    pub crew: Vec<String>,
    pub active_agent: Option<String>,
}

#[derive(Debug, Error)]
pub enum ToolError {
    #[error(transparent)]
    Process(#[from] ProcessError),
    #[error("exited with status {code}: {stderr}")]
    Failed { code: i32, stderr: String },
    #[error("{0}")]
    Other(String),
}

#[async_trait]
pub trait Tool: Send + Sync {
    fn description(&self) -> &str;

    async fn invoke(&self, context: &ToolContext) -> Result<String, ToolError>;
}

pub type ToolRegistry = Registry<dyn Tool>;

/// Runs an external command; the crew snapshot is exported through
/// `CREWTERM_CREW` and `CREWTERM_ACTIVE_AGENT`.
pub struct CommandTool {
    description: String,
    argv: Vec<String>,
    timeout: Option<Duration>,
}

impl CommandTool {
    pub fn new(
        description: impl Into<String>,
        argv: Vec<String>,
        timeout: Option<Duration>,
    ) -> Result<Self, ProcessError> {
        if argv.first().map_or(true, |program| program.trim().is_empty()) {
            return Err(ProcessError::EmptyCommand);
        }
        Ok(Self {
            description: description.into(),
            argv,
            timeout,
        })
    }
}

#[async_trait]
impl Tool for CommandTool {
    fn description(&self) -> &str {
        &self.description
    }

    async fn invoke(&self, context: &ToolContext) -> Result<String, ToolError> {
        let (program, args) = self.argv.split_first().ok_or(ProcessError::EmptyCommand)?;
        let mut command = Command::new(program);
        command
            .args(args)
            .env("CREWTERM_CREW", context.crew.join(","))
            .env(
                "CREWTERM_ACTIVE_AGENT",
                context.active_agent.as_deref().unwrap_or(""),
            );
        let output = capture_output(&mut command, program, self.timeout).await?;
        if !output.status.success() {
            return Err(ToolError::Failed {
                code: output.status.code().unwrap_or(-1),
                stderr: String::from_utf8_lossy(&output.stderr).trim().to_string(),
            });
        }
        Ok(String::from_utf8_lossy(&output.stdout).trim().to_string())
    }
}

pub struct ChronometerTool;

#[async_trait]
impl Tool for ChronometerTool {
    fn description(&self) -> &str {
        "Report ship time (UTC)"
    }

    async fn invoke(&self, _context: &ToolContext) -> Result<String, ToolError> {
        Ok(format!(
            "SHIP TIME {}",
            Utc::now().format("%Y-%m-%d %H:%M:%S UTC")
        ))
    }
}

pub struct RosterTool;

#[async_trait]
impl Tool for RosterTool {
    fn description(&self) -> &str {
        "Summarize the crew roster"
    }

    async fn invoke(&self, context: &ToolContext) -> Result<String, ToolError> {
        if context.crew.is_empty() {
            return Err(ToolError::Other("crew database empty".to_string()));
        }
        let active = context.active_agent.as_deref().unwrap_or("NONE");
        Ok(format!(
            "{} CREW ON BOARD ({}); ACTIVE: {}",
            context.crew.len(),
            context.crew.join(", ").to_uppercase(),
            active.to_uppercase()
        ))
    }
}

pub fn build_registry(builtins: bool, configured: &[ToolConfig]) -> Result<ToolRegistry, RegistryError> {
    let mut registry = ToolRegistry::new();
    if builtins {
        registry.register("chronometer", Arc::new(ChronometerTool))?;
        registry.register("roster", Arc::new(RosterTool))?;
    }
    for tool in configured {
        let command = CommandTool::new(
            tool.description.clone().unwrap_or_default(),
            tool.command.clone(),
            tool.timeout_secs.map(Duration::from_secs),
        )
        .map_err(|err| RegistryError::Invalid {
            name: tool.name.clone(),
            reason: err.to_string(),
        })?;
        registry.register(tool.name.clone(), Arc::new(command))?;
    }
    Ok(registry)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn tool_config(name: &str, command: &[&str]) -> ToolConfig {
        ToolConfig {
            name: name.to_string(),
            description: None,
            command: command.iter().map(|part| part.to_string()).collect(),
            timeout_secs: None,
        }
    }

    #[test]
    fn registry_includes_builtins_before_configured_tools() {
        let registry = build_registry(true, &[tool_config("ping", &["echo", "pong"])]).unwrap();
        assert_eq!(
            registry.names().collect::<Vec<_>>(),
            vec!["chronometer", "roster", "ping"]
        );
    }

    #[test]
    fn configured_tool_without_command_is_rejected() {
        let err = build_registry(false, &[tool_config("broken", &[])]).err().unwrap();
        assert!(matches!(err, RegistryError::Invalid { ref name, .. } if name == "broken"));
    }

    #[test]
    fn configured_tool_cannot_shadow_builtin() {
        let err = build_registry(true, &[tool_config("Roster", &["true"])]).err().unwrap();
        assert_eq!(err, RegistryError::Duplicate("roster".to_string()));
    }

    #[tokio::test]
    async fn roster_tool_reads_the_context() {
        let context = ToolContext {
            crew: vec!["navigator".to_string(), "code_expert".to_string()],
            active_agent: Some("navigator".to_string()),
        };
        let summary = RosterTool.invoke(&context).await.unwrap();
        assert_eq!(
            summary,
            "2 CREW ON BOARD (NAVIGATOR, CODE_EXPERT); ACTIVE: NAVIGATOR"
        );
        assert!(RosterTool.invoke(&ToolContext::default()).await.is_err());
    }

    #[cfg(unix)]
    #[tokio::test]
    async fn command_tool_returns_trimmed_stdout() {
        let tool = CommandTool::new("", vec!["echo".to_string(), "pong".to_string()], None).unwrap();
        assert_eq!(tool.invoke(&ToolContext::default()).await.unwrap(), "pong");
    }

    #[cfg(unix)]
    #[tokio::test]
    async fn command_tool_sees_active_agent() {
        let tool = CommandTool::new(
            "",
            vec![
                "sh".to_string(),
                "-c".to_string(),
                "printf %s \"$CREWTERM_ACTIVE_AGENT\"".to_string(),
            ],
            None,
        )
        .unwrap();
        let context = ToolContext {
            crew: vec!["pilot".to_string()],
            active_agent: Some("pilot".to_string()),
        };
        assert_eq!(tool.invoke(&context).await.unwrap(), "pilot");
    }

    #[cfg(unix)]
    #[tokio::test]
    async fn failing_command_reports_status() {
        let tool = CommandTool::new("", vec!["false".to_string()], None).unwrap();
        let err = tool.invoke(&ToolContext::default()).await.unwrap_err();
        assert!(matches!(err, ToolError::Failed { code: 1, .. }));
    }
}
