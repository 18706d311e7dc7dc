use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use std::time::Duration;

use crate::ui::animation::BusyPolicy;

#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
#[serde(default)]
pub struct Config {
    /// Crew member made active at startup; defaults to the first one.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub default_crew: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub log_file: Option<String>,
    pub exit_grace_ms: u64,
    pub builtin_tools: bool,
    pub backend: BackendConfig,
    pub animation: AnimationConfig,
    pub runner: RunnerConfig,
    pub execution: ExecutionConfig,
    pub mission: MissionConfig,
    pub crew: Vec<CrewMemberConfig>,
    pub tools: Vec<ToolConfig>,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            default_crew: None,
            log_file: None,
            exit_grace_ms: 1000,
            builtin_tools: true,
            backend: BackendConfig::default(),
            animation: AnimationConfig::default(),
            runner: RunnerConfig::default(),
            execution: ExecutionConfig::default(),
            mission: MissionConfig::default(),
            crew: default_crew(),
            tools: Vec::new(),
        }
    }
}

impl Config {
    pub fn exit_grace(&self) -> Duration {
        Duration::from_millis(self.exit_grace_ms)
    }
}

#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
#[serde(default)]
pub struct BackendConfig {
    /// OpenAI-compatible API root, e.g. a local `llama-server`.
    pub base_url: String,
    pub model: String,
    /// Environment variable holding the bearer token, if the backend needs one.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub api_key_env: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub max_tokens: Option<u32>,
    pub model_type: String,
    pub engine: String,
    /// Server launched at startup and terminated on `exit`.
    pub server_command: Vec<String>,
    pub probe_on_startup: bool,
}

impl Default for BackendConfig {
    fn default() -> Self {
        Self {
            base_url: "http://127.0.0.1:8080/v1".to_string(),
            model: "local-gguf".to_string(),
            api_key_env: Some("CREWTERM_API_KEY".to_string()),
            max_tokens: Some(1024),
            model_type: "GGUF".to_string(),
            engine: "LLAMA.CPP".to_string(),
            server_command: Vec::new(),
            probe_on_startup: true,
        }
    }
}

#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
#[serde(default)]
pub struct AnimationConfig {
    pub enabled: bool,
    pub char_delay_ms: u64,
    pub garble_ms: u64,
    pub banner_char_delay_ms: u64,
    pub busy_policy: BusyPolicy,
}

impl Default for AnimationConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            char_delay_ms: 1,
            garble_ms: 8,
            banner_char_delay_ms: 5,
            busy_policy: BusyPolicy::Drop,
        }
    }
}

#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
#[serde(default)]
pub struct RunnerConfig {
    pub max_concurrent_tasks: usize,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub task_timeout_secs: Option<u64>,
}

impl Default for RunnerConfig {
    fn default() -> Self {
        Self {
            max_concurrent_tasks: 4,
            task_timeout_secs: None,
        }
    }
}

#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
#[serde(default)]
pub struct ExecutionConfig {
    /// Crew member whose replies are captured for `run_code`.
    pub code_agent: String,
    pub interpreter: String,
    pub args: Vec<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub timeout_secs: Option<u64>,
}

impl Default for ExecutionConfig {
    fn default() -> Self {
        Self {
            code_agent: "code_expert".to_string(),
            interpreter: "python3".to_string(),
            args: vec!["-c".to_string()],
            timeout_secs: Some(60),
        }
    }
}

#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
#[serde(default)]
pub struct MissionConfig {
    pub target: String,
    pub objective: String,
    pub eta: String,
    pub status: String,
}

impl Default for MissionConfig {
    fn default() -> Self {
        Self {
            target: "EUROPA (JUPITER II)".to_string(),
            objective: "SUBSURFACE EXPLORATION".to_string(),
            eta: "267 DAYS 14 HOURS".to_string(),
            status: "ON COURSE".to_string(),
        }
    }
}

#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
pub struct CrewMemberConfig {
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub system_prompt: Option<String>,
    /// Overrides `backend.model` for this member.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub model: Option<String>,
}

#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
pub struct ToolConfig {
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    pub command: Vec<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub timeout_secs: Option<u64>,
}

fn crew_member(name: &str, system_prompt: &str) -> CrewMemberConfig {
    CrewMemberConfig {
        name: name.to_string(),
        system_prompt: Some(system_prompt.to_string()),
        model: None,
    }
}

fn default_crew() -> Vec<CrewMemberConfig> {
    vec![
        crew_member(
            "navigator",
            "You are the navigator of a deep-space vessel bound for Europa. \
Answer briefly and precisely.",
        ),
        crew_member(
            "science_officer",
            "You are the science officer of a deep-space vessel bound for Europa. \
Explain findings clearly and concisely.",
        ),
        crew_member(
            "code_expert",
            "You are the ship's software engineer. When asked for code, reply with \
a single fenced ```python code block that runs with `python3 -c` and prints its result.",
        ),
    ]
}

pub fn path_display<P: AsRef<Path>>(path: P) -> String {
    let path = path.as_ref();

    #[cfg(unix)]
    {
        if let Some(home) = std::env::var_os("HOME") {
            let home_path = PathBuf::from(home);
            if let Ok(relative) = path.strip_prefix(&home_path) {
                return format!("~/{}", relative.display());
            }
        }
    }

    path.display().to_string()
}
