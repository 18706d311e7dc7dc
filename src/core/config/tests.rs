use super::data::{path_display, Config, ToolConfig};
use super::io::ConfigError;
use crate::ui::animation::BusyPolicy;
use std::fs;
use std::path::PathBuf;
use tempfile::TempDir;

#[test]
fn test_load_nonexistent_config() {
    let temp_dir = TempDir::new().expect("Failed to create temp directory");
    let config_path = temp_dir.path().join("nonexistent_config.toml");

    let config = Config::load_from_path(&config_path).expect("Failed to load config");

    assert_eq!(config, Config::default());
    assert_eq!(config.execution.code_agent, "code_expert");
    assert!(config.crew.iter().any(|member| member.name == "code_expert"));
}

#[test]
fn partial_config_keeps_defaults_for_missing_sections() {
    let temp_dir = TempDir::new().expect("Failed to create temp directory");
    let config_path = temp_dir.path().join("config.toml");
    fs::write(
        &config_path,
        r#"
exit_grace_ms = 250

[animation]
busy_policy = "queue"

[[crew]]
name = "pilot"

[[tools]]
name = "ping"
command = ["echo", "pong"]
"#,
    )
    .unwrap();

    let config = Config::load_from_path(&config_path).expect("Failed to load config");

    assert_eq!(config.exit_grace_ms, 250);
    assert_eq!(config.animation.busy_policy, BusyPolicy::Queue);
    assert_eq!(config.animation.char_delay_ms, 1);
    assert_eq!(config.crew.len(), 1);
    assert_eq!(config.crew[0].name, "pilot");
    assert!(config.crew[0].system_prompt.is_none());
    assert_eq!(config.tools[0].command, vec!["echo", "pong"]);
    assert_eq!(config.runner.max_concurrent_tasks, 4);
}

#[test]
fn test_config_persistence_lifecycle() {
    let temp_dir = TempDir::new().expect("Failed to create temp directory");
    let config_path = temp_dir.path().join("nested").join("config.toml");

    let mut config = Config {
        default_crew: Some("navigator".to_string()),
        ..Default::default()
    };
    config.tools.push(ToolConfig {
        name: "scan".to_string(),
        description: Some("Long-range scan".to_string()),
        command: vec!["scan".to_string(), "--wide".to_string()],
        timeout_secs: Some(5),
    });
    config.save_to_path(&config_path).expect("Failed to save config");

    let loaded = Config::load_from_path(&config_path).expect("Failed to load config");
    assert_eq!(loaded, config);

    config.default_crew = None;
    config.save_to_path(&config_path).expect("Failed to save config");
    let loaded = Config::load_from_path(&config_path).expect("Failed to load config");
    assert_eq!(loaded.default_crew, None);
}

#[test]
fn invalid_toml_reports_parse_error_with_path() {
    let temp_dir = TempDir::new().expect("Failed to create temp directory");
    let config_path = temp_dir.path().join("config.toml");
    fs::write(&config_path, "exit_grace_ms = [").unwrap();

    let err = Config::load_from_path(&config_path).unwrap_err();
    assert!(matches!(err, ConfigError::Parse { .. }));
    assert!(err.to_string().starts_with("Failed to parse config at"));
}

#[test]
fn unknown_busy_policy_is_rejected() {
    let parsed: Result<Config, _> = toml::from_str("[animation]\nbusy_policy = \"shuffle\"\n");
    assert!(parsed.is_err());
}

#[cfg(unix)]
#[test]
fn path_display_abbreviates_home() {
    let Some(home) = std::env::var_os("HOME") else {
        return;
    };
    let path = PathBuf::from(home).join(".config").join("crewterm");
    assert_eq!(path_display(&path), "~/.config/crewterm");
}
