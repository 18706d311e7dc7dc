use super::*;
use std::fs;
use tempfile::TempDir;

fn parse_args(argv: &[&str]) -> Args {
    Args::try_parse_from(argv)
        .unwrap_or_else(|err| panic!("argv={argv:?} should parse successfully: {err}"))
}

#[test]
fn no_subcommand_means_chat() {
    let args = parse_args(&["crewterm"]);
    assert!(args.command.is_none());
    assert!(!args.no_animation);
    assert!(args.crew.is_none());
}

#[test]
fn global_flags_parse_after_subcommand() {
    let args = parse_args(&[
        "crewterm",
        "chat",
        "--crew",
        "code_expert",
        "--no-animation",
        "-c",
        "/tmp/crew.toml",
    ]);
    assert_eq!(args.command, Some(Commands::Chat));
    assert_eq!(args.crew.as_deref(), Some("code_expert"));
    assert!(args.no_animation);
    assert_eq!(args.config, Some(PathBuf::from("/tmp/crew.toml")));
}

#[test]
fn log_file_flag_is_a_path() {
    let args = parse_args(&["crewterm", "--log-file", "session.log", "tools"]);
    assert_eq!(args.log_file, Some(PathBuf::from("session.log")));
    assert_eq!(args.command, Some(Commands::Tools));
}

#[test]
fn config_subcommand_accepts_init() {
    assert_eq!(
        parse_args(&["crewterm", "config"]).command,
        Some(Commands::Config { init: false })
    );
    assert_eq!(
        parse_args(&["crewterm", "config", "--init"]).command,
        Some(Commands::Config { init: true })
    );
}

#[test]
fn unknown_subcommand_is_rejected() {
    assert!(Args::try_parse_from(["crewterm", "warp"]).is_err());
}

#[test]
fn config_init_writes_defaults_once() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("nested").join("config.toml");

    show_config(&Config::default(), Some(&path), true).unwrap();
    let written = Config::load_from_path(&path).unwrap();
    assert_eq!(written, Config::default());

    fs::write(&path, "exit_grace_ms = 5\n").unwrap();
    assert!(show_config(&Config::default(), Some(&path), true).is_err());
    assert_eq!(Config::load_from_path(&path).unwrap().exit_grace_ms, 5);
}

#[test]
fn tool_listing_rejects_duplicate_names() {
    let mut config = Config::default();
    config.tools.push(crate::core::config::data::ToolConfig {
        name: "Roster".to_string(),
        description: None,
        command: vec!["true".to_string()],
        timeout_secs: None,
    });
    assert!(list_tools(&config).is_err());
}
