//! Command-line interface parsing and handling
//!
//! Parses arguments, loads configuration and either starts the console or
//! runs one of the listing subcommands.

pub mod crew_list;
pub mod tool_list;

use std::error::Error;
use std::path::{Path, PathBuf};
use std::time::Duration;

use clap::{Parser, Subcommand};
use tracing::debug;

use crate::cli::crew_list::list_crew;
use crate::cli::tool_list::list_tools;
use crate::core::config::data::path_display;
use crate::core::config::Config;
use crate::ui::chat_loop::{run_chat, ChatOptions};
use crate::utils::logging::init_tracing;

const SHUTDOWN_TIMEOUT: Duration = Duration::from_millis(250);

#[derive(Parser)]
#[command(name = "crewterm")]
#[command(about = "A retro crew console for local language models")]
#[command(
    long_about = "crewterm is a line-oriented console for talking to a crew of named \
agents backed by an OpenAI-compatible server such as llama.cpp's llama-server.\n\n\
Console commands:\n\
  HELP                  List every console command\n\
  ASK [QUERY]           Send a query to the active crew member\n\
  USE [NAME]            Switch the active crew member\n\
  RUN_TOOL [TOOL_NAME]  Run a configured tool\n\
  RUN_CODE              Review and run the last generated code\n\
  EXIT                  Leave the console\n\n\
Environment Variables:\n\
  CREWTERM_API_KEY      Bearer token for the backend (name configurable)\n\
  CREWTERM_LOG          Tracing filter directives, e.g. crewterm=debug"
)]
pub struct Args {
    #[command(subcommand)]
    pub command: Option<Commands>,

    /// Read configuration from this file instead of the default location
    #[arg(short = 'c', long, global = true, value_name = "PATH")]
    pub config: Option<PathBuf>,

    /// Append diagnostics to this file instead of stderr
    #[arg(short = 'l', long, global = true, value_name = "PATH")]
    pub log_file: Option<PathBuf>,

    /// Crew member to activate at startup
    #[arg(long, global = true, value_name = "NAME")]
    pub crew: Option<String>,

    /// Print text instantly instead of typing it out
    #[arg(long, global = true)]
    pub no_animation: bool,
}

#[derive(Subcommand, Debug, PartialEq, Eq)]
pub enum Commands {
    /// Start the interactive console (default)
    Chat,
    /// List the configured crew
    Crew,
    /// List the available tools
    Tools,
    /// Show the configuration file location and effective settings
    Config {
        /// Write the default configuration if no file exists yet
        #[arg(long)]
        init: bool,
    },
}

pub fn main() -> Result<(), Box<dyn Error>> {
    let runtime = tokio::runtime::Runtime::new()?;
    let result = runtime.block_on(async_main());
    // The stdin reader may still be parked on a blocking read.
    runtime.shutdown_timeout(SHUTDOWN_TIMEOUT);
    result
}

async fn async_main() -> Result<(), Box<dyn Error>> {
    let args = Args::parse();
    let config = Config::load(args.config.as_deref())?;

    let log_file = args
        .log_file
        .clone()
        .or_else(|| config.log_file.as_ref().map(PathBuf::from));
    init_tracing(log_file.as_deref())?;
    debug!(config = ?args.config, "configuration loaded");

    match args.command.unwrap_or(Commands::Chat) {
        Commands::Chat => {
            let options = ChatOptions {
                crew: args.crew,
                animate: !args.no_animation,
            };
            run_chat(config, options).await
        }
        Commands::Crew => {
            list_crew(&config);
            Ok(())
        }
        Commands::Tools => list_tools(&config),
        Commands::Config { init } => show_config(&config, args.config.as_deref(), init),
    }
}

fn show_config(config: &Config, override_path: Option<&Path>, init: bool) -> Result<(), Box<dyn Error>> {
    let path = match override_path {
        Some(path) => path.to_path_buf(),
        None => Config::config_path()?,
    };
    if init {
        if path.exists() {
            return Err(format!("{} already exists", path_display(&path)).into());
        }
        Config::default().save_to_path(&path)?;
        println!("Wrote default configuration to {}", path_display(&path));
        return Ok(());
    }

    let state = if path.exists() { "" } else { " (not present, using defaults)" };
    println!("Configuration file: {}{state}", path_display(&path));
    config.print_all();
    Ok(())
}

#[cfg(test)]
mod tests;
