//! Crewterm is a retro mission-console terminal for talking to a crew of AI agents.
//!
//! The crate is organized around a small set of collaborating layers:
//! - [`core`] owns session state, the crew and tool registries, the background
//!   task runner, the code-execution safety gate, and configuration.
//! - [`ui`] renders paced, garbled-then-revealed output and runs the owner loop
//!   that multiplexes user input, task completions, and animation deadlines.
//! - [`commands`] implements console verb parsing and command execution used
//!   by the owner loop.
//! - [`api`] defines chat/model payloads used by the OpenAI-compatible backend client.
//!
//! Runtime entrypoints live in the binary crate (`src/main.rs`) and route
//! through [`crate::cli::main`], which loads configuration and dispatches into
//! [`ui::chat_loop`] for interactive sessions.

pub mod api;
pub mod cli;
pub mod commands;
pub mod core;
pub mod ui;
pub mod utils;
