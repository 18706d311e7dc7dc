pub mod app;
pub mod backend;
pub mod chat_stream;
pub mod code;
pub mod config;
pub mod constants;
pub mod crew;
pub mod exec;
pub mod gate;
pub mod registry;
pub mod runner;
pub mod tools;
