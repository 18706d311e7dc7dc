//! Console presentation for the crew session.
//!
//! - [`chat_loop`]: the owner loop that dispatches input lines to
//!   [`crate::commands`] and applies background completions.
//! - [`animation`]: the tick-driven typewriter renderer.
//! - [`output`]: where rendered text lands.
//!
//! Domain state lives in [`crate::core`]; this layer only schedules and
//! writes it.

pub mod animation;
pub mod chat_loop;
pub mod output;
