pub(super) mod code;
pub(super) mod core;
pub(super) mod crew;
pub(super) mod tools;

use crate::commands::CommandResult;
use crate::core::app::{App, Pace};

pub(super) fn reply(app: &mut App, text: impl AsRef<str>) -> CommandResult {
    app.print(text);
    CommandResult::Continue
}

pub(super) fn animated_reply(app: &mut App, text: String) -> CommandResult {
    app.animate(text, Pace::Standard, None);
    CommandResult::Continue
}
