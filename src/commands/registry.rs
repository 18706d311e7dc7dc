use super::CommandResult;
use crate::core::app::App;

pub type CommandHandler = fn(&mut App, CommandInvocation<'_>) -> CommandResult;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Syntax {
    /// The whole line must equal the name or an alias.
    Exact,
    /// `name` alone or `name <argument>`.
    WithArgument,
}

pub struct Command {
    pub name: &'static str,
    pub aliases: &'static [&'static str],
    pub syntax: Syntax,
    pub usage: &'static str,
    pub help: &'static str,
    pub handler: CommandHandler,
}

#[derive(Clone, Copy)]
pub struct CommandInvocation<'a> {
    pub command: &'static Command,
    pub input: &'a str,
    /// Trimmed argument in its original casing; empty for exact verbs.
    pub args: &'a str,
}

pub fn all_commands() -> &'static [Command] {
    COMMANDS
}

/// Classifies an already-trimmed line. Verbs and aliases match ignoring
/// ASCII case.
pub fn parse(input: &str) -> Option<CommandInvocation<'_>> {
    let lowered = input.to_ascii_lowercase();
    all_commands().iter().find_map(|command| {
        let args = match command.syntax {
            Syntax::Exact => {
                let hit = lowered == command.name || command.aliases.contains(&lowered.as_str());
                hit.then_some("")?
            }
            Syntax::WithArgument => {
                let rest = lowered.strip_prefix(command.name)?;
                if !rest.is_empty() && !rest.starts_with(char::is_whitespace) {
                    return None;
                }
                input[command.name.len()..].trim()
            }
        };
        Some(CommandInvocation {
            command,
            input,
            args,
        })
    })
}

const COMMANDS: &[Command] = &[
    Command {
        name: "help",
        aliases: &[],
        syntax: Syntax::Exact,
        usage: "HELP",
        help: "ACCESS THIS INFORMATION NODE",
        handler: super::handlers::core::handle_help,
    },
    Command {
        name: "exit",
        aliases: &[],
        syntax: Syntax::Exact,
        usage: "EXIT",
        help: "TERMINATE NEURAL CONNECTION",
        handler: super::handlers::core::handle_exit,
    },
    Command {
        name: "status",
        aliases: &[],
        syntax: Syntax::Exact,
        usage: "STATUS",
        help: "DISPLAY SYSTEM DIAGNOSTICS",
        handler: super::handlers::core::handle_status,
    },
    Command {
        name: "destination",
        aliases: &[],
        syntax: Syntax::Exact,
        usage: "DESTINATION",
        help: "REVEAL CURRENT MISSION COORDINATES",
        handler: super::handlers::core::handle_destination,
    },
    Command {
        name: "model_info",
        aliases: &["model info"],
        syntax: Syntax::Exact,
        usage: "MODEL_INFO",
        help: "DISPLAY ACTIVE MODEL CONFIGURATION",
        handler: super::handlers::core::handle_model_info,
    },
    Command {
        name: "ask",
        aliases: &[],
        syntax: Syntax::WithArgument,
        usage: "ASK [QUERY]",
        help: "INTERROGATE CREW KNOWLEDGE BASE",
        handler: super::handlers::crew::handle_ask,
    },
    Command {
        name: "crew",
        aliases: &["list crew"],
        syntax: Syntax::Exact,
        usage: "CREW",
        help: "LIST AVAILABLE CREW MEMBERS",
        handler: super::handlers::crew::handle_crew,
    },
    Command {
        name: "tools",
        aliases: &["list tools"],
        syntax: Syntax::Exact,
        usage: "TOOLS",
        help: "LIST AVAILABLE SPECIALIZED TOOLS",
        handler: super::handlers::tools::handle_tools,
    },
    Command {
        name: "use",
        aliases: &[],
        syntax: Syntax::WithArgument,
        usage: "USE [NAME]",
        help: "SWITCH ACTIVE CREW MEMBER",
        handler: super::handlers::crew::handle_use,
    },
    Command {
        name: "reset",
        aliases: &[],
        syntax: Syntax::Exact,
        usage: "RESET",
        help: "PURGE CONVERSATION MEMORY",
        handler: super::handlers::crew::handle_reset,
    },
    Command {
        name: "run_tool",
        aliases: &[],
        syntax: Syntax::WithArgument,
        usage: "RUN_TOOL [TOOL_NAME]",
        help: "EXECUTE SPECIALIZED TOOLS",
        handler: super::handlers::tools::handle_run_tool,
    },
    Command {
        name: "run_code",
        aliases: &[],
        syntax: Syntax::Exact,
        usage: "RUN_CODE",
        help: "EXECUTE LAST GENERATED CODE SEQUENCE",
        handler: super::handlers::code::handle_run_code,
    },
];
