//! The console's owner loop.
//!
//! One task owns the [`App`]. Input lines, background completions and
//! animation deadlines all arrive here and are applied in order, so no
//! other task ever touches session state or the terminal.

pub(crate) mod executors;
mod setup;

use std::error::Error;
use std::io::{self, IsTerminal};
use std::time::Instant;

use tokio::io::{AsyncBufReadExt, BufReader};
use tokio::sync::mpsc;
use tracing::{debug, info, warn};

use self::executors::spawn_app_command;
use self::setup::{bootstrap_app, startup_command};
use crate::commands::{process_input, CommandResult};
use crate::core::app::actions::apply_action;
use crate::core::app::{App, AppAction, AppActionDispatcher, Pace, SessionBootstrap};
use crate::core::config::data::Config;
use crate::core::constants::{BANNER, READY_LINE};
use crate::ui::output::TerminalSink;

#[derive(Debug, Clone, Default)]
pub struct ChatOptions {
    /// Crew member to activate instead of the configured default.
    pub crew: Option<String>,
    pub animate: bool,
}

#[derive(Debug)]
pub enum UiEvent {
    Line(String),
    InputClosed,
}

pub async fn run_chat(config: Config, options: ChatOptions) -> Result<(), Box<dyn Error>> {
    let options = ChatOptions {
        animate: options.animate && io::stdout().is_terminal(),
        ..options
    };

    let (action_tx, mut action_rx) = mpsc::unbounded_channel::<AppAction>();
    let dispatcher = AppActionDispatcher::new(action_tx);
    let SessionBootstrap {
        mut app,
        startup_errors,
        probe,
    } = bootstrap_app(&config, &options, dispatcher, Box::new(TerminalSink::stdout()))?;

    let (event_tx, mut event_rx) = mpsc::unbounded_channel::<UiEvent>();
    spawn_input_reader(event_tx);

    boot_sequence(&mut app, &startup_errors);
    let command = startup_command(&mut app, probe);
    spawn_app_command(&app, command);

    run_owner_loop(&mut app, &mut event_rx, &mut action_rx).await;
    info!("console session ended");
    Ok(())
}

/// Types the banner, then queues any startup problems behind it.
pub fn boot_sequence(app: &mut App, startup_errors: &[String]) {
    let banner = format!(
        "{BANNER}\n    MISSION: {} EXPLORATION",
        app.settings.mission.target
    );
    app.animate(
        banner,
        Pace::Banner,
        Some(AppAction::Print {
            text: READY_LINE.to_string(),
        }),
    );
    for error in startup_errors {
        app.print(error);
    }
}

fn spawn_input_reader(tx: mpsc::UnboundedSender<UiEvent>) {
    tokio::spawn(async move {
        let mut lines = BufReader::new(tokio::io::stdin()).lines();
        loop {
            match lines.next_line().await {
                Ok(Some(line)) => {
                    if tx.send(UiEvent::Line(line)).is_err() {
                        break;
                    }
                }
                Ok(None) => {
                    let _ = tx.send(UiEvent::InputClosed);
                    break;
                }
                Err(err) => {
                    warn!(error = %err, "failed to read from stdin");
                    let _ = tx.send(UiEvent::InputClosed);
                    break;
                }
            }
        }
    });
}

/// Runs until the exit grace period lapses, or until input is closed and
/// nothing is left in flight. Whatever is still pending is written out
/// unpaced before returning.
pub async fn run_owner_loop(
    app: &mut App,
    events: &mut mpsc::UnboundedReceiver<UiEvent>,
    actions: &mut mpsc::UnboundedReceiver<AppAction>,
) {
    let mut input_open = true;

    loop {
        let now = Instant::now();
        app.tick(now);

        if app.session.exit_due(now) {
            debug!("exit grace period elapsed");
            break;
        }
        if !input_open && !app.session.exit_requested() && app.is_idle() {
            debug!("input closed and no work pending");
            break;
        }

        let animation_deadline = app.animation.next_deadline();
        let exit_deadline = app.session.exit_deadline;

        tokio::select! {
            event = events.recv(), if input_open => match event {
                Some(UiEvent::Line(line)) => {
                    if let CommandResult::Background(command) = process_input(app, &line) {
                        spawn_app_command(app, command);
                    }
                }
                Some(UiEvent::InputClosed) | None => {
                    input_open = false;
                    if app.gate.disarm() {
                        app.print("CODE EXECUTION ABORTED");
                    }
                }
            },
            Some(action) = actions.recv() => apply_action(app, action),
            _ = wait_until(animation_deadline) => {}
            _ = wait_until(exit_deadline) => {}
        }
    }

    app.flush_output();
}

async fn wait_until(deadline: Option<Instant>) {
    match deadline {
        Some(deadline) => tokio::time::sleep_until(tokio::time::Instant::from_std(deadline)).await,
        None => std::future::pending().await,
    }
}
