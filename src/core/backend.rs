use std::io;
use std::process::Stdio;

use tokio::process::{Child, Command};
use tracing::info;

use super::exec::ProcessError;

/// A model server process owned for the lifetime of the session.
pub trait BackendHandle: Send {
    fn describe(&self) -> String;

    fn terminate(&mut self) -> io::Result<()>;
}

pub struct BackendProcess {
    program: String,
    child: Child,
}

impl BackendProcess {
    pub fn spawn(argv: &[String]) -> Result<Self, ProcessError> {
        let (program, args) = argv.split_first().ok_or(ProcessError::EmptyCommand)?;
        let child = Command::new(program)
            .args(args)
            .stdin(Stdio::null())
            .stdout(Stdio::null())
            .stderr(Stdio::null())
            .kill_on_drop(true)
            .spawn()
            .map_err(|source| ProcessError::Spawn {
                program: program.clone(),
                source,
            })?;
        info!(program = %program, pid = ?child.id(), "backend server started");
        Ok(Self {
            program: program.clone(),
            child,
        })
    }
}

impl BackendHandle for BackendProcess {
    fn describe(&self) -> String {
        match self.child.id() {
            Some(pid) => format!("{} (PID {pid})", self.program),
            None => format!("{} (EXITED)", self.program),
        }
    }

    fn terminate(&mut self) -> io::Result<()> {
        info!(program = %self.program, "terminating backend server");
        match self.child.start_kill() {
            Err(err) if err.kind() == io::ErrorKind::InvalidInput => Ok(()),
            other => other,
        }
    }
}
