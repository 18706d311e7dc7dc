//! Output sinks the animation engine writes through.
//!
//! [`TerminalSink`] drives a real terminal with crossterm cursor commands;
//! [`MemorySink`] keeps a shared transcript that tests can inspect after the
//! sink has been moved into an [`crate::core::app::App`].

use std::io::{self, Write};
use std::sync::{Arc, Mutex, PoisonError};

use crossterm::cursor::MoveLeft;
use crossterm::queue;
use crossterm::style::Print;

pub trait OutputSink: Send {
    /// Append text at the cursor.
    fn write_text(&mut self, text: &str) -> io::Result<()>;

    /// Replace the single-column glyph written last with `text`.
    fn overwrite_last(&mut self, text: &str) -> io::Result<()>;

    fn newline(&mut self) -> io::Result<()>;

    fn flush(&mut self) -> io::Result<()>;
}

pub struct TerminalSink<W: Write + Send> {
    writer: W,
}

impl TerminalSink<io::Stdout> {
    pub fn stdout() -> Self {
        Self::new(io::stdout())
    }
}

impl<W: Write + Send> TerminalSink<W> {
    pub fn new(writer: W) -> Self {
        Self { writer }
    }
}

impl<W: Write + Send> OutputSink for TerminalSink<W> {
    fn write_text(&mut self, text: &str) -> io::Result<()> {
        queue!(self.writer, Print(text))
    }

    fn overwrite_last(&mut self, text: &str) -> io::Result<()> {
        queue!(self.writer, MoveLeft(1), Print(text))
    }

    fn newline(&mut self) -> io::Result<()> {
        queue!(self.writer, Print("\n"))
    }

    fn flush(&mut self) -> io::Result<()> {
        self.writer.flush()
    }
}

/// Cloneable in-memory sink; every clone shares the same transcript.
#[derive(Clone, Default)]
pub struct MemorySink {
    transcript: Arc<Mutex<String>>,
}

impl MemorySink {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn transcript(&self) -> String {
        self.lock().clone()
    }

    pub fn lines(&self) -> Vec<String> {
        self.lock().lines().map(str::to_owned).collect()
    }

    pub fn clear(&self) {
        self.lock().clear();
    }

    fn lock(&self) -> std::sync::MutexGuard<'_, String> {
        self.transcript
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
    }
}

impl OutputSink for MemorySink {
    fn write_text(&mut self, text: &str) -> io::Result<()> {
        self.lock().push_str(text);
        Ok(())
    }

    fn overwrite_last(&mut self, text: &str) -> io::Result<()> {
        let mut transcript = self.lock();
        transcript.pop();
        transcript.push_str(text);
        Ok(())
    }

    fn newline(&mut self) -> io::Result<()> {
        self.lock().push('\n');
        Ok(())
    }

    fn flush(&mut self) -> io::Result<()> {
        Ok(())
    }
}
