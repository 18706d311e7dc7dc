//! Confirmation gate in front of code execution.
//!
//! `run_code` arms the gate with a snapshot of the code; the very next input
//! line is the answer. Only `y` or `yes` (any case) releases the code, and an
//! armed gate accepts exactly one answer.

use tracing::info;

pub const CONFIRM_PROMPT: &str = "EXECUTE POTENTIALLY DANGEROUS CODE SEQUENCE? [y/N]";

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum GateDecision {
    Approved(String),
    Refused,
}

#[derive(Debug, Default)]
pub struct SafetyGate {
    armed: Option<String>,
}

impl SafetyGate {
    pub fn new() -> Self {
        Self::default()
    }

    /// Holds `code` until answered and returns the prompt to show.
    pub fn arm(&mut self, code: impl Into<String>) -> &'static str {
        self.armed = Some(code.into());
        CONFIRM_PROMPT
    }

    pub fn is_armed(&self) -> bool {
        self.armed.is_some()
    }

    pub fn confirm(&mut self, answer: &str) -> GateDecision {
        let decision = match self.armed.take() {
            Some(code) if is_affirmative(answer) => GateDecision::Approved(code),
            _ => GateDecision::Refused,
        };
        info!(
            approved = matches!(decision, GateDecision::Approved(_)),
            "code execution gate answered"
        );
        decision
    }

    /// Refuses whatever is pending; returns whether anything was armed.
    pub fn disarm(&mut self) -> bool {
        self.armed.take().is_some()
    }
}

fn is_affirmative(answer: &str) -> bool {
    matches!(answer.trim().to_ascii_lowercase().as_str(), "y" | "yes")
}
