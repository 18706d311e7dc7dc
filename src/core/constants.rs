//! Shared console text

pub const BANNER: &str = r"
  ╔═══════════════════════════════════════════╗
  ║   C R E W T E R M   ·   Q I S - 0 9       ║
  ╚═══════════════════════════════════════════╝
    QUANTUM INTERFACE SYSTEM
    INITIALIZING NEURAL INTERFACE...
    QUANTUM ENCRYPTION: ACTIVE
    QUANTUM TUNNELING: STABLE
    ACCESSING CREWNET...
    CONNECTING...";

pub const READY_LINE: &str = "SYSTEM READY. TYPE 'HELP' FOR AVAILABLE COMMANDS.";

/// Shown while the startup task is still loading.
pub const STARTUP_STEPS: &[&str] = &[
    "DECRYPTING QUANTUM DATABASE...",
    "ESTABLISHING NEURAL LINK...",
    "CALCULATING QUANTUM PATHWAYS...",
    "SYNCHRONIZING TIMELINES...",
];

pub const SECURITY_WARNING: &[&str] = &[
    "⚠ SECURITY WARNING ⚠",
    "UNAUTHORIZED CODE EXECUTION DETECTED",
    "REVIEW BEFORE PROCEEDING:",
];
