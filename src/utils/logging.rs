use std::fs::OpenOptions;
use std::path::Path;
use std::sync::Mutex;

use tracing_subscriber::EnvFilter;

/// Environment variable holding the `EnvFilter` directives.
pub const LOG_ENV: &str = "CREWTERM_LOG";
const DEFAULT_DIRECTIVES: &str = "warn";

fn env_filter() -> EnvFilter {
    EnvFilter::try_from_env(LOG_ENV).unwrap_or_else(|_| EnvFilter::new(DEFAULT_DIRECTIVES))
}

/// Installs the global subscriber. Diagnostics are appended to `log_file`
/// when given, otherwise written to stderr; stdout stays reserved for the
/// console itself.
pub fn init_tracing(log_file: Option<&Path>) -> Result<(), Box<dyn std::error::Error>> {
    let builder = tracing_subscriber::fmt()
        .with_env_filter(env_filter())
        .with_target(false);

    match log_file {
        Some(path) => {
            let file = OpenOptions::new().create(true).append(true).open(path)?;
            builder
                .with_ansi(false)
                .with_writer(Mutex::new(file))
                .try_init()
                .map_err(|err| err.to_string())?;
        }
        None => builder
            .with_writer(std::io::stderr)
            .try_init()
            .map_err(|err| err.to_string())?,
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[test]
    fn unwritable_log_path_is_an_error() {
        let dir = tempdir().unwrap();
        let missing = dir.path().join("no-such-dir").join("crewterm.log");
        assert!(init_tracing(Some(&missing)).is_err());
    }
}
