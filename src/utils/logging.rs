use std::fs::OpenOptions;
use std::path::PathBuf;
use std::sync::Mutex;
use tracing_subscriber::EnvFilter;

/// Environment variable holding the `tracing` filter directives.
pub const LOG_ENV_VAR: &str = "RYCODE_LOG";

const DEFAULT_DIRECTIVES: &str = "warn";

/// Where diagnostics go for this run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LogTarget {
    Stderr,
    File(PathBuf),
    /// The interactive switcher owns the terminal, so without a log file
    /// nothing is installed.
    Discard,
}

impl LogTarget {
    pub fn resolve(log_file: Option<PathBuf>, interactive: bool) -> Self {
        match (log_file, interactive) {
            (Some(path), _) => LogTarget::File(path),
            (None, true) => LogTarget::Discard,
            (None, false) => LogTarget::Stderr,
        }
    }
}

pub fn env_filter() -> EnvFilter {
    EnvFilter::try_from_env(LOG_ENV_VAR).unwrap_or_else(|_| EnvFilter::new(DEFAULT_DIRECTIVES))
}

pub fn init_logging(
    target: &LogTarget,
) -> Result<(), Box<dyn std::error::Error + Send + Sync>> {
    match target {
        LogTarget::Stderr => tracing_subscriber::fmt()
            .with_env_filter(env_filter())
            .with_writer(std::io::stderr)
            .try_init()?,
        LogTarget::File(path) => {
            let file = OpenOptions::new().create(true).append(true).open(path)?;
            tracing_subscriber::fmt()
                .with_env_filter(env_filter())
                .with_ansi(false)
                .with_writer(Mutex::new(file))
                .try_init()?
        }
        LogTarget::Discard => {}
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn log_file_always_wins() {
        let path = PathBuf::from("/tmp/rycode.log");
        assert_eq!(
            LogTarget::resolve(Some(path.clone()), true),
            LogTarget::File(path.clone())
        );
        assert_eq!(
            LogTarget::resolve(Some(path.clone()), false),
            LogTarget::File(path)
        );
    }

    #[test]
    fn interactive_runs_discard_without_a_file() {
        assert_eq!(LogTarget::resolve(None, true), LogTarget::Discard);
        assert_eq!(LogTarget::resolve(None, false), LogTarget::Stderr);
    }

    #[test]
    fn unwritable_log_file_is_an_error() {
        let dir = tempfile::TempDir::new().expect("temp dir");
        let target = LogTarget::File(dir.path().join("missing").join("rycode.log"));
        assert!(init_logging(&target).is_err());
    }

    #[test]
    fn second_subscriber_is_rejected() {
        let _ = init_logging(&LogTarget::Stderr);
        let err = init_logging(&LogTarget::Stderr).expect_err("global subscriber already set");
        assert!(!err.to_string().is_empty());
    }
}
