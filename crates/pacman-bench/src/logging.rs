use std::fs::{self, File};
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use tracing::Level;
use tracing_appender::non_blocking::{NonBlockingBuilder, WorkerGuard};
use tracing_subscriber::{EnvFilter, fmt};

use crate::config::{LoggingConfig, ResolvedOutputs};

/// Crates whose events are kept at the configured level. Everything else is
/// held to warnings.
const EVENT_SOURCES: [&str; 3] = ["pacman_bench", "pacman_bot", "pacman_core"];

/// Keeps the background writer alive; dropping it flushes pending events.
pub struct LoggingGuard {
    _flush: WorkerGuard,
    telemetry_path: PathBuf,
}

impl LoggingGuard {
    pub fn telemetry_path(&self) -> &Path {
        &self.telemetry_path
    }
}

/// Routes `tracing` events as JSON lines into `telemetry.jsonl` beside the
/// episode rows. Returns `None` when structured logging is off.
pub fn init_logging(
    logging: &LoggingConfig,
    outputs: &ResolvedOutputs,
) -> Result<Option<LoggingGuard>> {
    if !logging.enable_structured {
        return Ok(None);
    }

    let telemetry_path = outputs.telemetry_path();
    let file = open_telemetry_file(&telemetry_path)?;
    let (writer, flush) = NonBlockingBuilder::default().lossy(false).finish(file);

    // RUST_LOG wins over the configured level when set.
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| {
        EnvFilter::new(filter_directives(logging.level().unwrap_or(Level::INFO)))
    });

    let subscriber = fmt::Subscriber::builder()
        .json()
        .flatten_event(true)
        .with_current_span(false)
        .with_env_filter(filter)
        .with_writer(writer)
        .finish();

    // Already installed when several runs share a process.
    if tracing::subscriber::set_global_default(subscriber).is_err() {
        eprintln!("structured logging already initialised; keeping the existing subscriber");
    }

    Ok(Some(LoggingGuard {
        _flush: flush,
        telemetry_path,
    }))
}

fn open_telemetry_file(path: &Path) -> Result<File> {
    if let Some(dir) = path.parent().filter(|dir| !dir.as_os_str().is_empty()) {
        fs::create_dir_all(dir)
            .with_context(|| format!("creating telemetry directory at {}", dir.display()))?;
    }
    File::create(path).with_context(|| format!("creating telemetry file at {}", path.display()))
}

fn filter_directives(level: Level) -> String {
    let level = level.as_str().to_ascii_lowercase();
    let mut directives = String::from("warn");
    for source in EVENT_SOURCES {
        directives.push_str(&format!(",{source}={level}"));
    }
    directives
}

#[cfg(test)]
mod tests {
    use super::{filter_directives, init_logging, open_telemetry_file};
    use crate::config::{LoggingConfig, ResolvedOutputs};
    use tracing::Level;

    #[test]
    fn directives_scope_the_level_to_our_crates() {
        assert_eq!(
            filter_directives(Level::DEBUG),
            "warn,pacman_bench=debug,pacman_bot=debug,pacman_core=debug"
        );
    }

    #[test]
    fn disabled_logging_leaves_no_file() {
        let dir = tempfile::tempdir().expect("tempdir");
        let outputs = ResolvedOutputs {
            jsonl: dir.path().join("run").join("episodes.jsonl"),
        };
        let guard = init_logging(&LoggingConfig::default(), &outputs).expect("init");
        assert!(guard.is_none());
        assert!(!outputs.telemetry_path().exists());
    }

    #[test]
    fn telemetry_file_creates_missing_directories() {
        let dir = tempfile::tempdir().expect("tempdir");
        let path = dir.path().join("a").join("b").join("telemetry.jsonl");
        open_telemetry_file(&path).expect("open");
        assert!(path.is_file());
    }
}
