use std::path::PathBuf;

use tracing_appender::non_blocking::WorkerGuard;
use tracing_appender::rolling::{RollingFileAppender, Rotation};
use tracing_subscriber::{fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

const LOG_FILE_PREFIX: &str = "parola.log";

/// Keeps the non-blocking file writer alive; dropping it flushes pending lines
pub struct FileLogGuard {
    _guard: WorkerGuard,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LogSettings {
    pub level: String,
    /// Daily rolling log files are written here when set
    pub file_dir: Option<PathBuf>,
}

impl LogSettings {
    pub fn from_env(level: &str) -> Self {
        let enabled = std::env::var("ENABLE_FILE_LOGS")
            .map(|v| is_truthy(&v))
            .unwrap_or(false);
        let file_dir = enabled.then(|| {
            PathBuf::from(std::env::var("LOG_DIR").unwrap_or_else(|_| "./logs".to_string()))
        });
        Self {
            level: level.to_string(),
            file_dir,
        }
    }
}

fn is_truthy(value: &str) -> bool {
    value == "true" || value == "1"
}

pub fn init_tracing(settings: &LogSettings) -> Option<FileLogGuard> {
    let env_filter =
        EnvFilter::try_new(&settings.level).unwrap_or_else(|_| EnvFilter::new("info"));
    let stdout_layer = fmt::layer().with_target(true);

    if let Some(log_dir) = &settings.file_dir {
        match std::fs::create_dir_all(log_dir) {
            Ok(()) => {
                let file_appender = RollingFileAppender::new(Rotation::DAILY, log_dir, LOG_FILE_PREFIX);
                let (file_writer, guard) = tracing_appender::non_blocking(file_appender);
                let file_layer = fmt::layer()
                    .with_writer(file_writer)
                    .with_ansi(false)
                    .with_target(true);

                tracing_subscriber::registry()
                    .with(env_filter)
                    .with(stdout_layer)
                    .with(file_layer)
                    .init();

                return Some(FileLogGuard { _guard: guard });
            }
            Err(err) => eprintln!("failed to create log directory {}: {err}", log_dir.display()),
        }
    }

    tracing_subscriber::registry()
        .with(env_filter)
        .with(stdout_layer)
        .init();

    None
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_truthy_flags() {
        assert!(is_truthy("true"));
        assert!(is_truthy("1"));
        assert!(!is_truthy("yes"));
        assert!(!is_truthy("TRUE"));
    }
}
