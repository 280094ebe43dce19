use std::env;
use std::fs::OpenOptions;
use std::io;
use std::path::PathBuf;
use tracing_subscriber::{EnvFilter, fmt, layer::SubscriberExt, util::SubscriberInitExt};

/// Configuration for the logging system
///
/// Logs never go to stdout: command results are printed there.
#[derive(Debug, Clone)]
pub struct LogConfig {
    /// Log level filter (e.g., "debug", "info", "warn", "error")
    pub level: String,
    /// Optional log file path. If None, logs only to stderr
    pub file_path: Option<PathBuf>,
    /// Whether to use structured JSON format for logs
    pub json_format: bool,
}

impl Default for LogConfig {
    fn default() -> Self {
        Self {
            level: "warn".to_string(),
            file_path: None,
            json_format: false,
        }
    }
}

/// Insert the process id before the extension: `nav.log` -> `nav.<pid>.log`
fn unique_log_path(mut path_buf: PathBuf, pid: u32) -> PathBuf {
    if let Some(filename) = path_buf.file_stem() {
        let extension = path_buf
            .extension()
            .and_then(|ext| ext.to_str())
            .unwrap_or("");

        let unique_filename = if extension.is_empty() {
            format!("{}.{}", filename.to_string_lossy(), pid)
        } else {
            format!("{}.{}.{}", filename.to_string_lossy(), pid, extension)
        };

        path_buf.set_file_name(unique_filename);
    }
    path_buf
}

impl LogConfig {
    /// Create LogConfig from environment variables
    ///
    /// - `RUST_LOG`: level filter (default "warn")
    /// - `RAILS_NAV_LOG_FILE`: write logs to this file instead of stderr
    /// - `RAILS_NAV_LOG_UNIQUE=true`: add the process id to the log file name
    /// - `RAILS_NAV_LOG_JSON=true`: JSON lines instead of human-readable output
    pub fn from_env() -> Self {
        let level = env::var("RUST_LOG").unwrap_or_else(|_| "warn".to_string());

        let file_path = env::var("RAILS_NAV_LOG_FILE").ok().map(|path| {
            let path_buf = PathBuf::from(path);
            if env::var("RAILS_NAV_LOG_UNIQUE").unwrap_or_default() == "true" {
                unique_log_path(path_buf, std::process::id())
            } else {
                path_buf
            }
        });

        let json_format = env::var("RAILS_NAV_LOG_JSON").unwrap_or_default() == "true";

        Self {
            level,
            file_path,
            json_format,
        }
    }

    /// Override values from CLI arguments
    pub fn with_overrides(
        mut self,
        level: Option<String>,
        file_path: Option<PathBuf>,
        json_format: bool,
    ) -> Self {
        if let Some(level) = level {
            self.level = level;
        }
        if let Some(file_path) = file_path {
            self.file_path = Some(file_path);
        }
        self.json_format |= json_format;
        self
    }
}

/// Initialize the logging system based on configuration
pub fn init_logging(config: LogConfig) -> Result<(), Box<dyn std::error::Error>> {
    // Create environment filter from log level
    let env_filter = EnvFilter::try_new(&config.level).or_else(|_| EnvFilter::try_new("warn"))?;

    let subscriber = tracing_subscriber::registry().with(env_filter);

    match (&config.file_path, config.json_format) {
        (Some(file_path), true) => {
            let file = OpenOptions::new()
                .create(true)
                .append(true)
                .open(file_path)?;

            let file_layer = fmt::layer().json().with_writer(file).with_ansi(false);

            subscriber.with(file_layer).init();
        }
        (Some(file_path), false) => {
            let file = OpenOptions::new()
                .create(true)
                .append(true)
                .open(file_path)?;

            let file_layer = fmt::layer()
                .with_writer(file)
                .with_ansi(false)
                .with_target(true)
                .with_thread_ids(true)
                .with_line_number(true);

            subscriber.with(file_layer).init();
        }
        (None, true) => {
            let stderr_layer = fmt::layer().json().with_writer(io::stderr).with_ansi(false);

            subscriber.with(stderr_layer).init();
        }
        // Stderr only + human readable format (default)
        (None, false) => {
            let stderr_layer = fmt::layer()
                .with_writer(io::stderr)
                .with_ansi(true)
                .with_target(true)
                .with_thread_ids(true)
                .with_line_number(true);

            subscriber.with(stderr_layer).init();
        }
    }

    Ok(())
}

/// Helper function to log performance timing
#[macro_export]
macro_rules! log_timing {
    ($level:expr, $operation:expr, $duration:expr) => {
        tracing::event!(
            $level,
            operation = $operation,
            duration_ms = $duration.as_millis(),
            pid = std::process::id(),
            "Performance timing"
        );
    };
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_unique_log_path() {
        assert_eq!(
            unique_log_path(PathBuf::from("/tmp/rails-nav.log"), 42),
            PathBuf::from("/tmp/rails-nav.42.log")
        );
        assert_eq!(
            unique_log_path(PathBuf::from("/tmp/rails-nav"), 7),
            PathBuf::from("/tmp/rails-nav.7")
        );
    }

    #[test]
    fn test_cli_overrides_win() {
        let config = LogConfig::default().with_overrides(
            Some("debug".to_string()),
            Some(PathBuf::from("/tmp/nav.log")),
            true,
        );
        assert_eq!(config.level, "debug");
        assert_eq!(config.file_path, Some(PathBuf::from("/tmp/nav.log")));
        assert!(config.json_format);

        let config = LogConfig::default().with_overrides(None, None, false);
        assert_eq!(config.level, "warn");
        assert!(config.file_path.is_none());
        assert!(!config.json_format);
    }
}
