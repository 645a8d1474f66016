//! Logging initialization for the catalog service.
//!
//! `RUST_LOG`, when set, replaces the configured filter entirely. Otherwise the
//! configured level applies to the service and to request tracing, while sqlx
//! statement logging stays at `warn`.

use std::fs::{self, File};
use std::path::Path;
use std::sync::Arc;

use tracing_subscriber::fmt::writer::MakeWriterExt;
use tracing_subscriber::prelude::*;
use tracing_subscriber::{fmt, EnvFilter};

use crate::config::LoggingConfig;
use crate::Result;

/// Normalise a configured level name; unknown names fall back to `info`.
fn normalize_level(level: &str) -> &'static str {
    match level.trim().to_lowercase().as_str() {
        "trace" => "trace",
        "debug" => "debug",
        "warn" | "warning" => "warn",
        "error" => "error",
        _ => "info",
    }
}

/// Filter directives used when `RUST_LOG` is not set.
fn filter_directives(level: &str) -> String {
    let level = normalize_level(level);
    format!("{level},catalog={level},tower_http={level},sqlx=warn")
}

fn build_filter(level: &str) -> EnvFilter {
    EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(filter_directives(level)))
}

/// Initialize logging to stdout and, if configured, a log file.
///
/// With `json = true` both outputs emit one JSON object per event.
pub fn init(config: &LoggingConfig) -> Result<()> {
    let registry = tracing_subscriber::registry().with(build_filter(&config.level));

    if config.file.trim().is_empty() {
        if config.json {
            registry.with(fmt::layer().json().with_target(true)).init();
        } else {
            registry.with(fmt::layer().with_target(true)).init();
        }
        return Ok(());
    }

    if let Some(parent) = Path::new(&config.file).parent() {
        if !parent.as_os_str().is_empty() && !parent.exists() {
            fs::create_dir_all(parent)?;
        }
    }
    let log_file = Arc::new(File::create(&config.file)?);
    let writer = std::io::stdout.and(log_file);

    if config.json {
        registry
            .with(fmt::layer().json().with_target(true).with_writer(writer))
            .init();
    } else {
        registry
            .with(
                fmt::layer()
                    .with_writer(writer)
                    .with_ansi(false)
                    .with_target(true),
            )
            .init();
    }

    Ok(())
}

/// Initialize console-only logging, used when the log file cannot be opened.
pub fn init_console_only(level: &str) {
    tracing_subscriber::registry()
        .with(build_filter(level))
        .with(fmt::layer().with_ansi(true).with_target(true))
        .init();
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_normalize_level() {
        assert_eq!(normalize_level("DEBUG"), "debug");
        assert_eq!(normalize_level(" warning "), "warn");
        assert_eq!(normalize_level("bogus"), "info");
        assert_eq!(normalize_level(""), "info");
    }

    #[test]
    fn test_filter_directives_quiet_sqlx() {
        assert_eq!(
            filter_directives("debug"),
            "debug,catalog=debug,tower_http=debug,sqlx=warn"
        );
        assert!(EnvFilter::try_new(filter_directives("nonsense")).is_ok());
    }
}
