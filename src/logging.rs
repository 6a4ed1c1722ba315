use std::path::Path;
use std::sync::Mutex;
use thiserror::Error;
use tracing_subscriber::EnvFilter;

/// Filter used when neither `RUST_LOG` nor the configuration sets one
const DEFAULT_FILTER: &str = "info";

/// Install a global `tracing` subscriber that appends log messages to the
/// file at `path`.  If `path` is `None`, no subscriber is installed and all
/// log messages are discarded.
///
/// Messages are never written to the terminal, as that would corrupt the
/// game display.
pub(crate) fn init(path: Option<&Path>, filter: Option<&str>) -> Result<(), LogError> {
    let Some(path) = path else {
        return Ok(());
    };
    let filter = parse_filter(filter_directives(
        std::env::var("RUST_LOG").ok().as_deref(),
        filter,
    ))?;
    let file = fs_err::OpenOptions::new()
        .create(true)
        .append(true)
        .open(path)
        .map_err(LogError::Open)?;
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_ansi(false)
        .with_writer(Mutex::new(file))
        .try_init()
        .map_err(LogError::Install)
}

/// `RUST_LOG` takes precedence over the configured filter
fn filter_directives<'a>(env: Option<&'a str>, configured: Option<&'a str>) -> &'a str {
    env.filter(|s| !s.trim().is_empty())
        .or(configured)
        .unwrap_or(DEFAULT_FILTER)
}

fn parse_filter(directives: &str) -> Result<EnvFilter, LogError> {
    EnvFilter::try_new(directives).map_err(|source| LogError::Filter {
        directives: directives.to_owned(),
        source,
    })
}

#[derive(Debug, Error)]
pub(crate) enum LogError {
    #[error("invalid log filter {directives:?}")]
    Filter {
        directives: String,
        source: tracing_subscriber::filter::ParseError,
    },
    #[error("failed to open log file")]
    Open(#[source] std::io::Error),
    #[error("failed to install log subscriber")]
    Install(#[source] Box<dyn std::error::Error + Send + Sync>),
}
