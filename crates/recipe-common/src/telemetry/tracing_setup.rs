//! Tracing and logging setup
//!
//! Installs a global `tracing` subscriber filtered by `RUST_LOG`, falling
//! back to the configured level. Output is JSON in production and
//! human-readable elsewhere.

use tracing::{Dispatch, Level};
use tracing_subscriber::{
    fmt::{self, format::FmtSpan},
    layer::SubscriberExt,
    util::SubscriberInitExt,
    EnvFilter,
};

use crate::config::Environment;

#[derive(Debug, Clone)]
pub struct TracingConfig {
    /// Default level when `RUST_LOG` is unset
    pub level: Level,
    pub json: bool,
    /// Emit span open/close events
    pub span_events: bool,
    pub file_line: bool,
    pub thread_names: bool,
}

impl Default for TracingConfig {
    fn default() -> Self {
        Self {
            level: Level::INFO,
            json: false,
            span_events: false,
            file_line: true,
            thread_names: false,
        }
    }
}

impl TracingConfig {
    pub fn development() -> Self {
        Self {
            level: Level::DEBUG,
            span_events: true,
            thread_names: true,
            ..Self::default()
        }
    }

    pub fn production() -> Self {
        Self {
            level: Level::INFO,
            json: true,
            span_events: false,
            file_line: false,
            thread_names: false,
        }
    }

    pub fn for_environment(env: Environment) -> Self {
        match env {
            Environment::Development => Self::development(),
            Environment::Staging => Self::default(),
            Environment::Production => Self::production(),
        }
    }

    fn span_events(&self) -> FmtSpan {
        if self.span_events {
            FmtSpan::NEW | FmtSpan::CLOSE
        } else {
            FmtSpan::NONE
        }
    }
}

fn build_dispatch(config: &TracingConfig) -> Dispatch {
    let env_filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(config.level.to_string()));

    let json_layer = config.json.then(|| {
        fmt::layer()
            .json()
            .with_file(config.file_line)
            .with_line_number(config.file_line)
            .with_thread_names(config.thread_names)
            .with_span_events(config.span_events())
    });
    let pretty_layer = (!config.json).then(|| {
        fmt::layer()
            .with_file(config.file_line)
            .with_line_number(config.file_line)
            .with_thread_names(config.thread_names)
            .with_span_events(config.span_events())
    });

    Dispatch::new(
        tracing_subscriber::registry()
            .with(env_filter)
            .with(json_layer)
            .with(pretty_layer),
    )
}

/// Install the default subscriber
///
/// # Panics
/// Panics if a global subscriber is already installed.
pub fn init_tracing() {
    init_tracing_with_config(&TracingConfig::default());
}

/// # Panics
/// Panics if a global subscriber is already installed.
pub fn init_tracing_with_config(config: &TracingConfig) {
    build_dispatch(config).init();
}

/// Like [`init_tracing`], but reports a second initialisation as an error
pub fn try_init_tracing() -> Result<(), TracingError> {
    try_init_tracing_with_config(&TracingConfig::default())
}

pub fn try_init_tracing_with_config(config: &TracingConfig) -> Result<(), TracingError> {
    build_dispatch(config)
        .try_init()
        .map_err(|_| TracingError::AlreadyInitialized)
}

#[derive(Debug, thiserror::Error)]
pub enum TracingError {
    #[error("Tracing subscriber already initialized")]
    AlreadyInitialized,
}
