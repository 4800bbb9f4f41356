//! Telemetry and Observability
//!
//! Sets up `tracing-subscriber` for structured logging. Logs always go to
//! stderr; stdout is reserved for the conversation itself.

use std::sync::OnceLock;
use tracing_subscriber::{
    fmt, layer::SubscriberExt, reload, util::SubscriberInitExt, EnvFilter, Registry,
};

/// Filter handle of the installed subscriber, set by the first successful init
static FILTER_HANDLE: OnceLock<reload::Handle<EnvFilter, Registry>> = OnceLock::new();

fn default_filter(log_level: &str) -> String {
    format!("warn,colloquy_engine={},colloquy={}", log_level, log_level)
}

/// Initialize the tracing subscriber with the given log level.
///
/// Priority: `RUST_LOG` env var > `log_level` parameter.
///
/// In debug builds: pretty-printed terminal output.
/// In release builds: JSON structured output with spans.
///
/// The first call installs the subscriber. Later calls swap in the new
/// level unless `RUST_LOG` is set.
pub fn init_telemetry_with_level(log_level: &str) {
    if let Some(handle) = FILTER_HANDLE.get() {
        if std::env::var_os("RUST_LOG").is_none() {
            handle.reload(EnvFilter::new(default_filter(log_level))).ok();
        }
        return;
    }

    let env_filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(default_filter(log_level)));
    let (filter, handle) = reload::Layer::new(env_filter);

    #[cfg(debug_assertions)]
    let installed = tracing_subscriber::registry()
        .with(filter)
        .with(
            fmt::layer()
                .pretty()
                .with_target(false)
                .with_writer(std::io::stderr),
        )
        .try_init();

    #[cfg(not(debug_assertions))]
    let installed = tracing_subscriber::registry()
        .with(filter)
        .with(
            fmt::layer()
                .json()
                .with_current_span(true)
                .with_writer(std::io::stderr),
        )
        .try_init();

    if installed.is_ok() {
        FILTER_HANDLE.set(handle).ok();
    }
}

/// Initialize telemetry at "info" before the configuration is known.
pub fn init_telemetry() {
    init_telemetry_with_level("info");
}

/// Resolve the effective level: CLI flag, then config, then "info".
pub fn effective_level<'a>(cli_level: Option<&'a str>, config_level: Option<&'a str>) -> &'a str {
    cli_level.or(config_level).unwrap_or("info")
}
