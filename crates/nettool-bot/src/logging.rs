//! `tracing` subscriber setup
use crate::api::types::SERVICE_NAME;
use crate::config::{LogFormat, LoggingConfig};
use crate::error::{BotError, Result};
use tracing_subscriber::{EnvFilter, Layer, layer::SubscriberExt, util::SubscriberInitExt};

/// Create a filter for the subscriber.
///
/// `RUST_LOG` takes precedence over the configured filter when it is set.
pub fn filter_layer(cfg: &LoggingConfig) -> Result<EnvFilter> {
    if std::env::var_os(EnvFilter::DEFAULT_ENV).is_some() {
        return EnvFilter::try_from_default_env().map_err(|e| BotError::Logging(e.to_string()));
    }

    let mut filter = EnvFilter::try_new(cfg.filter.as_ref())
        .map_err(|e| BotError::Logging(format!("Invalid log filter `{}`: {e}", cfg.filter)))?;
    for directive in &cfg.directives {
        filter = filter.add_directive(directive.parse().map_err(|e| {
            BotError::Logging(format!("Invalid log directive `{directive}`: {e}"))
        })?);
    }
    Ok(filter)
}

/// Initialize the global subscriber, writing to stderr
///
/// ## Errors
/// - `BotError::Logging` - invalid filter, or a subscriber is already installed
pub fn init(cfg: &LoggingConfig) -> Result<()> {
    let filter = filter_layer(cfg)?;
    let registry = tracing_subscriber::registry();

    let result = match cfg.format {
        LogFormat::Json => registry
            .with(
                tracing_subscriber::fmt::layer()
                    .json()
                    .with_writer(std::io::stderr)
                    .with_filter(filter),
            )
            .try_init(),
        LogFormat::Full => registry
            .with(
                tracing_subscriber::fmt::layer()
                    .pretty()
                    .with_ansi(cfg.ansi)
                    .with_writer(std::io::stderr)
                    .with_thread_names(true)
                    .with_line_number(true)
                    .with_thread_ids(true)
                    .with_filter(filter),
            )
            .try_init(),
        LogFormat::Pretty => registry
            .with(
                tracing_subscriber::fmt::layer()
                    .pretty()
                    .with_ansi(cfg.ansi)
                    .with_writer(std::io::stderr)
                    .with_filter(filter),
            )
            .try_init(),
        LogFormat::Compact => registry
            .with(
                tracing_subscriber::fmt::layer()
                    .compact()
                    .with_ansi(cfg.ansi)
                    .with_writer(std::io::stderr)
                    .with_target(true)
                    .with_filter(filter),
            )
            .try_init(),
    };

    result.map_err(|e| BotError::Logging(e.to_string()))?;
    tracing::debug!(target: SERVICE_NAME, format = ?cfg.format, "Logging initialized");
    Ok(())
}
