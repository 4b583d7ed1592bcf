use tracing::info;
use tracing_subscriber::{fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter, Registry};

use crate::error::{FieldcapError, FieldcapResult};

/// Logging configuration for fieldcap
#[derive(Debug, Clone)]
pub struct LoggingConfig {
    pub level: String,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: "info".to_string(),
        }
    }
}

/// Initialize the logging system for the capture engine.
///
/// The core owns no file boundary, so everything goes to stderr; the host
/// application can install its own subscriber instead and skip this.
pub fn init_logging(config: &LoggingConfig) -> FieldcapResult<()> {
    let env_filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(format!("fieldcap={}", config.level)));

    let console_layer = fmt::layer()
        .with_writer(std::io::stderr)
        .with_target(false)
        .without_time()
        .compact();

    Registry::default()
        .with(env_filter)
        .with(console_layer)
        .try_init()
        .map_err(|e| FieldcapError::configuration(format!("logging init failed: {e}")))?;

    info!("fieldcap logging initialized");
    info!("Log level: {}", config.level);

    Ok(())
}
