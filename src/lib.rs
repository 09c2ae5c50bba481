pub mod analysis;
pub mod config;
pub mod corrections;
pub mod db;
pub mod export;
pub mod grid;
pub mod interpretations;
pub mod models;
pub mod projection;

use tracing_subscriber::EnvFilter;

/// Install the global tracing subscriber.
///
/// `RUST_LOG` takes precedence; otherwise the default filter from
/// [`config::default_log_filter`] applies. Call once from the embedding shell.
pub fn init_logging() {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new(config::default_log_filter())),
        )
        .init();

    tracing::info!("{} starting v{}", config::APP_NAME, config::APP_VERSION);
}
