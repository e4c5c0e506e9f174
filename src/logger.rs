//! Tracing subscriber setup for hosts embedding the crate.
//!
//! `RUST_LOG` takes precedence over the configured level.

use tracing_subscriber::{EnvFilter, fmt, layer::SubscriberExt, util::SubscriberInitExt};

use crate::config::Config;

/// Installs a fmt subscriber. Returns `false` if one was already installed.
pub fn init(level: &str) -> bool {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(level));

    let fmt_layer = fmt::layer()
        .with_target(true)
        .with_thread_ids(false)
        .with_file(false)
        .with_line_number(false);

    tracing_subscriber::registry()
        .with(filter)
        .with(fmt_layer)
        .try_init()
        .is_ok()
}

pub fn init_from_config(config: &Config) -> bool {
    init(&config.log_level)
}
