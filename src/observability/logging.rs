// Copyright (c) 2025 Steve Wagner (ciroque@live.com)
// SPDX-License-Identifier: MIT

use tracing_subscriber::{fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

/// Default filter when neither `RUST_LOG` nor the config supplies one
pub const DEFAULT_LOG_FILTER: &str = "info";

/// Pick the filter directive: `RUST_LOG` wins, then the config, then the default.
pub fn build_env_filter(configured: Option<&str>) -> EnvFilter {
    if std::env::var("RUST_LOG").is_ok() {
        return EnvFilter::from_default_env();
    }
    EnvFilter::new(configured.unwrap_or(DEFAULT_LOG_FILTER))
}

/// Install the global fmt subscriber.
///
/// Safe to call more than once; later calls are no-ops.
pub fn init_logging(configured: Option<&str>) {
    let _ = tracing_subscriber::registry()
        .with(
            fmt::layer()
                .with_target(true)
                .with_thread_ids(false)
                .with_ansi(std::env::var("NO_COLOR").is_err()),
        )
        .with(build_env_filter(configured))
        .try_init();
}
