//! Structured logging.
//!
//! # Responsibilities
//! - Initialize the tracing subscriber exactly once per process
//! - Default filter keeps the deployer's own events at info level
//! - `RUST_LOG` overrides the filter at runtime

use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

/// Default filter when `RUST_LOG` is unset.
pub const DEFAULT_FILTER: &str = "contract_deployer=info";

/// Initialize the logging subsystem.
pub fn init_logging() {
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| DEFAULT_FILTER.into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();
}
