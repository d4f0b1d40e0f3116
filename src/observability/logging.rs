//! Structured logging.
//!
//! # Responsibilities
//! - Initialize the global `tracing` subscriber
//! - Pick the filter from `RUST_LOG`, falling back to configuration
//!
//! # Design Decisions
//! - Human readable fmt layer; structured fields carry the detail
//! - Initialisation is fallible rather than panicking so tests and
//!   embedding binaries can call it more than once

use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

/// Filter used when neither `RUST_LOG` nor configuration provide one.
pub const DEFAULT_FILTER: &str = "restkit=debug,tower_http=debug";

/// Install the global subscriber.
pub fn init(default_filter: &str) -> Result<(), tracing_subscriber::util::TryInitError> {
    tracing_subscriber::registry()
        .with(filter_from_env(default_filter))
        .with(tracing_subscriber::fmt::layer())
        .try_init()
}

fn filter_from_env(default_filter: &str) -> EnvFilter {
    EnvFilter::try_from_default_env().unwrap_or_else(|_| {
        let directive = if default_filter.trim().is_empty() {
            DEFAULT_FILTER
        } else {
            default_filter
        };
        EnvFilter::new(directive)
    })
}
