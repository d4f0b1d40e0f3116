//! Observability subsystem.
//!
//! # Data Flow
//! ```text
//! client / cors produce:
//!     → tracing events (structured fields)  → logging.rs subscriber
//!     → counters (outcome classes, CORS decisions) → metrics.rs recorder
//!
//! Consumers:
//!     → stdout (fmt layer)
//!     → Prometheus scrape endpoint (optional)
//! ```
//!
//! # Design Decisions
//! - Recording is always on; without an installed recorder the `metrics`
//!   macros are no-ops
//! - Request ID flows through the demo server via tower-http layers

pub mod logging;
pub mod metrics;
