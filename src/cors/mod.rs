//! Cross-origin admission subsystem.
//!
//! # Data Flow
//! ```text
//! Incoming request:
//!     → middleware.rs (host, runs before route matching)
//!     → filter.rs before_routing → Continue | ShortCircuit | Abort
//!     → [routing + handler, only on Continue]
//!     → filter.rs after_response (same CorsContext)
//!     → Send to client
//! ```
//!
//! # Design Decisions
//! - Fail closed: a disallowed origin never reaches a handler
//! - No ambient state; the context is threaded explicitly between phases

pub mod filter;
pub mod middleware;

pub use filter::{Admission, AllowedOrigins, CorsContext, CorsFilter, CorsRejection};
pub use middleware::{cors_middleware, pre_routing};
