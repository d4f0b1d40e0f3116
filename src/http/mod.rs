//! HTTP vocabulary and the demo server.
//!
//! # Contents
//! - status.rs, media_type.rs, headers.rs: constants and the status registry
//! - uri.rs: form encoding with `%20` for spaces
//! - error_response.rs: JSON error body
//! - multipart.rs: buffered multipart extraction
//! - request_id.rs, server.rs: the demo server and its layers

pub mod error_response;
pub mod headers;
pub mod media_type;
pub mod multipart;
pub mod request_id;
pub mod server;
pub mod status;
pub mod uri;

pub use error_response::ErrorResponse;
pub use server::HttpServer;
pub use status::{Family, StatusInfo};
