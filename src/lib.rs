//! REST client and CORS admission helpers.

pub mod client;
pub mod config;
pub mod cors;
pub mod http;
pub mod observability;

pub use client::{ClientError, Request, Response, RestClient};
pub use config::schema::RestKitConfig;
pub use cors::CorsFilter;
pub use http::HttpServer;
