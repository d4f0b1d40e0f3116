//! CORS admission filter.
//!
//! # States per inbound request
//! ```text
//! before routing:
//!   no Origin            → Continue (not cross-origin)
//!   OPTIONS + Origin     → origin ok?  ShortCircuit(200 + CORS headers)
//!                                 no?  Abort(403), rejected
//!   other  + Origin      → origin ok?  Continue
//!                                 no?  Abort(403), rejected
//! after response:
//!   no Origin | preflight | rejected → untouched
//!   otherwise → put Allow-Origin (echo) and Allow-Credentials: true
//! ```
//!
//! # Design Decisions
//! - Origins match by exact string equality; `*` admits everything
//! - The decision travels in a [`CorsContext`] returned from the before
//!   phase and handed back to the after phase
//! - Response headers are replaced, never appended

use std::collections::BTreeSet;

use axum::{
    body::Body,
    http::{
        header::{
            ACCESS_CONTROL_ALLOW_CREDENTIALS, ACCESS_CONTROL_ALLOW_HEADERS,
            ACCESS_CONTROL_ALLOW_METHODS, ACCESS_CONTROL_ALLOW_ORIGIN,
            ACCESS_CONTROL_REQUEST_HEADERS, ACCESS_CONTROL_REQUEST_METHOD, ORIGIN,
        },
        HeaderMap, HeaderValue, Method, StatusCode,
    },
    response::{IntoResponse, Response},
};

use crate::config::CorsConfig;
use crate::http::error_response::ErrorResponse;
use crate::observability::metrics;

/// Allow-list entry admitting every origin.
pub const ALL_ALLOWED_ORIGINS: &str = "*";

/// Origins permitted to make cross-origin requests.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AllowedOrigins {
    Any,
    List(BTreeSet<String>),
}

impl AllowedOrigins {
    /// Parse `*` or a comma/whitespace separated list of origins.
    pub fn parse(allow_list: &str) -> Self {
        let entries: BTreeSet<String> = allow_list
            .split(|c: char| c == ',' || c.is_whitespace())
            .filter(|s| !s.is_empty())
            .map(str::to_string)
            .collect();

        if entries.contains(ALL_ALLOWED_ORIGINS) {
            AllowedOrigins::Any
        } else {
            AllowedOrigins::List(entries)
        }
    }

    pub fn allows(&self, origin: &str) -> bool {
        match self {
            AllowedOrigins::Any => true,
            AllowedOrigins::List(origins) => origins.contains(origin),
        }
    }
}

/// Per-request CORS state, produced before routing and consumed after.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CorsContext {
    origin: Option<String>,
    preflight: bool,
    rejected: bool,
}

impl CorsContext {
    pub fn origin(&self) -> Option<&str> {
        self.origin.as_deref()
    }

    pub fn is_preflight(&self) -> bool {
        self.preflight
    }

    pub fn is_rejected(&self) -> bool {
        self.rejected
    }
}

/// Origin failed validation.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("Origin not allowed: {origin}")]
pub struct CorsRejection {
    pub origin: String,
}

impl IntoResponse for CorsRejection {
    fn into_response(self) -> Response {
        ErrorResponse::new(StatusCode::FORBIDDEN)
            .with_message(self.to_string())
            .into_response()
    }
}

/// Decision of the before-routing phase.
#[derive(Debug)]
pub enum Admission {
    /// Let the request through to routing.
    Continue(CorsContext),
    /// Answer immediately with this response (preflight).
    ShortCircuit(Response, CorsContext),
    /// Refuse the request.
    Abort(CorsRejection, CorsContext),
}

/// Two-phase CORS gatekeeper.
#[derive(Debug, Clone)]
pub struct CorsFilter {
    allowed: AllowedOrigins,
}

impl CorsFilter {
    pub fn new(allowed: AllowedOrigins) -> Self {
        Self { allowed }
    }

    pub fn from_config(config: &CorsConfig) -> Self {
        Self::new(AllowedOrigins::parse(&config.allowed_origins))
    }

    pub fn allowed(&self) -> &AllowedOrigins {
        &self.allowed
    }

    /// Before-routing phase.
    pub fn before_routing(&self, method: &Method, headers: &HeaderMap) -> Admission {
        let Some(origin) = origin_of(headers) else {
            return Admission::Continue(CorsContext::default());
        };

        let mut context = CorsContext {
            origin: Some(origin.to_string()),
            preflight: is_options(method),
            rejected: false,
        };

        if let Err(rejection) = self.check_origin(origin) {
            context.rejected = true;
            tracing::warn!(origin = %origin, method = %method, "CORS origin rejected");
            metrics::record_cors_decision("rejected");
            return Admission::Abort(rejection, context);
        }

        if context.preflight {
            tracing::debug!(origin = %origin, "CORS preflight answered");
            metrics::record_cors_decision("preflight");
            return Admission::ShortCircuit(preflight_response(origin, headers), context);
        }

        metrics::record_cors_decision("admitted");
        Admission::Continue(context)
    }

    /// After-response phase.
    pub fn after_response(&self, context: &CorsContext, headers: &mut HeaderMap) {
        let Some(origin) = context.origin() else {
            return;
        };
        if context.preflight || context.rejected {
            return;
        }
        if let Ok(value) = HeaderValue::from_str(origin) {
            headers.insert(ACCESS_CONTROL_ALLOW_ORIGIN, value);
            headers.insert(ACCESS_CONTROL_ALLOW_CREDENTIALS, HeaderValue::from_static("true"));
        }
    }

    fn check_origin(&self, origin: &str) -> Result<(), CorsRejection> {
        if self.allowed.allows(origin) {
            Ok(())
        } else {
            Err(CorsRejection {
                origin: origin.to_string(),
            })
        }
    }
}

/// `Origin` header value, treating a blank or non-text value as absent.
fn origin_of(headers: &HeaderMap) -> Option<&str> {
    headers
        .get(ORIGIN)
        .and_then(|v| v.to_str().ok())
        .filter(|o| !o.trim().is_empty())
}

fn is_options(method: &Method) -> bool {
    method.as_str().eq_ignore_ascii_case(Method::OPTIONS.as_str())
}

fn preflight_response(origin: &str, request_headers: &HeaderMap) -> Response {
    let mut builder = Response::builder()
        .status(StatusCode::OK)
        .header(ACCESS_CONTROL_ALLOW_ORIGIN, origin)
        .header(ACCESS_CONTROL_ALLOW_CREDENTIALS, "true");

    if let Some(methods) = request_headers.get(ACCESS_CONTROL_REQUEST_METHOD) {
        builder = builder.header(ACCESS_CONTROL_ALLOW_METHODS, methods.clone());
    }
    if let Some(allow_headers) = request_headers.get(ACCESS_CONTROL_REQUEST_HEADERS) {
        builder = builder.header(ACCESS_CONTROL_ALLOW_HEADERS, allow_headers.clone());
    }

    builder
        .body(Body::empty())
        .unwrap_or_else(|_| StatusCode::OK.into_response())
}
