//! Demo HTTP server.
//!
//! # Responsibilities
//! - Create the Axum router with the demo handlers
//! - Put the CORS filter in front of route matching
//! - Wire up middleware (tracing, timeout, body limit, request ID)
//! - Bind to a listener and shut down gracefully on Ctrl+C
//!
//! # Routes
//! - `GET /health`: liveness probe
//! - `GET /status/{code}`: `ErrorResponse` for any status code
//! - `POST /upload`: multipart upload, answers with the received files
//! - `GET /download/{name}`: PDF attachment

use std::collections::BTreeMap;
use std::time::Duration;

use axum::{
    body::Body,
    extract::{DefaultBodyLimit, Multipart, Path},
    http::{header, HeaderMap, HeaderValue, StatusCode},
    response::{IntoResponse, Json, Response},
    routing::{get, post},
    Router,
};
use serde_json::json;
use tokio::net::TcpListener;
use tower_http::{
    request_id::{PropagateRequestIdLayer, SetRequestIdLayer},
    timeout::TimeoutLayer,
    trace::TraceLayer,
};

use crate::config::RestKitConfig;
use crate::cors::{self, CorsFilter};
use crate::http::error_response::ErrorResponse;
use crate::http::headers::{content_disposition_attachment, PRAGMA};
use crate::http::media_type::APPLICATION_PDF;
use crate::http::multipart::MultipartForm;
use crate::http::request_id::{request_id_of, UuidRequestId};

const DEMO_PDF: &[u8] =
    b"%PDF-1.4\n1 0 obj << /Type /Catalog >> endobj\ntrailer << /Root 1 0 R >>\n%%EOF\n";

/// HTTP server hosting the demo routes.
pub struct HttpServer {
    router: Router,
    config: RestKitConfig,
}

impl HttpServer {
    /// Create a new HTTP server with the given configuration.
    pub fn new(config: RestKitConfig) -> Self {
        let router = Self::build_router(&config);
        Self { router, config }
    }

    /// Build the Axum router with all middleware layers.
    #[allow(deprecated)]
    pub fn build_router(config: &RestKitConfig) -> Router {
        let routes = Router::new()
            .route("/health", get(health))
            .route("/status/{code}", get(status))
            .route("/upload", post(upload))
            .route("/download/{name}", get(download))
            .layer(DefaultBodyLimit::max(config.server.max_body_size));

        cors::pre_routing(routes, CorsFilter::from_config(&config.cors))
            .layer(TimeoutLayer::new(Duration::from_secs(config.server.request_timeout_secs)))
            .layer(PropagateRequestIdLayer::x_request_id())
            .layer(TraceLayer::new_for_http())
            .layer(SetRequestIdLayer::x_request_id(UuidRequestId))
    }

    /// Router with every layer applied.
    pub fn router(&self) -> Router {
        self.router.clone()
    }

    /// Run the server, accepting connections on the given listener.
    pub async fn run(self, listener: TcpListener) -> Result<(), std::io::Error> {
        let addr = listener.local_addr()?;
        tracing::info!(address = %addr, "HTTP server starting");

        axum::serve(listener, self.router)
            .with_graceful_shutdown(shutdown_signal())
            .await?;

        tracing::info!("HTTP server stopped");
        Ok(())
    }

    /// Get a reference to the config.
    pub fn config(&self) -> &RestKitConfig {
        &self.config
    }
}

async fn health() -> Json<serde_json::Value> {
    Json(json!({ "status": "ok" }))
}

async fn status(Path(code): Path<u16>) -> ErrorResponse {
    ErrorResponse::from(code)
}

async fn upload(headers: HeaderMap, multipart: Multipart) -> Response {
    let request_id = request_id_of(&headers).unwrap_or("unknown").to_string();

    let form = match MultipartForm::from_multipart(multipart).await {
        Ok(form) => form,
        Err(e) => {
            tracing::warn!(request_id = %request_id, error = %e, "Rejected multipart upload");
            return ErrorResponse::new(StatusCode::BAD_REQUEST)
                .with_message(e.to_string())
                .into_response();
        }
    };

    let description = match form.text_part("description") {
        Ok(description) => description,
        Err(e) => {
            return ErrorResponse::new(StatusCode::BAD_REQUEST)
                .with_message(e.to_string())
                .into_response();
        }
    };

    let files: BTreeMap<String, usize> = form
        .files()
        .into_iter()
        .map(|(name, bytes)| (name, bytes.len()))
        .collect();

    tracing::debug!(request_id = %request_id, files = files.len(), "Multipart upload received");
    Json(json!({ "description": description, "files": files })).into_response()
}

async fn download(Path(name): Path<String>) -> Response {
    let disposition = content_disposition_attachment(&name);
    let Ok(disposition) = HeaderValue::from_str(&disposition) else {
        return ErrorResponse::new(StatusCode::BAD_REQUEST)
            .with_message(format!("unusable file name: {}", name))
            .into_response();
    };

    let mut response = Body::from(DEMO_PDF).into_response();
    let headers = response.headers_mut();
    headers.insert(header::CONTENT_TYPE, HeaderValue::from_static(APPLICATION_PDF));
    headers.insert(header::CONTENT_DISPOSITION, disposition);
    headers.insert(PRAGMA, HeaderValue::from_static("no-cache"));
    response
}

/// Wait for shutdown signal (Ctrl+C).
async fn shutdown_signal() {
    tokio::signal::ctrl_c()
        .await
        .expect("Failed to install Ctrl+C handler");
    tracing::info!("Shutdown signal received");
}
