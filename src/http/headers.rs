//! Header names not covered by `axum::http::header`.
//!
//! CORS header names (`Origin`, `Access-Control-*`) are taken from
//! `axum::http::header` directly.

use axum::http::HeaderName;

use crate::http::uri;

pub const PRAGMA: HeaderName = HeaderName::from_static("pragma");

/// Prefix of a `Content-Disposition` value announcing a file download.
pub const CONTENT_DISPOSITION_ATTACHMENT_FILENAME: &str = "attachment; filename=";

/// `Content-Disposition` value for downloading `filename` as an attachment.
pub fn content_disposition_attachment(filename: &str) -> String {
    format!("{}{}", CONTENT_DISPOSITION_ATTACHMENT_FILENAME, uri::encode(filename))
}
