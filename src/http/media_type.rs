//! Media type constants used when building requests and responses.

/// `application/json` with an explicit UTF-8 charset.
pub const APPLICATION_JSON_UTF_8: &str = "application/json;charset=utf-8";

/// PDF document.
pub const APPLICATION_PDF: &str = "application/pdf";

pub const APPLICATION_JSON: &str = "application/json";
pub const APPLICATION_OCTET_STREAM: &str = "application/octet-stream";
pub const APPLICATION_FORM_URLENCODED: &str = "application/x-www-form-urlencoded";
pub const MULTIPART_FORM_DATA: &str = "multipart/form-data";
pub const TEXT_PLAIN: &str = "text/plain";
pub const TEXT_PLAIN_UTF_8: &str = "text/plain;charset=utf-8";

/// Whether a `Content-Type` value denotes JSON, ignoring parameters.
pub fn is_json(content_type: &str) -> bool {
    let essence = content_type
        .split(';')
        .next()
        .unwrap_or_default()
        .trim()
        .to_ascii_lowercase();
    essence == APPLICATION_JSON || essence.ends_with("+json")
}
