//! JSON error body returned by server-side components.

use axum::{
    http::StatusCode,
    response::{IntoResponse, Json, Response},
};
use serde::{Deserialize, Serialize};

use crate::http::status::{self, StatusInfo};

/// Error payload: status code, reason phrase, optional message and payload.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ErrorResponse {
    pub code: u16,
    pub reason_phrase: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub payload: Option<serde_json::Value>,
}

impl ErrorResponse {
    pub fn new(status: impl Into<StatusInfo>) -> Self {
        let info = status.into();
        Self {
            code: info.code,
            reason_phrase: info.reason.to_string(),
            message: None,
            payload: None,
        }
    }

    pub fn with_message(mut self, message: impl Into<String>) -> Self {
        self.message = Some(message.into());
        self
    }

    pub fn with_payload(mut self, payload: serde_json::Value) -> Self {
        self.payload = Some(payload);
        self
    }
}

impl IntoResponse for ErrorResponse {
    fn into_response(self) -> Response {
        let status = StatusCode::from_u16(self.code).unwrap_or(StatusCode::INTERNAL_SERVER_ERROR);
        (status, Json(self)).into_response()
    }
}

impl From<u16> for ErrorResponse {
    fn from(code: u16) -> Self {
        Self::new(status::from_code(code))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::http::status::ExtendedStatus;

    #[test]
    fn test_serializes_camel_case_and_skips_empty() {
        let body = ErrorResponse::new(StatusCode::FORBIDDEN).with_message("nope");
        let json = serde_json::to_value(&body).unwrap();
        assert_eq!(
            json,
            serde_json::json!({ "code": 403, "reasonPhrase": "Forbidden", "message": "nope" })
        );
    }

    #[test]
    fn test_extended_status() {
        let body = ErrorResponse::new(ExtendedStatus::Locked);
        assert_eq!(body.code, 423);
        assert_eq!(body.reason_phrase, "Locked");
    }

    #[test]
    fn test_into_response_status() {
        let response = ErrorResponse::from(507).into_response();
        assert_eq!(response.status().as_u16(), 507);
    }
}
