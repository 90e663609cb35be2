use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use serde::Serialize;

/// Wire payload for a translated exception.
///
/// The field names and conditional presence are a stable contract:
/// `ErrorCode` and `ErrorReference` appear only when the matched rule
/// configured a non-empty value for them.
///
/// ```json
/// {
///   "Message": "Resource missing",
///   "ErrorCode": "VAL001"
/// }
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "PascalCase")]
pub struct ErrorPayload {
    pub message: String,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub error_code: Option<String>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub error_reference: Option<String>,
}

impl ErrorPayload {
    /// Create a payload carrying only the friendly message.
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
            error_code: None,
            error_reference: None,
        }
    }
}

/// A translated exception, ready to be written to the client.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ErrorResponse {
    pub status: StatusCode,
    pub payload: ErrorPayload,
}

impl IntoResponse for ErrorResponse {
    fn into_response(self) -> Response {
        (self.status, Json(self.payload)).into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn payload_serializes_message_only() {
        let payload = ErrorPayload::new("boom");
        let json = serde_json::to_value(&payload).unwrap();
        assert_eq!(json, serde_json::json!({ "Message": "boom" }));
    }

    #[test]
    fn payload_serializes_optional_fields_when_present() {
        let payload = ErrorPayload {
            message: "Invalid: email".to_string(),
            error_code: Some("VAL001".to_string()),
            error_reference: Some("https://errors.example/VAL001".to_string()),
        };
        let json = serde_json::to_value(&payload).unwrap();
        assert_eq!(
            json,
            serde_json::json!({
                "Message": "Invalid: email",
                "ErrorCode": "VAL001",
                "ErrorReference": "https://errors.example/VAL001",
            })
        );
    }

    #[test]
    fn error_response_carries_status_and_json_body() {
        let response = ErrorResponse {
            status: StatusCode::NOT_FOUND,
            payload: ErrorPayload::new("Resource missing"),
        };
        let rendered = response.into_response();
        assert_eq!(rendered.status(), StatusCode::NOT_FOUND);
        assert_eq!(
            rendered
                .headers()
                .get(axum::http::header::CONTENT_TYPE)
                .unwrap(),
            "application/json"
        );
    }
}
