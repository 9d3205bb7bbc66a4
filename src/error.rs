use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde::Serialize;

use crate::upstream::UpstreamError;

// Taken from https://github.com/tokio-rs/axum/blob/main/examples/anyhow-error-response/src/main.rs
#[derive(Debug)]
pub struct VoiceBridgeError {
    pub status: StatusCode,
    pub message: HttpErrorResponse,
}

#[derive(Debug, Serialize)]
pub struct HttpErrorResponse {
    error: String,
}

impl From<String> for HttpErrorResponse {
    fn from(message: String) -> Self {
        HttpErrorResponse { error: message }
    }
}

impl From<&str> for HttpErrorResponse {
    fn from(message: &str) -> Self {
        HttpErrorResponse {
            error: message.to_string(),
        }
    }
}

impl IntoResponse for VoiceBridgeError {
    fn into_response(self) -> Response {
        let mut res = Json(self.message).into_response();
        *res.status_mut() = self.status;
        res
    }
}

impl<E> From<E> for VoiceBridgeError
where
    E: Into<anyhow::Error>,
{
    fn from(err: E) -> Self {
        VoiceBridgeError {
            status: StatusCode::INTERNAL_SERVER_ERROR,
            message: HttpErrorResponse::from(err.into().to_string()),
        }
    }
}

/// Applies the failure taxonomy: missing credentials are a server
/// misconfiguration, an oversized input is the caller's fault, everything
/// else means the upstream let us down.
pub fn from_upstream(err: UpstreamError) -> VoiceBridgeError {
    let status = match err {
        UpstreamError::MissingCredentials(_) => StatusCode::INTERNAL_SERVER_ERROR,
        UpstreamError::InputTooLong(_) => StatusCode::PAYLOAD_TOO_LARGE,
        UpstreamError::Network(_)
        | UpstreamError::Api { .. }
        | UpstreamError::Parse(_)
        | UpstreamError::EmptyCompletion
        | UpstreamError::EmptyTranscript
        | UpstreamError::NoModelAvailable => StatusCode::BAD_GATEWAY,
    };
    VoiceBridgeError {
        status,
        message: HttpErrorResponse::from(err.to_string()),
    }
}

pub type BridgeResult<T, E = VoiceBridgeError> = Result<T, E>;

#[macro_export]
macro_rules! bail_bridge {
    ($error_message:expr) => {
        return Err($crate::error::VoiceBridgeError { status: axum::http::StatusCode::INTERNAL_SERVER_ERROR, message: $crate::error::HttpErrorResponse::from($error_message) })
    };
    ($status_code:expr, $error_message:expr) => {
        return Err($crate::error::VoiceBridgeError { status: $status_code, message: $crate::error::HttpErrorResponse::from($error_message) })
    };
    ($status:expr, $fmt:expr $(, $arg:expr)*) => {
        return Err($crate::error::VoiceBridgeError {
            status: $status,
            message: $crate::error::HttpErrorResponse::from(format!($fmt $(, $arg)*)),
        })
    };
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn error_body_serializes_under_error_key() {
        let body = HttpErrorResponse::from("Text is required");
        let value = serde_json::to_value(&body).unwrap();
        assert_eq!(value, serde_json::json!({"error": "Text is required"}));
    }

    #[test]
    fn missing_credentials_map_to_internal_error() {
        let err = from_upstream(UpstreamError::MissingCredentials("GOOGLE_API_KEY"));
        assert_eq!(err.status, StatusCode::INTERNAL_SERVER_ERROR);
    }

    #[test]
    fn oversized_input_maps_to_payload_too_large() {
        let err = from_upstream(UpstreamError::InputTooLong(6000));
        assert_eq!(err.status, StatusCode::PAYLOAD_TOO_LARGE);
    }

    #[test]
    fn upstream_failures_map_to_bad_gateway() {
        for err in [
            UpstreamError::EmptyCompletion,
            UpstreamError::EmptyTranscript,
            UpstreamError::NoModelAvailable,
        ] {
            assert_eq!(from_upstream(err).status, StatusCode::BAD_GATEWAY);
        }
    }
}
