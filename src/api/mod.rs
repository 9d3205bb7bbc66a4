use axum::extract::rejection::JsonRejection;
use axum::extract::DefaultBodyLimit;
use axum::http::StatusCode;
use axum::routing::{get, post};
use axum::{Json, Router};

use crate::error::{BridgeResult, HttpErrorResponse, VoiceBridgeError};
use crate::AppState;

pub mod speech;
pub mod transcribe;
pub mod translate;

/// Assembles every route under `/api`.
pub fn router() -> Router<AppState> {
    let audio = Router::new()
        .route(
            "/transcribe-and-translate",
            post(transcribe::handle_transcribe_and_translate),
        )
        // 10 MB limit
        .layer(DefaultBodyLimit::max(10_000_000));

    let api = Router::new()
        .route("/translate", post(translate::handle_translate))
        .route("/speech", post(speech::handle_speech))
        .route("/speech-gtts", post(speech::handle_speech_gtts))
        .route("/health", get(health))
        .merge(audio);

    Router::new().nest("/api", api)
}

#[axum_macros::debug_handler]
async fn health() -> Json<serde_json::Value> {
    Json(serde_json::json!({"status": "ok"}))
}

pub(crate) fn bad_request(message: String) -> VoiceBridgeError {
    VoiceBridgeError {
        status: StatusCode::BAD_REQUEST,
        message: HttpErrorResponse::from(message),
    }
}

/// Maps a failed JSON extraction to the uniform error body. Syntax and type
/// errors are the caller's fault (400); body-buffering failures keep the
/// rejection's own status, so an over-limit body stays 413.
pub(crate) fn json_error(rejection: JsonRejection) -> VoiceBridgeError {
    let status = if matches!(rejection, JsonRejection::BytesRejection(_)) {
        rejection.status()
    } else {
        StatusCode::BAD_REQUEST
    };
    VoiceBridgeError {
        status,
        message: HttpErrorResponse::from(rejection.body_text()),
    }
}

/// Confirms a required string field is present and non-blank, returning it
/// trimmed. The error names the field the caller left out.
pub(crate) fn require_trimmed<'a>(value: Option<&'a str>, missing: &str) -> BridgeResult<&'a str> {
    match value.map(str::trim) {
        Some(value) if !value.is_empty() => Ok(value),
        _ => Err(bad_request(missing.to_string())),
    }
}
