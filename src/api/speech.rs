use axum::extract::rejection::JsonRejection;
use axum::extract::State;
use axum::http::{header, StatusCode};
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde::Deserialize;
use tracing::debug;

use crate::api::{json_error, require_trimmed};
use crate::error::{from_upstream, BridgeResult};
use crate::prompt::{build_prompt, Task};
use crate::AppState;

#[derive(Deserialize, Debug)]
pub struct SpeechRequest {
    text: Option<String>,
}

#[derive(Deserialize, Debug)]
pub struct SpeechPipelineRequest {
    text: Option<String>,
    #[serde(default)]
    task: Task,
    #[serde(rename = "targetLang")]
    target_lang: Option<String>,
    #[serde(rename = "ttsLang")]
    tts_lang: Option<String>,
}

/// Reads the posted text aloud, answering with raw MPEG bytes.
#[axum_macros::debug_handler]
pub async fn handle_speech(
    State(state): State<AppState>,
    payload: Result<Json<SpeechRequest>, JsonRejection>,
) -> BridgeResult<Response> {
    let Json(request) = payload.map_err(json_error)?;
    let text = require_trimmed(request.text.as_deref(), "Text is required")?;

    let audio = state.speech.synthesize(text).await.map_err(from_upstream)?;
    Ok(audio_response(audio))
}

/// Runs the language model over the text, then reads the output aloud.
#[axum_macros::debug_handler]
pub async fn handle_speech_gtts(
    State(state): State<AppState>,
    payload: Result<Json<SpeechPipelineRequest>, JsonRejection>,
) -> BridgeResult<Response> {
    let Json(request) = payload.map_err(json_error)?;
    let text = require_trimmed(request.text.as_deref(), "Text is required")?;
    if let Some(tts_lang) = &request.tts_lang {
        // The hosted voice is fixed, the hint only shows up in the trace.
        debug!(tts_lang = %tts_lang, "ignoring voice hint");
    }

    let prompt = build_prompt(
        request.task,
        text,
        request.target_lang.as_deref().unwrap_or(""),
    );
    let output = state.genai.generate(&prompt).await.map_err(from_upstream)?;
    let audio = state
        .speech
        .synthesize(&output)
        .await
        .map_err(from_upstream)?;
    Ok(audio_response(audio))
}

/// Audio artifacts are produced per request and never cached.
fn audio_response(audio: Vec<u8>) -> Response {
    (
        StatusCode::OK,
        [
            (header::CONTENT_TYPE, "audio/mpeg"),
            (header::CACHE_CONTROL, "no-store"),
        ],
        audio,
    )
        .into_response()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn audio_responses_carry_mpeg_and_no_store_headers() {
        let response = audio_response(vec![0xff, 0xf3]);
        assert_eq!(response.status(), StatusCode::OK);
        assert_eq!(
            response.headers().get(header::CONTENT_TYPE).unwrap(),
            "audio/mpeg"
        );
        assert_eq!(
            response.headers().get(header::CACHE_CONTROL).unwrap(),
            "no-store"
        );
    }
}
