use axum::extract::rejection::JsonRejection;
use axum::extract::State;
use axum::http::StatusCode;
use axum::Json;
use serde::{Deserialize, Serialize};

use crate::api::{json_error, require_trimmed};
use crate::error::{from_upstream, BridgeResult};
use crate::prompt::{build_prompt, Task};
use crate::AppState;

#[derive(Deserialize, Debug)]
pub struct TranslateRequest {
    text: Option<String>,
    #[serde(rename = "targetLanguage")]
    target_language: Option<String>,
}

#[derive(Serialize, Debug)]
pub struct TranslateResponse {
    translation: String,
}

/// Translates the posted text into the requested language.
#[axum_macros::debug_handler]
pub async fn handle_translate(
    State(state): State<AppState>,
    payload: Result<Json<TranslateRequest>, JsonRejection>,
) -> BridgeResult<(StatusCode, Json<TranslateResponse>)> {
    let Json(request) = payload.map_err(json_error)?;
    let text = require_trimmed(request.text.as_deref(), "Text is required")?;
    let target = require_trimmed(
        request.target_language.as_deref(),
        "Target language is missing.",
    )?;

    let prompt = build_prompt(Task::Translate, text, target);
    let translation = state.genai.generate(&prompt).await.map_err(from_upstream)?;
    Ok((StatusCode::OK, Json(TranslateResponse { translation })))
}
