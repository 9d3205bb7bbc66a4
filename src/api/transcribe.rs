use axum::body::Bytes;
use axum::extract::multipart::MultipartError;
use axum::extract::{FromRequest, Multipart, Request, State};
use axum::http::{header, StatusCode};
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde::{Deserialize, Serialize};

use crate::api::{bad_request, require_trimmed};
use crate::bail_bridge;
use crate::error::{from_upstream, BridgeResult, HttpErrorResponse, VoiceBridgeError};
use crate::prompt::{build_prompt, Task};
use crate::AppState;

#[derive(Deserialize, Debug)]
pub struct TaskRequest {
    text: Option<String>,
    #[serde(default)]
    task: Task,
    #[serde(rename = "targetLang")]
    target_lang: Option<String>,
}

#[derive(Serialize, Debug)]
pub struct TaskResponse {
    result: String,
}

#[derive(Serialize, Debug)]
pub struct TranscriptionResult {
    text: String,
    translation: String,
}

struct AudioUpload {
    data: Vec<u8>,
    file_name: String,
    content_type: String,
}

/// One route, two request shapes: a multipart upload is transcribed and then
/// translated, a JSON body runs the selected task over text directly.
#[axum_macros::debug_handler]
pub async fn handle_transcribe_and_translate(
    State(state): State<AppState>,
    request: Request,
) -> BridgeResult<Response> {
    // Media types compare case-insensitively.
    let is_multipart = request
        .headers()
        .get(header::CONTENT_TYPE)
        .and_then(|value| value.to_str().ok())
        .is_some_and(|value| {
            value
                .to_ascii_lowercase()
                .starts_with("multipart/form-data")
        });

    if is_multipart {
        let multipart = Multipart::from_request(request, &())
            .await
            .map_err(|rejection| bad_request(rejection.body_text()))?;
        transcribe_upload(state, multipart).await
    } else {
        let body = match Bytes::from_request(request, &()).await {
            Ok(body) => body,
            // Keeps the rejection's own status, an over-limit body is a 413.
            Err(rejection) => bail_bridge!(rejection.status(), rejection.body_text()),
        };
        let Json(task) = Json::<TaskRequest>::from_bytes(&body)
            .map_err(|rejection| bad_request(rejection.body_text()))?;
        run_task(state, task).await
    }
}

async fn run_task(state: AppState, request: TaskRequest) -> BridgeResult<Response> {
    let text = require_trimmed(request.text.as_deref(), "Text is required")?;

    let prompt = build_prompt(
        request.task,
        text,
        request.target_lang.as_deref().unwrap_or(""),
    );
    let result = state.genai.generate(&prompt).await.map_err(from_upstream)?;
    Ok((StatusCode::OK, Json(TaskResponse { result })).into_response())
}

async fn transcribe_upload(state: AppState, mut multipart: Multipart) -> BridgeResult<Response> {
    let mut upload: Option<AudioUpload> = None;
    let mut target_language: Option<String> = None;

    while let Some(field) = multipart.next_field().await.map_err(multipart_error)? {
        if let Some(name) = field.name() {
            match name {
                "audio" => {
                    let content_type = field.content_type().unwrap_or("audio/webm").to_owned();
                    if !supported_audio(&content_type) {
                        bail_bridge!(
                            StatusCode::BAD_REQUEST,
                            "Unsupported content-type {} for audio field",
                            content_type
                        );
                    }
                    let file_name = field.file_name().unwrap_or("audio.webm").to_owned();
                    let data = field.bytes().await.map_err(multipart_error)?;
                    upload = Some(AudioUpload {
                        data: data.to_vec(),
                        file_name,
                        content_type,
                    });
                }
                "targetLanguage" => {
                    target_language = Some(field.text().await.map_err(multipart_error)?);
                }
                _ => bail_bridge!(StatusCode::BAD_REQUEST, "Unknown field {}", name),
            }
        }
    }

    let Some(upload) = upload.filter(|upload| !upload.data.is_empty()) else {
        bail_bridge!(StatusCode::BAD_REQUEST, "Audio file is missing.");
    };
    let target =
        require_trimmed(target_language.as_deref(), "Target language is missing.")?.to_owned();

    let transcript = state
        .speech
        .transcribe(upload.data, upload.file_name, upload.content_type)
        .await
        .map_err(from_upstream)?;
    let translation = state
        .genai
        .generate(&build_prompt(Task::Translate, &transcript, &target))
        .await
        .map_err(from_upstream)?;

    Ok((
        StatusCode::OK,
        Json(TranscriptionResult {
            text: transcript,
            translation,
        }),
    )
        .into_response())
}

fn multipart_error(err: MultipartError) -> VoiceBridgeError {
    VoiceBridgeError {
        status: err.status(),
        message: HttpErrorResponse::from(err.body_text()),
    }
}

// Containers the browser recorder produces, per
// https://developer.mozilla.org/en-US/docs/Web/Media/Formats/Containers
static SUPPORTED_AUDIO_MIME_TYPES: [&str; 5] = [
    "audio/webm",
    "audio/wave",
    "audio/wav",
    "audio/x-wav",
    "audio/x-pn-wav",
];

fn supported_audio(content_type: &str) -> bool {
    let essence = content_type
        .split(';')
        .next()
        .unwrap_or(content_type)
        .trim();
    SUPPORTED_AUDIO_MIME_TYPES.contains(&essence)
}
