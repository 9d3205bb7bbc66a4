use serde::Deserialize;
use thiserror::Error;

pub mod genai;
pub mod speech;

pub use genai::GenAiClient;
pub use speech::SpeechClient;

/// Everything that can go wrong while talking to a hosted API. The HTTP
/// boundary decides which status each variant earns.
#[derive(Error, Debug)]
pub enum UpstreamError {
    #[error("{0} is not set")]
    MissingCredentials(&'static str),

    #[error("Text too long (max ~{0} chars)")]
    InputTooLong(usize),

    #[error("upstream request failed: {0}")]
    Network(#[from] reqwest::Error),

    #[error("upstream returned {status}: {message}")]
    Api {
        status: reqwest::StatusCode,
        message: String,
    },

    #[error("unexpected upstream response: {0}")]
    Parse(#[from] serde_json::Error),

    #[error("model returned an empty completion")]
    EmptyCompletion,

    #[error("Failed to transcribe audio.")]
    EmptyTranscript,

    #[error("no listed model supports content generation")]
    NoModelAvailable,
}

/// Folds a non-2xx upstream reply into an [`UpstreamError::Api`]. Both hosted
/// APIs nest a human-readable message under `error.message`.
pub(crate) fn api_error(status: reqwest::StatusCode, body: &[u8]) -> UpstreamError {
    #[derive(Deserialize)]
    struct ErrorBody {
        error: ErrorDetail,
    }

    #[derive(Deserialize)]
    struct ErrorDetail {
        message: String,
    }

    let message = serde_json::from_slice::<ErrorBody>(body)
        .map(|body| body.error.message)
        .unwrap_or_else(|_| String::from("request rejected without a readable message"));
    UpstreamError::Api { status, message }
}
