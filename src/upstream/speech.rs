use serde::{Deserialize, Serialize};

use crate::upstream::{api_error, UpstreamError};

/// Longest input the synthesis endpoint accepts, checked before any bytes
/// leave the process.
pub const SPEECH_INPUT_LIMIT: usize = 6000;

/// Client for the hosted speech API, covering synthesis and transcription.
#[derive(Clone)]
pub struct SpeechClient {
    http: reqwest::Client,
    base_url: String,
    api_key: Option<String>,
}

impl SpeechClient {
    pub fn new(base_url: impl Into<String>, api_key: Option<String>) -> Self {
        SpeechClient {
            http: reqwest::Client::new(),
            base_url: base_url.into().trim_end_matches('/').to_string(),
            api_key,
        }
    }

    /// Renders text with the fixed voice and returns the MPEG bytes.
    #[tracing::instrument(level = "info", skip(self, text), fields(chars = text.chars().count()))]
    pub async fn synthesize(&self, text: &str) -> Result<Vec<u8>, UpstreamError> {
        if text.chars().count() > SPEECH_INPUT_LIMIT {
            return Err(UpstreamError::InputTooLong(SPEECH_INPUT_LIMIT));
        }
        let Some(api_key) = self.api_key.as_deref() else {
            return Err(UpstreamError::MissingCredentials("OPENAI_API_KEY"));
        };

        let request = SynthesisRequest {
            model: "tts-1",
            voice: "alloy",
            input: text,
            response_format: "mp3",
        };
        let response = self
            .http
            .post(format!("{}/audio/speech", self.base_url))
            .bearer_auth(api_key)
            .json(&request)
            .send()
            .await?;

        let status = response.status();
        let body = response.bytes().await?;
        if !status.is_success() {
            return Err(api_error(status, &body));
        }
        Ok(body.to_vec())
    }

    /// Uploads captured audio and returns the trimmed transcript.
    #[tracing::instrument(level = "info", skip(self, audio), fields(bytes = audio.len()))]
    pub async fn transcribe(
        &self,
        audio: Vec<u8>,
        file_name: String,
        content_type: String,
    ) -> Result<String, UpstreamError> {
        let Some(api_key) = self.api_key.as_deref() else {
            return Err(UpstreamError::MissingCredentials("OPENAI_API_KEY"));
        };

        let file = reqwest::multipart::Part::bytes(audio)
            .file_name(file_name)
            .mime_str(&content_type)?;
        let form = reqwest::multipart::Form::new()
            .part("file", file)
            .text("model", "whisper-1");

        let response = self
            .http
            .post(format!("{}/audio/transcriptions", self.base_url))
            .bearer_auth(api_key)
            .multipart(form)
            .send()
            .await?;

        let status = response.status();
        let body = response.bytes().await?;
        if !status.is_success() {
            return Err(api_error(status, &body));
        }

        let transcription: TranscriptionResponse = serde_json::from_slice(&body)?;
        let text = transcription.text.trim().to_string();
        if text.is_empty() {
            return Err(UpstreamError::EmptyTranscript);
        }
        Ok(text)
    }
}

#[derive(Serialize, Debug)]
struct SynthesisRequest<'a> {
    model: &'static str,
    voice: &'static str,
    input: &'a str,
    response_format: &'static str,
}

#[derive(Deserialize, Debug)]
struct TranscriptionResponse {
    text: String,
}
