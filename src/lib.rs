//! Thin HTTP adapters over hosted language and speech APIs, plus the browser
//! client they serve: speak or type text, translate it, hear it read aloud.

use crate::config::Config;
use crate::upstream::genai::GenAiClient;
use crate::upstream::speech::SpeechClient;

pub mod api;
pub mod config;
pub mod error;
pub mod prompt;
pub mod telemetry;
pub mod upstream;

/// Adapter clients shared across requests, immutable once built.
#[derive(Clone)]
pub struct AppState {
    pub genai: GenAiClient,
    pub speech: SpeechClient,
}

impl AppState {
    pub fn from_config(config: &Config) -> Self {
        AppState {
            genai: GenAiClient::new(
                config.genai_base_url.as_str(),
                config.google_api_key.clone(),
                config.genai_model.clone(),
            ),
            speech: SpeechClient::new(
                config.speech_base_url.as_str(),
                config.openai_api_key.clone(),
            ),
        }
    }
}
