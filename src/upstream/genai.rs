use serde::{Deserialize, Serialize};

use crate::upstream::{api_error, UpstreamError};

/// Client for the hosted generative language API. Built once at startup,
/// cheap to clone, holds no per-request state.
#[derive(Clone)]
pub struct GenAiClient {
    http: reqwest::Client,
    base_url: String,
    api_key: Option<String>,
    model_override: Option<String>,
}

impl GenAiClient {
    pub fn new(
        base_url: impl Into<String>,
        api_key: Option<String>,
        model_override: Option<String>,
    ) -> Self {
        GenAiClient {
            http: reqwest::Client::new(),
            base_url: base_url.into().trim_end_matches('/').to_string(),
            api_key,
            model_override,
        }
    }

    /// Sends one generation request and returns the trimmed completion text
    /// of the first candidate. Never retries.
    #[tracing::instrument(level = "info", skip(self, prompt), fields(prompt_chars = prompt.chars().count()))]
    pub async fn generate(&self, prompt: &str) -> Result<String, UpstreamError> {
        let Some(api_key) = self.api_key.as_deref() else {
            return Err(UpstreamError::MissingCredentials("GOOGLE_API_KEY"));
        };
        let model = self.pick_model(api_key).await?;

        let request = GenerateRequest {
            contents: [Content {
                role: "user",
                parts: [Part { text: prompt }],
            }],
        };
        let response = self
            .http
            .post(format!(
                "{}/models/{}:generateContent",
                self.base_url, model
            ))
            .header("x-goog-api-key", api_key)
            .json(&request)
            .send()
            .await?;

        let status = response.status();
        let body = response.bytes().await?;
        if !status.is_success() {
            return Err(api_error(status, &body));
        }

        let response: GenerateResponse = serde_json::from_slice(&body)?;
        let text = completion_text(&response);
        if text.is_empty() {
            return Err(UpstreamError::EmptyCompletion);
        }
        Ok(text)
    }

    /// Resolves the model to call: the configured override wins, otherwise
    /// the listing is queried and filtered on every request.
    #[tracing::instrument(level = "info", skip(self, api_key))]
    async fn pick_model(&self, api_key: &str) -> Result<String, UpstreamError> {
        if let Some(model) = &self.model_override {
            return Ok(model.clone());
        }

        let response = self
            .http
            .get(format!("{}/models", self.base_url))
            .header("x-goog-api-key", api_key)
            .send()
            .await?;

        let status = response.status();
        let body = response.bytes().await?;
        if !status.is_success() {
            return Err(api_error(status, &body));
        }

        let listing: ModelListing = serde_json::from_slice(&body)?;
        let model = preferred_model(&listing.models).ok_or(UpstreamError::NoModelAvailable)?;
        tracing::debug!(model, "picked generation model");
        Ok(model.to_string())
    }
}

/// Narrows the listing to models that can generate content, then prefers a
/// "pro" model over a "flash" one, falling back to the first match.
fn preferred_model(models: &[ModelEntry]) -> Option<&str> {
    let generating: Vec<&str> = models
        .iter()
        .filter(|model| {
            model
                .supported_generation_methods
                .iter()
                .any(|method| method == "generateContent")
        })
        .map(|model| model.name.strip_prefix("models/").unwrap_or(&model.name))
        .collect();

    for marker in ["pro", "flash"] {
        if let Some(name) = generating.iter().copied().find(|name| name.contains(marker)) {
            return Some(name);
        }
    }
    generating.first().copied()
}

/// Joins the text parts of the first candidate, skipping thought parts some
/// models interleave with the answer.
fn completion_text(response: &GenerateResponse) -> String {
    let Some(candidate) = response.candidates.first() else {
        return String::new();
    };
    let Some(content) = &candidate.content else {
        return String::new();
    };

    let mut text = String::new();
    for part in &content.parts {
        if part.thought {
            continue;
        }
        text.push_str(&part.text);
    }
    text.trim().to_string()
}

#[derive(Serialize, Debug)]
struct GenerateRequest<'a> {
    contents: [Content<'a>; 1],
}

#[derive(Serialize, Debug)]
struct Content<'a> {
    role: &'static str,
    parts: [Part<'a>; 1],
}

#[derive(Serialize, Debug)]
struct Part<'a> {
    text: &'a str,
}

#[derive(Deserialize, Debug)]
struct GenerateResponse {
    #[serde(default)]
    candidates: Vec<Candidate>,
}

#[derive(Deserialize, Debug)]
struct Candidate {
    content: Option<CandidateContent>,
}

#[derive(Deserialize, Debug)]
struct CandidateContent {
    #[serde(default)]
    parts: Vec<CandidatePart>,
}

#[derive(Deserialize, Debug)]
struct CandidatePart {
    #[serde(default)]
    text: String,
    #[serde(default)]
    thought: bool,
}

#[derive(Deserialize, Debug)]
struct ModelListing {
    #[serde(default)]
    models: Vec<ModelEntry>,
}

#[derive(Deserialize, Debug)]
#[serde(rename_all = "camelCase")]
struct ModelEntry {
    name: String,
    #[serde(default)]
    supported_generation_methods: Vec<String>,
}
