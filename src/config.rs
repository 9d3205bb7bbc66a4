use anyhow::Result;
use clap_serde_derive::ClapSerde;
use serde::Deserialize;

#[derive(ClapSerde, Deserialize, Debug)]
pub struct Config {
    /// The address the listener binds to
    #[arg(short, long, env, default_value = "0.0.0.0")]
    pub address: String,

    /// The port the listener binds to
    #[arg(short, long, env, default_value = "8080")]
    pub port: u16,

    /// Directory holding the browser client files
    #[arg(short, long, env, default_value = "static")]
    pub static_dir: String,

    /// Base URL of the generative language API
    #[arg(long, env, default_value = "https://generativelanguage.googleapis.com/v1beta")]
    pub genai_base_url: String,

    /// Base URL of the speech synthesis and transcription API
    #[arg(long, env, default_value = "https://api.openai.com/v1")]
    pub speech_base_url: String,

    /// API key for the generative language API
    #[arg(long, env = "GOOGLE_API_KEY")]
    pub google_api_key: Option<String>,

    /// API key for the speech synthesis and transcription API
    #[arg(long, env = "OPENAI_API_KEY")]
    pub openai_api_key: Option<String>,

    /// Generation model id, set to skip the model listing call
    #[arg(long, env = "GENAI_MODEL")]
    pub genai_model: Option<String>,

    /// OTLP exporter endpoint for traces and metrics
    #[arg(long, env)]
    pub otlp_endpoint: Option<String>,

    /// Log to the console even when an OTLP endpoint is set
    #[arg(long, env)]
    pub console: bool,
}

impl Config {
    pub fn from_toml(path: &str) -> Result<Self> {
        let str = std::fs::read_to_string(path)?;
        let config = toml::from_str(&str)?;
        Ok(config)
    }
}
