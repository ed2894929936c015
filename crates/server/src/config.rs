//! # Server Configuration
//!
//! Environment-driven configuration for the server. A `.env` file is loaded
//! by `main` before this module reads the variables, so local development
//! only needs a `.env` next to the binary.

use survey_analyzer::providers::ai::gemini::{gemini_api_url, DEFAULT_GEMINI_MODEL};

/// The resolved server configuration.
#[derive(Debug, Clone)]
pub struct Config {
    /// The port to listen on. From `PORT`.
    pub port: u16,
    /// The path to the survey dataset file. From `DB_URL`.
    pub db_url: String,
    /// The model endpoint URL. From `AI_API_URL`, or derived from `AI_MODEL`.
    pub ai_api_url: String,
    /// An optional server-side default API key. From `AI_API_KEY`. Requests
    /// may carry their own key, which takes precedence.
    pub ai_api_key: Option<String>,
}

/// Reads the configuration from the environment, applying defaults.
pub fn get_config() -> anyhow::Result<Config> {
    let port = match std::env::var("PORT") {
        Ok(value) => value
            .parse::<u16>()
            .map_err(|e| anyhow::anyhow!("PORT must be a number: {e}"))?,
        Err(_) => 9090,
    };

    let db_url = std::env::var("DB_URL").unwrap_or_else(|_| "survey_results.db".to_string());

    let ai_api_url = match std::env::var("AI_API_URL") {
        Ok(url) => url,
        Err(_) => {
            let model =
                std::env::var("AI_MODEL").unwrap_or_else(|_| DEFAULT_GEMINI_MODEL.to_string());
            gemini_api_url(&model)
        }
    };

    Ok(Config {
        port,
        db_url,
        ai_api_url,
        ai_api_key: std::env::var("AI_API_KEY").ok(),
    })
}
