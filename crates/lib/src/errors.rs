use thiserror::Error;

/// Errors raised by the analyzer's providers and pipeline stages.
///
/// These never escape the pipeline itself: `SurveyAnalyzer` converts each
/// of them into the human-readable summary slot of its outcome. They exist
/// so the providers can report precisely what went wrong.
#[derive(Error, Debug)]
pub enum AnalyzerError {
    #[error("Failed to build Reqwest client: {0}")]
    ReqwestClientBuild(reqwest::Error),
    #[error("Failed to send request to the AI provider: {0}")]
    AiRequest(reqwest::Error),
    #[error("Failed to deserialize the AI provider response: {0}")]
    AiDeserialization(reqwest::Error),
    #[error("AI provider returned an error: {0}")]
    AiApi(String),
    #[error("API key is missing")]
    MissingApiKey,
    #[error("Database path is missing")]
    MissingDbPath,
    #[error("Storage connection error: {0}")]
    StorageConnection(String),
    #[error("Storage query execution failed: {0}")]
    StorageQueryFailed(String),
    #[error("Regex error: {0}")]
    Regex(#[from] regex::Error),
}
