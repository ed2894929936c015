pub mod gemini;

use crate::errors::AnalyzerError;
use async_trait::async_trait;
use dyn_clone::DynClone;
use std::fmt::Debug;

/// A trait for interacting with an AI provider.
///
/// This is the pluggable text-in/text-out seam of the pipeline: one
/// implementation talks to the hosted Gemini API, and tests substitute a
/// scripted mock. Both the query-generation and the summarization calls go
/// through the same `generate` operation.
#[async_trait]
pub trait AiProvider: Send + Sync + Debug + DynClone {
    /// Generates a response for the given system and user prompt.
    async fn generate(&self, system_prompt: &str, user_prompt: &str)
        -> Result<String, AnalyzerError>;
}

dyn_clone::clone_trait_object!(AiProvider);
