//! # Survey Analyzer
//!
//! This crate answers natural language questions about a spreadsheet-derived
//! survey database. A question is translated to SQL by a configurable AI
//! provider, the SQL is sanitized and executed against the local dataset, and
//! the result table is summarized in prose by a second model call.
//!
//! Each run of the pipeline is a single synchronous request/response flow
//! with no retries; any failing stage short-circuits and surfaces a
//! descriptive message in the summary slot of the outcome.

pub mod errors;
pub mod prompts;
pub mod providers;
pub mod sanitize;
pub mod types;

pub use errors::AnalyzerError;
pub use types::{AnalysisOutcome, ResultTable, SurveyAnalyzer, SurveyAnalyzerBuilder};

use providers::{
    ai::{gemini::GeminiProvider, AiProvider},
    db::{sqlite::SqliteProvider, storage::Storage},
};
use tracing::{debug, error, info};

impl SurveyAnalyzer {
    /// Runs the full pipeline for one question using the Gemini API.
    ///
    /// This is the primary entry point. The credential is request-scoped: a
    /// fresh model client and a fresh database connection are created for
    /// every call. The returned outcome never carries a typed error; every
    /// failure is converted to a message in the summary slot, and which of
    /// the `sql` and `table` slots are populated indicates how far the
    /// pipeline got.
    pub async fn analyze(&self, question: &str, api_key: &str) -> AnalysisOutcome {
        let storage = match SqliteProvider::new(&self.db_path).await {
            Ok(storage) => storage,
            Err(e) => {
                error!("[analyze] database connection error: {e:?}");
                return AnalysisOutcome::failure(format!("Error connecting to database: {e}"));
            }
        };

        let ai_provider = match GeminiProvider::new(self.ai_api_url.clone(), api_key.to_string()) {
            Ok(provider) => provider,
            Err(e) => {
                error!("[analyze] model client initialization error: {e:?}");
                return AnalysisOutcome::failure(format!(
                    "Error initializing the model client. Please check your API key. Details: {e}"
                ));
            }
        };

        self.run(question, &ai_provider, &storage).await
    }

    /// Runs the pipeline with a caller-supplied AI provider.
    ///
    /// This is the seam for substituting the model provider, e.g. with a
    /// scripted mock in tests. The database connection is still opened fresh
    /// from the configured path.
    pub async fn analyze_with_provider(
        &self,
        question: &str,
        ai_provider: &dyn AiProvider,
    ) -> AnalysisOutcome {
        let storage = match SqliteProvider::new(&self.db_path).await {
            Ok(storage) => storage,
            Err(e) => {
                error!("[analyze] database connection error: {e:?}");
                return AnalysisOutcome::failure(format!("Error connecting to database: {e}"));
            }
        };
        self.run(question, ai_provider, &storage).await
    }

    /// The stage sequence: schema -> query prompt -> model -> sanitize ->
    /// execute -> summary prompt -> model.
    async fn run(
        &self,
        question: &str,
        ai_provider: &dyn AiProvider,
        storage: &SqliteProvider,
    ) -> AnalysisOutcome {
        info!("[analyze] received question: {question:?}");

        // Schema introspection belongs to the connection stage: the dataset
        // layout is read at open time, as the prompt depends on it.
        let table_info = match storage.schema_overview().await {
            Ok(table_info) => table_info,
            Err(e) => {
                error!("[analyze] schema introspection error: {e:?}");
                return AnalysisOutcome::failure(format!("Error connecting to database: {e}"));
            }
        };

        let query_prompt = prompts::build_query_prompt(&table_info, question);
        debug!(user_prompt = %query_prompt, "--> Sending query-generation prompt");

        let raw_sql = match ai_provider
            .generate(prompts::QUERY_GENERATION_SYSTEM_PROMPT, &query_prompt)
            .await
        {
            Ok(raw_sql) => raw_sql,
            Err(e) => {
                error!("[analyze] SQL generation error: {e:?}");
                return AnalysisOutcome::failure(format!("Error during SQL generation: {e}"));
            }
        };
        debug!("<-- Raw query from model: {raw_sql}");

        let sql = match sanitize::clean_sql(&raw_sql) {
            Ok(sql) => sql,
            Err(e) => {
                error!("[analyze] sanitizer error: {e:?}");
                return AnalysisOutcome::failure(format!("Error during SQL generation: {e}"));
            }
        };
        info!("[analyze] sanitized query: {sql}");

        let table = match storage.execute_query(&sql).await {
            Ok(table) => table,
            Err(e) => {
                error!("[analyze] query execution error: {e:?}");
                // The attempted SQL is preserved for display despite the failure.
                return AnalysisOutcome {
                    summary: format!("SQL execution error: {e}\nAttempted query: {sql}"),
                    sql: Some(sql),
                    table: None,
                };
            }
        };

        let summary_prompt = prompts::build_summary_prompt(question, &table.render_text());
        debug!(user_prompt = %summary_prompt, "--> Sending summarization prompt");

        match ai_provider
            .generate(prompts::SUMMARY_SYSTEM_PROMPT, &summary_prompt)
            .await
        {
            Ok(summary) => AnalysisOutcome {
                summary,
                sql: Some(sql),
                table: Some(table),
            },
            Err(e) => {
                error!("[analyze] summarization error: {e:?}");
                // The table survived execution, so it is preserved too.
                AnalysisOutcome {
                    summary: format!("Error during summarization: {e}"),
                    sql: Some(sql),
                    table: Some(table),
                }
            }
        }
    }
}
