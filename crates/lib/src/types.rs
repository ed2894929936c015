use crate::errors::AnalyzerError;
use crate::providers::ai::gemini::{gemini_api_url, DEFAULT_GEMINI_MODEL};
use serde::{Deserialize, Serialize};
use serde_json::Value;

/// The rectangular row/column data produced by executing a query.
///
/// Rows hold JSON values in column order. The table lives for a single
/// request and is never persisted.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ResultTable {
    pub columns: Vec<String>,
    pub rows: Vec<Vec<Value>>,
}

impl ResultTable {
    /// Renders the table as column-aligned plain text for the summarization
    /// prompt: a header row followed by one line per data row.
    pub fn render_text(&self) -> String {
        if self.columns.is_empty() {
            return String::new();
        }

        let rendered_rows: Vec<Vec<String>> = self
            .rows
            .iter()
            .map(|row| row.iter().map(render_cell).collect())
            .collect();

        let mut widths: Vec<usize> = self.columns.iter().map(|c| c.len()).collect();
        for row in &rendered_rows {
            for (i, cell) in row.iter().enumerate() {
                if i < widths.len() && cell.len() > widths[i] {
                    widths[i] = cell.len();
                }
            }
        }

        let format_line = |cells: &[String]| {
            cells
                .iter()
                .enumerate()
                .map(|(i, cell)| format!("{cell:<width$}", width = widths[i]))
                .collect::<Vec<_>>()
                .join("  ")
                .trim_end()
                .to_string()
        };

        let mut lines = vec![format_line(&self.columns)];
        for row in &rendered_rows {
            lines.push(format_line(row));
        }
        lines.join("\n")
    }
}

fn render_cell(value: &Value) -> String {
    match value {
        Value::Null => String::new(),
        Value::String(s) => s.clone(),
        other => other.to_string(),
    }
}

/// The 3-slot result of one pipeline run.
///
/// On failure the summary slot carries a human-readable message and the
/// later slots are `None`; which of `sql` and `table` are populated tells
/// the caller how far the pipeline got.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AnalysisOutcome {
    pub summary: String,
    pub sql: Option<String>,
    pub table: Option<ResultTable>,
}

impl AnalysisOutcome {
    /// An outcome for a stage that failed before any SQL was produced.
    pub fn failure(message: impl Into<String>) -> Self {
        Self {
            summary: message.into(),
            sql: None,
            table: None,
        }
    }
}

/// The pipeline orchestrator.
///
/// Holds only request-independent configuration (the dataset path and the
/// model endpoint); the database connection and the model client are both
/// created fresh for every `analyze` call.
#[derive(Debug, Clone)]
pub struct SurveyAnalyzer {
    pub(crate) db_path: String,
    pub(crate) ai_api_url: String,
}

/// A builder for creating `SurveyAnalyzer` instances.
#[derive(Debug, Default)]
pub struct SurveyAnalyzerBuilder {
    db_path: String,
    ai_api_url: Option<String>,
}

impl SurveyAnalyzerBuilder {
    /// Creates a new `SurveyAnalyzerBuilder`.
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the path to the survey dataset file (required).
    pub fn db_path(mut self, db_path: impl Into<String>) -> Self {
        self.db_path = db_path.into();
        self
    }

    /// Overrides the model endpoint URL. Defaults to the Gemini
    /// `generateContent` endpoint for the default model.
    pub fn ai_api_url(mut self, ai_api_url: impl Into<String>) -> Self {
        self.ai_api_url = Some(ai_api_url.into());
        self
    }

    /// Builds the `SurveyAnalyzer`.
    pub fn build(self) -> Result<SurveyAnalyzer, AnalyzerError> {
        if self.db_path.trim().is_empty() {
            return Err(AnalyzerError::MissingDbPath);
        }
        Ok(SurveyAnalyzer {
            db_path: self.db_path,
            ai_api_url: self
                .ai_api_url
                .unwrap_or_else(|| gemini_api_url(DEFAULT_GEMINI_MODEL)),
        })
    }
}
