#![allow(dead_code)]
//! # Common Test Utilities
//!
//! Shared helpers for the integration tests: a seeded temporary copy of the
//! survey dataset and a scripted mock AI provider, so pipeline tests are
//! isolated and repeatable.

use async_trait::async_trait;
use std::fmt::Debug;
use std::sync::{Arc, RwLock};
use survey_analyzer::providers::ai::AiProvider;
use survey_analyzer::providers::db::sqlite::SqliteProvider;
use survey_analyzer::{AnalyzerError, SurveyAnalyzer, SurveyAnalyzerBuilder};
use tempfile::TempDir;

/// Schema and sample rows mirroring the externally-owned dataset layout:
/// `Sheet1` is the question bank, `Sheet2` the wide-format responses.
pub const SURVEY_INIT_SQL: &str = "
CREATE TABLE Sheet1 (Question_no INTEGER, Question TEXT, Answer TEXT);
CREATE TABLE Sheet2 (
    PRET1 TEXT, PRET2 TEXT, PRET3 TEXT, PRET4 TEXT, PRET5 TEXT,
    PRET6 TEXT, PRET7 TEXT, PRET8 TEXT, PRET9 TEXT, PRET10 TEXT,
    PRET11 TEXT, PRET12 TEXT, PRET13 TEXT, PRET14 TEXT, PRET15 TEXT,
    POSTT1 TEXT, POSTT2 TEXT, POSTT3 TEXT, POSTT4 TEXT, POSTT5 TEXT,
    POSTT6 TEXT, POSTT7 TEXT, POSTT8 TEXT, POSTT9 TEXT, POSTT10 TEXT,
    POSTT11 TEXT, POSTT12 TEXT, POSTT13 TEXT, POSTT14 TEXT, POSTT15 TEXT,
    PRET_SCORE INTEGER, POSTT_SCORE INTEGER
);
INSERT INTO Sheet1 VALUES (1, 'Which organ pumps blood through the body?', 'A');
INSERT INTO Sheet1 VALUES (5, 'Which vitamin is produced from sunlight?', 'C');
INSERT INTO Sheet2 (PRET1, PRET5, POSTT1, POSTT5, PRET_SCORE, POSTT_SCORE)
    VALUES ('A', 'B', 'A', 'C', 9, 12);
INSERT INTO Sheet2 (PRET1, PRET5, POSTT1, POSTT5, PRET_SCORE, POSTT_SCORE)
    VALUES ('B', 'C', 'A', 'C', 7, 13);
INSERT INTO Sheet2 (PRET1, PRET5, POSTT1, POSTT5, PRET_SCORE, POSTT_SCORE)
    VALUES ('A', 'A', 'C', 'B', 11, 10);
";

/// Creates a temporary survey database file and an analyzer pointed at it.
///
/// The `TempDir` must be kept alive for the duration of the test.
pub async fn setup_analyzer() -> anyhow::Result<(TempDir, SurveyAnalyzer)> {
    let dir = TempDir::new()?;
    let db_path = dir
        .path()
        .join("survey_results.db")
        .to_string_lossy()
        .to_string();

    let provider = SqliteProvider::new(&db_path).await?;
    provider.initialize_with_data(SURVEY_INIT_SQL).await?;

    let analyzer = SurveyAnalyzerBuilder::new().db_path(db_path.as_str()).build()?;
    Ok((dir, analyzer))
}

// --- Mock AI Provider for pipeline logic testing ---

/// Returns scripted responses in order and records every call. Once the
/// script is exhausted, further calls fail, which tests use to simulate a
/// failing summarization stage.
#[derive(Clone, Debug)]
pub struct MockAiProvider {
    pub call_history: Arc<RwLock<Vec<(String, String)>>>,
    pub responses: Arc<RwLock<Vec<String>>>,
}

impl MockAiProvider {
    pub fn new(responses: Vec<&str>) -> Self {
        Self {
            call_history: Arc::new(RwLock::new(Vec::new())),
            responses: Arc::new(RwLock::new(
                responses.into_iter().map(String::from).rev().collect(),
            )),
        }
    }
}

#[async_trait]
impl AiProvider for MockAiProvider {
    async fn generate(
        &self,
        system_prompt: &str,
        user_prompt: &str,
    ) -> Result<String, AnalyzerError> {
        self.call_history
            .write()
            .unwrap()
            .push((system_prompt.to_string(), user_prompt.to_string()));

        match self.responses.write().unwrap().pop() {
            Some(response) => Ok(response),
            None => Err(AnalyzerError::AiApi("mock responses exhausted".to_string())),
        }
    }
}
