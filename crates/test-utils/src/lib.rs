//! # Test Utilities
//!
//! Shared fixtures for integration tests across the workspace: a temporary,
//! seeded copy of the survey dataset and a scripted mock AI provider.

use anyhow::Result;
use async_trait::async_trait;
use std::fmt::Debug;
use std::sync::{Arc, Mutex};
use survey_analyzer::errors::AnalyzerError;
use survey_analyzer::providers::ai::AiProvider;
use survey_analyzer::providers::db::sqlite::SqliteProvider;
use tempfile::TempDir;

/// Schema and sample rows mirroring the externally-owned dataset layout.
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

/// A helper struct to manage survey database creation for each test.
///
/// Holds the temporary directory so the dataset file outlives the setup.
pub struct TestSetup {
    pub dir: TempDir,
    pub db_path: String,
}

impl TestSetup {
    /// Creates an isolated dataset file seeded with the survey tables.
    pub async fn new() -> Result<Self> {
        let dir = TempDir::new()?;
        let db_path = dir
            .path()
            .join("survey_results.db")
            .to_string_lossy()
            .to_string();

        let provider = SqliteProvider::new(&db_path).await?;
        provider.initialize_with_data(SURVEY_INIT_SQL).await?;

        Ok(Self { dir, db_path })
    }
}

// --- Mock AI Provider ---

/// Returns scripted responses in order and records every call.
///
/// Once the script is exhausted, further calls fail; tests use this to
/// simulate a failing model stage.
#[derive(Clone, Debug)]
pub struct MockAiProvider {
    responses: Arc<Mutex<Vec<String>>>,
    calls: Arc<Mutex<Vec<(String, String)>>>,
}

impl MockAiProvider {
    pub fn new(responses: Vec<&str>) -> Self {
        Self {
            responses: Arc::new(Mutex::new(
                responses.into_iter().map(String::from).rev().collect(),
            )),
            calls: Arc::new(Mutex::new(Vec::new())),
        }
    }

    /// Retrieves the recorded calls for assertion.
    pub fn get_calls(&self) -> Vec<(String, String)> {
        self.calls.lock().unwrap().clone()
    }
}

#[async_trait]
impl AiProvider for MockAiProvider {
    async fn generate(
        &self,
        system_prompt: &str,
        user_prompt: &str,
    ) -> Result<String, AnalyzerError> {
        self.calls
            .lock()
            .unwrap()
            .push((system_prompt.to_string(), user_prompt.to_string()));

        match self.responses.lock().unwrap().pop() {
            Some(response) => Ok(response),
            None => Err(AnalyzerError::AiApi("mock responses exhausted".to_string())),
        }
    }
}
