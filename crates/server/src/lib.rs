//! # Survey Analyzer Server
//!
//! A thin HTTP surface over the `survey-analyzer` pipeline. The server is a
//! pure caller: it collects a question (and optionally a request-scoped API
//! key), runs one analysis, and returns the 3-slot outcome. Pipeline
//! failures are reported inside the outcome body, not as HTTP errors.

pub mod config;

use self::config::Config;
use axum::{
    extract::State,
    routing::{get, post},
    Json, Router,
};
use serde::Deserialize;
use std::sync::Arc;
use survey_analyzer::{AnalysisOutcome, SurveyAnalyzer, SurveyAnalyzerBuilder};
use tower_http::trace::TraceLayer;
use tracing::info;

/// Sample questions offered to first-time users, as in the original sidebar.
pub const SAMPLE_QUESTIONS: &[&str] = &[
    "Show the average pre-test and post-test scores.",
    "Which 5 participants showed the most improvement from pre-test to post-test?",
    "What is the average score for question 5 in the post-test?",
    "How many participants scored higher on the post-test than the pre-test?",
    "Which questions were answered correctly by most participants in the pre-test?",
];

/// The shared application state.
///
/// Holds only the configured analyzer and the optional server-side default
/// key; all per-request resources are created inside the pipeline.
#[derive(Clone)]
pub struct AppState {
    pub analyzer: Arc<SurveyAnalyzer>,
    pub api_key: Option<String>,
}

/// Builds the shared application state from the configuration.
pub fn build_app_state(config: Config) -> anyhow::Result<AppState> {
    let analyzer = SurveyAnalyzerBuilder::new()
        .db_path(config.db_url)
        .ai_api_url(config.ai_api_url)
        .build()?;

    Ok(AppState {
        analyzer: Arc::new(analyzer),
        api_key: config.ai_api_key,
    })
}

/// Creates the Axum router with all the application routes.
pub fn create_router(app_state: AppState) -> Router {
    Router::new()
        .route("/", get(root))
        .route("/health", get(health_check))
        .route("/questions", get(questions_handler))
        .route("/analyze", post(analyze_handler))
        .with_state(app_state)
        .layer(TraceLayer::new_for_http())
}

/// The request body for the `/analyze` endpoint.
#[derive(Deserialize)]
struct AnalyzeRequest {
    question: String,
    /// Overrides the server-side default API key for this request.
    #[serde(default)]
    api_key: Option<String>,
}

/// The root handler.
async fn root() -> &'static str {
    "survey analyzer server is running."
}

/// The health check handler.
async fn health_check() -> &'static str {
    "OK"
}

/// Returns the sample questions for the form's sidebar.
async fn questions_handler() -> Json<Vec<&'static str>> {
    Json(SAMPLE_QUESTIONS.to_vec())
}

/// The handler for the `/analyze` endpoint.
///
/// Always responds 200 with an `AnalysisOutcome`: stage failures (including
/// a missing API key) surface as the summary slot of the body, and the
/// caller tells partial success apart by which of `sql`/`table` are present.
async fn analyze_handler(
    State(app_state): State<AppState>,
    Json(payload): Json<AnalyzeRequest>,
) -> Json<AnalysisOutcome> {
    info!("Received question: {:?}", payload.question);

    let api_key = payload
        .api_key
        .or_else(|| app_state.api_key.clone())
        .unwrap_or_default();

    let outcome = app_state.analyzer.analyze(&payload.question, &api_key).await;
    Json(outcome)
}

/// The main entry point for running the server.
pub async fn run(listener: tokio::net::TcpListener, config: Config) -> anyhow::Result<()> {
    let app_state = build_app_state(config)?;
    let app = create_router(app_state);

    info!("listening on {}", listener.local_addr()?);
    axum::serve(listener, app).await?;

    Ok(())
}
