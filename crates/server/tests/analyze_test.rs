//! # Server End-to-End Tests
//!
//! Boots the real router against a seeded temporary dataset and a wiremock
//! stand-in for the Gemini endpoint, then exercises `/analyze` over HTTP.

use serde_json::{json, Value};
use survey_analyzer_server::{build_app_state, config::Config, create_router, SAMPLE_QUESTIONS};
use survey_analyzer_test_utils::TestSetup;
use wiremock::matchers::{body_string_contains, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

/// Wraps a model reply in the Gemini `generateContent` response schema.
fn gemini_body(text: &str) -> Value {
    json!({
        "candidates": [{
            "content": { "parts": [{ "text": text }] }
        }]
    })
}

/// Spawns the server on an ephemeral port and returns its base URL.
async fn spawn_server(config: Config) -> String {
    let app_state = build_app_state(config).expect("failed to build app state");
    let app = create_router(app_state);
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0")
        .await
        .expect("failed to bind listener");
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        axum::serve(listener, app).await.unwrap();
    });
    format!("http://{addr}")
}

#[tokio::test]
async fn test_analyze_endpoint_end_to_end() {
    let setup = TestSetup::new().await.unwrap();
    let mock_server = MockServer::start().await;
    let model_path = "/v1beta/models/gemini-2.0-flash:generateContent";

    // The query-generation prompt ends with the `SQLQuery:` cue; the
    // summarization prompt carries `The doctor asked:` instead.
    Mock::given(method("POST"))
        .and(path(model_path))
        .and(body_string_contains("SQLQuery:"))
        .respond_with(ResponseTemplate::new(200).set_body_json(gemini_body(
            "```sql\nSELECT AVG(PRET_SCORE) AS avg_pre, AVG(POSTT_SCORE) AS avg_post FROM Sheet2;\n```",
        )))
        .mount(&mock_server)
        .await;

    Mock::given(method("POST"))
        .and(path(model_path))
        .and(body_string_contains("The doctor asked:"))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_json(gemini_body("Post-test scores improved overall.")),
        )
        .mount(&mock_server)
        .await;

    let config = Config {
        port: 0,
        db_url: setup.db_path.clone(),
        ai_api_url: format!("{}{model_path}", mock_server.uri()),
        ai_api_key: Some("test-key".to_string()),
    };
    let base_url = spawn_server(config).await;

    let client = reqwest::Client::new();
    let response = client
        .post(format!("{base_url}/analyze"))
        .json(&json!({ "question": "Show the average pre-test and post-test scores." }))
        .send()
        .await
        .unwrap();

    assert_eq!(response.status(), 200);
    let body: Value = response.json().await.unwrap();

    assert_eq!(body["summary"], "Post-test scores improved overall.");
    assert_eq!(
        body["sql"],
        "SELECT AVG(PRET_SCORE) AS avg_pre, AVG(POSTT_SCORE) AS avg_post FROM Sheet2;"
    );
    assert_eq!(body["table"]["columns"], json!(["avg_pre", "avg_post"]));
    assert_eq!(body["table"]["rows"].as_array().unwrap().len(), 1);
}

/// A request without a key on a server without a default key still responds
/// 200; the failure lives in the summary slot.
#[tokio::test]
async fn test_analyze_endpoint_missing_api_key() {
    let setup = TestSetup::new().await.unwrap();

    let config = Config {
        port: 0,
        db_url: setup.db_path.clone(),
        ai_api_url: "http://127.0.0.1:1/unused".to_string(),
        ai_api_key: None,
    };
    let base_url = spawn_server(config).await;

    let client = reqwest::Client::new();
    let response = client
        .post(format!("{base_url}/analyze"))
        .json(&json!({ "question": "anything" }))
        .send()
        .await
        .unwrap();

    assert_eq!(response.status(), 200);
    let body: Value = response.json().await.unwrap();

    assert!(body["summary"]
        .as_str()
        .unwrap()
        .contains("Error initializing the model client"));
    assert!(body["sql"].is_null());
    assert!(body["table"].is_null());
}

#[tokio::test]
async fn test_health_and_questions_endpoints() {
    let setup = TestSetup::new().await.unwrap();

    let config = Config {
        port: 0,
        db_url: setup.db_path.clone(),
        ai_api_url: "http://127.0.0.1:1/unused".to_string(),
        ai_api_key: None,
    };
    let base_url = spawn_server(config).await;

    let client = reqwest::Client::new();

    let health = client.get(format!("{base_url}/health")).send().await.unwrap();
    assert_eq!(health.status(), 200);
    assert_eq!(health.text().await.unwrap(), "OK");

    let questions: Vec<String> = client
        .get(format!("{base_url}/questions"))
        .send()
        .await
        .unwrap()
        .json()
        .await
        .unwrap();
    assert_eq!(questions.len(), SAMPLE_QUESTIONS.len());
    assert_eq!(questions[0], SAMPLE_QUESTIONS[0]);
}
