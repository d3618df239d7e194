//! Server API tests

use super::*;
use axum::{
    body::Body,
    http::{Request, StatusCode},
};
use chrono::NaiveDate;
use http_body_util::BodyExt;
use kakeibo_core::test_utils::MockOpenAIServer;
use kakeibo_core::{AIClient, Category, NewTransaction, OpenAICompatibleBackend, PromptLibrary};
use tower::ServiceExt;

fn seeded_db() -> Database {
    let db = Database::in_memory().unwrap();
    db.insert_transactions(&[
        NewTransaction {
            date: NaiveDate::from_ymd_opt(2024, 3, 1).unwrap(),
            amount: 280000.0,
            category: Category::Salary,
            description: Category::Salary.description().to_string(),
        },
        NewTransaction {
            date: NaiveDate::from_ymd_opt(2024, 3, 2).unwrap(),
            amount: -3000.0,
            category: Category::Food,
            description: Category::Food.description().to_string(),
        },
    ])
    .unwrap();
    db
}

fn setup_app_with(db: Database, ai: AIClient) -> Router {
    let advisor = Advisor::with_prompts(ai, PromptLibrary::embedded_only());
    create_router(db, advisor, ServerConfig::default())
}

fn setup_test_app() -> Router {
    setup_app_with(seeded_db(), AIClient::mock())
}

fn setup_failing_app() -> Router {
    setup_app_with(seeded_db(), AIClient::failing_mock())
}

async fn get_body_json(response: axum::response::Response) -> serde_json::Value {
    let body = response.into_body();
    let bytes = body.collect().await.unwrap().to_bytes();
    serde_json::from_slice(&bytes).unwrap()
}

async fn get_body_text(response: axum::response::Response) -> String {
    let bytes = response.into_body().collect().await.unwrap().to_bytes();
    String::from_utf8(bytes.to_vec()).unwrap()
}

fn location(response: &axum::response::Response) -> String {
    response
        .headers()
        .get("location")
        .unwrap()
        .to_str()
        .unwrap()
        .to_string()
}

async fn get(app: &Router, uri: &str) -> axum::response::Response {
    app.clone()
        .oneshot(Request::builder().uri(uri).body(Body::empty()).unwrap())
        .await
        .unwrap()
}

async fn post_json(app: &Router, uri: &str, body: serde_json::Value) -> axum::response::Response {
    app.clone()
        .oneshot(
            Request::builder()
                .method("POST")
                .uri(uri)
                .header("content-type", "application/json")
                .body(Body::from(serde_json::to_string(&body).unwrap()))
                .unwrap(),
        )
        .await
        .unwrap()
}

async fn post_form(app: &Router, uri: &str, body: &str) -> axum::response::Response {
    app.clone()
        .oneshot(
            Request::builder()
                .method("POST")
                .uri(uri)
                .header("content-type", "application/x-www-form-urlencoded")
                .body(Body::from(body.to_string()))
                .unwrap(),
        )
        .await
        .unwrap()
}

async fn create_api_session(app: &Router) -> String {
    let response = post_json(app, "/api/sessions", serde_json::json!({})).await;
    assert_eq!(response.status(), StatusCode::OK);
    let json = get_body_json(response).await;
    assert_eq!(json["entries"].as_array().unwrap().len(), 0);
    json["session_id"].as_str().unwrap().to_string()
}

/// Start a page session via `GET /` and return its page URL
async fn start_page_session(app: &Router) -> String {
    let response = get(app, "/").await;
    assert_eq!(response.status(), StatusCode::SEE_OTHER);
    location(&response)
}

// ========== Ledger API Tests ==========

#[tokio::test]
async fn test_list_transactions() {
    let app = setup_test_app();

    let response = get(&app, "/api/transactions").await;
    assert_eq!(response.status(), StatusCode::OK);

    let json = get_body_json(response).await;
    assert_eq!(json["total"], 2);
    assert_eq!(json["transactions"][0]["category"], "salary");
    assert_eq!(json["transactions"][1]["date"], "2024-03-02");
    assert_eq!(json["transactions"][1]["amount"], -3000.0);
}

#[tokio::test]
async fn test_get_summary() {
    let app = setup_test_app();

    let response = get(&app, "/api/summary").await;
    assert_eq!(response.status(), StatusCode::OK);

    let json = get_body_json(response).await;
    assert_eq!(json["total_income"], 280000.0);
    assert_eq!(json["total_expense"], 3000.0);
    assert_eq!(json["balance"], 277000.0);
    assert_eq!(json["breakdown"].as_array().unwrap().len(), 1);
    assert_eq!(json["breakdown"][0]["category"], "food");
}

#[tokio::test]
async fn test_get_prompt_with_question() {
    let app = setup_test_app();

    let response = get(&app, "/api/prompt?question=Can%20I%20travel%3F").await;
    assert_eq!(response.status(), StatusCode::OK);

    let json = get_body_json(response).await;
    assert_eq!(json["system"], "You are a professional financial planner.");
    let user = json["user"].as_str().unwrap();
    assert!(user.contains("■ Balance: 277000 yen"));
    assert!(user.ends_with("Question from the user: Can I travel?"));
}

#[tokio::test]
async fn test_ledger_failure_is_sanitized() {
    let db = seeded_db();
    db.conn()
        .unwrap()
        .execute_batch("DROP TABLE transactions;")
        .unwrap();
    let app = setup_app_with(db, AIClient::mock());

    let response = get(&app, "/api/summary").await;
    assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
    let json = get_body_json(response).await;
    assert_eq!(json["error"], "An internal error occurred");
}

// ========== Session API Tests ==========

#[tokio::test]
async fn test_api_advice_adds_one_entry() {
    let app = setup_test_app();
    let id = create_api_session(&app).await;

    let response = post_json(&app, &format!("/api/sessions/{}/advice", id), serde_json::json!({})).await;
    assert_eq!(response.status(), StatusCode::OK);

    let json = get_body_json(response).await;
    let entries = json["entries"].as_array().unwrap();
    assert_eq!(entries.len(), 1);
    assert_eq!(entries[0]["role"], "assistant");

    let response = get(&app, &format!("/api/sessions/{}", id)).await;
    let json = get_body_json(response).await;
    assert_eq!(json["entries"].as_array().unwrap().len(), 1);
}

#[tokio::test]
async fn test_api_question_adds_two_entries() {
    let app = setup_test_app();
    let id = create_api_session(&app).await;

    let response = post_json(
        &app,
        &format!("/api/sessions/{}/questions", id),
        serde_json::json!({"question": "Should I cut food?"}),
    )
    .await;
    assert_eq!(response.status(), StatusCode::OK);

    let json = get_body_json(response).await;
    let entries = json["entries"].as_array().unwrap();
    assert_eq!(entries.len(), 2);
    assert_eq!(entries[0]["role"], "user");
    assert_eq!(entries[0]["content"], "Should I cut food?");
    assert_eq!(entries[1]["role"], "assistant");
}

#[tokio::test]
async fn test_api_failed_advice_returns_502_and_unchanged_log() {
    let app = setup_failing_app();
    let id = create_api_session(&app).await;

    let response = post_json(&app, &format!("/api/sessions/{}/advice", id), serde_json::json!({})).await;
    assert_eq!(response.status(), StatusCode::BAD_GATEWAY);

    let json = get_body_json(response).await;
    assert!(json["error"].as_str().unwrap().contains("Advice request failed"));
    assert_eq!(json["entries"].as_array().unwrap().len(), 0);
}

#[tokio::test]
async fn test_api_failed_question_keeps_user_entry() {
    let app = setup_failing_app();
    let id = create_api_session(&app).await;

    let response = post_json(
        &app,
        &format!("/api/sessions/{}/questions", id),
        serde_json::json!({"question": "Why so much on transport?"}),
    )
    .await;
    assert_eq!(response.status(), StatusCode::BAD_GATEWAY);

    let json = get_body_json(response).await;
    let entries = json["entries"].as_array().unwrap();
    assert_eq!(entries.len(), 1);
    assert_eq!(entries[0]["role"], "user");
}

#[tokio::test]
async fn test_api_blank_question_rejected() {
    let app = setup_test_app();
    let id = create_api_session(&app).await;

    let response = post_json(
        &app,
        &format!("/api/sessions/{}/questions", id),
        serde_json::json!({"question": "   "}),
    )
    .await;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);

    let response = get(&app, &format!("/api/sessions/{}", id)).await;
    let json = get_body_json(response).await;
    assert_eq!(json["entries"].as_array().unwrap().len(), 0);
}

#[tokio::test]
async fn test_api_unknown_session() {
    let app = setup_test_app();

    let response = get(&app, "/api/sessions/ses_missing").await;
    assert_eq!(response.status(), StatusCode::NOT_FOUND);

    let response = post_json(&app, "/api/sessions/ses_missing/advice", serde_json::json!({})).await;
    assert_eq!(response.status(), StatusCode::NOT_FOUND);

    // Unknown session wins over a blank question
    let response = post_json(
        &app,
        "/api/sessions/ses_missing/questions",
        serde_json::json!({"question": "  "}),
    )
    .await;
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_api_against_openai_compatible_server() {
    let server = MockOpenAIServer::start_with_reply("Reduce food spending by 10%.").await;
    let ai = AIClient::OpenAICompatible(OpenAICompatibleBackend::with_api_key(
        &server.url(),
        "gpt-3.5-turbo",
        "sk-test",
    ));
    let app = setup_app_with(seeded_db(), ai);
    let id = create_api_session(&app).await;

    let response = post_json(&app, &format!("/api/sessions/{}/advice", id), serde_json::json!({})).await;
    assert_eq!(response.status(), StatusCode::OK);
    let json = get_body_json(response).await;
    assert_eq!(json["entries"][0]["content"], "Reduce food spending by 10%.");

    let recorded = server.requests();
    assert_eq!(recorded.len(), 1);
    assert_eq!(recorded[0].authorization.as_deref(), Some("Bearer sk-test"));
    let temp = recorded[0].body["temperature"].as_f64().unwrap();
    assert!((temp - 0.7).abs() < 0.001);
}

#[tokio::test]
async fn test_api_upstream_rejection_is_502() {
    let server = MockOpenAIServer::start_failing().await;
    let ai = AIClient::OpenAICompatible(OpenAICompatibleBackend::new(&server.url(), "gpt-3.5-turbo"));
    let app = setup_app_with(seeded_db(), ai);
    let id = create_api_session(&app).await;

    let response = post_json(&app, &format!("/api/sessions/{}/advice", id), serde_json::json!({})).await;
    assert_eq!(response.status(), StatusCode::BAD_GATEWAY);
    let json = get_body_json(response).await;
    assert!(json["error"].as_str().unwrap().contains("401"));
}

// ========== Page Tests ==========

#[tokio::test]
async fn test_root_redirects_to_new_session() {
    let app = setup_test_app();

    let first = start_page_session(&app).await;
    let second = start_page_session(&app).await;
    assert!(first.starts_with("/sessions/ses_"));
    assert_ne!(first, second);
}

#[tokio::test]
async fn test_unknown_page_session_redirects_home() {
    let app = setup_test_app();

    let response = get(&app, "/sessions/ses_missing").await;
    assert_eq!(response.status(), StatusCode::SEE_OTHER);
    assert_eq!(location(&response), "/");

    let response = post_form(&app, "/sessions/ses_missing/advice", "").await;
    assert_eq!(response.status(), StatusCode::SEE_OTHER);
    assert_eq!(location(&response), "/");
}

#[tokio::test]
async fn test_page_renders_ledger() {
    let app = setup_test_app();
    let page_url = start_page_session(&app).await;

    let response = get(&app, &page_url).await;
    assert_eq!(response.status(), StatusCode::OK);

    let html = get_body_text(response).await;
    assert!(html.contains("Convenience store purchase"));
    assert!(html.contains("Balance: <strong>277000 yen</strong>"));
    assert!(html.contains("Get advice"));
}

#[tokio::test]
async fn test_page_advice_then_question() {
    let app = setup_test_app();
    let page_url = start_page_session(&app).await;

    let response = post_form(&app, &format!("{}/advice", page_url), "").await;
    assert_eq!(response.status(), StatusCode::SEE_OTHER);
    assert_eq!(location(&response), page_url);

    let response = post_form(
        &app,
        &format!("{}/questions", page_url),
        "question=Can+I+afford+%3Cskiing%3E%3F",
    )
    .await;
    assert_eq!(response.status(), StatusCode::SEE_OTHER);

    let html = get_body_text(get(&app, &page_url).await).await;
    assert_eq!(html.matches(r#"<div class="entry assistant">"#).count(), 2);
    assert_eq!(html.matches(r#"<div class="entry user">"#).count(), 1);
    assert!(html.contains("Can I afford &lt;skiing&gt;?"));
    assert!(!html.contains("<skiing>"));
}

#[tokio::test]
async fn test_page_failure_shows_banner_once() {
    let app = setup_failing_app();
    let page_url = start_page_session(&app).await;

    let response = post_form(&app, &format!("{}/questions", page_url), "question=Any+tips%3F").await;
    assert_eq!(response.status(), StatusCode::SEE_OTHER);

    let html = get_body_text(get(&app, &page_url).await).await;
    assert!(html.contains(r#"<div class="error" role="alert">"#));
    assert!(html.contains("Advice request failed"));
    // The question stays in the log without a reply
    assert_eq!(html.matches(r#"<div class="entry user">"#).count(), 1);
    assert_eq!(html.matches(r#"<div class="entry assistant">"#).count(), 0);

    let html = get_body_text(get(&app, &page_url).await).await;
    assert!(!html.contains(r#"<div class="error" role="alert">"#));
}

#[tokio::test]
async fn test_page_blank_question_ignored() {
    let app = setup_test_app();
    let page_url = start_page_session(&app).await;

    let response = post_form(&app, &format!("{}/questions", page_url), "question=+++").await;
    assert_eq!(response.status(), StatusCode::SEE_OTHER);

    let html = get_body_text(get(&app, &page_url).await).await;
    assert!(!html.contains(r#"<div class="entry"#));
    assert!(!html.contains(r#"<div class="error""#));
}

#[tokio::test]
async fn test_page_ledger_failure_shows_error_page() {
    let db = seeded_db();
    let app = setup_app_with(db.clone(), AIClient::mock());
    let page_url = start_page_session(&app).await;

    db.conn()
        .unwrap()
        .execute_batch("DROP TABLE transactions;")
        .unwrap();

    let response = get(&app, &page_url).await;
    assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
    let html = get_body_text(response).await;
    assert!(html.contains("Could not load the ledger"));
}

// ========== Security Header Tests ==========

#[tokio::test]
async fn test_security_headers() {
    let app = setup_test_app();

    let response = get(&app, "/api/summary").await;
    let headers = response.headers();
    assert_eq!(headers.get("x-content-type-options").unwrap(), "nosniff");
    assert_eq!(headers.get("x-frame-options").unwrap(), "DENY");
    assert!(headers
        .get("content-security-policy")
        .unwrap()
        .to_str()
        .unwrap()
        .contains("script-src 'none'"));
}
