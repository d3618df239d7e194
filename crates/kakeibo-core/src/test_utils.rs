//! Test utilities for kakeibo-core
//!
//! This module provides a mock OpenAI-compatible server that can be used for
//! development and integration tests without network access or an API key.

use std::net::SocketAddr;
use std::sync::{Arc, Mutex};

use axum::{
    extract::State,
    http::{header::AUTHORIZATION, HeaderMap, StatusCode},
    routing::{get, post},
    Json, Router,
};
use serde_json::{json, Value};
use tokio::sync::oneshot;

/// Default reply for `MockOpenAIServer::start`
pub const DEFAULT_REPLY: &str = "Keep food spending under 30,000 yen and save the rest.";

/// A chat completion request as the mock server saw it
#[derive(Debug, Clone)]
pub struct RecordedRequest {
    /// Raw `Authorization` header, if any
    pub authorization: Option<String>,
    /// Parsed JSON body
    pub body: Value,
}

#[derive(Debug, Clone)]
enum Behavior {
    Reply(String),
    /// 401 with an OpenAI-style error body
    Unauthorized,
    /// 200 with an empty `choices` array
    Empty,
}

struct MockState {
    behavior: Behavior,
    requests: Mutex<Vec<RecordedRequest>>,
}

/// Mock OpenAI-compatible server for testing and development
pub struct MockOpenAIServer {
    addr: SocketAddr,
    state: Arc<MockState>,
    shutdown_tx: Option<oneshot::Sender<()>>,
}

impl MockOpenAIServer {
    /// Start the mock server on an available port, answering with [`DEFAULT_REPLY`]
    pub async fn start() -> Self {
        Self::spawn(Behavior::Reply(DEFAULT_REPLY.to_string())).await
    }

    /// Start a server that answers every completion with `reply`
    pub async fn start_with_reply(reply: &str) -> Self {
        Self::spawn(Behavior::Reply(reply.to_string())).await
    }

    /// Start a server that rejects every completion with 401
    pub async fn start_failing() -> Self {
        Self::spawn(Behavior::Unauthorized).await
    }

    /// Start a server that answers with no choices
    pub async fn start_empty() -> Self {
        Self::spawn(Behavior::Empty).await
    }

    async fn spawn(behavior: Behavior) -> Self {
        let state = Arc::new(MockState {
            behavior,
            requests: Mutex::new(Vec::new()),
        });

        let app = Router::new()
            .route("/v1/models", get(handle_models))
            .route("/v1/chat/completions", post(handle_chat_completions))
            .with_state(state.clone());

        let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();

        let (shutdown_tx, shutdown_rx) = oneshot::channel();

        tokio::spawn(async move {
            axum::serve(listener, app)
                .with_graceful_shutdown(async {
                    shutdown_rx.await.ok();
                })
                .await
                .unwrap();
        });

        Self {
            addr,
            state,
            shutdown_tx: Some(shutdown_tx),
        }
    }

    /// Get the base URL for this mock server
    pub fn url(&self) -> String {
        format!("http://{}", self.addr)
    }

    /// Chat completion requests received so far, oldest first
    pub fn requests(&self) -> Vec<RecordedRequest> {
        self.state.requests.lock().unwrap().clone()
    }

    /// Stop the mock server
    pub fn stop(&mut self) {
        if let Some(tx) = self.shutdown_tx.take() {
            let _ = tx.send(());
        }
    }
}

impl Drop for MockOpenAIServer {
    fn drop(&mut self) {
        self.stop();
    }
}

/// Model listing (health check)
async fn handle_models() -> Json<Value> {
    Json(json!({
        "object": "list",
        "data": [{"id": "gpt-3.5-turbo", "object": "model", "owned_by": "mock"}]
    }))
}

/// Chat completions endpoint
async fn handle_chat_completions(
    State(state): State<Arc<MockState>>,
    headers: HeaderMap,
    Json(body): Json<Value>,
) -> (StatusCode, Json<Value>) {
    let authorization = headers
        .get(AUTHORIZATION)
        .and_then(|v| v.to_str().ok())
        .map(str::to_string);
    let model = body["model"].as_str().unwrap_or("unknown").to_string();

    state
        .requests
        .lock()
        .unwrap()
        .push(RecordedRequest {
            authorization,
            body,
        });

    match &state.behavior {
        Behavior::Reply(reply) => (
            StatusCode::OK,
            Json(json!({
                "id": "chatcmpl-mock",
                "object": "chat.completion",
                "model": model,
                "choices": [{
                    "index": 0,
                    "message": {"role": "assistant", "content": reply},
                    "finish_reason": "stop"
                }]
            })),
        ),
        Behavior::Unauthorized => (
            StatusCode::UNAUTHORIZED,
            Json(json!({
                "error": {
                    "message": "Incorrect API key provided.",
                    "type": "invalid_request_error",
                    "code": "invalid_api_key"
                }
            })),
        ),
        Behavior::Empty => (
            StatusCode::OK,
            Json(json!({"id": "chatcmpl-mock", "model": model, "choices": []})),
        ),
    }
}
