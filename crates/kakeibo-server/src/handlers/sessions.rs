//! JSON session API
//!
//! Same operations as the page, for scripted clients. Advice failures come
//! back as 502 together with the log as it stands after the failure.

use std::sync::Arc;

use axum::{
    extract::{Path, State},
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::{AppError, AppState};
use kakeibo_core::{ConversationEntry, Session};

/// A session and its conversation log
#[derive(Debug, Serialize)]
pub struct SessionView {
    pub session_id: String,
    pub entries: Vec<ConversationEntry>,
}

impl SessionView {
    fn new(session_id: String, log: &Session) -> Self {
        Self {
            session_id,
            entries: log.entries().to_vec(),
        }
    }
}

/// Body for `POST /api/sessions/:id/questions`
#[derive(Debug, Deserialize)]
pub struct QuestionRequest {
    pub question: String,
}

/// 502 body: the advice error plus the log after the failed action
fn advice_failure(error: &kakeibo_core::Error, log: &Session) -> Response {
    (
        StatusCode::BAD_GATEWAY,
        Json(serde_json::json!({
            "error": error.to_string(),
            "entries": log.entries(),
        })),
    )
        .into_response()
}

/// POST /api/sessions - Start a new session
pub async fn create_session(State(state): State<Arc<AppState>>) -> Json<SessionView> {
    let session_id = state.sessions.create().await;
    debug!(session_id = %session_id, "Created session");

    Json(SessionView {
        session_id,
        entries: Vec::new(),
    })
}

/// GET /api/sessions/:id - Get a session's conversation log
pub async fn get_session(
    State(state): State<Arc<AppState>>,
    Path(session_id): Path<String>,
) -> Result<Json<SessionView>, AppError> {
    let handle = state
        .sessions
        .get(&session_id)
        .await
        .ok_or_else(|| AppError::not_found("Session not found or expired"))?;

    let session = handle.lock().await;
    Ok(Json(SessionView::new(session_id, &session.log)))
}

/// POST /api/sessions/:id/advice - Ask for general advice
pub async fn request_advice(
    State(state): State<Arc<AppState>>,
    Path(session_id): Path<String>,
) -> Result<Response, AppError> {
    let handle = state
        .sessions
        .get(&session_id)
        .await
        .ok_or_else(|| AppError::not_found("Session not found or expired"))?;

    let mut session = handle.lock().await;
    let ledger = state.db.load_ledger()?;

    match session.log.request_advice(&state.advisor, &ledger).await {
        Ok(()) => Ok(Json(SessionView::new(session_id, &session.log)).into_response()),
        Err(e) => Ok(advice_failure(&e, &session.log)),
    }
}

/// POST /api/sessions/:id/questions - Ask a follow-up question
pub async fn submit_question(
    State(state): State<Arc<AppState>>,
    Path(session_id): Path<String>,
    Json(payload): Json<QuestionRequest>,
) -> Result<Response, AppError> {
    let handle = state
        .sessions
        .get(&session_id)
        .await
        .ok_or_else(|| AppError::not_found("Session not found or expired"))?;

    if payload.question.trim().is_empty() {
        return Err(AppError::bad_request("Question must not be empty"));
    }

    let mut session = handle.lock().await;
    let ledger = state.db.load_ledger()?;

    match session
        .log
        .submit_question(&state.advisor, &ledger, &payload.question)
        .await
    {
        Ok(()) => Ok(Json(SessionView::new(session_id, &session.log)).into_response()),
        Err(e) => Ok(advice_failure(&e, &session.log)),
    }
}
