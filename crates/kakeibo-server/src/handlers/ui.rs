//! Interactive page handlers
//!
//! Every action is a form POST that redirects back to the page, so the
//! entries it added are on screen before the next action can be taken.

use std::sync::Arc;

use axum::{
    extract::{Path, State},
    response::{Html, IntoResponse, Redirect, Response},
    Form,
};
use serde::Deserialize;
use tracing::{debug, error};

use crate::page;
use crate::AppState;

/// Form body for the question box
#[derive(Debug, Deserialize)]
pub struct QuestionForm {
    #[serde(default)]
    pub question: String,
}

fn session_url(session_id: &str) -> String {
    format!("/sessions/{}", session_id)
}

/// GET / - Start a session and send the browser to its page
pub async fn start_page(State(state): State<Arc<AppState>>) -> Redirect {
    let session_id = state.sessions.create().await;
    debug!(session_id = %session_id, "Started page session");
    Redirect::to(&session_url(&session_id))
}

/// GET /sessions/:id - Render the page
pub async fn show_page(
    State(state): State<Arc<AppState>>,
    Path(session_id): Path<String>,
) -> Response {
    let Some(handle) = state.sessions.get(&session_id).await else {
        return Redirect::to("/").into_response();
    };

    let ledger = match state.db.load_ledger() {
        Ok(ledger) => ledger,
        Err(e) => {
            error!(error = %e, "Failed to load ledger");
            return page::error_page(&format!("Could not load the ledger: {}", e)).into_response();
        }
    };

    let mut session = handle.lock().await;
    let flash = session.take_flash();
    Html(page::render(
        &session_id,
        &ledger,
        session.log.entries(),
        flash.as_deref(),
    ))
    .into_response()
}

/// POST /sessions/:id/advice - "Get advice" button
pub async fn page_advice(
    State(state): State<Arc<AppState>>,
    Path(session_id): Path<String>,
) -> Redirect {
    let Some(handle) = state.sessions.get(&session_id).await else {
        return Redirect::to("/");
    };

    let mut session = handle.lock().await;
    let result = match state.db.load_ledger() {
        Ok(ledger) => session.log.request_advice(&state.advisor, &ledger).await,
        Err(e) => Err(e),
    };
    if let Err(e) = result {
        session.flash = Some(e.to_string());
    }

    Redirect::to(&session_url(&session_id))
}

/// POST /sessions/:id/questions - Question form
pub async fn page_question(
    State(state): State<Arc<AppState>>,
    Path(session_id): Path<String>,
    Form(form): Form<QuestionForm>,
) -> Redirect {
    let Some(handle) = state.sessions.get(&session_id).await else {
        return Redirect::to("/");
    };

    // Submitting an empty box does nothing
    if form.question.trim().is_empty() {
        return Redirect::to(&session_url(&session_id));
    }

    let mut session = handle.lock().await;
    let result = match state.db.load_ledger() {
        Ok(ledger) => {
            session
                .log
                .submit_question(&state.advisor, &ledger, &form.question)
                .await
        }
        Err(e) => Err(e),
    };
    if let Err(e) = result {
        session.flash = Some(e.to_string());
    }

    Redirect::to(&session_url(&session_id))
}
