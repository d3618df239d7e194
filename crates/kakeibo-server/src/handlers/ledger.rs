//! Ledger handlers

use std::sync::Arc;

use axum::{
    extract::{Query, State},
    Json,
};
use serde::{Deserialize, Serialize};

use crate::{AppError, AppState};
use kakeibo_core::{AdvicePrompt, LedgerSummary, Transaction};

#[derive(Serialize)]
pub struct TransactionsResponse {
    pub transactions: Vec<Transaction>,
    pub total: usize,
}

/// GET /api/transactions - The full ledger, ordered by id
pub async fn list_transactions(
    State(state): State<Arc<AppState>>,
) -> Result<Json<TransactionsResponse>, AppError> {
    let transactions = state.db.list_transactions()?;
    Ok(Json(TransactionsResponse {
        total: transactions.len(),
        transactions,
    }))
}

/// GET /api/summary - Totals and per-category expense breakdown
pub async fn get_summary(
    State(state): State<Arc<AppState>>,
) -> Result<Json<LedgerSummary>, AppError> {
    let ledger = state.db.load_ledger()?;
    Ok(Json(ledger.summarize()))
}

#[derive(Debug, Deserialize)]
pub struct PromptQuery {
    pub question: Option<String>,
}

/// GET /api/prompt - The advice prompt that would be sent, without sending it
pub async fn get_prompt(
    State(state): State<Arc<AppState>>,
    Query(query): Query<PromptQuery>,
) -> Result<Json<AdvicePrompt>, AppError> {
    let ledger = state.db.load_ledger()?;
    let prompt = state.advisor.prompt(&ledger, query.question.as_deref())?;
    Ok(Json(prompt))
}
