//! Kakeibo Core Library
//!
//! Shared functionality for the Kakeibo budgeting advisor:
//! - Synthetic ledger generation and SQLite storage
//! - Income/expense summary with a per-category breakdown
//! - Prompt library for the advice prompt
//! - Pluggable advice backends (OpenAI-compatible, mock)
//! - Append-only conversation log per session

pub mod advice;
pub mod ai;
pub mod db;
pub mod error;
pub mod generator;
pub mod ledger;
pub mod models;
pub mod prompts;
pub mod session;

/// Test utilities including a mock chat completion server
#[cfg(any(test, feature = "test-utils"))]
pub mod test_utils;

pub use advice::{AdvicePrompt, Advisor};
pub use ai::{
    AIBackend, AIClient, AdvisorConfig, BackendKind, CompletionRequest, MockBackend,
    OpenAICompatibleBackend,
};
pub use db::Database;
pub use error::{Error, Result};
pub use generator::{generate_ledger, seed_database};
pub use ledger::{CategoryTotal, Ledger, LedgerSummary};
pub use models::{Category, ConversationEntry, NewTransaction, Role, Transaction};
pub use prompts::{Prompt, PromptId, PromptInfo, PromptLibrary};
pub use session::Session;
