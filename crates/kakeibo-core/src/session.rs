//! Per-session conversation log
//!
//! Entries are append-only. A failed advice call never removes what was
//! already written: a question that could not be answered stays in the log
//! without a reply.

use serde::Serialize;

use crate::advice::Advisor;
use crate::error::{Error, Result};
use crate::ledger::Ledger;
use crate::models::ConversationEntry;

/// Conversation log for one interactive session
#[derive(Debug, Clone, Default, Serialize)]
pub struct Session {
    entries: Vec<ConversationEntry>,
}

impl Session {
    pub fn new() -> Self {
        Self::default()
    }

    /// Entries in the order they were added
    pub fn entries(&self) -> &[ConversationEntry] {
        &self.entries
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Ask for general advice on `ledger`
    ///
    /// Appends one assistant entry on success and nothing on failure.
    pub async fn request_advice(&mut self, advisor: &Advisor, ledger: &Ledger) -> Result<()> {
        let reply = advisor.advise(ledger, None).await?;
        self.entries.push(ConversationEntry::assistant(reply));
        Ok(())
    }

    /// Ask a follow-up question about `ledger`
    ///
    /// Blank questions are rejected without touching the log. Otherwise the
    /// question is logged first; the reply follows only if the call succeeds.
    pub async fn submit_question(
        &mut self,
        advisor: &Advisor,
        ledger: &Ledger,
        question: &str,
    ) -> Result<()> {
        if question.trim().is_empty() {
            return Err(Error::InvalidData("question must not be empty".into()));
        }

        self.entries.push(ConversationEntry::user(question));
        let reply = advisor.advise(ledger, Some(question)).await?;
        self.entries.push(ConversationEntry::assistant(reply));
        Ok(())
    }
}
