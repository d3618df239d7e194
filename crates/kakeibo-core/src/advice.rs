//! Advice prompt assembly and the advisor that sends it
//!
//! The prompt is rendered from the `budget_advice` template: its `# System`
//! section becomes the system message and its `# User` section is filled with
//! the ledger totals. A user question, when present, is appended after
//! rendering so its text is passed through untouched.

use std::collections::HashMap;
use std::sync::{Arc, RwLock};

use serde::Serialize;
use tracing::{debug, warn};

use crate::ai::{AIBackend, AIClient, CompletionRequest};
use crate::error::{Error, Result};
use crate::ledger::{whole_amount, Ledger, LedgerSummary};
use crate::prompts::{Prompt, PromptId, PromptLibrary};

/// Sampling temperature for advice requests
pub const ADVICE_TEMPERATURE: f32 = 0.7;

/// Output token cap for advice requests
pub const ADVICE_MAX_TOKENS: u32 = 1000;

/// Prefix of the final prompt line carrying a user question
pub const QUESTION_PREFIX: &str = "Question from the user: ";

/// Used when an override template has no `# System` section
const FALLBACK_SYSTEM: &str = "You are a professional financial planner.";

/// A fully rendered prompt, ready to send
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct AdvicePrompt {
    pub system: String,
    pub user: String,
}

impl AdvicePrompt {
    /// Render `template` with the summary figures and an optional question
    ///
    /// Blank questions are treated as absent.
    pub fn build(template: &Prompt, summary: &LedgerSummary, question: Option<&str>) -> Self {
        let income = whole_amount(summary.total_income).to_string();
        let expense = whole_amount(summary.total_expense).to_string();
        let balance = whole_amount(summary.balance).to_string();
        let breakdown = format_breakdown(summary);

        let mut vars = HashMap::new();
        vars.insert("total_income", income.as_str());
        vars.insert("total_expense", expense.as_str());
        vars.insert("balance", balance.as_str());
        vars.insert("breakdown", breakdown.as_str());

        let mut user = template.render_user(&vars);
        if let Some(question) = question.filter(|q| !q.trim().is_empty()) {
            user.push_str("\n\n");
            user.push_str(QUESTION_PREFIX);
            user.push_str(question);
        }

        Self {
            system: template.system_section().unwrap_or(FALLBACK_SYSTEM).to_string(),
            user,
        }
    }

    /// Wrap the prompt in a request with the advisor's fixed sampling settings
    pub fn to_request(&self) -> CompletionRequest {
        CompletionRequest {
            system: self.system.clone(),
            prompt: self.user.clone(),
            temperature: ADVICE_TEMPERATURE,
            max_tokens: ADVICE_MAX_TOKENS,
        }
    }
}

/// One `- <label>: <amount> yen` line per category, in breakdown order
pub fn format_breakdown(summary: &LedgerSummary) -> String {
    summary
        .breakdown
        .iter()
        .map(|c| format!("- {}: {} yen", c.category.label(), whole_amount(c.amount)))
        .collect::<Vec<_>>()
        .join("\n")
}

/// Pairs the prompt library with an advice backend
#[derive(Clone)]
pub struct Advisor {
    ai: AIClient,
    prompts: Arc<RwLock<PromptLibrary>>,
}

impl Advisor {
    /// Create an advisor using the default prompt library (with user overrides)
    pub fn new(ai: AIClient) -> Self {
        Self::with_prompts(ai, PromptLibrary::new())
    }

    /// Create an advisor with an explicit prompt library
    pub fn with_prompts(ai: AIClient, prompts: PromptLibrary) -> Self {
        Self {
            ai,
            prompts: Arc::new(RwLock::new(prompts)),
        }
    }

    /// The backend advice requests go to
    pub fn ai(&self) -> &AIClient {
        &self.ai
    }

    /// Build the prompt for `ledger` without sending it
    pub fn prompt(&self, ledger: &Ledger, question: Option<&str>) -> Result<AdvicePrompt> {
        let summary = ledger.summarize();
        let mut prompts = self
            .prompts
            .write()
            .map_err(|_| Error::InvalidData("Failed to acquire prompt library lock".into()))?;
        let template = prompts.get(PromptId::BudgetAdvice)?;
        Ok(AdvicePrompt::build(template, &summary, question))
    }

    /// Build the prompt and ask the backend for advice
    pub async fn advise(&self, ledger: &Ledger, question: Option<&str>) -> Result<String> {
        let prompt = self.prompt(ledger, question)?;
        debug!(
            model = %self.ai.model(),
            transactions = ledger.len(),
            has_question = question.is_some_and(|q| !q.trim().is_empty()),
            "Requesting advice"
        );

        self.ai
            .complete(&prompt.to_request())
            .await
            .inspect_err(|e| warn!(error = %e, host = %self.ai.host(), "Advice request failed"))
    }
}
