//! Mock backend for testing
//!
//! Returns canned advice without a network round trip. Useful for unit tests
//! and for running the page without an API key (`AI_BACKEND=mock`).

use async_trait::async_trait;

use crate::advice::QUESTION_PREFIX;
use crate::error::{Error, Result};

use super::types::CompletionRequest;
use super::AIBackend;

/// Mock AI backend for testing
#[derive(Clone, Default)]
pub struct MockBackend {
    /// Whether health_check and complete succeed
    pub healthy: bool,
}

impl MockBackend {
    /// Create a new mock backend (healthy by default)
    pub fn new() -> Self {
        Self { healthy: true }
    }

    /// Create a mock backend that fails every call
    pub fn failing() -> Self {
        Self { healthy: false }
    }
}

#[async_trait]
impl AIBackend for MockBackend {
    async fn complete(&self, request: &CompletionRequest) -> Result<String> {
        if !self.healthy {
            return Err(Error::Advice("mock advice endpoint is unavailable".into()));
        }

        let reply = match request.prompt.rfind(QUESTION_PREFIX) {
            Some(pos) => format!(
                "Mock advice on \"{}\": keep daily spending steady and move the balance into savings.",
                request.prompt[pos + QUESTION_PREFIX.len()..].trim()
            ),
            None => "Mock advice: your largest expense category is the first place to cut. \
                     Set aside part of the balance as savings each month."
                .to_string(),
        };

        Ok(reply)
    }

    async fn health_check(&self) -> bool {
        self.healthy
    }

    fn model(&self) -> &str {
        "mock"
    }

    fn host(&self) -> &str {
        "mock://localhost"
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn request(prompt: &str) -> CompletionRequest {
        CompletionRequest {
            system: "system".into(),
            prompt: prompt.into(),
            temperature: 0.7,
            max_tokens: 1000,
        }
    }

    #[tokio::test]
    async fn test_reply_mentions_question() {
        let backend = MockBackend::new();
        let reply = backend
            .complete(&request("totals...\n\nQuestion from the user: Can I afford a trip?"))
            .await
            .unwrap();
        assert!(reply.contains("Can I afford a trip?"));
    }

    #[tokio::test]
    async fn test_reply_without_question() {
        let reply = MockBackend::new().complete(&request("totals")).await.unwrap();
        assert!(reply.starts_with("Mock advice:"));
    }

    #[tokio::test]
    async fn test_failing_backend() {
        let backend = MockBackend::failing();
        assert!(!backend.health_check().await);
        assert!(backend.complete(&request("totals")).await.is_err());
    }
}
