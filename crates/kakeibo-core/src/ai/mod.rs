//! Pluggable advice backend abstraction
//!
//! This module provides a backend-agnostic interface for the chat completion
//! call behind the advisor.
//!
//! # Architecture
//!
//! - `AIBackend` trait: defines the interface for all backends
//! - `AIClient` enum: concrete wrapper providing Clone + compile-time dispatch
//! - Backend implementations: `OpenAICompatibleBackend`, `MockBackend`
//!
//! # Usage
//!
//! ```rust,ignore
//! let ai = AIClient::from_env();
//! let reply = ai.complete(&request).await?;
//! ```
//!
//! # Configuration
//!
//! See [`AdvisorConfig::from_env`] for the environment variables read.

mod mock;
mod openai_compatible;
pub mod types;

pub use mock::MockBackend;
pub use openai_compatible::OpenAICompatibleBackend;
pub use types::*;

use async_trait::async_trait;

use crate::error::Result;

/// Trait defining the interface for all advice backends
///
/// Backends should be Send + Sync to allow use across async tasks.
#[async_trait]
pub trait AIBackend: Send + Sync {
    /// Send one chat completion and return the reply text
    async fn complete(&self, request: &CompletionRequest) -> Result<String>;

    /// Check if the backend is reachable
    async fn health_check(&self) -> bool;

    /// Get the model name
    fn model(&self) -> &str;

    /// Get the host URL (for logging)
    fn host(&self) -> &str;
}

/// Concrete AI client enum
///
/// Provides Clone and compile-time dispatch without Box<dyn> overhead.
#[derive(Clone)]
pub enum AIClient {
    /// OpenAI-compatible chat completions endpoint
    OpenAICompatible(OpenAICompatibleBackend),
    /// Mock backend for development and testing
    Mock(MockBackend),
}

impl AIClient {
    /// Create an AI client from environment variables
    pub fn from_env() -> Self {
        Self::from_config(&AdvisorConfig::from_env())
    }

    /// Create an AI client from already-loaded configuration
    pub fn from_config(config: &AdvisorConfig) -> Self {
        match config.backend {
            BackendKind::OpenAICompatible => {
                AIClient::OpenAICompatible(OpenAICompatibleBackend::from_config(config))
            }
            BackendKind::Mock => AIClient::Mock(MockBackend::new()),
        }
    }

    /// Create a mock backend for testing
    pub fn mock() -> Self {
        AIClient::Mock(MockBackend::new())
    }

    /// Create a mock backend whose every call fails
    pub fn failing_mock() -> Self {
        AIClient::Mock(MockBackend::failing())
    }
}

// Implement AIBackend for AIClient by delegating to the inner backend
#[async_trait]
impl AIBackend for AIClient {
    async fn complete(&self, request: &CompletionRequest) -> Result<String> {
        match self {
            AIClient::OpenAICompatible(b) => b.complete(request).await,
            AIClient::Mock(b) => b.complete(request).await,
        }
    }

    async fn health_check(&self) -> bool {
        match self {
            AIClient::OpenAICompatible(b) => b.health_check().await,
            AIClient::Mock(b) => b.health_check().await,
        }
    }

    fn model(&self) -> &str {
        match self {
            AIClient::OpenAICompatible(b) => b.model(),
            AIClient::Mock(b) => b.model(),
        }
    }

    fn host(&self) -> &str {
        match self {
            AIClient::OpenAICompatible(b) => b.host(),
            AIClient::Mock(b) => b.host(),
        }
    }
}
