//! Backend-agnostic request and configuration types

use std::fmt;

use serde::Serialize;

/// Default endpoint when `OPENAI_COMPATIBLE_HOST` is unset
pub const DEFAULT_HOST: &str = "https://api.openai.com";

/// Default chat model when `OPENAI_COMPATIBLE_MODEL` is unset
pub const DEFAULT_MODEL: &str = "gpt-3.5-turbo";

/// One chat completion call: a system instruction plus the composed prompt
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CompletionRequest {
    /// Fixed instruction sent as the system message
    pub system: String,
    /// Composed prompt sent as the single user message
    pub prompt: String,
    pub temperature: f32,
    /// Upper bound on generated tokens
    pub max_tokens: u32,
}

/// Which backend `AIClient::from_config` builds
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum BackendKind {
    #[default]
    OpenAICompatible,
    Mock,
}

impl BackendKind {
    /// Parse an `AI_BACKEND` value, `None` for anything unrecognized
    pub fn parse(value: &str) -> Option<Self> {
        match value.trim().to_lowercase().as_str() {
            "openai_compatible" | "openai" => Some(Self::OpenAICompatible),
            "mock" => Some(Self::Mock),
            _ => None,
        }
    }
}

/// Advice endpoint settings, read once at startup
#[derive(Clone, PartialEq)]
pub struct AdvisorConfig {
    pub backend: BackendKind,
    /// Base URL without the `/v1/...` suffix
    pub host: String,
    pub model: String,
    /// Bearer credential; never logged
    pub api_key: Option<String>,
}

impl AdvisorConfig {
    /// Read configuration from the process environment
    ///
    /// - `AI_BACKEND`: `openai_compatible` (default) or `mock`
    /// - `OPENAI_COMPATIBLE_HOST`: default `https://api.openai.com`
    /// - `OPENAI_COMPATIBLE_MODEL`: default `gpt-3.5-turbo`
    /// - `OPENAI_COMPATIBLE_API_KEY`, falling back to `OPENAI_API_KEY`
    pub fn from_env() -> Self {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Build from an arbitrary key lookup (the environment in production)
    pub fn from_lookup<F>(lookup: F) -> Self
    where
        F: Fn(&str) -> Option<String>,
    {
        let non_empty = |key: &str| lookup(key).filter(|v| !v.trim().is_empty());

        let backend = match non_empty("AI_BACKEND") {
            Some(value) => BackendKind::parse(&value).unwrap_or_else(|| {
                tracing::warn!(backend = %value, "Unknown AI_BACKEND, falling back to openai_compatible");
                BackendKind::OpenAICompatible
            }),
            None => BackendKind::default(),
        };

        Self {
            backend,
            host: non_empty("OPENAI_COMPATIBLE_HOST").unwrap_or_else(|| DEFAULT_HOST.to_string()),
            model: non_empty("OPENAI_COMPATIBLE_MODEL")
                .unwrap_or_else(|| DEFAULT_MODEL.to_string()),
            api_key: non_empty("OPENAI_COMPATIBLE_API_KEY").or_else(|| non_empty("OPENAI_API_KEY")),
        }
    }
}

impl Default for AdvisorConfig {
    fn default() -> Self {
        Self {
            backend: BackendKind::default(),
            host: DEFAULT_HOST.to_string(),
            model: DEFAULT_MODEL.to_string(),
            api_key: None,
        }
    }
}

impl fmt::Debug for AdvisorConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("AdvisorConfig")
            .field("backend", &self.backend)
            .field("host", &self.host)
            .field("model", &self.model)
            .field("api_key", &self.api_key.as_ref().map(|_| "<redacted>"))
            .finish()
    }
}
