//! LLM provider abstraction.
//!
//! `LlmProvider` is an enum over concrete provider implementations.
//! Add a new variant + module in `providers/` for each additional backend.
//!
//! Provider instances are immutable after startup; clone them freely.
//! Every HTTP provider owns one `reqwest::Client`, so all requests served by
//! the process reuse the same connection pool.

pub mod providers;

use thiserror::Error;

// ── Error ─────────────────────────────────────────────────────────────────────

#[derive(Debug, Error)]
pub enum ProviderError {
    #[error("unknown provider: {0}")]
    UnknownProvider(String),
    #[error("provider timed out after {0}s")]
    Timeout(u64),
    #[error("provider request failed: {0}")]
    Request(String),
    #[error("malformed provider response: {0}")]
    Malformed(String),
}

impl ProviderError {
    pub fn is_timeout(&self) -> bool {
        matches!(self, ProviderError::Timeout(_))
    }
}

// ── Provider enum ─────────────────────────────────────────────────────────────

/// All available provider backends.
///
/// Enum dispatch avoids `dyn` trait objects and the `async-trait` dependency.
/// Adding a backend = new module + new variant + new `complete` arm.
#[derive(Debug, Clone)]
pub enum LlmProvider {
    Dummy(providers::dummy::DummyProvider),
    Ollama(providers::ollama::OllamaProvider),
    OpenAiCompatible(providers::openai_compatible::OpenAiCompatibleProvider),
}

impl LlmProvider {
    /// Send one system + one user message and return the reply text unmodified.
    pub async fn complete(&self, system: &str, user: &str) -> Result<String, ProviderError> {
        match self {
            LlmProvider::Dummy(p) => p.complete(system, user).await,
            LlmProvider::Ollama(p) => p.complete(system, user).await,
            LlmProvider::OpenAiCompatible(p) => p.complete(system, user).await,
        }
    }

    /// Model identifier sent with every request.
    pub fn model(&self) -> &str {
        match self {
            LlmProvider::Dummy(_) => "echo",
            LlmProvider::Ollama(p) => p.model(),
            LlmProvider::OpenAiCompatible(p) => p.model(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn timeout_is_flagged() {
        assert!(ProviderError::Timeout(5).is_timeout());
        assert!(!ProviderError::Request("refused".into()).is_timeout());
    }

    #[test]
    fn error_display_carries_detail() {
        let e = ProviderError::Malformed("missing message.content".into());
        assert!(e.to_string().contains("message.content"));
        assert_eq!(ProviderError::Timeout(120).to_string(), "provider timed out after 120s");
    }

    #[tokio::test]
    async fn dummy_dispatch_through_enum() {
        let p = LlmProvider::Dummy(providers::dummy::DummyProvider);
        assert_eq!(p.complete("sys", "hello").await.unwrap(), "[echo] hello");
        assert_eq!(p.model(), "echo");
    }
}
