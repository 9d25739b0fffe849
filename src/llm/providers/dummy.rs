//! Dummy LLM provider: echoes the user message back prefixed with `[echo]`.
//! Used to run the full HTTP round-trip without a model runtime.

use crate::llm::ProviderError;

#[derive(Debug, Clone)]
pub struct DummyProvider;

impl DummyProvider {
    pub async fn complete(&self, _system: &str, user: &str) -> Result<String, ProviderError> {
        Ok(format!("[echo] {user}"))
    }
}
