//! Ollama native chat provider (`POST /api/chat`, non-streaming).
//!
//! The reply text is taken from `message.content` exactly as the runtime
//! sent it.

use serde::{Deserialize, Serialize};
use tracing::{debug, error};

use crate::llm::ProviderError;

use super::{Endpoint, WireMessage, system_then_user};

#[derive(Debug, Clone)]
pub struct OllamaProvider {
    endpoint: Endpoint,
    model: String,
}

impl OllamaProvider {
    /// `api_url` is the full chat endpoint, e.g. `http://localhost:11434/api/chat`.
    pub fn new(api_url: String, model: String, timeout_seconds: u64) -> Result<Self, ProviderError> {
        Ok(Self {
            endpoint: Endpoint::new(api_url, timeout_seconds, None)?,
            model,
        })
    }

    pub fn model(&self) -> &str {
        &self.model
    }

    pub async fn complete(&self, system: &str, user: &str) -> Result<String, ProviderError> {
        let payload = ChatRequest {
            model: &self.model,
            messages: system_then_user(system, user),
            stream: false,
        };

        debug!(
            model = %self.model,
            system_len = system.len(),
            user_len = user.len(),
            "sending ollama chat request"
        );

        let body = self.endpoint.post_json(&payload).await?;
        parse_reply(&body)
    }
}

fn parse_reply(body: &str) -> Result<String, ProviderError> {
    let parsed: ChatResponse = serde_json::from_str(body).map_err(|e| {
        error!(error = %e, "failed to deserialize ollama response");
        ProviderError::Malformed(format!("failed to parse response body: {e}"))
    })?;

    debug!(done = ?parsed.done, "received ollama response");

    parsed
        .message
        .and_then(|m| m.content)
        .ok_or_else(|| ProviderError::Malformed("missing message.content in response".into()))
}

#[derive(Debug, Serialize)]
struct ChatRequest<'a> {
    model: &'a str,
    messages: [WireMessage<'a>; 2],
    stream: bool,
}

#[derive(Debug, Deserialize)]
struct ChatResponse {
    #[serde(default)]
    message: Option<ResponseMessage>,
    #[serde(default)]
    done: Option<bool>,
}

#[derive(Debug, Deserialize)]
struct ResponseMessage {
    #[serde(default)]
    content: Option<String>,
}
