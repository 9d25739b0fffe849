//! `/v1/chat/completions` provider for hosted or self-hosted OpenAI-style
//! servers (OpenAI, LM Studio, llama.cpp server, vLLM).

use serde::{Deserialize, Serialize};
use tracing::{debug, error};

use crate::llm::ProviderError;

use super::{Endpoint, WireMessage, system_then_user};

#[derive(Debug, Clone)]
pub struct OpenAiCompatibleProvider {
    endpoint: Endpoint,
    model: String,
    temperature: Option<f32>,
}

impl OpenAiCompatibleProvider {
    /// `api_key`, when present, is sent as `Authorization: Bearer <key>`.
    pub fn new(
        api_base_url: String,
        model: String,
        temperature: f32,
        timeout_seconds: u64,
        api_key: Option<String>,
    ) -> Result<Self, ProviderError> {
        // gpt-5 models reject an explicit temperature.
        let temperature = (!model.starts_with("gpt-5")).then_some(temperature);
        Ok(Self {
            endpoint: Endpoint::new(api_base_url, timeout_seconds, api_key)?,
            model,
            temperature,
        })
    }

    pub fn model(&self) -> &str {
        &self.model
    }

    pub async fn complete(&self, system: &str, user: &str) -> Result<String, ProviderError> {
        let payload = CompletionRequest {
            model: &self.model,
            messages: system_then_user(system, user),
            temperature: self.temperature,
        };

        debug!(model = %self.model, temperature = ?self.temperature, user_len = user.len(), "sending completion request");

        let body = self.endpoint.post_json(&payload).await?;
        first_choice(&body)
    }
}

fn first_choice(body: &str) -> Result<String, ProviderError> {
    let parsed: CompletionResponse = serde_json::from_str(body).map_err(|e| {
        error!(error = %e, "failed to deserialize completion response");
        ProviderError::Malformed(format!("failed to parse response body: {e}"))
    })?;

    parsed
        .choices
        .into_iter()
        .find_map(|c| c.message.content)
        .ok_or_else(|| ProviderError::Malformed("no choice carried message.content".into()))
}

#[derive(Debug, Serialize)]
struct CompletionRequest<'a> {
    model: &'a str,
    messages: [WireMessage<'a>; 2],
    #[serde(skip_serializing_if = "Option::is_none")]
    temperature: Option<f32>,
}

#[derive(Debug, Deserialize)]
struct CompletionResponse {
    #[serde(default)]
    choices: Vec<Choice>,
}

#[derive(Debug, Deserialize)]
struct Choice {
    message: ChoiceMessage,
}

#[derive(Debug, Deserialize)]
struct ChoiceMessage {
    #[serde(default)]
    content: Option<String>,
}
