//! LLM provider implementations.
//!
//! `build(config, api_key)` is the startup factory. The network providers
//! share [`Endpoint`] for transport and only own their wire formats.

pub mod dummy;
pub mod ollama;
pub mod openai_compatible;

use std::time::Duration;

use reqwest::Client;
use serde::{Deserialize, Serialize};
use tracing::{error, trace};

use crate::config::LlmConfig;
use crate::llm::{LlmProvider, ProviderError};

/// Construct a `LlmProvider` from config and an optional API key.
///
/// `api_key` is sourced from `LLM_API_KEY` env (never TOML) and is `None`
/// for keyless local models.
pub fn build(config: &LlmConfig, api_key: Option<String>) -> Result<LlmProvider, ProviderError> {
    match config.provider.as_str() {
        "dummy" => Ok(LlmProvider::Dummy(dummy::DummyProvider)),
        "ollama" => {
            let o = &config.ollama;
            let p = ollama::OllamaProvider::new(o.api_url.clone(), o.model.clone(), o.timeout_seconds)?;
            Ok(LlmProvider::Ollama(p))
        }
        "openai" | "openai-compatible" => {
            let oai = &config.openai;
            let p = openai_compatible::OpenAiCompatibleProvider::new(
                oai.api_base_url.clone(),
                oai.model.clone(),
                oai.temperature,
                oai.timeout_seconds,
                api_key,
            )?;
            Ok(LlmProvider::OpenAiCompatible(p))
        }
        _ => Err(ProviderError::UnknownProvider(config.provider.clone())),
    }
}

/// `{"role": ..., "content": ...}`, spelled the same by both chat APIs.
#[derive(Debug, Serialize)]
struct WireMessage<'a> {
    role: &'static str,
    content: &'a str,
}

fn system_then_user<'a>(system: &'a str, user: &'a str) -> [WireMessage<'a>; 2] {
    [
        WireMessage { role: "system", content: system },
        WireMessage { role: "user", content: user },
    ]
}

/// A chat URL plus the pooled client that talks to it.
///
/// The client carries the whole-request timeout, so a hung model is cut off
/// even when nobody is waiting on the other side anymore.
#[derive(Debug, Clone)]
struct Endpoint {
    client: Client,
    url: String,
    timeout_seconds: u64,
    bearer: Option<String>,
}

impl Endpoint {
    fn new(url: String, timeout_seconds: u64, bearer: Option<String>) -> Result<Self, ProviderError> {
        let client = Client::builder()
            .timeout(Duration::from_secs(timeout_seconds))
            .build()
            .map_err(|e| ProviderError::Request(format!("failed to build HTTP client: {e}")))?;
        Ok(Self { client, url, timeout_seconds, bearer })
    }

    /// POST `payload` as JSON and return the raw success body.
    async fn post_json<T: Serialize>(&self, payload: &T) -> Result<String, ProviderError> {
        if tracing::enabled!(tracing::Level::TRACE) {
            let json = serde_json::to_string_pretty(payload)
                .unwrap_or_else(|e| format!("<serialization failed: {e}>"));
            trace!(url = %self.url, payload = %json, "full LLM request payload");
        }

        let mut req = self.client.post(&self.url).json(payload);
        if let Some(key) = &self.bearer {
            req = req.bearer_auth(key);
        }

        let response = req
            .send()
            .await
            .map_err(|e| transport_error(e, &self.url, self.timeout_seconds))?;
        let response = check_status(response).await?;

        response
            .text()
            .await
            .map_err(|e| transport_error(e, &self.url, self.timeout_seconds))
    }
}

/// Map a reqwest failure, keeping timeouts distinguishable.
fn transport_error(e: reqwest::Error, url: &str, timeout_seconds: u64) -> ProviderError {
    if e.is_timeout() {
        error!(%url, timeout_seconds, "LLM request timed out");
        ProviderError::Timeout(timeout_seconds)
    } else {
        error!(%url, error = %e, "LLM HTTP request failed (transport)");
        ProviderError::Request(e.to_string())
    }
}

// Error envelopes: OpenAI nests an object, Ollama sends a bare string.
#[derive(Debug, Deserialize)]
struct ErrorEnvelope {
    error: ErrorBody,
}

#[derive(Debug, Deserialize)]
#[serde(untagged)]
enum ErrorBody {
    Detailed {
        message: String,
        #[serde(default)]
        code: Option<serde_json::Value>,
    },
    Plain(String),
}

/// Consume the response and return it if successful, or a structured error.
async fn check_status(response: reqwest::Response) -> Result<reqwest::Response, ProviderError> {
    let status = response.status();
    if status.is_success() {
        return Ok(response);
    }

    let body = response
        .text()
        .await
        .unwrap_or_else(|_| "<failed to read error body>".to_string());

    let message = match serde_json::from_str::<ErrorEnvelope>(&body) {
        Ok(ErrorEnvelope { error: ErrorBody::Detailed { message, code } }) => {
            let code = code
                .map(|v| match v {
                    serde_json::Value::String(s) => format!(" [code={s}]"),
                    other => format!(" [code={other}]"),
                })
                .unwrap_or_default();
            format!("HTTP {status}{code}: {message}")
        }
        Ok(ErrorEnvelope { error: ErrorBody::Plain(message) }) => format!("HTTP {status}: {message}"),
        Err(_) => format!("HTTP {status}: {body}"),
    };

    error!(%status, %message, "LLM request returned HTTP error");
    Err(ProviderError::Request(message))
}
