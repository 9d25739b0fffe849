//! HTTP client for the `/chat` endpoint, used by `petit-prof-ask`.
//!
//! Transport failures are reported separately from server-side errors, and
//! they never depend on the server's own error semantics.

use std::env;
use std::time::Duration;

use reqwest::{Client, StatusCode};
use thiserror::Error;
use tracing::debug;

use crate::relay::{ChatRequest, Envelope};

/// Env var holding the backend base URL.
pub const BACKEND_URL_ENV: &str = "PETIT_PROF_BACKEND_URL";
/// Base URL used when [`BACKEND_URL_ENV`] is unset or empty.
pub const DEFAULT_BACKEND_URL: &str = "http://127.0.0.1:8000";
/// Client-side request timeout.
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(30);

#[derive(Debug, Error)]
pub enum ClientError {
    #[error("Erreur du serveur : {status}")]
    Server {
        status: StatusCode,
        /// Envelope text, when the server sent one.
        message: Option<String>,
    },
    #[error("Impossible de joindre le serveur : {0}")]
    Unreachable(String),
    #[error("Réponse illisible du serveur : {0}")]
    Malformed(String),
}

/// Backend base URL from the environment, falling back to localhost.
pub fn backend_url_from_env() -> String {
    env::var(BACKEND_URL_ENV)
        .ok()
        .filter(|v| !v.trim().is_empty())
        .unwrap_or_else(|| DEFAULT_BACKEND_URL.to_string())
}

#[derive(Debug, Clone)]
pub struct AskClient {
    client: Client,
    chat_url: String,
}

impl AskClient {
    pub fn new(base_url: &str, timeout: Duration) -> Result<Self, ClientError> {
        let client = Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| ClientError::Unreachable(format!("failed to build HTTP client: {e}")))?;
        Ok(Self {
            client,
            chat_url: chat_url(base_url),
        })
    }

    pub fn chat_url(&self) -> &str {
        &self.chat_url
    }

    /// Post one question and return the tutor's reply text.
    pub async fn ask(&self, req: &ChatRequest) -> Result<String, ClientError> {
        debug!(url = %self.chat_url, niveau = %req.niveau, matiere = %req.matiere, "posting question");

        let response = self
            .client
            .post(&self.chat_url)
            .json(req)
            .send()
            .await
            .map_err(|e| ClientError::Unreachable(e.to_string()))?;

        let status = response.status();
        let body = response
            .text()
            .await
            .map_err(|e| ClientError::Unreachable(e.to_string()))?;
        let envelope = serde_json::from_str::<Envelope>(&body);

        if !status.is_success() {
            return Err(ClientError::Server {
                status,
                message: envelope.ok().map(|e| e.response),
            });
        }

        envelope
            .map(|e| e.response)
            .map_err(|e| ClientError::Malformed(e.to_string()))
    }
}

fn chat_url(base_url: &str) -> String {
    format!("{}/chat", base_url.trim_end_matches('/'))
}
