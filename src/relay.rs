//! Relay service. Validates a chat request, composes the tutor prompt and
//! forwards it to the configured LLM provider.
//!
//! Stateless: each call builds its prompt from the shared [`Guidance`] and
//! performs at most one completion. Validation failures never reach the model.

use std::sync::Arc;

use axum::http::StatusCode;
use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::{debug, error, warn};

use crate::llm::{LlmProvider, ProviderError};
use crate::tutor::{self, Guidance, PromptError};

/// Child-facing message for a failed completion.
const COMPLETION_FAILED: &str = "Le modèle n'a pas pu répondre. Réessaie dans un instant.";
/// Child-facing message for a completion that ran out of time.
const COMPLETION_TIMED_OUT: &str = "Le modèle a mis trop de temps à répondre.";

/// `POST /chat` body.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChatRequest {
    pub question: String,
    pub niveau: String,
    pub matiere: String,
}

/// JSON envelope returned for every `/chat` outcome.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Envelope {
    pub response: String,
}

#[derive(Debug, Error)]
pub enum RelayError {
    #[error(transparent)]
    Invalid(#[from] PromptError),
    #[error("completion failed: {0}")]
    Completion(#[from] ProviderError),
}

impl RelayError {
    pub fn status(&self) -> StatusCode {
        match self {
            RelayError::Invalid(_) => StatusCode::BAD_REQUEST,
            RelayError::Completion(e) if e.is_timeout() => StatusCode::GATEWAY_TIMEOUT,
            RelayError::Completion(_) => StatusCode::BAD_GATEWAY,
        }
    }

    /// Envelope sent back to the caller. Provider details stay in the log.
    pub fn envelope(&self) -> Envelope {
        let response = match self {
            RelayError::Invalid(e) => e.to_string(),
            RelayError::Completion(e) if e.is_timeout() => COMPLETION_TIMED_OUT.to_string(),
            RelayError::Completion(_) => COMPLETION_FAILED.to_string(),
        };
        Envelope { response }
    }
}

/// Cheap to clone: the provider wraps a pooled client and the guidance is shared.
#[derive(Debug, Clone)]
pub struct Relay {
    provider: LlmProvider,
    guidance: Arc<Guidance>,
}

impl Relay {
    pub fn new(provider: LlmProvider, guidance: Arc<Guidance>) -> Self {
        Self { provider, guidance }
    }

    pub fn model(&self) -> &str {
        self.provider.model()
    }

    /// Handle one chat request. The model reply is returned unmodified.
    pub async fn chat(&self, req: &ChatRequest) -> Result<Envelope, RelayError> {
        let prompt = tutor::build(&self.guidance, &req.niveau, &req.matiere, &req.question)
            .inspect_err(|e| warn!(niveau = %req.niveau, matiere = %req.matiere, "rejected chat request: {e}"))?;

        debug!(
            level = %prompt.level,
            subject = %prompt.subject,
            model = %self.provider.model(),
            question_len = req.question.len(),
            "dispatching to llm provider"
        );

        let response = self
            .provider
            .complete(&prompt.system, &prompt.user)
            .await
            .inspect_err(|e| error!(level = %prompt.level, subject = %prompt.subject, error = %e, "completion failed"))?;

        Ok(Envelope { response })
    }
}
