//! Startup and serving errors for the `petit-prof` process.
//!
//! Per-request failures never reach this type; they are answered with an
//! envelope by the relay (see `relay::RelayError`).

use std::path::PathBuf;

use thiserror::Error;

use crate::llm::ProviderError;

#[derive(Debug, Error)]
pub enum AppError {
    #[error("config error: {0}")]
    Config(String),

    #[error("system prompt {}: {reason}", path.display())]
    SystemPrompt { path: PathBuf, reason: String },

    #[error("llm provider: {0}")]
    Provider(#[from] ProviderError),

    #[error("logger error: {0}")]
    Logger(String),

    #[error("http channel: {0}")]
    Comms(String),

    #[error("io error: {0}")]
    Io(#[from] std::io::Error),
}
