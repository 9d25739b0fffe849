//! Public configuration types.
//!
//! These are the resolved, ready-to-use structs the server consumes.
//! Raw TOML deserialization types live in `raw.rs`.

use std::path::PathBuf;

// ── Comms ───────────────────────────────────────────────────────────────────

/// Axum HTTP channel configuration.
#[derive(Debug, Clone)]
pub struct AxumChannelConfig {
    /// Whether the axum channel is explicitly enabled.
    pub enabled: bool,
    /// Socket address to bind the axum listener to.
    pub bind: String,
}

#[derive(Debug, Clone)]
pub struct CommsConfig {
    pub axum_channel: AxumChannelConfig,
}

// ── LLM ──────────────────────────────────────────────────────────────────────

/// Ollama native chat provider configuration (`[llm.ollama]`).
#[derive(Debug, Clone)]
pub struct OllamaConfig {
    /// Full `/api/chat` endpoint URL.
    pub api_url: String,
    /// Model name passed in the request body.
    pub model: String,
    /// Per-request HTTP timeout in seconds.
    pub timeout_seconds: u64,
}

/// OpenAI / OpenAI-compatible provider configuration (`[llm.openai]`).
#[derive(Debug, Clone)]
pub struct OpenAiConfig {
    /// Full chat completions endpoint URL.
    pub api_base_url: String,
    /// Model name passed in the request body.
    pub model: String,
    /// Sampling temperature (ignored for models that forbid it).
    pub temperature: f32,
    /// Per-request HTTP timeout in seconds.
    pub timeout_seconds: u64,
}

/// LLM boundary configuration.
#[derive(Debug, Clone)]
pub struct LlmConfig {
    /// Which provider is active (`"ollama"`, `"openai"`, `"dummy"`).
    pub provider: String,
    pub ollama: OllamaConfig,
    pub openai: OpenAiConfig,
}

impl LlmConfig {
    /// Model identifier of the active provider, for logs and the startup summary.
    pub fn active_model(&self) -> &str {
        match self.provider.as_str() {
            "openai" | "openai-compatible" => &self.openai.model,
            "dummy" => "echo",
            _ => &self.ollama.model,
        }
    }

    /// Timeout of the active provider in seconds.
    pub fn active_timeout_seconds(&self) -> u64 {
        match self.provider.as_str() {
            "openai" | "openai-compatible" => self.openai.timeout_seconds,
            "dummy" => 0,
            _ => self.ollama.timeout_seconds,
        }
    }
}

// ── Tutor ────────────────────────────────────────────────────────────────────

#[derive(Debug, Clone, Default)]
pub struct TutorConfig {
    /// Replaces the built-in system directive when set (already `~`-expanded).
    pub system_prompt_file: Option<PathBuf>,
}

// ── Config (root) ────────────────────────────────────────────────────────────

/// Fully-resolved server configuration.
#[derive(Debug, Clone)]
pub struct Config {
    pub name: String,
    pub log_level: String,
    pub comms: CommsConfig,
    pub llm: LlmConfig,
    pub tutor: TutorConfig,
    /// API key from `LLM_API_KEY` env var, never from TOML.
    pub llm_api_key: Option<String>,
}

impl Config {
    /// Returns `true` if the axum channel should be loaded.
    pub fn comms_axum_should_load(&self) -> bool {
        self.comms.axum_channel.enabled
    }
}
