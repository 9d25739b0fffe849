//! Server configuration.
//!
//! `config/default.toml` (relative to the working directory) is read when no
//! `-f` path is given. A file may name a `[meta] base` file it overlays.
//! `PETIT_PROF_LOG_LEVEL` and `PETIT_PROF_BIND` beat the files; the model API
//! key only ever comes from `LLM_API_KEY`.

mod load;
mod raw;
mod types;

pub use load::{Overrides, expand_home, load, load_from};
pub use types::*;

#[cfg(test)]
impl Config {
    /// Echo provider on an ephemeral port; nothing leaves the process.
    pub fn test_default() -> Self {
        Self {
            name: "test".into(),
            log_level: "info".into(),
            comms: CommsConfig {
                axum_channel: AxumChannelConfig {
                    enabled: true,
                    bind: "127.0.0.1:0".into(),
                },
            },
            llm: LlmConfig {
                provider: "dummy".into(),
                ollama: OllamaConfig {
                    api_url: "http://localhost:0/api/chat".into(),
                    model: "test-model".into(),
                    timeout_seconds: 1,
                },
                openai: OpenAiConfig {
                    api_base_url: "http://localhost:0/v1/chat/completions".into(),
                    model: "test-model".into(),
                    temperature: 0.0,
                    timeout_seconds: 1,
                },
            },
            tutor: TutorConfig::default(),
            llm_api_key: None,
        }
    }
}
