//! Serde targets mirroring the TOML layout.
//!
//! Every table is `#[serde(default)]`, so a file only lists what it changes
//! and a missing file resolves to the `Default` impls below.

use serde::Deserialize;

const DEFAULT_BIND: &str = "0.0.0.0:8000";
const DEFAULT_TIMEOUT_SECONDS: u64 = 120;

#[derive(Deserialize, Default)]
#[serde(default)]
pub(super) struct RawConfig {
    pub server: RawServer,
    pub comms: RawComms,
    pub llm: RawLlm,
    pub tutor: RawTutor,
}

/// `[server]`
#[derive(Deserialize)]
#[serde(default)]
pub(super) struct RawServer {
    pub name: String,
    pub log_level: String,
}

impl Default for RawServer {
    fn default() -> Self {
        Self {
            name: "petit-prof".into(),
            log_level: "info".into(),
        }
    }
}

/// `[comms]`
#[derive(Deserialize, Default)]
#[serde(default)]
pub(super) struct RawComms {
    pub axum_channel: RawAxumChannel,
}

/// `[comms.axum_channel]`
#[derive(Deserialize)]
#[serde(default)]
pub(super) struct RawAxumChannel {
    pub enabled: bool,
    pub bind: String,
}

impl Default for RawAxumChannel {
    fn default() -> Self {
        Self {
            enabled: true,
            bind: DEFAULT_BIND.into(),
        }
    }
}

/// `[llm]`; the active provider key is spelled `default`.
#[derive(Deserialize)]
#[serde(default)]
pub(super) struct RawLlm {
    #[serde(rename = "default")]
    pub provider: String,
    pub ollama: RawOllama,
    pub openai: RawOpenAi,
}

impl Default for RawLlm {
    fn default() -> Self {
        Self {
            provider: "ollama".into(),
            ollama: RawOllama::default(),
            openai: RawOpenAi::default(),
        }
    }
}

/// `[llm.ollama]`
#[derive(Deserialize)]
#[serde(default)]
pub(super) struct RawOllama {
    pub api_url: String,
    pub model: String,
    pub timeout_seconds: u64,
}

impl Default for RawOllama {
    fn default() -> Self {
        Self {
            api_url: "http://localhost:11434/api/chat".into(),
            model: "mistral".into(),
            timeout_seconds: DEFAULT_TIMEOUT_SECONDS,
        }
    }
}

/// `[llm.openai]`
#[derive(Deserialize)]
#[serde(default)]
pub(super) struct RawOpenAi {
    pub api_base_url: String,
    pub model: String,
    pub temperature: f32,
    pub timeout_seconds: u64,
}

impl Default for RawOpenAi {
    fn default() -> Self {
        Self {
            api_base_url: "https://api.openai.com/v1/chat/completions".into(),
            model: "gpt-4o-mini".into(),
            temperature: 0.2,
            timeout_seconds: DEFAULT_TIMEOUT_SECONDS,
        }
    }
}

/// `[tutor]`
#[derive(Deserialize, Default)]
#[serde(default)]
pub(super) struct RawTutor {
    pub system_prompt_file: Option<String>,
}
