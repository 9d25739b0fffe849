//! TOML loading, `[meta] base` chains, env overrides and validation.

use std::collections::HashSet;
use std::env;
use std::fs;
use std::net::SocketAddr;
use std::path::{Path, PathBuf};

use serde::Deserialize;

use crate::error::AppError;

use super::raw::RawConfig;
use super::types::*;

const DEFAULT_CONFIG_PATH: &str = "config/default.toml";

/// Values that beat whatever the TOML files say.
#[derive(Debug, Clone, Default)]
pub struct Overrides {
    /// `PETIT_PROF_LOG_LEVEL`
    pub log_level: Option<String>,
    /// `PETIT_PROF_BIND`
    pub bind: Option<String>,
}

impl Overrides {
    pub fn from_env() -> Self {
        let var = |name: &str| env::var(name).ok().filter(|v| !v.trim().is_empty());
        Self {
            log_level: var("PETIT_PROF_LOG_LEVEL"),
            bind: var("PETIT_PROF_BIND"),
        }
    }
}

/// Tables merge key by key; any other value in `overlay` replaces `base`.
fn merge_toml(base: toml::Value, overlay: toml::Value) -> toml::Value {
    match (base, overlay) {
        (toml::Value::Table(mut merged), toml::Value::Table(overlay)) => {
            for (key, value) in overlay {
                let value = match merged.remove(&key) {
                    Some(prev) => merge_toml(prev, value),
                    None => value,
                };
                merged.insert(key, value);
            }
            toml::Value::Table(merged)
        }
        (_, overlay) => overlay,
    }
}

fn read_toml(path: &Path) -> Result<toml::Value, AppError> {
    let text = fs::read_to_string(path)
        .map_err(|e| AppError::Config(format!("cannot read {}: {e}", path.display())))?;
    toml::from_str(&text)
        .map_err(|e| AppError::Config(format!("parse error in {}: {e}", path.display())))
}

fn base_of(path: &Path, doc: &toml::Value) -> Option<PathBuf> {
    let base = doc.get("meta")?.get("base")?.as_str()?;
    let base = Path::new(base);
    Some(if base.is_absolute() {
        base.to_path_buf()
    } else {
        path.parent().unwrap_or(Path::new(".")).join(base)
    })
}

/// Walk `path` → base → base-of-base, then fold the chain root-first so the
/// file the user named has the last word.
fn read_chain(path: &Path) -> Result<toml::Value, AppError> {
    let mut seen = HashSet::new();
    let mut docs = Vec::new();
    let mut next = Some(path.to_path_buf());

    while let Some(current) = next {
        let key = current.canonicalize().unwrap_or_else(|_| current.clone());
        if !seen.insert(key) {
            return Err(AppError::Config(format!(
                "circular base reference detected at: {}",
                current.display()
            )));
        }
        let doc = read_toml(&current)?;
        next = base_of(&current, &doc);
        docs.push(doc);
    }

    let mut docs = docs.into_iter().rev();
    let root = docs.next().unwrap_or_else(|| toml::Value::Table(Default::default()));
    Ok(docs.fold(root, merge_toml))
}

/// Load `config_path`, or `config/default.toml` when it exists, or the
/// built-in defaults; env overrides apply in every case.
pub fn load(config_path: Option<&str>) -> Result<Config, AppError> {
    let overrides = Overrides::from_env();

    match config_path {
        Some(path) => load_from(Path::new(path), &overrides),
        None if Path::new(DEFAULT_CONFIG_PATH).exists() => {
            load_from(Path::new(DEFAULT_CONFIG_PATH), &overrides)
        }
        None => resolve(RawConfig::default(), &overrides),
    }
}

/// Load one file (and its base chain) with explicit overrides.
pub fn load_from(path: &Path, overrides: &Overrides) -> Result<Config, AppError> {
    let merged = read_chain(path)?;
    let raw = RawConfig::deserialize(merged).map_err(|e: toml::de::Error| {
        AppError::Config(format!("config error in {}: {e}", path.display()))
    })?;
    resolve(raw, overrides)
}

fn resolve(raw: RawConfig, overrides: &Overrides) -> Result<Config, AppError> {
    let bind = overrides.bind.clone().unwrap_or(raw.comms.axum_channel.bind);
    if raw.comms.axum_channel.enabled && bind.parse::<SocketAddr>().is_err() {
        return Err(AppError::Config(format!(
            "comms.axum_channel.bind '{bind}' is not a socket address"
        )));
    }

    let config = Config {
        name: raw.server.name,
        log_level: overrides.log_level.clone().unwrap_or(raw.server.log_level),
        comms: CommsConfig {
            axum_channel: AxumChannelConfig {
                enabled: raw.comms.axum_channel.enabled,
                bind,
            },
        },
        llm: LlmConfig {
            provider: raw.llm.provider,
            ollama: OllamaConfig {
                api_url: raw.llm.ollama.api_url,
                model: raw.llm.ollama.model,
                timeout_seconds: raw.llm.ollama.timeout_seconds,
            },
            openai: OpenAiConfig {
                api_base_url: raw.llm.openai.api_base_url,
                model: raw.llm.openai.model,
                temperature: raw.llm.openai.temperature,
                timeout_seconds: raw.llm.openai.timeout_seconds,
            },
        },
        tutor: TutorConfig {
            system_prompt_file: raw.tutor.system_prompt_file.as_deref().map(expand_home),
        },
        llm_api_key: env::var("LLM_API_KEY").ok().filter(|k| !k.is_empty()),
    };

    if config.llm.provider != "dummy" {
        if config.llm.active_model().trim().is_empty() {
            return Err(AppError::Config(format!(
                "llm provider '{}' has an empty model name",
                config.llm.provider
            )));
        }
        if config.llm.active_timeout_seconds() == 0 {
            return Err(AppError::Config(format!(
                "llm provider '{}' needs timeout_seconds > 0",
                config.llm.provider
            )));
        }
    }

    Ok(config)
}

/// `~/x` → `$HOME/x`; anything else is returned as is.
pub fn expand_home(path: &str) -> PathBuf {
    match path {
        "~" => dirs::home_dir().unwrap_or_else(|| PathBuf::from(path)),
        p => match (p.strip_prefix("~/"), dirs::home_dir()) {
            (Some(rest), Some(home)) => home.join(rest),
            _ => PathBuf::from(p),
        },
    }
}
