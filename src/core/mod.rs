//! Process-wide plumbing shared by the server and the CLI client.
//!
//! `config` resolves `config/default.toml` (plus overlays and env overrides)
//! into typed settings; `error` is the startup error enum.

pub mod config;
pub mod error;
