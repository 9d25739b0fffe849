// Library root. Exposes internals for integration tests and the binaries.
// The server entry point is src/main.rs.

pub mod bootstrap;
pub mod client;
pub mod comms;
pub mod core;
pub mod llm;
pub mod relay;
pub mod tutor;

pub use crate::core::{config, error};
pub use bootstrap::logger;
