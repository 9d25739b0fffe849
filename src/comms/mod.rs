//! External I/O channels.
//!
//! The only channel is the axum HTTP server. [`run`] drives it until the
//! shutdown token is cancelled or the server fails.

pub mod axum_channel;

use tokio_util::sync::CancellationToken;
use tracing::warn;

use crate::config::Config;
use crate::error::AppError;
use crate::relay::Relay;

use axum_channel::AxumChannel;

/// Run every enabled channel until shutdown.
///
/// Returns immediately with a warning when no channel is enabled.
pub async fn run(config: &Config, relay: Relay, shutdown: CancellationToken) -> Result<(), AppError> {
    if !config.comms_axum_should_load() {
        warn!("no comms channel enabled, nothing to serve");
        return Ok(());
    }

    AxumChannel::new("http", config.comms.axum_channel.bind.clone(), relay)
        .run(shutdown)
        .await
}
