//! OS signal handling: shutdown and settings reload

use std::sync::Arc;
use futures::stream::StreamExt;
use signal_hook::consts::{SIGHUP, SIGINT, SIGTERM};
use signal_hook_tokio::Signals;
use tracing::{info, warn};

use crate::state::AppState;

/// Wait for a shutdown signal (SIGTERM, SIGINT).
///
/// SIGHUP reloads the settings file and keeps waiting.
pub async fn shutdown_signal(state: Arc<AppState>) -> std::io::Result<()> {
    let mut signals = Signals::new([SIGTERM, SIGINT, SIGHUP])?;

    while let Some(signal) = signals.next().await {
        if signal == SIGHUP {
            info!("Received SIGHUP, reloading settings");
            if let Err(e) = state.reload_settings() {
                warn!("Settings reload failed: {}", e);
            }
            continue;
        }
        info!("Received signal: {}", signal);
        break;
    }
    Ok(())
}
