//! How Much Longer - A workday countdown with milestone notifications
//!
//! This is the main entry point for the how-much-longer daemon.

use std::sync::Arc;
use tokio::net::TcpListener;
use tracing::{error, info, warn};

use how_much_longer::{
    api::create_router,
    config::{Config, TICK_INTERVAL},
    countdown::CountdownEngine,
    services::{DesktopDispatcher, FileSettingsStore, LogDispatcher, NotificationDispatcher, SettingsStore},
    state::AppState,
    tasks::notification_dispatch_task,
    utils::shutdown_signal,
};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let config = Config::parse();

    // Initialize tracing with appropriate log level
    tracing_subscriber::fmt()
        .with_env_filter(format!("how_much_longer={},tower_http=info", config.log_level()))
        .init();

    info!("Starting how-much-longer v{}", env!("CARGO_PKG_VERSION"));

    let store = match &config.settings {
        Some(path) => FileSettingsStore::with_path(path),
        None => FileSettingsStore::new(),
    };
    info!("Settings file: {}", store.path().display());

    let settings = store.load();
    info!(
        "End of workday {}, work duration {}m, hourly={}, milestones={}",
        settings.end_of_workday.format("%H:%M"),
        settings.work_duration.num_minutes(),
        settings.enable_hourly_notifications,
        settings.enable_milestone_notifications,
    );

    let store: Arc<dyn SettingsStore> = Arc::new(store);
    let engine = CountdownEngine::with_system_clock(settings);
    let state = Arc::new(AppState::new(engine, store, TICK_INTERVAL));

    // Subscribe before the first tick so no notification is missed
    let dispatcher: Box<dyn NotificationDispatcher> = if config.log_only {
        Box::new(LogDispatcher)
    } else {
        Box::new(DesktopDispatcher::new())
    };
    let dispatch = tokio::spawn(notification_dispatch_task(state.subscribe(), dispatcher));

    if config.no_autostart {
        info!("Autostart disabled; POST /countdown/start to begin");
    } else {
        state.start_countdown().map_err(anyhow::Error::msg)?;
    }

    // Create HTTP router with all endpoints
    let app = create_router(Arc::clone(&state));

    let addr = config.address();
    let listener = TcpListener::bind(&addr).await?;

    info!("Server running on http://{}", addr);
    info!("Endpoints:");
    info!("  GET  /countdown         - Current countdown");
    info!("  POST /countdown/start   - Start the countdown");
    info!("  POST /countdown/stop    - Stop the countdown");
    info!("  GET  /settings          - Current settings");
    info!("  PUT  /settings          - Save workday hours and toggles");
    info!("  POST /settings/reload   - Reload the settings file");
    info!("  GET  /health            - Health check");

    let server = axum::serve(listener, app);

    tokio::select! {
        result = server => {
            if let Err(e) = result {
                error!("Server error: {}", e);
            }
        }
        result = shutdown_signal(Arc::clone(&state)) => {
            match result {
                Ok(()) => info!("Shutdown signal received"),
                Err(e) => error!("Signal handling failed: {}", e),
            }
        }
    }

    if let Err(e) = state.stop_countdown() {
        warn!("Failed to stop countdown: {}", e);
    }
    dispatch.abort();

    info!("Shutdown complete");
    Ok(())
}
