//! Main application state management

use std::{
    sync::{Arc, Mutex},
    time::{Duration, Instant},
};
use tokio::{
    sync::{broadcast, watch},
    task::JoinHandle,
};
use tracing::{debug, info, warn};

use crate::{
    countdown::{CountdownEngine, CountdownEvent, CountdownState},
    services::SettingsStore,
    tasks::countdown_ticker_task,
};
use super::Settings;

/// The engine plus the id of the ticker task allowed to drive it
struct EngineSlot {
    engine: CountdownEngine,
    driver_id: u64,
}

/// Shared application state: the countdown engine and its output channels
pub struct AppState {
    /// Engine and driver bookkeeping; every tick runs while holding this lock
    engine: Mutex<EngineSlot>,
    /// Handle of the running ticker task, locked before `engine` when both are needed
    ticker: Mutex<Option<JoinHandle<()>>>,
    store: Arc<dyn SettingsStore>,
    pub tick_interval: Duration,
    pub start_time: Instant,
    /// Every engine event, in tick order
    pub event_tx: broadcast::Sender<CountdownEvent>,
    /// Latest countdown snapshot, `None` until the first tick
    pub state_tx: watch::Sender<Option<CountdownState>>,
    /// Keep the receiver alive to prevent channel closure
    pub _state_rx: watch::Receiver<Option<CountdownState>>,
}

impl AppState {
    pub fn new(engine: CountdownEngine, store: Arc<dyn SettingsStore>, tick_interval: Duration) -> Self {
        let (event_tx, _) = broadcast::channel(100);
        let (state_tx, state_rx) = watch::channel(None);

        Self {
            engine: Mutex::new(EngineSlot { engine, driver_id: 0 }),
            ticker: Mutex::new(None),
            store,
            tick_interval,
            start_time: Instant::now(),
            event_tx,
            state_tx,
            _state_rx: state_rx,
        }
    }

    /// Subscribe to engine events
    pub fn subscribe(&self) -> broadcast::Receiver<CountdownEvent> {
        self.event_tx.subscribe()
    }

    /// Watch the latest countdown snapshot
    pub fn watch_state(&self) -> watch::Receiver<Option<CountdownState>> {
        self.state_tx.subscribe()
    }

    pub fn latest_state(&self) -> Option<CountdownState> {
        self.state_tx.borrow().clone()
    }

    pub fn is_running(&self) -> Result<bool, String> {
        self.engine
            .lock()
            .map(|slot| slot.engine.is_running())
            .map_err(|e| format!("Failed to lock countdown engine: {}", e))
    }

    /// Get the current settings snapshot
    pub fn settings(&self) -> Result<Settings, String> {
        self.engine
            .lock()
            .map(|slot| slot.engine.settings().clone())
            .map_err(|e| format!("Failed to lock countdown engine: {}", e))
    }

    /// Hand new settings to the engine, starting a new day session
    pub fn update_settings(&self, settings: Settings) -> Result<(), String> {
        let mut slot = self.engine.lock()
            .map_err(|e| format!("Failed to lock countdown engine: {}", e))?;
        slot.engine.update_settings(settings);
        Ok(())
    }

    /// Persist settings through the store, then apply them
    pub fn save_settings(&self, settings: Settings) -> Result<(), String> {
        self.store
            .save(&settings)
            .map_err(|e| format!("Failed to save settings: {}", e))?;
        self.update_settings(settings)
    }

    /// Re-read settings from the store and apply them
    pub fn reload_settings(&self) -> Result<Settings, String> {
        let settings = self.store.load();
        self.update_settings(settings.clone())?;
        info!("Settings reloaded from store");
        Ok(settings)
    }

    /// Start the periodic ticker. Returns false if it was already running.
    pub fn start_countdown(self: &Arc<Self>) -> Result<bool, String> {
        let mut ticker = self.ticker.lock()
            .map_err(|e| format!("Failed to lock ticker handle: {}", e))?;

        let driver_id = {
            let mut slot = self.engine.lock()
                .map_err(|e| format!("Failed to lock countdown engine: {}", e))?;
            if !slot.engine.start() {
                debug!("Countdown already running");
                return Ok(false);
            }
            slot.driver_id += 1;
            slot.driver_id
        };

        if let Some(stale) = ticker.take() {
            stale.abort();
        }
        *ticker = Some(tokio::spawn(countdown_ticker_task(Arc::clone(self), driver_id)));

        info!("Countdown started");
        Ok(true)
    }

    /// Stop the periodic ticker. Returns false if it was not running.
    ///
    /// Any tick already in progress finishes first; none starts after this returns.
    pub fn stop_countdown(&self) -> Result<bool, String> {
        let mut ticker = self.ticker.lock()
            .map_err(|e| format!("Failed to lock ticker handle: {}", e))?;

        let stopped = {
            let mut slot = self.engine.lock()
                .map_err(|e| format!("Failed to lock countdown engine: {}", e))?;
            slot.engine.stop()
        };

        if let Some(handle) = ticker.take() {
            handle.abort();
        }

        if stopped {
            info!("Countdown stopped");
        }
        Ok(stopped)
    }

    /// Run one tick on behalf of ticker `driver_id` and publish its events.
    ///
    /// Returns `None` when the countdown is stopped or another ticker has
    /// taken over, telling the caller to exit.
    pub fn tick(&self, driver_id: u64) -> Result<Option<Vec<CountdownEvent>>, String> {
        let mut slot = self.engine.lock()
            .map_err(|e| format!("Failed to lock countdown engine: {}", e))?;

        if !slot.engine.is_running() || slot.driver_id != driver_id {
            return Ok(None);
        }

        let events = slot.engine.tick();
        self.publish(&events);
        Ok(Some(events))
    }

    /// Fan events out to subscribers without waiting on any of them
    fn publish(&self, events: &[CountdownEvent]) {
        for event in events {
            if let CountdownEvent::StateUpdated(state) = event {
                if let Err(e) = self.state_tx.send(Some(state.clone())) {
                    warn!("Failed to send countdown state: {}", e);
                }
            }
            if self.event_tx.send(event.clone()).is_err() {
                debug!("No subscribers for {} event", event.name());
            }
        }
    }

    /// Calculate uptime as a formatted string
    pub fn get_uptime(&self) -> String {
        let duration = self.start_time.elapsed();
        let hours = duration.as_secs() / 3600;
        let minutes = (duration.as_secs() % 3600) / 60;
        let seconds = duration.as_secs() % 60;

        if hours > 0 {
            format!("{}h {}m {}s", hours, minutes, seconds)
        } else if minutes > 0 {
            format!("{}m {}s", minutes, seconds)
        } else {
            format!("{}s", seconds)
        }
    }
}
