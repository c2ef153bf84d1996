//! Notification dispatch backends

use std::{fmt, sync::Arc};
use async_trait::async_trait;
use chrono::TimeDelta;
use tracing::{debug, info, warn};

const APP_NAME: &str = "How Much Longer";
const WORKDAY_ENDED_MESSAGE: &str = "Workday is over! Time to go home!";

/// Renders the notifications requested by countdown events.
///
/// Implementations handle their own failures; nothing is reported back.
#[async_trait]
pub trait NotificationDispatcher: Send {
    async fn show_hourly(&mut self, time_remaining: TimeDelta);
    async fn show_milestone(&mut self, message: &str);
    async fn show_workday_ended(&mut self);
}

/// Body text for an hourly notification
pub fn hourly_message(time_remaining: TimeDelta) -> String {
    let hours = time_remaining.num_hours();
    let unit = if hours == 1 { "hour" } else { "hours" };
    format!("{} {} left until end of workday", hours, unit)
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Backend {
    Desktop,
    LogOnly,
}

/// Shows one notification body; runs on the blocking pool
pub type RenderFn = Arc<dyn Fn(&str) -> Result<(), String> + Send + Sync>;

fn render_with_notify_rust(body: &str) -> Result<(), String> {
    let mut notification = notify_rust::Notification::new();
    let shown = notification
        .appname(APP_NAME)
        .summary(APP_NAME)
        .body(body)
        .show();
    shown.map(|_| ()).map_err(|e| e.to_string())
}

/// Desktop notifications through notify-rust.
///
/// Falls back to log-only after the first failed notification.
pub struct DesktopDispatcher {
    backend: Backend,
    render: RenderFn,
}

impl fmt::Debug for DesktopDispatcher {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("DesktopDispatcher")
            .field("backend", &self.backend)
            .finish_non_exhaustive()
    }
}

impl Default for DesktopDispatcher {
    fn default() -> Self {
        Self::new()
    }
}

impl DesktopDispatcher {
    pub fn new() -> Self {
        Self::with_renderer(Arc::new(render_with_notify_rust))
    }

    /// Use `render` in place of notify-rust
    pub fn with_renderer(render: RenderFn) -> Self {
        debug!("Desktop notification dispatcher created");
        Self {
            backend: Backend::Desktop,
            render,
        }
    }

    pub fn is_log_only(&self) -> bool {
        self.backend == Backend::LogOnly
    }

    async fn show(&mut self, body: String) {
        if self.backend == Backend::LogOnly {
            info!("[NOTIFY] {}", body);
            return;
        }

        let text = body.clone();
        let render = Arc::clone(&self.render);
        let result = tokio::task::spawn_blocking(move || render(&text)).await;

        match result {
            Ok(Ok(())) => debug!("Notification shown: {}", body),
            Ok(Err(e)) => {
                warn!(error = %e, "Desktop notification failed; switching to log-only");
                self.backend = Backend::LogOnly;
                info!("[NOTIFY] {}", body);
            }
            Err(e) => {
                warn!(error = %e, "Notification task did not complete");
                info!("[NOTIFY] {}", body);
            }
        }
    }
}

#[async_trait]
impl NotificationDispatcher for DesktopDispatcher {
    async fn show_hourly(&mut self, time_remaining: TimeDelta) {
        self.show(hourly_message(time_remaining)).await;
    }

    async fn show_milestone(&mut self, message: &str) {
        self.show(message.to_string()).await;
    }

    async fn show_workday_ended(&mut self) {
        self.show(WORKDAY_ENDED_MESSAGE.to_string()).await;
    }
}

/// Writes notifications to the log only
#[derive(Debug, Clone, Copy, Default)]
pub struct LogDispatcher;

#[async_trait]
impl NotificationDispatcher for LogDispatcher {
    async fn show_hourly(&mut self, time_remaining: TimeDelta) {
        info!("[NOTIFY] {}", hourly_message(time_remaining));
    }

    async fn show_milestone(&mut self, message: &str) {
        info!("[NOTIFY] {}", message);
    }

    async fn show_workday_ended(&mut self) {
        info!("[NOTIFY] {}", WORKDAY_ENDED_MESSAGE);
    }
}
