//! Tick-driven countdown engine with exactly-once threshold notifications

use chrono::NaiveDateTime;
use tracing::{debug, info, trace};

use crate::state::Settings;
use super::{Clock, CountdownEvent, CountdownState, Milestone, SystemClock};

/// Which thresholds have already fired in the current day session.
///
/// Owned by the engine and swapped as a whole value, so a reset never leaves a
/// half-cleared set of flags behind.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct NotificationGateState {
    /// Hour value of the last hourly notification, `None` before the first one
    pub last_hour_notified: Option<i64>,
    pub halfway_notified: bool,
    pub one_hour_notified: bool,
    pub fifteen_minutes_notified: bool,
}

/// Converts (now, settings) into countdown snapshots and notification events
pub struct CountdownEngine {
    clock: Box<dyn Clock>,
    settings: Settings,
    gate: NotificationGateState,
    /// End time the current gate belongs to
    session_end: Option<NaiveDateTime>,
    running: bool,
}

impl CountdownEngine {
    /// Create a stopped engine reading time from `clock`
    pub fn new(settings: Settings, clock: Box<dyn Clock>) -> Self {
        Self {
            clock,
            settings,
            gate: NotificationGateState::default(),
            session_end: None,
            running: false,
        }
    }

    /// Create a stopped engine backed by the local system clock
    pub fn with_system_clock(settings: Settings) -> Self {
        Self::new(settings, Box::new(SystemClock))
    }

    pub fn settings(&self) -> &Settings {
        &self.settings
    }

    pub fn gate(&self) -> NotificationGateState {
        self.gate
    }

    pub fn is_running(&self) -> bool {
        self.running
    }

    /// Mark the engine as running. Returns false if it already was.
    pub fn start(&mut self) -> bool {
        let changed = !self.running;
        self.running = true;
        changed
    }

    /// Mark the engine as stopped. Returns false if it already was.
    pub fn stop(&mut self) -> bool {
        let changed = self.running;
        self.running = false;
        changed
    }

    /// Replace the settings snapshot and start a new day session.
    ///
    /// The gate is reset on every call, even when the settings are unchanged.
    pub fn update_settings(&mut self, settings: Settings) {
        info!(
            "Settings updated: end of workday {}, work duration {}m, hourly={}, milestones={}",
            settings.end_of_workday.format("%H:%M:%S"),
            settings.work_duration.num_minutes(),
            settings.enable_hourly_notifications,
            settings.enable_milestone_notifications,
        );
        self.settings = settings;
        self.gate = NotificationGateState::default();
        self.session_end = None;
    }

    /// Snapshot for the current clock reading, without touching the gate
    pub fn current_state(&self) -> CountdownState {
        CountdownState::compute(self.clock.now(), self.settings.end_of_workday)
    }

    /// Run one tick: read the clock, build the snapshot and check thresholds
    pub fn tick(&mut self) -> Vec<CountdownEvent> {
        let state = self.current_state();
        self.observe(state)
    }

    /// Start a new day session once the target end time moves forward
    fn roll_session(&mut self, end_time: NaiveDateTime) {
        match self.session_end {
            Some(previous) if end_time > previous => {
                info!("New day session ending at {}", end_time);
                self.gate = NotificationGateState::default();
                self.session_end = Some(end_time);
            }
            Some(_) => {}
            None => self.session_end = Some(end_time),
        }
    }

    /// Check thresholds against an already computed snapshot.
    ///
    /// `StateUpdated` is always the first event. Threshold checks are skipped
    /// entirely once the workday is over.
    pub fn observe(&mut self, state: CountdownState) -> Vec<CountdownEvent> {
        trace!("Countdown tick: {} remaining", state.formatted_time());
        self.roll_session(state.end_time());
        let mut events = vec![CountdownEvent::StateUpdated(state.clone())];

        if state.is_workday_over() {
            return events;
        }

        let settings = &self.settings;
        let mut gate = self.gate;

        if settings.enable_hourly_notifications {
            let remaining = state.time_remaining();
            let current_hour = remaining.num_hours();
            if current_hour > 0
                && gate.last_hour_notified != Some(current_hour)
                && remaining.num_minutes() % 60 == 0
            {
                info!("Hourly threshold reached: {} hour(s) left", current_hour);
                gate.last_hour_notified = Some(current_hour);
                events.push(CountdownEvent::Hourly { time_remaining: remaining });
            }
        }

        if settings.enable_milestone_notifications {
            let minutes = state.total_minutes_remaining();
            let halfway_point = settings.work_duration.num_milliseconds() as f64 / 60_000.0 / 2.0;

            let remaining = minutes as f64;
            if !gate.halfway_notified && remaining <= halfway_point && remaining >= halfway_point - 1.0 {
                gate.halfway_notified = true;
                events.push(fire(Milestone::Halfway));
            }

            if !gate.one_hour_notified && minutes <= 60 && minutes > 59 {
                gate.one_hour_notified = true;
                events.push(fire(Milestone::OneHourLeft));
            }

            if !gate.fifteen_minutes_notified && minutes <= 15 && minutes > 14 {
                gate.fifteen_minutes_notified = true;
                events.push(fire(Milestone::FifteenMinutesLeft));
            }
        }

        if gate != self.gate {
            debug!("Notification gate changed: {:?}", gate);
        }
        self.gate = gate;
        events
    }
}

fn fire(milestone: Milestone) -> CountdownEvent {
    info!("Milestone reached: {:?}", milestone);
    CountdownEvent::Milestone(milestone)
}
