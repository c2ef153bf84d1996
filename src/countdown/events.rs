//! Events produced by the countdown engine

use std::fmt;
use chrono::TimeDelta;

use super::CountdownState;

/// Fixed points in the workday that get a one-off notification
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Milestone {
    Halfway,
    OneHourLeft,
    FifteenMinutesLeft,
}

impl Milestone {
    pub fn message(&self) -> &'static str {
        match self {
            Milestone::Halfway => "Halfway there! 🎯",
            Milestone::OneHourLeft => "Just 1 hour left! ⏰",
            Milestone::FifteenMinutesLeft => "Only 15 minutes to go! 🏁",
        }
    }
}

impl fmt::Display for Milestone {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.message())
    }
}

/// Output of a single engine tick
#[derive(Debug, Clone, PartialEq)]
pub enum CountdownEvent {
    /// Emitted first on every tick
    StateUpdated(CountdownState),
    /// Remaining time just reached a whole hour
    Hourly { time_remaining: TimeDelta },
    Milestone(Milestone),
}

impl CountdownEvent {
    pub fn name(&self) -> &'static str {
        match self {
            CountdownEvent::StateUpdated(_) => "state-updated",
            CountdownEvent::Hourly { .. } => "hourly-notification",
            CountdownEvent::Milestone(_) => "milestone-notification",
        }
    }

    /// True for the events that should reach the notification dispatcher
    pub fn is_notification(&self) -> bool {
        !matches!(self, CountdownEvent::StateUpdated(_))
    }
}
