//! Countdown snapshot computed on every tick

use chrono::{NaiveDateTime, NaiveTime, TimeDelta};

/// Immutable snapshot of the countdown at one instant.
///
/// A fresh value is built for every tick; nothing about it carries over to the
/// next one.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CountdownState {
    current_time: NaiveDateTime,
    end_time: NaiveDateTime,
    time_remaining: TimeDelta,
}

impl CountdownState {
    /// Build a snapshot from explicit timestamps, without rolling the end time forward
    pub fn new(current_time: NaiveDateTime, end_time: NaiveDateTime) -> Self {
        Self {
            current_time,
            end_time,
            time_remaining: end_time - current_time,
        }
    }

    /// Build the snapshot for `now`, pointing at the next occurrence of `end_of_workday`.
    ///
    /// The end time is today's date at `end_of_workday`; once `now` is past it the
    /// target moves to the same time tomorrow.
    pub fn compute(now: NaiveDateTime, end_of_workday: NaiveTime) -> Self {
        let mut end_time = now.date().and_time(end_of_workday);
        if now > end_time {
            end_time += TimeDelta::days(1);
        }
        Self::new(now, end_time)
    }

    pub fn current_time(&self) -> NaiveDateTime {
        self.current_time
    }

    pub fn end_time(&self) -> NaiveDateTime {
        self.end_time
    }

    /// Signed time left until the end time
    pub fn time_remaining(&self) -> TimeDelta {
        self.time_remaining
    }

    /// Whole minutes remaining, truncated toward zero
    pub fn total_minutes_remaining(&self) -> i64 {
        self.time_remaining.num_minutes()
    }

    /// Whole seconds remaining, truncated toward zero
    pub fn total_seconds_remaining(&self) -> i64 {
        self.time_remaining.num_seconds()
    }

    /// Remaining time as `HH:MM:SS`, or `00:00:00` once the end time has passed
    pub fn formatted_time(&self) -> String {
        if self.time_remaining < TimeDelta::zero() {
            return "00:00:00".to_string();
        }
        format!(
            "{:02}:{:02}:{:02}",
            self.time_remaining.num_hours(),
            self.time_remaining.num_minutes() % 60,
            self.time_remaining.num_seconds() % 60,
        )
    }

    pub fn is_workday_over(&self) -> bool {
        self.time_remaining <= TimeDelta::zero()
    }

    pub fn is_overtime(&self) -> bool {
        self.time_remaining < TimeDelta::zero()
    }

    /// Short human-readable status line for presentation
    pub fn status_message(&self) -> &'static str {
        if self.is_overtime() {
            "You're in overtime! 🔥"
        } else {
            "Time until end of workday"
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    fn at(hour: u32, minute: u32, second: u32) -> NaiveDateTime {
        NaiveDate::from_ymd_opt(2024, 5, 14)
            .unwrap()
            .and_hms_opt(hour, minute, second)
            .unwrap()
    }

    fn time(hour: u32, minute: u32) -> NaiveTime {
        NaiveTime::from_hms_opt(hour, minute, 0).unwrap()
    }

    #[test]
    fn one_hour_before_end() {
        let state = CountdownState::compute(at(16, 0, 0), time(17, 0));
        assert_eq!(state.end_time(), at(17, 0, 0));
        assert_eq!(state.time_remaining(), TimeDelta::hours(1));
        assert_eq!(state.total_minutes_remaining(), 60);
        assert_eq!(state.total_seconds_remaining(), 3600);
        assert_eq!(state.formatted_time(), "01:00:00");
        assert!(!state.is_workday_over());
    }

    #[test]
    fn end_time_rolls_forward_after_deadline() {
        let state = CountdownState::compute(at(17, 5, 0), time(17, 0));
        assert_eq!(state.end_time(), at(17, 0, 0) + TimeDelta::days(1));
        assert_eq!(state.formatted_time(), "23:55:00");
        assert!(!state.is_overtime());
    }

    #[test]
    fn end_time_is_next_occurrence_for_every_minute_of_the_day() {
        let end = time(8, 30);
        let start = at(0, 0, 0);
        for minute in 0..(24 * 60) {
            let now = start + TimeDelta::minutes(minute);
            let state = CountdownState::compute(now, end);
            assert!(state.end_time() >= now);
            assert!(state.end_time() - now < TimeDelta::days(1));
            assert_eq!(state.end_time().time(), end);
        }
    }

    #[test]
    fn exactly_at_end_is_over_but_not_overtime() {
        let state = CountdownState::compute(at(17, 0, 0), time(17, 0));
        assert_eq!(state.end_time(), at(17, 0, 0));
        assert!(state.is_workday_over());
        assert!(!state.is_overtime());
        assert_eq!(state.formatted_time(), "00:00:00");
    }

    #[test]
    fn overtime_is_clamped() {
        let state = CountdownState::new(at(17, 5, 0), at(17, 0, 0));
        assert!(state.is_overtime());
        assert!(state.is_workday_over());
        assert_eq!(state.formatted_time(), "00:00:00");
        assert_eq!(state.total_minutes_remaining(), -5);
        assert_eq!(state.status_message(), "You're in overtime! 🔥");
    }

    #[test]
    fn partial_minutes_truncate_toward_zero() {
        let state = CountdownState::new(at(16, 44, 30), at(17, 0, 0));
        assert_eq!(state.total_minutes_remaining(), 15);
        assert_eq!(state.formatted_time(), "00:15:30");

        let late = CountdownState::new(at(17, 0, 30), at(17, 0, 0));
        assert_eq!(late.total_minutes_remaining(), 0);
        assert_eq!(late.total_seconds_remaining(), -30);
    }

    #[test]
    fn formatted_time_is_eight_characters() {
        for seconds in [1, 59, 61, 3599, 3601, 36_000, 86_399] {
            let state = CountdownState::new(at(0, 0, 0), at(0, 0, 0) + TimeDelta::seconds(seconds));
            assert_eq!(state.formatted_time().len(), 8, "{seconds}s");
        }
    }
}
