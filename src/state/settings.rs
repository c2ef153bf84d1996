//! Workday settings and their on-disk representation

use chrono::{NaiveTime, TimeDelta, Timelike};
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Errors raised while validating, loading or saving settings
#[derive(Debug, Error)]
pub enum SettingsError {
    #[error("invalid time value: {0}")]
    InvalidTime(String),
    #[error("settings file I/O failed: {0}")]
    Io(#[from] std::io::Error),
    #[error("settings file is not valid JSON: {0}")]
    Json(#[from] serde_json::Error),
}

/// User settings, persisted as a camelCase JSON object.
///
/// Times are written as `HH:MM:SS`; missing fields fall back to the defaults.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct Settings {
    #[serde(with = "time_of_day")]
    pub end_of_workday: NaiveTime,
    #[serde(with = "time_of_day")]
    pub start_of_workday: NaiveTime,
    /// Only used to place the halfway milestone; may be zero or negative
    #[serde(with = "signed_duration")]
    pub work_duration: TimeDelta,
    pub enable_hourly_notifications: bool,
    pub enable_milestone_notifications: bool,
    pub minimize_to_tray_on_close: bool,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            end_of_workday: clock_time(17, 0),
            start_of_workday: clock_time(9, 0),
            work_duration: TimeDelta::hours(8),
            enable_hourly_notifications: true,
            enable_milestone_notifications: true,
            minimize_to_tray_on_close: true,
        }
    }
}

fn clock_time(hour: u32, minute: u32) -> NaiveTime {
    NaiveTime::from_hms_opt(hour, minute, 0).unwrap_or_default()
}

/// The settings dialog form: whole hours and minutes plus the toggles.
///
/// The work duration is not entered directly; it is derived from the two times.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WorkdayHours {
    pub end_hour: u32,
    pub end_minute: u32,
    pub start_hour: u32,
    pub start_minute: u32,
    pub enable_hourly_notifications: bool,
    pub enable_milestone_notifications: bool,
    pub minimize_to_tray_on_close: bool,
}

impl WorkdayHours {
    /// Check ranges and convert into full settings with `workDuration = end - start`
    pub fn into_settings(self) -> Result<Settings, SettingsError> {
        let end = form_time("end", self.end_hour, self.end_minute)?;
        let start = form_time("start", self.start_hour, self.start_minute)?;

        Ok(Settings {
            end_of_workday: end,
            start_of_workday: start,
            work_duration: end.signed_duration_since(start),
            enable_hourly_notifications: self.enable_hourly_notifications,
            enable_milestone_notifications: self.enable_milestone_notifications,
            minimize_to_tray_on_close: self.minimize_to_tray_on_close,
        })
    }
}

impl From<&Settings> for WorkdayHours {
    fn from(settings: &Settings) -> Self {
        Self {
            end_hour: settings.end_of_workday.hour(),
            end_minute: settings.end_of_workday.minute(),
            start_hour: settings.start_of_workday.hour(),
            start_minute: settings.start_of_workday.minute(),
            enable_hourly_notifications: settings.enable_hourly_notifications,
            enable_milestone_notifications: settings.enable_milestone_notifications,
            minimize_to_tray_on_close: settings.minimize_to_tray_on_close,
        }
    }
}

fn form_time(which: &str, hour: u32, minute: u32) -> Result<NaiveTime, SettingsError> {
    if hour > 23 || minute > 59 {
        return Err(SettingsError::InvalidTime(format!(
            "{which} of workday {hour}:{minute:02} is out of range"
        )));
    }
    NaiveTime::from_hms_opt(hour, minute, 0)
        .ok_or_else(|| SettingsError::InvalidTime(format!("{which} of workday {hour}:{minute:02}")))
}

/// Parse `[-][d.]H:M[:S[.fraction]]` into a signed duration.
/// Any fractional seconds are dropped.
pub fn parse_clock_duration(raw: &str) -> Result<TimeDelta, SettingsError> {
    let invalid = || SettingsError::InvalidTime(raw.to_string());

    let trimmed = raw.trim();
    let (negative, body) = match trimmed.strip_prefix('-') {
        Some(rest) => (true, rest),
        None => (false, trimmed),
    };

    let parts: Vec<&str> = body.split(':').collect();
    if parts.len() < 2 || parts.len() > 3 {
        return Err(invalid());
    }

    let (days, hours) = match parts[0].split_once('.') {
        Some((d, h)) => (d.parse::<i64>().map_err(|_| invalid())?, h),
        None => (0, parts[0]),
    };
    let hours = hours.parse::<i64>().map_err(|_| invalid())?;
    let minutes = parts[1].parse::<i64>().map_err(|_| invalid())?;
    let seconds = match parts.get(2) {
        Some(s) => {
            let whole = s.split('.').next().unwrap_or_default();
            whole.parse::<i64>().map_err(|_| invalid())?
        }
        None => 0,
    };

    if days < 0 || hours < 0 || !(0..60).contains(&minutes) || !(0..60).contains(&seconds) {
        return Err(invalid());
    }
    if days > 0 && hours > 23 {
        return Err(invalid());
    }

    let total = TimeDelta::try_days(days)
        .zip(TimeDelta::try_hours(hours))
        .and_then(|(d, h)| d.checked_add(&h))
        .and_then(|t| t.checked_add(&TimeDelta::minutes(minutes)))
        .and_then(|t| t.checked_add(&TimeDelta::seconds(seconds)))
        .ok_or_else(invalid)?;

    Ok(if negative { -total } else { total })
}

/// Format a signed duration as `[-][d.]HH:MM:SS`
pub fn format_clock_duration(duration: TimeDelta) -> String {
    let sign = if duration < TimeDelta::zero() { "-" } else { "" };
    let total = duration.num_seconds().abs();
    let days = total / 86_400;
    let hours = (total % 86_400) / 3600;
    let minutes = (total % 3600) / 60;
    let seconds = total % 60;

    if days > 0 {
        format!("{sign}{days}.{hours:02}:{minutes:02}:{seconds:02}")
    } else {
        format!("{sign}{hours:02}:{minutes:02}:{seconds:02}")
    }
}

/// Parse a time of day written as `H:M` or `H:M:S`
pub fn parse_time_of_day(raw: &str) -> Result<NaiveTime, SettingsError> {
    let duration = parse_clock_duration(raw)?;
    if duration < TimeDelta::zero() || duration >= TimeDelta::days(1) {
        return Err(SettingsError::InvalidTime(raw.to_string()));
    }
    let seconds = duration.num_seconds() as u32;
    NaiveTime::from_num_seconds_from_midnight_opt(seconds, 0)
        .ok_or_else(|| SettingsError::InvalidTime(raw.to_string()))
}

mod time_of_day {
    use chrono::NaiveTime;
    use serde::{Deserialize, Deserializer, Serializer};

    pub fn serialize<S: Serializer>(time: &NaiveTime, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&time.format("%H:%M:%S").to_string())
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(deserializer: D) -> Result<NaiveTime, D::Error> {
        let raw = String::deserialize(deserializer)?;
        super::parse_time_of_day(&raw).map_err(serde::de::Error::custom)
    }
}

mod signed_duration {
    use chrono::TimeDelta;
    use serde::{Deserialize, Deserializer, Serializer};

    pub fn serialize<S: Serializer>(duration: &TimeDelta, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&super::format_clock_duration(*duration))
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(deserializer: D) -> Result<TimeDelta, D::Error> {
        let raw = String::deserialize(deserializer)?;
        super::parse_clock_duration(&raw).map_err(serde::de::Error::custom)
    }
}
