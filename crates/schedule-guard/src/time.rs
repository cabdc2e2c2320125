//! Wall-clock time-of-day values for timetable slots.
//!
//! Times arrive from HTML `<input type="time">` fields as `"HH:MM"` (some
//! browsers append `":SS"`). They are stored at minute precision and always
//! written back as `"HH:MM"`.

use std::fmt;
use std::str::FromStr;

use chrono::{NaiveTime, Timelike};
use serde::{de, Deserialize, Deserializer, Serialize, Serializer};

use crate::error::{Result, ScheduleError};

/// A same-day time of day, 24-hour clock, minute precision.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct TimeOfDay(NaiveTime);

impl TimeOfDay {
    /// Build a time from an hour (0–23) and minute (0–59).
    pub fn from_hm(hour: u32, minute: u32) -> Option<Self> {
        NaiveTime::from_hms_opt(hour, minute, 0).map(Self)
    }

    pub fn hour(&self) -> u32 {
        self.0.hour()
    }

    pub fn minute(&self) -> u32 {
        self.0.minute()
    }

    /// Minutes elapsed since midnight.
    pub fn minutes_from_midnight(&self) -> u32 {
        self.hour() * 60 + self.minute()
    }

    /// Signed minutes from `self` to `later`.
    pub fn minutes_until(&self, later: TimeOfDay) -> i64 {
        (later.0 - self.0).num_minutes()
    }
}

impl FromStr for TimeOfDay {
    type Err = ScheduleError;

    fn from_str(s: &str) -> Result<Self> {
        let trimmed = s.trim();
        let parsed = NaiveTime::parse_from_str(trimmed, "%H:%M")
            .or_else(|_| NaiveTime::parse_from_str(trimmed, "%H:%M:%S"))
            .map_err(|_| ScheduleError::InvalidTime(s.to_string()))?;

        // Drop seconds; slots are compared at minute precision.
        Self::from_hm(parsed.hour(), parsed.minute())
            .ok_or_else(|| ScheduleError::InvalidTime(s.to_string()))
    }
}

impl fmt::Display for TimeOfDay {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0.format("%H:%M"))
    }
}

impl Serialize for TimeOfDay {
    fn serialize<S: Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

impl<'de> Deserialize<'de> for TimeOfDay {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> std::result::Result<Self, D::Error> {
        let raw = String::deserialize(deserializer)?;
        raw.parse().map_err(de::Error::custom)
    }
}
