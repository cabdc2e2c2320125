//! School days and day-sets.
//!
//! Classes meet Monday through Saturday. A [`DaySet`] is a six-bit set over
//! those days, so intersection is a single AND and iteration is always in
//! week order regardless of how the days were entered.

use std::fmt;
use std::str::FromStr;

use serde::{de, Deserialize, Deserializer, Serialize, Serializer};

use crate::error::{Result, ScheduleError};

/// A teaching day. Sunday is not schedulable.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum SchoolDay {
    Monday,
    Tuesday,
    Wednesday,
    Thursday,
    Friday,
    Saturday,
}

impl SchoolDay {
    /// All school days in week order.
    pub const ALL: [SchoolDay; 6] = [
        SchoolDay::Monday,
        SchoolDay::Tuesday,
        SchoolDay::Wednesday,
        SchoolDay::Thursday,
        SchoolDay::Friday,
        SchoolDay::Saturday,
    ];

    pub fn name(&self) -> &'static str {
        match self {
            SchoolDay::Monday => "Monday",
            SchoolDay::Tuesday => "Tuesday",
            SchoolDay::Wednesday => "Wednesday",
            SchoolDay::Thursday => "Thursday",
            SchoolDay::Friday => "Friday",
            SchoolDay::Saturday => "Saturday",
        }
    }

    fn bit(self) -> u8 {
        1 << (self as u8)
    }
}

impl FromStr for SchoolDay {
    type Err = ScheduleError;

    /// Parse a day name, ignoring case and surrounding whitespace.
    fn from_str(s: &str) -> Result<Self> {
        let trimmed = s.trim();
        SchoolDay::ALL
            .into_iter()
            .find(|day| day.name().eq_ignore_ascii_case(trimmed))
            .ok_or_else(|| ScheduleError::UnknownDay(s.to_string()))
    }
}

impl fmt::Display for SchoolDay {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl Serialize for SchoolDay {
    fn serialize<S: Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
        serializer.serialize_str(self.name())
    }
}

impl<'de> Deserialize<'de> for SchoolDay {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> std::result::Result<Self, D::Error> {
        let raw = String::deserialize(deserializer)?;
        raw.parse().map_err(de::Error::custom)
    }
}

/// An unordered, duplicate-free set of school days.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct DaySet(u8);

impl DaySet {
    pub const fn empty() -> Self {
        Self(0)
    }

    pub fn insert(&mut self, day: SchoolDay) {
        self.0 |= day.bit();
    }

    pub fn contains(&self, day: SchoolDay) -> bool {
        self.0 & day.bit() != 0
    }

    pub fn is_empty(&self) -> bool {
        self.0 == 0
    }

    pub fn len(&self) -> usize {
        self.0.count_ones() as usize
    }

    pub fn intersection(&self, other: &DaySet) -> DaySet {
        DaySet(self.0 & other.0)
    }

    /// True when the two sets share at least one day.
    pub fn intersects(&self, other: &DaySet) -> bool {
        !self.intersection(other).is_empty()
    }

    /// Days in week order.
    pub fn iter(&self) -> impl Iterator<Item = SchoolDay> + '_ {
        SchoolDay::ALL.into_iter().filter(move |day| self.contains(*day))
    }
}

impl FromIterator<SchoolDay> for DaySet {
    fn from_iter<I: IntoIterator<Item = SchoolDay>>(iter: I) -> Self {
        let mut set = DaySet::empty();
        for day in iter {
            set.insert(day);
        }
        set
    }
}

impl<const N: usize> From<[SchoolDay; N]> for DaySet {
    fn from(days: [SchoolDay; N]) -> Self {
        days.into_iter().collect()
    }
}

impl fmt::Display for DaySet {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let names: Vec<&str> = self.iter().map(|d| d.name()).collect();
        f.write_str(&names.join(", "))
    }
}

impl Serialize for DaySet {
    fn serialize<S: Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
        serializer.collect_seq(self.iter())
    }
}

impl<'de> Deserialize<'de> for DaySet {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> std::result::Result<Self, D::Error> {
        let days = Vec::<SchoolDay>::deserialize(deserializer)?;
        Ok(days.into_iter().collect())
    }
}
