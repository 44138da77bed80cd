use std::fmt;
use std::str::FromStr;

use chrono::{NaiveTime, Timelike};
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use thiserror::Error;

pub const MINUTES_PER_DAY: u16 = 24 * 60;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum TimeError {
    #[error("Minute of day out of range: {0}")]
    OutOfRange(u32),

    #[error("Invalid time '{0}', expected HH:MM")]
    Malformed(String),
}

/// A wall-clock time expressed as minutes since midnight, `0..1440`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct MinuteOfDay(u16);

impl MinuteOfDay {
    pub fn new(minutes: u16) -> Result<Self, TimeError> {
        if minutes >= MINUTES_PER_DAY {
            return Err(TimeError::OutOfRange(minutes as u32));
        }
        Ok(Self(minutes))
    }

    pub fn from_hm(hour: u16, minute: u16) -> Result<Self, TimeError> {
        if minute >= 60 {
            return Err(TimeError::OutOfRange(hour as u32 * 60 + minute as u32));
        }
        Self::new(hour.saturating_mul(60).saturating_add(minute))
    }

    pub fn minutes(self) -> u16 {
        self.0
    }

    pub fn hour(self) -> u16 {
        self.0 / 60
    }

    pub fn minute(self) -> u16 {
        self.0 % 60
    }

    pub fn is_aligned_to(self, granularity: u16) -> bool {
        granularity != 0 && self.0 % granularity == 0
    }

    pub fn to_naive_time(self) -> NaiveTime {
        NaiveTime::from_num_seconds_from_midnight_opt(self.0 as u32 * 60, 0)
            .unwrap_or(NaiveTime::MIN)
    }
}

impl From<NaiveTime> for MinuteOfDay {
    fn from(time: NaiveTime) -> Self {
        Self((time.hour() * 60 + time.minute()) as u16)
    }
}

impl FromStr for MinuteOfDay {
    type Err = TimeError;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        let trimmed = value.trim();
        NaiveTime::parse_from_str(trimmed, "%H:%M")
            .map(MinuteOfDay::from)
            .map_err(|_| TimeError::Malformed(trimmed.to_string()))
    }
}

impl fmt::Display for MinuteOfDay {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:02}:{:02}", self.hour(), self.minute())
    }
}

impl Serialize for MinuteOfDay {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

#[derive(Deserialize)]
#[serde(untagged)]
enum MinuteOfDayRepr {
    Minutes(u16),
    Text(String),
}

impl<'de> Deserialize<'de> for MinuteOfDay {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        match MinuteOfDayRepr::deserialize(deserializer)? {
            MinuteOfDayRepr::Minutes(minutes) => {
                MinuteOfDay::new(minutes).map_err(serde::de::Error::custom)
            }
            MinuteOfDayRepr::Text(text) => text.parse().map_err(serde::de::Error::custom),
        }
    }
}
