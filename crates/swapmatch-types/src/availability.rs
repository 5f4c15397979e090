//! Recurring weekly availability.
//!
//! A slot applies to every weekday whose bit is set in its [`DayBitmask`]
//! (bit 0 = Monday ... bit 6 = Sunday) and covers `[start_time, end_time)`.

use chrono::{DateTime, NaiveTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use std::fmt;
use std::str::FromStr;

use crate::error::AvailabilityError;
use crate::id::uuid_id;
use crate::user::UserId;

uuid_id!(
    /// Identifier of an availability slot.
    SlotId
);

/// Time-of-day wire format.
pub const TIME_FORMAT: &str = "%H:%M";

/// Maximum label length in characters.
pub const MAX_LABEL_LEN: usize = 100;

/// Day of the week, Monday first.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum Weekday {
    Monday,
    Tuesday,
    Wednesday,
    Thursday,
    Friday,
    Saturday,
    Sunday,
}

impl Weekday {
    pub const ALL: [Weekday; 7] = [
        Weekday::Monday,
        Weekday::Tuesday,
        Weekday::Wednesday,
        Weekday::Thursday,
        Weekday::Friday,
        Weekday::Saturday,
        Weekday::Sunday,
    ];

    /// Parse an ISO weekday number (1 = Monday ... 7 = Sunday).
    pub fn from_number(day: i64) -> Result<Self, AvailabilityError> {
        match day {
            1..=7 => Ok(Self::ALL[(day - 1) as usize]),
            other => Err(AvailabilityError::InvalidWeekday(other)),
        }
    }

    /// Zero-based bit index in a [`DayBitmask`].
    pub fn bit_index(&self) -> u8 {
        *self as u8
    }

    /// Single-day mask for this weekday.
    pub fn mask(&self) -> u8 {
        1 << self.bit_index()
    }
}

impl fmt::Display for Weekday {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Weekday::Monday => "Monday",
            Weekday::Tuesday => "Tuesday",
            Weekday::Wednesday => "Wednesday",
            Weekday::Thursday => "Thursday",
            Weekday::Friday => "Friday",
            Weekday::Saturday => "Saturday",
            Weekday::Sunday => "Sunday",
        };
        f.write_str(name)
    }
}

/// 7-bit weekday set. Always in `1..=127`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "i64", into = "i64")]
pub struct DayBitmask(u8);

impl DayBitmask {
    pub const MIN: i64 = 1;
    pub const MAX: i64 = 127;

    /// Validate a raw mask.
    pub fn new(raw: i64) -> Result<Self, AvailabilityError> {
        if (Self::MIN..=Self::MAX).contains(&raw) {
            Ok(Self(raw as u8))
        } else {
            Err(AvailabilityError::InvalidDayBitmask(raw))
        }
    }

    /// Build a mask from a list of days. Returns `None` for an empty list.
    pub fn from_days(days: &[Weekday]) -> Option<Self> {
        let bits = days.iter().fold(0u8, |acc, day| acc | day.mask());
        (bits != 0).then_some(Self(bits))
    }

    pub fn bits(&self) -> u8 {
        self.0
    }

    pub fn contains(&self, day: Weekday) -> bool {
        self.0 & day.mask() != 0
    }

    /// Days present in both masks, or `None` when they share no day.
    pub fn intersect(&self, other: &DayBitmask) -> Option<DayBitmask> {
        let bits = self.0 & other.0;
        (bits != 0).then_some(Self(bits))
    }

    /// Decode the set days, Monday first.
    pub fn days(&self) -> impl Iterator<Item = Weekday> + '_ {
        Weekday::ALL.into_iter().filter(|day| self.contains(*day))
    }
}

impl TryFrom<i64> for DayBitmask {
    type Error = AvailabilityError;

    fn try_from(raw: i64) -> Result<Self, Self::Error> {
        Self::new(raw)
    }
}

impl From<DayBitmask> for i64 {
    fn from(mask: DayBitmask) -> Self {
        i64::from(mask.0)
    }
}

impl fmt::Display for DayBitmask {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let names: Vec<String> = self.days().map(|d| d.to_string()).collect();
        f.write_str(&names.join(", "))
    }
}

/// Parse an `HH:MM` time of day.
pub fn parse_time_of_day(field: &'static str, value: &str) -> Result<NaiveTime, AvailabilityError> {
    NaiveTime::parse_from_str(value.trim(), TIME_FORMAT).map_err(|_| {
        AvailabilityError::InvalidTimeFormat {
            field,
            value: value.to_string(),
        }
    })
}

/// Format a time of day as `HH:MM`.
pub fn format_time_of_day(time: &NaiveTime) -> String {
    time.format(TIME_FORMAT).to_string()
}

/// Serde adapter for `HH:MM` times.
pub mod hhmm {
    use chrono::NaiveTime;
    use serde::{Deserialize, Deserializer, Serializer};

    use super::TIME_FORMAT;

    pub fn serialize<S: Serializer>(time: &NaiveTime, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&time.format(TIME_FORMAT).to_string())
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(deserializer: D) -> Result<NaiveTime, D::Error> {
        let raw = String::deserialize(deserializer)?;
        NaiveTime::parse_from_str(&raw, TIME_FORMAT).map_err(serde::de::Error::custom)
    }
}

/// A recurring weekly window owned by one user.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AvailabilitySlot {
    pub id: SlotId,
    pub user_id: UserId,
    pub label: String,
    pub day_bitmask: DayBitmask,
    #[serde(with = "hhmm")]
    pub start_time: NaiveTime,
    #[serde(with = "hhmm")]
    pub end_time: NaiveTime,
    pub created_at: DateTime<Utc>,
}

impl AvailabilitySlot {
    /// Whether this slot fully contains `[start, end)` on `day`.
    pub fn covers(&self, day: Weekday, start: NaiveTime, end: NaiveTime) -> bool {
        self.day_bitmask.contains(day) && self.start_time <= start && self.end_time >= end
    }
}

/// Raw slot input as received from a caller, before validation.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SlotInput {
    pub label: String,
    pub day_bitmask: i64,
    pub start_time: String,
    pub end_time: String,
}

/// Validated slot fields.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SlotSpec {
    pub label: String,
    pub day_bitmask: DayBitmask,
    pub start_time: NaiveTime,
    pub end_time: NaiveTime,
}

impl SlotSpec {
    /// Validate a [`SlotInput`]: label length, bitmask range, `HH:MM` times,
    /// and end strictly after start.
    pub fn parse(input: &SlotInput) -> Result<Self, AvailabilityError> {
        let label = input.label.trim();
        if label.is_empty() {
            return Err(AvailabilityError::InvalidLabel(
                "label cannot be empty".to_string(),
            ));
        }
        if label.chars().count() > MAX_LABEL_LEN {
            return Err(AvailabilityError::InvalidLabel(format!(
                "label cannot exceed {MAX_LABEL_LEN} characters"
            )));
        }

        let start_time = parse_time_of_day("start_time", &input.start_time)?;
        let end_time = parse_time_of_day("end_time", &input.end_time)?;
        if end_time <= start_time {
            return Err(AvailabilityError::InvalidTimeRange);
        }

        let day_bitmask = DayBitmask::new(input.day_bitmask)?;

        Ok(Self {
            label: label.to_string(),
            day_bitmask,
            start_time,
            end_time,
        })
    }
}

/// One weekday/time-range intersection of two users' availability.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct CommonAvailability {
    pub day: Weekday,
    #[serde(with = "hhmm")]
    pub start_time: NaiveTime,
    #[serde(with = "hhmm")]
    pub end_time: NaiveTime,
    pub duration_minutes: i64,
}

impl FromStr for Weekday {
    type Err = AvailabilityError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let lowered = s.trim().to_lowercase();
        Weekday::ALL
            .into_iter()
            .find(|day| {
                let name = day.to_string().to_lowercase();
                name == lowered || name[..3] == lowered
            })
            .ok_or_else(|| AvailabilityError::InvalidWeekdayName(s.to_string()))
    }
}
