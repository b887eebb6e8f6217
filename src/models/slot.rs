//! Slot keys and derived slot views

use std::fmt;
use std::str::FromStr;

use chrono::{NaiveDate, NaiveDateTime, NaiveTime};
use serde::{Deserialize, Deserializer, Serialize, Serializer};

use crate::models::user::PlayerSummary;
use crate::utils::errors::CourtsideError;
use crate::utils::helpers::format_hour;

/// Canonical component separator
pub const SLOT_KEY_SEPARATOR: char = '|';

/// Identifies one bookable hour on one court.
///
/// Text form is `{court}|{YYYY-MM-DD}|{HH:00}`. The legacy
/// `{court}-{YYYY-MM-DD}-{HH:00}` form is accepted on input only.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct SlotKey {
    pub court_id: i32,
    pub date: NaiveDate,
    pub hour: u32,
}

impl SlotKey {
    pub fn new(court_id: i32, date: NaiveDate, hour: u32) -> Result<Self, CourtsideError> {
        if hour > 23 {
            return Err(CourtsideError::InvalidSlotKey(format!("hour out of range: {}", hour)));
        }
        Ok(Self { court_id, date, hour })
    }

    /// `HH:00` label of the slot's hour
    pub fn time_label(&self) -> String {
        format_hour(self.hour)
    }

    /// Wall-clock instant at which the slot starts
    pub fn starts_at(&self) -> NaiveDateTime {
        // hour <= 23 is guaranteed by every constructor
        self.date.and_time(NaiveTime::from_hms_opt(self.hour, 0, 0).unwrap_or(NaiveTime::MIN))
    }
}

impl fmt::Display for SlotKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{}{sep}{}{sep}{:02}:00",
            self.court_id,
            self.date.format("%Y-%m-%d"),
            self.hour,
            sep = SLOT_KEY_SEPARATOR
        )
    }
}

/// Parse an `HH:00` label into an hour
pub fn parse_time_label(label: &str) -> Result<u32, CourtsideError> {
    let invalid = || CourtsideError::InvalidSlotKey(format!("invalid time: {}", label));

    let hour = label.strip_suffix(":00").ok_or_else(invalid)?;
    if hour.len() != 2 || !hour.bytes().all(|b| b.is_ascii_digit()) {
        return Err(invalid());
    }
    let hour: u32 = hour.parse().map_err(|_| invalid())?;
    if hour > 23 {
        return Err(invalid());
    }
    Ok(hour)
}

impl FromStr for SlotKey {
    type Err = CourtsideError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let (court, date, time) = if s.contains(SLOT_KEY_SEPARATOR) {
            let parts: Vec<&str> = s.split(SLOT_KEY_SEPARATOR).collect();
            match parts.as_slice() {
                [court, date, time] => (court.to_string(), date.to_string(), time.to_string()),
                _ => {
                    return Err(CourtsideError::InvalidSlotKey(format!(
                        "expected 3 components in '{}', found {}",
                        s,
                        parts.len()
                    )))
                }
            }
        } else {
            // court-YYYY-MM-DD-HH:00
            let parts: Vec<&str> = s.split('-').collect();
            match parts.as_slice() {
                [court, year, month, day, time] => (
                    court.to_string(),
                    format!("{}-{}-{}", year, month, day),
                    time.to_string(),
                ),
                _ => {
                    return Err(CourtsideError::InvalidSlotKey(format!(
                        "unrecognised slot key format: '{}'",
                        s
                    )))
                }
            }
        };

        let court_id: i32 = court
            .parse()
            .map_err(|_| CourtsideError::InvalidSlotKey(format!("invalid court id: {}", court)))?;
        let date = NaiveDate::parse_from_str(&date, "%Y-%m-%d")
            .map_err(|_| CourtsideError::InvalidSlotKey(format!("invalid date: {}", date)))?;
        let hour = parse_time_label(&time)?;

        SlotKey::new(court_id, date, hour)
    }
}

impl Serialize for SlotKey {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

impl<'de> Deserialize<'de> for SlotKey {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let raw = String::deserialize(deserializer)?;
        raw.parse().map_err(serde::de::Error::custom)
    }
}

/// One hour on one court as shown to the booking UI.
/// Regenerated on every read; never persisted.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Slot {
    pub key: SlotKey,
    pub time: String,
    pub booked: bool,
    pub past: bool,
    pub available: bool,
    pub players: Vec<PlayerSummary>,
}
