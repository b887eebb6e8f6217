//! Slot catalog
//!
//! Every court offers the same hourly template. Booked and past slots stay
//! in the sequence; they are flagged rather than removed.

use std::ops::RangeInclusive;

use chrono::{NaiveDate, NaiveDateTime};

use crate::models::slot::{Slot, SlotKey};
use crate::services::availability::Availability;
use crate::utils::errors::Result;

/// First bookable hour of the day
pub const OPENING_HOUR: u32 = 6;

/// Last bookable hour of the day (the slot starting at 23:00)
pub const LAST_SLOT_HOUR: u32 = 23;

/// Hours that start a bookable slot
pub fn bookable_hours() -> RangeInclusive<u32> {
    OPENING_HOUR..=LAST_SLOT_HOUR
}

pub fn is_bookable_hour(hour: u32) -> bool {
    bookable_hours().contains(&hour)
}

/// Whether the slot has already started at `now`
pub fn is_past(key: &SlotKey, now: NaiveDateTime) -> bool {
    key.starts_at() <= now
}

/// Build the day's slots for one court
pub fn generate_slots(
    court_id: i32,
    date: NaiveDate,
    availability: &Availability,
    now: NaiveDateTime,
) -> Result<Vec<Slot>> {
    bookable_hours()
        .map(|hour| {
            let key = SlotKey::new(court_id, date, hour)?;
            let time = key.time_label();
            let booked = availability.is_booked(&time);
            let past = is_past(&key, now);

            Ok(Slot {
                key,
                players: availability.players_at(&time).to_vec(),
                time,
                booked,
                past,
                available: !booked && !past,
            })
        })
        .collect()
}
