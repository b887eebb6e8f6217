//! Availability lookup
//!
//! Reads a court's reservations for one date and reports which hours are
//! taken and who is playing in each. A storage failure is returned as an
//! error; it is never reported as an empty, fully open day.

use std::collections::BTreeMap;
use std::sync::Arc;

use chrono::NaiveDate;
use serde::Serialize;
use tracing::{debug, error};

use crate::database::DatabaseService;
use crate::models::booking::BookingDetails;
use crate::models::court::Court;
use crate::models::slot::Slot;
use crate::models::user::PlayerSummary;
use crate::services::slots;
use crate::utils::clock::Clock;
use crate::utils::errors::{CourtsideError, Result};

/// Occupied hours of one court on one date
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Availability {
    pub booked_time_slots: Vec<String>,
    /// `HH:00` to owner followed by invited players
    pub current_players: BTreeMap<String, Vec<PlayerSummary>>,
}

impl Availability {
    pub fn from_bookings(bookings: &[BookingDetails]) -> Self {
        let mut availability = Self::default();
        for booking in bookings {
            availability.insert(booking.time.clone(), booking.participants());
        }
        availability
    }

    pub fn insert(&mut self, time: String, players: Vec<PlayerSummary>) {
        if !self.booked_time_slots.contains(&time) {
            self.booked_time_slots.push(time.clone());
            self.booked_time_slots.sort();
        }
        self.current_players.entry(time).or_default().extend(players);
    }

    pub fn is_booked(&self, time: &str) -> bool {
        self.booked_time_slots.iter().any(|t| t == time)
    }

    pub fn players_at(&self, time: &str) -> &[PlayerSummary] {
        self.current_players
            .get(time)
            .map(Vec::as_slice)
            .unwrap_or(&[])
    }
}

#[derive(Clone)]
pub struct AvailabilityService {
    db: DatabaseService,
    clock: Arc<dyn Clock>,
}

impl AvailabilityService {
    pub fn new(db: DatabaseService, clock: Arc<dyn Clock>) -> Self {
        Self { db, clock }
    }

    pub async fn courts(&self) -> Result<Vec<Court>> {
        self.db.courts.list().await
    }

    /// Booked hours and participants for a court on a date
    pub async fn lookup(&self, court_id: i32, date: NaiveDate) -> Result<Availability> {
        debug!(court_id = court_id, date = %date, "Looking up availability");

        let bookings = self
            .db
            .bookings
            .for_court_on(court_id, date)
            .await
            .map_err(|e| {
                error!(court_id = court_id, date = %date, error = %e, "Availability lookup failed");
                e
            })?;

        Ok(Availability::from_bookings(&bookings))
    }

    /// The day's full slot catalog for a court
    pub async fn day_slots(&self, court_id: i32, date: NaiveDate) -> Result<Vec<Slot>> {
        if self.db.courts.find(court_id).await?.is_none() {
            return Err(CourtsideError::not_found("Court", court_id));
        }

        let availability = self.lookup(court_id, date).await?;
        slots::generate_slots(court_id, date, &availability, self.clock.local_now())
    }
}
