//! Booking service
//!
//! Validates a booking request, writes every requested slot in one
//! all-or-nothing store call and then notifies the players.

use std::collections::HashSet;
use std::sync::Arc;

use chrono::NaiveDate;
use serde::Serialize;
use tracing::{debug, info};

use crate::database::DatabaseService;
use crate::models::booking::{BookingDetails, CreateBookingRequest, InviteList};
use crate::models::slot::SlotKey;
use crate::models::user::{User, UserRole};
use crate::services::notification::{NotificationReport, NotificationService};
use crate::services::slots;
use crate::utils::clock::Clock;
use crate::utils::errors::{CourtsideError, Result};
use crate::utils::logging::log_booking_action;

/// Result of a successful booking request
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct BookingOutcome {
    pub bookings: Vec<BookingDetails>,
    pub notifications: NotificationReport,
}

/// Bookings a user has on one date
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct UserBookingCheck {
    pub user_id: i64,
    pub date: NaiveDate,
    pub has_bookings: bool,
    pub bookings: Vec<BookingDetails>,
}

#[derive(Clone)]
pub struct BookingService {
    db: DatabaseService,
    notifications: NotificationService,
    clock: Arc<dyn Clock>,
}

impl BookingService {
    pub fn new(db: DatabaseService, notifications: NotificationService, clock: Arc<dyn Clock>) -> Self {
        Self {
            db,
            notifications,
            clock,
        }
    }

    /// Book one or more slots on a court for the caller
    pub async fn create_booking(&self, user_id: i64, request: CreateBookingRequest) -> Result<BookingOutcome> {
        debug!(user_id = user_id, court_id = request.court_id, slots = request.selected_slots.len(), "Creating booking");

        let booker = self
            .db
            .users
            .find_by_id(user_id)
            .await?
            .ok_or_else(|| CourtsideError::Unauthorized("Unknown session user".to_string()))?;
        if !booker.is_active_member() {
            return Err(CourtsideError::PermissionDenied(
                "Your membership is not active yet".to_string(),
            ));
        }

        let court = self
            .db
            .courts
            .find(request.court_id)
            .await?
            .ok_or_else(|| CourtsideError::not_found("Court", request.court_id))?;

        let keys = self.parse_slots(court.id, &request.selected_slots)?;
        let invited = self.resolve_invitees(&booker, request.invited_players).await?;
        let invited_ids: Vec<i64> = invited.iter().map(|u| u.id).collect();

        let bookings = self
            .db
            .bookings
            .create_all(booker.id, &keys, &invited_ids, self.clock.now())
            .await?;

        log_booking_action(booker.id, "create", court.id, bookings.len());
        info!(user_id = booker.id, court_id = court.id, bookings = bookings.len(), "Booking created");

        let notifications = self
            .notifications
            .send_booking_notifications(&booker, &invited, &bookings)
            .await;

        Ok(BookingOutcome {
            bookings,
            notifications,
        })
    }

    /// Parse and check requested slot keys against the court and the clock
    fn parse_slots(&self, court_id: i32, selected: &[String]) -> Result<Vec<SlotKey>> {
        if selected.is_empty() {
            return Err(CourtsideError::InvalidInput(
                "Select at least one time slot".to_string(),
            ));
        }

        let now = self.clock.local_now();
        let mut seen = HashSet::with_capacity(selected.len());
        let mut keys = Vec::with_capacity(selected.len());

        for raw in selected {
            let key: SlotKey = raw.trim().parse()?;

            if key.court_id != court_id {
                return Err(CourtsideError::InvalidInput(format!(
                    "Slot {} is not on court {}",
                    key, court_id
                )));
            }
            if !slots::is_bookable_hour(key.hour) {
                return Err(CourtsideError::InvalidSlotKey(format!(
                    "{} is outside opening hours",
                    key
                )));
            }
            if !seen.insert(key) {
                return Err(CourtsideError::InvalidInput(format!("Slot {} selected twice", key)));
            }
            if slots::is_past(&key, now) {
                return Err(CourtsideError::SlotUnavailable(format!("{} has already started", key)));
            }

            keys.push(key);
        }

        keys.sort();
        Ok(keys)
    }

    /// Check the invite list and load the invited users in request order
    async fn resolve_invitees(&self, booker: &User, requested: Vec<i64>) -> Result<Vec<User>> {
        let invites = InviteList::try_from(requested)?;
        if invites.as_slice().contains(&booker.id) {
            return Err(CourtsideError::InvalidInput(
                "You cannot invite yourself".to_string(),
            ));
        }
        if invites.is_empty() {
            return Ok(Vec::new());
        }

        let found = self.db.users.find_many(invites.as_slice()).await?;
        invites
            .as_slice()
            .iter()
            .map(|id| {
                found
                    .iter()
                    .find(|u| u.id == *id)
                    .cloned()
                    .ok_or_else(|| CourtsideError::not_found("User", id))
            })
            .collect()
    }

    /// Cancel a booking; allowed for its owner and administrators
    pub async fn cancel_booking(&self, user_id: i64, role: UserRole, booking_id: i64) -> Result<()> {
        let booking = self
            .db
            .bookings
            .find(booking_id)
            .await?
            .ok_or_else(|| CourtsideError::not_found("Booking", booking_id))?;

        if booking.owner.id != user_id && role != UserRole::Administrator {
            return Err(CourtsideError::PermissionDenied(
                "Only the owner or an administrator can cancel this booking".to_string(),
            ));
        }

        if !self.db.bookings.delete(booking_id).await? {
            return Err(CourtsideError::not_found("Booking", booking_id));
        }

        log_booking_action(user_id, "cancel", booking.court_id, 1);
        Ok(())
    }

    /// Today's and future bookings the user owns or is invited to
    pub async fn upcoming_for_user(&self, user_id: i64) -> Result<Vec<BookingDetails>> {
        let today = self.clock.local_now().date();
        self.db.bookings.for_user(user_id, today, None).await
    }

    /// Bookings the user owns or is invited to on one date
    pub async fn check_user_bookings(&self, user_id: i64, date: NaiveDate) -> Result<UserBookingCheck> {
        let bookings = self.db.bookings.for_user(user_id, date, Some(date)).await?;
        Ok(UserBookingCheck {
            user_id,
            date,
            has_bookings: !bookings.is_empty(),
            bookings,
        })
    }
}
