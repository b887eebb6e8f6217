//! Booking repository implementation
//!
//! `bookings` carries `UNIQUE (court_id, booking_date, start_hour)`; a
//! violation inside [`BookingStore::create_all`] rolls back the whole request.

use std::collections::HashMap;

use async_trait::async_trait;
use chrono::{DateTime, NaiveDate, Utc};
use sqlx::{FromRow, PgPool};

use crate::database::store::BookingStore;
use crate::models::booking::BookingDetails;
use crate::models::slot::SlotKey;
use crate::models::user::PlayerSummary;
use crate::utils::errors::{is_unique_violation, CourtsideError, Result};

const DETAILS_SELECT: &str = r#"
    SELECT b.id, b.court_id, c.name AS court_name, b.booking_date, b.start_hour, b.created_at,
           u.id AS owner_id, u.name AS owner_name, u.avatar_url AS owner_avatar_url
    FROM bookings b
    INNER JOIN courts c ON c.id = b.court_id
    INNER JOIN users u ON u.id = b.owner_id
"#;

#[derive(Debug, FromRow)]
struct BookingRow {
    id: i64,
    court_id: i32,
    court_name: String,
    booking_date: NaiveDate,
    start_hour: i32,
    created_at: DateTime<Utc>,
    owner_id: i64,
    owner_name: String,
    owner_avatar_url: Option<String>,
}

#[derive(Debug, FromRow)]
struct InvitedRow {
    booking_id: i64,
    id: i64,
    name: String,
    avatar_url: Option<String>,
}

impl BookingRow {
    fn into_details(self, invited_players: Vec<PlayerSummary>) -> Result<BookingDetails> {
        let hour = u32::try_from(self.start_hour)
            .map_err(|_| CourtsideError::InvalidSlotKey(format!("stored hour {}", self.start_hour)))?;
        let slot_key = SlotKey::new(self.court_id, self.booking_date, hour)?;

        Ok(BookingDetails {
            id: self.id,
            court_id: self.court_id,
            court_name: self.court_name,
            date: self.booking_date,
            time: slot_key.time_label(),
            slot_key,
            owner: PlayerSummary {
                id: self.owner_id,
                name: self.owner_name,
                avatar_url: self.owner_avatar_url,
            },
            invited_players,
            created_at: self.created_at,
        })
    }
}

#[derive(Clone, Debug)]
pub struct BookingRepository {
    pool: PgPool,
}

impl BookingRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Attach invited players to booking rows
    async fn with_players(&self, rows: Vec<BookingRow>) -> Result<Vec<BookingDetails>> {
        let ids: Vec<i64> = rows.iter().map(|row| row.id).collect();
        let mut invited: HashMap<i64, Vec<PlayerSummary>> = HashMap::new();

        if !ids.is_empty() {
            let players = sqlx::query_as::<_, InvitedRow>(
                r#"
                SELECT bp.booking_id, u.id, u.name, u.avatar_url
                FROM booking_players bp
                INNER JOIN users u ON u.id = bp.user_id
                WHERE bp.booking_id = ANY($1)
                ORDER BY bp.booking_id, bp.position
                "#,
            )
            .bind(&ids)
            .fetch_all(&self.pool)
            .await?;

            for player in players {
                invited.entry(player.booking_id).or_default().push(PlayerSummary {
                    id: player.id,
                    name: player.name,
                    avatar_url: player.avatar_url,
                });
            }
        }

        rows.into_iter()
            .map(|row| {
                let players = invited.remove(&row.id).unwrap_or_default();
                row.into_details(players)
            })
            .collect()
    }
}

#[async_trait]
impl BookingStore for BookingRepository {
    async fn create_all(
        &self,
        owner_id: i64,
        slots: &[SlotKey],
        invited: &[i64],
        created_at: DateTime<Utc>,
    ) -> Result<Vec<BookingDetails>> {
        let mut tx = self.pool.begin().await?;
        let mut ids = Vec::with_capacity(slots.len());

        for slot in slots {
            let (id,): (i64,) = sqlx::query_as(
                r#"
                INSERT INTO bookings (court_id, booking_date, start_hour, owner_id, created_at)
                VALUES ($1, $2, $3, $4, $5)
                RETURNING id
                "#,
            )
            .bind(slot.court_id)
            .bind(slot.date)
            .bind(slot.hour as i32)
            .bind(owner_id)
            .bind(created_at)
            .fetch_one(&mut *tx)
            .await
            .map_err(|e| {
                if is_unique_violation(&e) {
                    CourtsideError::SlotUnavailable(format!("{} is already booked", slot))
                } else {
                    e.into()
                }
            })?;

            for (position, player_id) in invited.iter().enumerate() {
                sqlx::query("INSERT INTO booking_players (booking_id, user_id, position) VALUES ($1, $2, $3)")
                    .bind(id)
                    .bind(player_id)
                    .bind(position as i32)
                    .execute(&mut *tx)
                    .await?;
            }

            ids.push(id);
        }

        tx.commit().await?;

        let rows = sqlx::query_as::<_, BookingRow>(&format!(
            "{} WHERE b.id = ANY($1) ORDER BY b.booking_date, b.start_hour",
            DETAILS_SELECT
        ))
        .bind(&ids)
        .fetch_all(&self.pool)
        .await?;

        self.with_players(rows).await
    }

    async fn for_court_on(&self, court_id: i32, date: NaiveDate) -> Result<Vec<BookingDetails>> {
        let rows = sqlx::query_as::<_, BookingRow>(&format!(
            "{} WHERE b.court_id = $1 AND b.booking_date = $2 ORDER BY b.start_hour",
            DETAILS_SELECT
        ))
        .bind(court_id)
        .bind(date)
        .fetch_all(&self.pool)
        .await?;

        self.with_players(rows).await
    }

    async fn for_user(
        &self,
        user_id: i64,
        from: NaiveDate,
        until: Option<NaiveDate>,
    ) -> Result<Vec<BookingDetails>> {
        let rows = sqlx::query_as::<_, BookingRow>(&format!(
            r#"{}
            WHERE (b.owner_id = $1
                   OR EXISTS (SELECT 1 FROM booking_players bp WHERE bp.booking_id = b.id AND bp.user_id = $1))
              AND b.booking_date >= $2
              AND ($3::DATE IS NULL OR b.booking_date <= $3)
            ORDER BY b.booking_date, b.start_hour, b.court_id
            "#,
            DETAILS_SELECT
        ))
        .bind(user_id)
        .bind(from)
        .bind(until)
        .fetch_all(&self.pool)
        .await?;

        self.with_players(rows).await
    }

    async fn find(&self, id: i64) -> Result<Option<BookingDetails>> {
        let row = sqlx::query_as::<_, BookingRow>(&format!("{} WHERE b.id = $1", DETAILS_SELECT))
            .bind(id)
            .fetch_optional(&self.pool)
            .await?;

        match row {
            Some(row) => Ok(self.with_players(vec![row]).await?.pop()),
            None => Ok(None),
        }
    }

    async fn delete(&self, id: i64) -> Result<bool> {
        let result = sqlx::query("DELETE FROM bookings WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await?;

        Ok(result.rows_affected() > 0)
    }

    async fn count_on(&self, date: NaiveDate) -> Result<i64> {
        let count: (i64,) = sqlx::query_as("SELECT COUNT(*) FROM bookings WHERE booking_date = $1")
            .bind(date)
            .fetch_one(&self.pool)
            .await?;

        Ok(count.0)
    }
}
