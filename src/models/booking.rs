//! Booking model

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Deserializer, Serialize};
use sqlx::FromRow;

use crate::models::slot::SlotKey;
use crate::models::user::PlayerSummary;
use crate::utils::errors::{CourtsideError, Result};

/// Players on a court including the booker
pub const MAX_PLAYERS: usize = 4;

/// Invited players on top of the booker
pub const MAX_INVITED: usize = MAX_PLAYERS - 1;

/// One reserved hour on one court
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
#[serde(rename_all = "camelCase")]
pub struct Booking {
    pub id: i64,
    pub court_id: i32,
    pub booking_date: NaiveDate,
    pub start_hour: i32,
    pub owner_id: i64,
    pub created_at: DateTime<Utc>,
}

/// A booking with its court and participants resolved
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct BookingDetails {
    pub id: i64,
    pub court_id: i32,
    pub court_name: String,
    pub date: NaiveDate,
    pub time: String,
    pub slot_key: SlotKey,
    pub owner: PlayerSummary,
    pub invited_players: Vec<PlayerSummary>,
    pub created_at: DateTime<Utc>,
}

impl BookingDetails {
    /// Owner first, then invited players
    pub fn participants(&self) -> Vec<PlayerSummary> {
        let mut players = Vec::with_capacity(1 + self.invited_players.len());
        players.push(self.owner.clone());
        players.extend(self.invited_players.iter().cloned());
        players
    }

    pub fn involves(&self, user_id: i64) -> bool {
        self.owner.id == user_id || self.invited_players.iter().any(|p| p.id == user_id)
    }
}

/// Body of `POST /api/bookings`
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateBookingRequest {
    pub court_id: i32,
    pub selected_slots: Vec<String>,
    #[serde(default, deserialize_with = "deserialize_player_ids")]
    pub invited_players: Vec<i64>,
}

/// Accepts player ids as JSON numbers or numeric strings
fn deserialize_player_ids<'de, D>(deserializer: D) -> std::result::Result<Vec<i64>, D::Error>
where
    D: Deserializer<'de>,
{
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum PlayerId {
        Number(i64),
        Text(String),
    }

    let raw: Option<Vec<PlayerId>> = Option::deserialize(deserializer)?;
    raw.unwrap_or_default()
        .into_iter()
        .map(|id| match id {
            PlayerId::Number(n) => Ok(n),
            PlayerId::Text(s) => s
                .trim()
                .parse()
                .map_err(|_| serde::de::Error::custom(format!("invalid player id: {}", s))),
        })
        .collect()
}

/// Invited players for one booking, capped at [`MAX_INVITED`]
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct InviteList {
    players: Vec<i64>,
}

impl InviteList {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a player. Fails without changing the list when it is full.
    pub fn add(&mut self, player_id: i64) -> Result<()> {
        if self.players.contains(&player_id) {
            return Err(CourtsideError::InvalidInput(format!(
                "Player {} is already invited",
                player_id
            )));
        }
        if self.players.len() >= MAX_INVITED {
            return Err(CourtsideError::MaxPlayers { max: MAX_PLAYERS });
        }
        self.players.push(player_id);
        Ok(())
    }

    pub fn remove(&mut self, player_id: i64) -> bool {
        let before = self.players.len();
        self.players.retain(|&id| id != player_id);
        self.players.len() != before
    }

    pub fn len(&self) -> usize {
        self.players.len()
    }

    pub fn is_empty(&self) -> bool {
        self.players.is_empty()
    }

    pub fn as_slice(&self) -> &[i64] {
        &self.players
    }
}

impl TryFrom<Vec<i64>> for InviteList {
    type Error = CourtsideError;

    fn try_from(players: Vec<i64>) -> Result<Self> {
        let mut list = InviteList::new();
        for player in players {
            list.add(player)?;
        }
        Ok(list)
    }
}
