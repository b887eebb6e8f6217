//! Email audit log model

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;

/// Append-only record of a bulk email
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
#[serde(rename_all = "camelCase")]
pub struct EmailLog {
    pub id: i64,
    pub subject: String,
    pub template: String,
    pub content: String,
    pub recipient_count: i32,
    pub sender_id: i64,
    pub sent_at: DateTime<Utc>,
}

#[derive(Debug, Clone)]
pub struct NewEmailLog {
    pub subject: String,
    pub template: String,
    pub content: String,
    pub recipient_count: i32,
    pub sender_id: i64,
    pub sent_at: DateTime<Utc>,
}
