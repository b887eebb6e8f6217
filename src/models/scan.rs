//! Attendance scan model

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;

/// Location/device recorded when the scanner sends none
pub const UNKNOWN: &str = "Unknown";

#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
#[serde(rename_all = "camelCase")]
pub struct ScanEvent {
    pub id: i64,
    /// The member whose code was scanned
    pub user_id: i64,
    /// The session that performed the scan
    pub scanned_by: Option<i64>,
    pub location: String,
    pub device: String,
    pub scanned_at: DateTime<Utc>,
}

/// Body of `POST /api/scan`
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ScanRequest {
    pub code: String,
    pub location: Option<String>,
    pub device: Option<String>,
}

#[derive(Debug, Clone)]
pub struct NewScan {
    pub user_id: i64,
    pub scanned_by: Option<i64>,
    pub location: String,
    pub device: String,
    pub scanned_at: DateTime<Utc>,
}
