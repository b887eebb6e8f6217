//! Attendance scan repository implementation

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::PgPool;

use crate::database::store::ScanStore;
use crate::models::scan::{NewScan, ScanEvent};
use crate::utils::errors::Result;

const SCAN_COLUMNS: &str = "id, user_id, scanned_by, location, device, scanned_at";

#[derive(Clone, Debug)]
pub struct ScanRepository {
    pool: PgPool,
}

impl ScanRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl ScanStore for ScanRepository {
    async fn record_unless_recent(
        &self,
        scan: NewScan,
        window_start: DateTime<Utc>,
    ) -> Result<Option<ScanEvent>> {
        let mut tx = self.pool.begin().await?;

        // Serialises concurrent scans of the same member
        sqlx::query("SELECT id FROM users WHERE id = $1 FOR UPDATE")
            .bind(scan.user_id)
            .execute(&mut *tx)
            .await?;

        let recent: (i64,) = sqlx::query_as(
            "SELECT COUNT(*) FROM scans WHERE user_id = $1 AND scanned_at > $2",
        )
        .bind(scan.user_id)
        .bind(window_start)
        .fetch_one(&mut *tx)
        .await?;

        if recent.0 > 0 {
            tx.rollback().await?;
            return Ok(None);
        }

        let event = sqlx::query_as::<_, ScanEvent>(&format!(
            r#"
            INSERT INTO scans (user_id, scanned_by, location, device, scanned_at)
            VALUES ($1, $2, $3, $4, $5)
            RETURNING {}
            "#,
            SCAN_COLUMNS
        ))
        .bind(scan.user_id)
        .bind(scan.scanned_by)
        .bind(&scan.location)
        .bind(&scan.device)
        .bind(scan.scanned_at)
        .fetch_one(&mut *tx)
        .await?;

        tx.commit().await?;
        Ok(Some(event))
    }

    async fn recent(&self, limit: i64) -> Result<Vec<ScanEvent>> {
        let scans = sqlx::query_as::<_, ScanEvent>(&format!(
            "SELECT {} FROM scans ORDER BY scanned_at DESC, id DESC LIMIT $1",
            SCAN_COLUMNS
        ))
        .bind(limit)
        .fetch_all(&self.pool)
        .await?;

        Ok(scans)
    }

    async fn count_since(&self, since: DateTime<Utc>) -> Result<i64> {
        let count: (i64,) = sqlx::query_as("SELECT COUNT(*) FROM scans WHERE scanned_at > $1")
            .bind(since)
            .fetch_one(&self.pool)
            .await?;

        Ok(count.0)
    }
}
