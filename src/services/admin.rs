//! Admin service
//!
//! Dashboard statistics, membership activation and read access to the scan
//! and email audit trails. Callers must hold the `Administrator` role.

use std::sync::Arc;

use chrono::{DateTime, Utc};
use serde::Serialize;

use crate::database::DatabaseService;
use crate::models::email_log::EmailLog;
use crate::models::scan::ScanEvent;
use crate::models::user::User;
use crate::services::scanner::scan_window;
use crate::utils::clock::Clock;
use crate::utils::errors::{CourtsideError, Result};
use crate::utils::helpers::{calculate_offset, one_year_after};
use crate::utils::logging::log_admin_action;

/// Upper bound for list endpoints
pub const MAX_PAGE_SIZE: usize = 200;

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DashboardStats {
    pub total_users: i64,
    pub active_members: i64,
    pub bookings_today: i64,
    pub scans_last_24h: i64,
    pub generated_at: DateTime<Utc>,
}

#[derive(Clone)]
pub struct AdminService {
    db: DatabaseService,
    clock: Arc<dyn Clock>,
}

impl AdminService {
    pub fn new(db: DatabaseService, clock: Arc<dyn Clock>) -> Self {
        Self { db, clock }
    }

    pub async fn dashboard(&self) -> Result<DashboardStats> {
        let now = self.clock.now();
        let today = self.clock.local_now().date();

        Ok(DashboardStats {
            total_users: self.db.users.count().await?,
            active_members: self.db.users.count_active().await?,
            bookings_today: self.db.bookings.count_on(today).await?,
            scans_last_24h: self.db.scans.count_since(now - scan_window()).await?,
            generated_at: now,
        })
    }

    /// Users, newest first; `page` starts at 1
    pub async fn list_users(&self, page: usize, page_size: usize) -> Result<Vec<User>> {
        let page_size = page_size.clamp(1, MAX_PAGE_SIZE);
        let offset = calculate_offset(page, page_size);
        self.db.users.list(page_size as i64, offset as i64).await
    }

    /// Record a membership payment: activate and renew for a year
    pub async fn activate_user(&self, admin_id: i64, user_id: i64) -> Result<User> {
        if self.db.users.find_by_id(user_id).await?.is_none() {
            return Err(CourtsideError::not_found("User", user_id));
        }

        let renewal_date = one_year_after(self.clock.local_now().date());
        let user = self.db.users.activate(user_id, renewal_date).await?;
        log_admin_action(
            admin_id,
            "activate_user",
            Some(&user_id.to_string()),
            Some(&format!("renewal {}", renewal_date)),
        );

        Ok(user)
    }

    pub async fn recent_scans(&self, limit: usize) -> Result<Vec<ScanEvent>> {
        self.db.scans.recent(limit.clamp(1, MAX_PAGE_SIZE) as i64).await
    }

    pub async fn email_logs(&self, limit: usize) -> Result<Vec<EmailLog>> {
        self.db.email_logs.recent(limit.clamp(1, MAX_PAGE_SIZE) as i64).await
    }
}
