//! Attendance scanner
//!
//! Resolves a scanned QR token to a member and records at most one scan per
//! member in any rolling 24 hour window.

use std::sync::Arc;

use chrono::Duration;
use serde::Serialize;
use tracing::debug;

use crate::database::DatabaseService;
use crate::models::scan::{NewScan, ScanEvent, ScanRequest, UNKNOWN};
use crate::models::user::PlayerSummary;
use crate::utils::clock::Clock;
use crate::utils::errors::{CourtsideError, Result};
use crate::utils::helpers::is_qr_token;
use crate::utils::logging::log_scan;

/// Length of the duplicate-scan window
pub fn scan_window() -> Duration {
    Duration::hours(24)
}

/// A recorded scan with the scanned member
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ScanResult {
    pub scan: ScanEvent,
    pub member: PlayerSummary,
}

#[derive(Clone)]
pub struct ScannerService {
    db: DatabaseService,
    clock: Arc<dyn Clock>,
}

impl ScannerService {
    pub fn new(db: DatabaseService, clock: Arc<dyn Clock>) -> Self {
        Self { db, clock }
    }

    /// Record a scan by the session `scanned_by`
    pub async fn scan(&self, scanned_by: i64, request: ScanRequest) -> Result<ScanResult> {
        let location = non_empty_or_unknown(request.location);
        let device = non_empty_or_unknown(request.device);
        let code = request.code.trim();
        debug!(scanned_by = scanned_by, location = %location, "Processing scan");

        let found = if is_qr_token(code) {
            self.db.users.find_by_qr_code(code).await?
        } else {
            None
        };
        let member = match found {
            Some(user) => user,
            None => {
                log_scan(None, "invalid_code", &location);
                return Err(CourtsideError::InvalidCode);
            }
        };

        let now = self.clock.now();
        let scan = NewScan {
            user_id: member.id,
            scanned_by: Some(scanned_by),
            location: location.clone(),
            device,
            scanned_at: now,
        };

        match self.db.scans.record_unless_recent(scan, now - scan_window()).await? {
            Some(event) => {
                log_scan(Some(member.id), "recorded", &location);
                Ok(ScanResult {
                    scan: event,
                    member: member.summary(),
                })
            }
            None => {
                log_scan(Some(member.id), "duplicate", &location);
                Err(CourtsideError::DuplicateScan { user_id: member.id })
            }
        }
    }
}

fn non_empty_or_unknown(value: Option<String>) -> String {
    value
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
        .unwrap_or_else(|| UNKNOWN.to_string())
}
