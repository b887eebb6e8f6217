//! Persistence ports
//!
//! Services depend on these traits; [`crate::database::repositories`] holds the
//! Postgres implementations and [`crate::database::memory`] an in-process one.
//! Both must uphold the same invariants: one booking per (court, date, hour),
//! all-or-nothing multi-slot inserts, and an atomic check-then-insert for scans.

use async_trait::async_trait;
use chrono::{DateTime, NaiveDate, Utc};

use crate::models::{
    BookingDetails, Court, CreateGroupRequest, EmailLog, Group, GroupMember, GroupMemberDetails,
    GroupRole, NewEmailLog, NewScan, NewUser, ScanEvent, SlotKey, UpdateProfileRequest, User,
};
use crate::utils::errors::Result;

#[async_trait]
pub trait UserStore: Send + Sync {
    /// Insert a user; a taken email yields `Conflict`
    async fn create(&self, user: NewUser) -> Result<User>;
    async fn find_by_id(&self, id: i64) -> Result<Option<User>>;
    async fn find_by_email(&self, email: &str) -> Result<Option<User>>;
    async fn find_by_qr_code(&self, code: &str) -> Result<Option<User>>;
    /// Users with the given ids, in no particular order; unknown ids are skipped
    async fn find_many(&self, ids: &[i64]) -> Result<Vec<User>>;
    async fn list(&self, limit: i64, offset: i64) -> Result<Vec<User>>;
    /// Users with an active membership, ordered by name
    async fn list_active(&self) -> Result<Vec<User>>;
    async fn update_profile(&self, id: i64, update: UpdateProfileRequest) -> Result<User>;
    async fn set_password_hash(&self, id: i64, password_hash: &str) -> Result<()>;
    /// Mark the membership active and promote plain users to `Member`
    async fn activate(&self, id: i64, renewal_date: NaiveDate) -> Result<User>;
    /// Store a QR token only if the user has none; returns whether it was stored
    async fn set_qr_code_if_absent(&self, id: i64, code: &str) -> Result<bool>;
    async fn count(&self) -> Result<i64>;
    async fn count_active(&self) -> Result<i64>;
}

#[async_trait]
pub trait CourtStore: Send + Sync {
    async fn list(&self) -> Result<Vec<Court>>;
    async fn find(&self, id: i32) -> Result<Option<Court>>;
}

#[async_trait]
pub trait BookingStore: Send + Sync {
    /// Insert one booking per slot, all or none.
    ///
    /// A slot that is already taken fails the whole call with `SlotUnavailable`.
    async fn create_all(
        &self,
        owner_id: i64,
        slots: &[SlotKey],
        invited: &[i64],
        created_at: DateTime<Utc>,
    ) -> Result<Vec<BookingDetails>>;
    async fn for_court_on(&self, court_id: i32, date: NaiveDate) -> Result<Vec<BookingDetails>>;
    /// Bookings the user owns or is invited to, from `from` up to `until` inclusive
    async fn for_user(
        &self,
        user_id: i64,
        from: NaiveDate,
        until: Option<NaiveDate>,
    ) -> Result<Vec<BookingDetails>>;
    async fn find(&self, id: i64) -> Result<Option<BookingDetails>>;
    async fn delete(&self, id: i64) -> Result<bool>;
    async fn count_on(&self, date: NaiveDate) -> Result<i64>;
}

#[async_trait]
pub trait ScanStore: Send + Sync {
    /// Record the scan unless the user already has one after `window_start`.
    ///
    /// Returns `None` for a duplicate. The check and the insert are atomic.
    async fn record_unless_recent(
        &self,
        scan: NewScan,
        window_start: DateTime<Utc>,
    ) -> Result<Option<ScanEvent>>;
    async fn recent(&self, limit: i64) -> Result<Vec<ScanEvent>>;
    async fn count_since(&self, since: DateTime<Utc>) -> Result<i64>;
}

#[async_trait]
pub trait GroupStore: Send + Sync {
    /// Create the group and its `Owner` membership together
    async fn create(&self, owner_id: i64, request: CreateGroupRequest) -> Result<Group>;
    async fn find(&self, id: i64) -> Result<Option<Group>>;
    async fn list_for_user(&self, user_id: i64) -> Result<Vec<Group>>;
    async fn membership(&self, group_id: i64, user_id: i64) -> Result<Option<GroupMember>>;
    async fn members(&self, group_id: i64) -> Result<Vec<GroupMemberDetails>>;
    /// An existing membership yields `Conflict`
    async fn add_member(&self, group_id: i64, user_id: i64, role: GroupRole) -> Result<GroupMember>;
    async fn remove_member(&self, group_id: i64, user_id: i64) -> Result<bool>;
    /// Delete the group and, with it, every membership
    async fn delete(&self, id: i64) -> Result<bool>;
}

#[async_trait]
pub trait EmailLogStore: Send + Sync {
    async fn append(&self, entry: NewEmailLog) -> Result<EmailLog>;
    async fn recent(&self, limit: i64) -> Result<Vec<EmailLog>>;
}
