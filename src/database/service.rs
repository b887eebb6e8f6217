//! Database service layer
//!
//! Bundles one handle per store so services can be wired against either
//! Postgres or the in-memory store.

use std::sync::Arc;

use crate::database::memory::MemoryStore;
use crate::database::repositories::{
    BookingRepository, CourtRepository, EmailLogRepository, GroupRepository, ScanRepository,
    UserRepository,
};
use crate::database::store::{
    BookingStore, CourtStore, EmailLogStore, GroupStore, ScanStore, UserStore,
};
use crate::database::{health_check, DatabasePool};
use crate::utils::errors::Result;

#[derive(Clone)]
pub struct DatabaseService {
    pub users: Arc<dyn UserStore>,
    pub courts: Arc<dyn CourtStore>,
    pub bookings: Arc<dyn BookingStore>,
    pub scans: Arc<dyn ScanStore>,
    pub groups: Arc<dyn GroupStore>,
    pub email_logs: Arc<dyn EmailLogStore>,
    pool: Option<DatabasePool>,
}

impl DatabaseService {
    pub fn postgres(pool: DatabasePool) -> Self {
        Self {
            users: Arc::new(UserRepository::new(pool.clone())),
            courts: Arc::new(CourtRepository::new(pool.clone())),
            bookings: Arc::new(BookingRepository::new(pool.clone())),
            scans: Arc::new(ScanRepository::new(pool.clone())),
            groups: Arc::new(GroupRepository::new(pool.clone())),
            email_logs: Arc::new(EmailLogRepository::new(pool.clone())),
            pool: Some(pool),
        }
    }

    pub fn in_memory() -> Self {
        let store = Arc::new(MemoryStore::new());
        Self {
            users: store.clone(),
            courts: store.clone(),
            bookings: store.clone(),
            scans: store.clone(),
            groups: store.clone(),
            email_logs: store,
            pool: None,
        }
    }

    pub fn backend(&self) -> &'static str {
        if self.pool.is_some() {
            "postgres"
        } else {
            "memory"
        }
    }

    /// Round-trip to Postgres; the in-memory store is always healthy
    pub async fn health_check(&self) -> Result<()> {
        match &self.pool {
            Some(pool) => health_check(pool).await,
            None => Ok(()),
        }
    }
}

impl std::fmt::Debug for DatabaseService {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("DatabaseService")
            .field("backend", &self.backend())
            .finish()
    }
}
