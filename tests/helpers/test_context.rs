//! Test context for unified test setup
//!
//! Wires the full application against the in-memory store, a
//! [`FixedClock`] and a [`RecordingMailer`].

use std::sync::{Arc, Once};

use chrono::{NaiveDate, NaiveDateTime};
use courtside::config::Settings;
use courtside::database::DatabaseService;
use courtside::services::ServiceFactory;
use courtside::state::AppState;
use courtside::utils::clock::FixedClock;

use super::mail_mock::RecordingMailer;

pub const TEST_JWT_SECRET: &str = "test-secret-with-enough-length";

static INIT: Once = Once::new();

/// Initialize logging for tests (called once)
pub fn init_test_logging() {
    INIT.call_once(|| {
        let _ = tracing_subscriber::fmt()
            .with_env_filter("courtside=debug")
            .with_test_writer()
            .try_init();
    });
}

/// 2025-01-10 08:00, a Friday morning before the courts fill up
pub fn default_now() -> NaiveDateTime {
    NaiveDate::from_ymd_opt(2025, 1, 10)
        .unwrap()
        .and_hms_opt(8, 0, 0)
        .unwrap()
}

/// Settings tuned for fast tests
pub fn test_settings() -> Settings {
    let mut settings = Settings::default();
    settings.database.url = "memory://".to_string();
    settings.auth.jwt_secret = TEST_JWT_SECRET.to_string();
    settings.auth.bcrypt_cost = 4;
    settings.mail.batch_size = 2;
    settings.mail.batch_pause_ms = 0;
    settings.mail.max_attempts = 2;
    settings.logging.level = "debug".to_string();
    settings
}

/// Unified test context that manages all test components
pub struct TestContext {
    pub settings: Settings,
    pub db: DatabaseService,
    pub clock: Arc<FixedClock>,
    pub mailer: Arc<RecordingMailer>,
    pub state: AppState,
}

impl TestContext {
    pub fn new() -> Self {
        Self::with_settings(test_settings())
    }

    pub fn with_settings(settings: Settings) -> Self {
        init_test_logging();

        let db = DatabaseService::in_memory();
        let clock = Arc::new(FixedClock::at(default_now()));
        let mailer = Arc::new(RecordingMailer::new());
        let state = AppState::with_parts(settings.clone(), db.clone(), clock.clone(), mailer.clone());

        Self {
            settings,
            db,
            clock,
            mailer,
            state,
        }
    }

    pub fn services(&self) -> &ServiceFactory {
        &self.state.services
    }

    /// Move the clock to a local wall-clock time
    pub fn set_now(&self, local: NaiveDateTime) {
        self.clock.set(local.and_utc());
    }
}

impl Default for TestContext {
    fn default() -> Self {
        Self::new()
    }
}
