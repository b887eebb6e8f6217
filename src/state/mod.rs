//! Application state shared by every HTTP worker

use std::sync::Arc;

use crate::config::Settings;
use crate::database::DatabaseService;
use crate::services::{MailTransport, ServiceFactory};
use crate::utils::clock::{Clock, SystemClock};
use crate::utils::errors::Result;

#[derive(Clone)]
pub struct AppState {
    pub settings: Arc<Settings>,
    pub db: DatabaseService,
    pub services: ServiceFactory,
}

impl AppState {
    /// Production wiring: system clock and the configured mail transport
    pub fn new(settings: Settings, db: DatabaseService) -> Result<Self> {
        let clock: Arc<dyn Clock> = Arc::new(SystemClock);
        let services = ServiceFactory::new(&settings, db.clone(), clock)?;

        Ok(Self {
            settings: Arc::new(settings),
            db,
            services,
        })
    }

    /// Wiring with an explicit clock and mail transport
    pub fn with_parts(
        settings: Settings,
        db: DatabaseService,
        clock: Arc<dyn Clock>,
        transport: Arc<dyn MailTransport>,
    ) -> Self {
        let services = ServiceFactory::with_transport(&settings, db.clone(), clock, transport);

        Self {
            settings: Arc::new(settings),
            db,
            services,
        }
    }
}
