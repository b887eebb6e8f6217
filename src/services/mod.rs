//! Services module
//!
//! This module contains business logic services

pub mod admin;
pub mod auth;
pub mod availability;
pub mod booking;
pub mod email_blast;
pub mod group;
pub mod mailer;
pub mod notification;
pub mod scanner;
pub mod slots;
pub mod user;

// Re-export commonly used services
pub use admin::{AdminService, DashboardStats};
pub use auth::{AuthService, Claims};
pub use availability::{Availability, AvailabilityService};
pub use booking::{BookingOutcome, BookingService, UserBookingCheck};
pub use email_blast::{Audience, BlastReport, EmailBlastRequest, EmailBlastService};
pub use group::GroupService;
pub use mailer::{HttpMailer, LogMailer, MailTransport, OutgoingEmail};
pub use notification::{NotificationReport, NotificationService, TemplateParams};
pub use scanner::{ScanResult, ScannerService};
pub use user::{LoginResponse, UserService};

use std::sync::Arc;

use crate::config::Settings;
use crate::database::DatabaseService;
use crate::utils::clock::Clock;
use crate::utils::errors::Result;

/// Service factory for creating and managing all services
#[derive(Clone)]
pub struct ServiceFactory {
    pub auth_service: AuthService,
    pub user_service: UserService,
    pub availability_service: AvailabilityService,
    pub booking_service: BookingService,
    pub scanner_service: ScannerService,
    pub group_service: GroupService,
    pub admin_service: AdminService,
    pub email_blast_service: EmailBlastService,
}

impl ServiceFactory {
    /// Create a new ServiceFactory with the mail transport chosen by configuration
    pub fn new(settings: &Settings, db: DatabaseService, clock: Arc<dyn Clock>) -> Result<Self> {
        let transport = mailer::transport_from_config(&settings.mail)?;
        Ok(Self::with_transport(settings, db, clock, transport))
    }

    /// Create a ServiceFactory around an explicit mail transport
    pub fn with_transport(
        settings: &Settings,
        db: DatabaseService,
        clock: Arc<dyn Clock>,
        transport: Arc<dyn MailTransport>,
    ) -> Self {
        let auth_service = AuthService::new(&settings.auth, clock.clone());
        let notification_service = NotificationService::new(transport.clone(), &settings.mail);

        Self {
            user_service: UserService::new(db.clone(), auth_service.clone(), clock.clone()),
            availability_service: AvailabilityService::new(db.clone(), clock.clone()),
            booking_service: BookingService::new(db.clone(), notification_service, clock.clone()),
            scanner_service: ScannerService::new(db.clone(), clock.clone()),
            group_service: GroupService::new(db.clone()),
            admin_service: AdminService::new(db.clone(), clock.clone()),
            email_blast_service: EmailBlastService::new(db, transport, settings.mail.clone(), clock),
            auth_service,
        }
    }
}
