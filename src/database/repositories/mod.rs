//! Database repositories module
//!
//! Postgres implementations of the store traits in [`crate::database::store`]

pub mod booking;
pub mod court;
pub mod email_log;
pub mod group;
pub mod scan;
pub mod user;

// Re-export repositories
pub use booking::BookingRepository;
pub use court::CourtRepository;
pub use email_log::EmailLogRepository;
pub use group::GroupRepository;
pub use scan::ScanRepository;
pub use user::UserRepository;
