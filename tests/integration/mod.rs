//! Integration tests module
//!
//! Organized by feature: bookings and availability, attendance scanning,
//! notifications and blasts, users, groups and administration.

pub mod availability_test;
pub mod booking_test;
pub mod email_blast_test;
pub mod notification_test;
pub mod scanner_test;
pub mod user_test;
