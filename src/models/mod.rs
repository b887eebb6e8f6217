//! Data models module
//!
//! This module contains all data structures used throughout the application

pub mod booking;
pub mod court;
pub mod email_log;
pub mod group;
pub mod scan;
pub mod slot;
pub mod user;

// Re-export commonly used models
pub use booking::{Booking, BookingDetails, CreateBookingRequest, InviteList};
pub use court::Court;
pub use email_log::{EmailLog, NewEmailLog};
pub use group::{AddMemberRequest, CreateGroupRequest, Group, GroupMember, GroupMemberDetails, GroupRole};
pub use scan::{NewScan, ScanEvent, ScanRequest};
pub use slot::{Slot, SlotKey};
pub use user::{
    ChangePasswordRequest, LoginRequest, NewUser, PlayerSummary, RegisterRequest,
    UpdateProfileRequest, User, UserRole,
};
