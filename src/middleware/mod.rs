//! Middleware module
//!
//! Request logging and bearer-token extraction for the HTTP layer

pub mod auth;
pub mod logging;

pub use auth::{AdminUser, AuthenticatedUser};
pub use logging::{RequestLogger, REQUEST_ID_HEADER};
