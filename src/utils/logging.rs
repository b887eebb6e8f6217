//! Logging configuration and setup
//!
//! This module provides logging initialization and structured logging utilities
//! for the Courtside application.

use tracing::{debug, error, info, warn};
use tracing_appender::non_blocking::WorkerGuard;
use tracing_subscriber::{fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter, Layer};

use crate::config::LoggingConfig;
use crate::utils::errors::{CourtsideError, Result};

/// Initialize logging based on configuration
///
/// The returned guard flushes the file writer on drop and must be held for
/// the lifetime of the process.
pub fn init_logging(config: &LoggingConfig) -> Result<Option<WorkerGuard>> {
    let filter = EnvFilter::try_new(&config.level)
        .map_err(|e| CourtsideError::Config(format!("Invalid log filter: {}", e)))?;

    let stdout_layer = if config.json {
        fmt::layer().json().with_writer(std::io::stdout).boxed()
    } else {
        fmt::layer().with_writer(std::io::stdout).boxed()
    };

    let (file_layer, guard) = match &config.file_path {
        Some(dir) => {
            let file_appender = tracing_appender::rolling::daily(dir, "courtside.log");
            let (non_blocking, guard) = tracing_appender::non_blocking(file_appender);
            let layer = fmt::layer().json().with_writer(non_blocking).boxed();
            (Some(layer), Some(guard))
        }
        None => (None, None),
    };

    tracing_subscriber::registry()
        .with(filter)
        .with(stdout_layer)
        .with(file_layer)
        .try_init()
        .map_err(|e| CourtsideError::Config(format!("Logging already initialized: {}", e)))?;

    info!("Logging initialized with level: {}", config.level);
    Ok(guard)
}

/// Log user actions with structured data
pub fn log_user_action(user_id: i64, action: &str, details: Option<&str>) {
    info!(
        user_id = user_id,
        action = action,
        details = details,
        "User action performed"
    );
}

/// Log booking lifecycle events
pub fn log_booking_action(user_id: i64, action: &str, court_id: i32, slots: usize) {
    info!(
        user_id = user_id,
        action = action,
        court_id = court_id,
        slots = slots,
        "Booking action performed"
    );
}

/// Log attendance scan results
pub fn log_scan(user_id: Option<i64>, outcome: &str, location: &str) {
    match outcome {
        "recorded" => info!(user_id = user_id, location = location, "Scan recorded"),
        _ => warn!(user_id = user_id, outcome = outcome, location = location, "Scan rejected"),
    }
}

/// Log group events
pub fn log_group_event(group_id: i64, event: &str, user_id: Option<i64>, details: Option<&str>) {
    info!(
        group_id = group_id,
        event = event,
        user_id = user_id,
        details = details,
        "Group event occurred"
    );
}

/// Log admin actions
pub fn log_admin_action(admin_id: i64, action: &str, target: Option<&str>, details: Option<&str>) {
    warn!(
        admin_id = admin_id,
        action = action,
        target = target,
        details = details,
        "Admin action performed"
    );
}

/// Log mail delivery outcomes
pub fn log_email_delivery(template: &str, recipients: usize, success: bool, error: Option<&str>) {
    if success {
        debug!(template = template, recipients = recipients, "Email delivered");
    } else {
        error!(
            template = template,
            recipients = recipients,
            error = error,
            "Email delivery failed"
        );
    }
}
