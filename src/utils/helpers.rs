//! Helper functions and utilities
//!
//! This module contains common helper functions used throughout the application.

use std::sync::OnceLock;

use chrono::{Months, NaiveDate};
use rand::Rng;
use regex::Regex;

/// Prefix of every member QR token
pub const QR_TOKEN_PREFIX: &str = "USER_";

/// Number of random characters after the QR prefix
pub const QR_TOKEN_LENGTH: usize = 10;

const QR_CHARSET: &[u8] = b"ABCDEFGHIJKLMNOPQRSTUVWXYZ0123456789";

/// Generate a member QR token: `USER_` followed by 10 uppercase alphanumerics
pub fn generate_qr_token() -> String {
    format!("{}{}", QR_TOKEN_PREFIX, generate_random_string(QR_TOKEN_LENGTH))
}

/// Check whether a string has the shape of a QR token
pub fn is_qr_token(value: &str) -> bool {
    value
        .strip_prefix(QR_TOKEN_PREFIX)
        .map(|rest| {
            rest.len() == QR_TOKEN_LENGTH
                && rest.bytes().all(|b| b.is_ascii_uppercase() || b.is_ascii_digit())
        })
        .unwrap_or(false)
}

/// Generate a random uppercase alphanumeric string
pub fn generate_random_string(length: usize) -> String {
    let mut rng = rand::thread_rng();

    (0..length)
        .map(|_| {
            let idx = rng.gen_range(0..QR_CHARSET.len());
            QR_CHARSET[idx] as char
        })
        .collect()
}

fn email_regex() -> &'static Regex {
    static EMAIL: OnceLock<Regex> = OnceLock::new();
    EMAIL.get_or_init(|| Regex::new(r"^[^\s@]+@[^\s@]+\.[^\s@]+$").expect("email regex is valid"))
}

/// Validate email format
pub fn is_valid_email(email: &str) -> bool {
    email_regex().is_match(email)
}

/// Lower-case and trim an email address for storage and lookup
pub fn normalize_email(email: &str) -> String {
    email.trim().to_lowercase()
}

/// Check password strength: at least 8 characters with a letter and a digit
pub fn check_password_strength(password: &str) -> Result<(), &'static str> {
    if password.chars().count() < 8 {
        return Err("Password must be at least 8 characters long");
    }

    let has_letter = password.chars().any(|c| c.is_alphabetic());
    let has_digit = password.chars().any(|c| c.is_ascii_digit());

    if !has_letter || !has_digit {
        return Err("Password must contain at least one letter and one number");
    }

    Ok(())
}

/// Format a booking date for emails, e.g. "Friday, 10 January 2025"
pub fn format_booking_date(date: NaiveDate) -> String {
    date.format("%A, %-d %B %Y").to_string()
}

/// Format an hour as `HH:00`
pub fn format_hour(hour: u32) -> String {
    format!("{:02}:00", hour)
}

/// Membership renewal date: the same calendar day one year later
///
/// 29 February maps to 28 February of the following year.
pub fn one_year_after(date: NaiveDate) -> NaiveDate {
    date.checked_add_months(Months::new(12)).unwrap_or(NaiveDate::MAX)
}

/// Escape text for inclusion in HTML email bodies
pub fn escape_html(text: &str) -> String {
    let mut escaped = String::with_capacity(text.len());
    for c in text.chars() {
        match c {
            '&' => escaped.push_str("&amp;"),
            '<' => escaped.push_str("&lt;"),
            '>' => escaped.push_str("&gt;"),
            '"' => escaped.push_str("&quot;"),
            '\'' => escaped.push_str("&#39;"),
            _ => escaped.push(c),
        }
    }
    escaped
}

/// Calculate pagination offset
pub fn calculate_offset(page: usize, page_size: usize) -> usize {
    page.saturating_sub(1) * page_size
}
