//! Notification service implementation
//!
//! Renders booking emails from a keyed template map with `{placeholder}`
//! substitution and sends them one recipient at a time. A failed send is
//! logged and reported; it never undoes the booking.

use std::collections::HashMap;
use std::sync::Arc;

use serde::Serialize;
use tracing::{debug, info, warn};

use crate::config::MailConfig;
use crate::models::booking::BookingDetails;
use crate::models::user::User;
use crate::services::mailer::{self, MailTransport, OutgoingEmail};
use crate::utils::errors::{CourtsideError, Result};
use crate::utils::helpers::{escape_html, format_booking_date};
use crate::utils::logging::log_email_delivery;

pub const BOOKING_CONFIRMATION: &str = "booking_confirmation";
pub const BOOKING_INVITATION: &str = "booking_invitation";

/// Email template: subject and HTML body with `{placeholder}`s
#[derive(Debug, Clone, Serialize)]
pub struct EmailTemplate {
    pub key: String,
    pub subject: String,
    pub html: String,
}

/// Outcome of a notification run
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct NotificationReport {
    pub sent: usize,
    pub failed: Vec<FailedDelivery>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct FailedDelivery {
    pub recipient: String,
    pub error: String,
}

/// Notification service for booking emails
#[derive(Clone)]
pub struct NotificationService {
    transport: Arc<dyn MailTransport>,
    from: String,
    templates: HashMap<String, EmailTemplate>,
}

impl NotificationService {
    /// Create a new NotificationService instance
    pub fn new(transport: Arc<dyn MailTransport>, config: &MailConfig) -> Self {
        Self {
            transport,
            from: mailer::sender(config),
            templates: Self::load_default_templates(),
        }
    }

    /// Confirmation for the booker, then one invitation per invited player
    pub async fn send_booking_notifications(
        &self,
        booker: &User,
        invited: &[User],
        bookings: &[BookingDetails],
    ) -> NotificationReport {
        let mut report = NotificationReport::default();
        let Some(first) = bookings.first() else {
            return report;
        };

        let mut params = TemplateParams::new();
        params.text("court_name", &first.court_name);
        params.text("booker_name", &booker.name);
        params.html("slots", slot_table(bookings));
        params.text(
            "booking_ids",
            bookings.iter().map(|b| b.id.to_string()).collect::<Vec<_>>().join(", "),
        );
        params.text("players", player_names(booker, invited));

        let mut recipients = Vec::with_capacity(1 + invited.len());
        recipients.push((BOOKING_CONFIRMATION, booker));
        recipients.extend(invited.iter().map(|user| (BOOKING_INVITATION, user)));

        for (template_key, user) in recipients {
            params.text("name", &user.name);
            let result = match self.render(template_key, &params) {
                Ok((subject, html)) => {
                    let email = OutgoingEmail {
                        from: self.from.clone(),
                        to: vec![user.email.clone()],
                        bcc: Vec::new(),
                        subject,
                        html,
                    };
                    self.transport.send(&email).await
                }
                Err(e) => Err(e),
            };

            match result {
                Ok(()) => {
                    debug!(template_key = template_key, user_id = user.id, "Booking email sent");
                    log_email_delivery(template_key, 1, true, None);
                    report.sent += 1;
                }
                Err(e) => {
                    warn!(template_key = template_key, user_id = user.id, error = %e, "Failed to send booking email");
                    log_email_delivery(template_key, 1, false, Some(&e.to_string()));
                    report.failed.push(FailedDelivery {
                        recipient: user.email.clone(),
                        error: e.to_string(),
                    });
                }
            }
        }

        info!(sent = report.sent, failed = report.failed.len(), "Booking notifications completed");
        report
    }

    /// Render a template's plain-text subject and HTML body
    pub fn render(&self, template_key: &str, parameters: &TemplateParams) -> Result<(String, String)> {
        let template = self
            .templates
            .get(template_key)
            .ok_or_else(|| CourtsideError::InvalidInput(format!("Template not found: {}", template_key)))?;

        Ok((
            substitute(&template.subject, |key| parameters.subject_value(key)),
            substitute(&template.html, |key| parameters.html_value(key)),
        ))
    }

    pub fn template_keys(&self) -> Vec<String> {
        let mut keys: Vec<String> = self.templates.keys().cloned().collect();
        keys.sort();
        keys
    }

    fn load_default_templates() -> HashMap<String, EmailTemplate> {
        let mut templates = HashMap::new();

        templates.insert(
            BOOKING_CONFIRMATION.to_string(),
            EmailTemplate {
                key: BOOKING_CONFIRMATION.to_string(),
                subject: "Booking confirmed: {court_name}".to_string(),
                html: concat!(
                    "<p>Hi {name},</p>",
                    "<p>Your booking on <strong>{court_name}</strong> is confirmed.</p>",
                    "<table><thead><tr><th>Date</th><th>Time</th></tr></thead><tbody>{slots}</tbody></table>",
                    "<p>Players: {players}</p>",
                    "<p>Booking reference: {booking_ids}</p>"
                )
                .to_string(),
            },
        );

        templates.insert(
            BOOKING_INVITATION.to_string(),
            EmailTemplate {
                key: BOOKING_INVITATION.to_string(),
                subject: "{booker_name} invited you to play on {court_name}".to_string(),
                html: concat!(
                    "<p>Hi {name},</p>",
                    "<p><strong>{booker_name}</strong> has booked <strong>{court_name}</strong> and invited you to play.</p>",
                    "<table><thead><tr><th>Date</th><th>Time</th></tr></thead><tbody>{slots}</tbody></table>",
                    "<p>Players: {players}</p>"
                )
                .to_string(),
            },
        );

        templates
    }
}

/// Values for a template's `{placeholder}`s
///
/// Text values go into the subject as given and are escaped for the body.
/// HTML values are trusted markup built by this module.
#[derive(Debug, Clone, Default)]
pub struct TemplateParams {
    values: HashMap<&'static str, TemplateValue>,
}

#[derive(Debug, Clone)]
enum TemplateValue {
    Text(String),
    Html(String),
}

impl TemplateParams {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn text(&mut self, key: &'static str, value: impl Into<String>) {
        self.values.insert(key, TemplateValue::Text(value.into()));
    }

    pub fn html(&mut self, key: &'static str, markup: impl Into<String>) {
        self.values.insert(key, TemplateValue::Html(markup.into()));
    }

    fn subject_value(&self, key: &str) -> Option<String> {
        self.values.get(key).map(|value| match value {
            TemplateValue::Text(text) | TemplateValue::Html(text) => text.clone(),
        })
    }

    fn html_value(&self, key: &str) -> Option<String> {
        self.values.get(key).map(|value| match value {
            TemplateValue::Text(text) => escape_html(text),
            TemplateValue::Html(markup) => markup.clone(),
        })
    }
}

/// Replace each `{key}` in one left-to-right pass.
///
/// Inserted values are never rescanned. Unknown placeholders stay as written.
fn substitute<F>(content: &str, lookup: F) -> String
where
    F: Fn(&str) -> Option<String>,
{
    let mut formatted = String::with_capacity(content.len());
    let mut rest = content;

    while let Some(open) = rest.find('{') {
        formatted.push_str(&rest[..open]);
        let tail = &rest[open..];
        let Some(close) = tail.find('}') else {
            rest = tail;
            break;
        };
        let key = &tail[1..close];
        match lookup(key) {
            Some(value) if !key.contains('{') => {
                formatted.push_str(&value);
                rest = &tail[close + 1..];
            }
            _ => {
                formatted.push('{');
                rest = &tail[1..];
            }
        }
    }

    formatted.push_str(rest);
    formatted
}

/// `<tr>` rows of date and time, one per booked slot
fn slot_table(bookings: &[BookingDetails]) -> String {
    bookings
        .iter()
        .map(|b| {
            format!(
                "<tr><td>{}</td><td>{}</td></tr>",
                format_booking_date(b.date),
                b.time
            )
        })
        .collect()
}

fn player_names(booker: &User, invited: &[User]) -> String {
    std::iter::once(booker)
        .chain(invited.iter())
        .map(|u| u.name.as_str())
        .collect::<Vec<_>>()
        .join(", ")
}
