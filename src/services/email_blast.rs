//! Bulk email
//!
//! Recipients are split into BCC batches of `mail.batch_size`, with a fixed
//! pause between batches as the only backpressure toward the mail provider.
//! A batch that fails in transport is retried up to `mail.max_attempts`
//! times. Every blast that reaches at least one recipient is appended to the
//! email audit log.

use std::collections::HashSet;
use std::sync::Arc;
use std::time::Duration;

use serde::{Deserialize, Serialize};
use tracing::{info, warn};

use crate::config::MailConfig;
use crate::database::DatabaseService;
use crate::models::email_log::{EmailLog, NewEmailLog};
use crate::services::mailer::{self, MailTransport, OutgoingEmail};
use crate::utils::clock::Clock;
use crate::utils::errors::{CourtsideError, Result};
use crate::utils::helpers::{is_valid_email, normalize_email};
use crate::utils::logging::{log_admin_action, log_email_delivery};

/// Template tag stored for blasts sent without one
pub const DEFAULT_BLAST_TEMPLATE: &str = "blast";

const USER_PAGE_SIZE: i64 = 500;

/// Who receives a blast
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum Audience {
    All,
    ActiveMembers,
    Emails(Vec<String>),
}

/// Body of `POST /api/admin/email-blast`
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EmailBlastRequest {
    pub subject: String,
    pub html: String,
    pub audience: Audience,
    pub template: Option<String>,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct BlastReport {
    pub recipients: usize,
    pub delivered: usize,
    pub batches: usize,
    pub failed_batches: usize,
    pub log: EmailLog,
}

#[derive(Clone)]
pub struct EmailBlastService {
    db: DatabaseService,
    transport: Arc<dyn MailTransport>,
    config: MailConfig,
    clock: Arc<dyn Clock>,
}

impl EmailBlastService {
    pub fn new(
        db: DatabaseService,
        transport: Arc<dyn MailTransport>,
        config: MailConfig,
        clock: Arc<dyn Clock>,
    ) -> Self {
        Self {
            db,
            transport,
            config,
            clock,
        }
    }

    pub async fn send_blast(&self, sender_id: i64, request: EmailBlastRequest) -> Result<BlastReport> {
        if request.subject.trim().is_empty() || request.html.trim().is_empty() {
            return Err(CourtsideError::InvalidInput(
                "Subject and content are required".to_string(),
            ));
        }

        let recipients = self.resolve_audience(&request.audience).await?;
        if recipients.is_empty() {
            return Err(CourtsideError::InvalidInput("No recipients selected".to_string()));
        }

        let batch_size = self.config.batch_size.max(1);
        let pause = Duration::from_millis(self.config.batch_pause_ms);
        let from = mailer::sender(&self.config);
        let template = request
            .template
            .clone()
            .unwrap_or_else(|| DEFAULT_BLAST_TEMPLATE.to_string());

        info!(recipients = recipients.len(), batch_size = batch_size, "Starting email blast");

        let mut delivered = 0;
        let mut failed_batches = 0;
        let batches: Vec<&[String]> = recipients.chunks(batch_size).collect();

        for (index, batch) in batches.iter().enumerate() {
            if index > 0 {
                tokio::time::sleep(pause).await;
            }

            let email = OutgoingEmail {
                from: from.clone(),
                to: vec![self.config.from_address.clone()],
                bcc: batch.to_vec(),
                subject: request.subject.clone(),
                html: request.html.clone(),
            };

            match self.send_with_retry(&email, index).await {
                Ok(()) => {
                    delivered += batch.len();
                    log_email_delivery(&template, batch.len(), true, None);
                }
                Err(e) => {
                    failed_batches += 1;
                    log_email_delivery(&template, batch.len(), false, Some(&e.to_string()));
                }
            }
        }

        if delivered == 0 {
            return Err(CourtsideError::Mail(format!(
                "None of {} batches could be delivered",
                batches.len()
            )));
        }

        let log = self
            .db
            .email_logs
            .append(NewEmailLog {
                subject: request.subject,
                template: template.clone(),
                content: request.html,
                recipient_count: i32::try_from(delivered).unwrap_or(i32::MAX),
                sender_id,
                sent_at: self.clock.now(),
            })
            .await?;

        log_admin_action(sender_id, "email_blast", Some(&template), Some(&format!("{} recipients", delivered)));
        info!(delivered = delivered, failed_batches = failed_batches, "Email blast completed");

        Ok(BlastReport {
            recipients: recipients.len(),
            delivered,
            batches: batches.len(),
            failed_batches,
            log,
        })
    }

    async fn send_with_retry(&self, email: &OutgoingEmail, batch: usize) -> Result<()> {
        let attempts = self.config.max_attempts.max(1);
        let mut attempt = 1;

        loop {
            match self.transport.send(email).await {
                Ok(()) => return Ok(()),
                Err(e) if e.is_recoverable() && attempt < attempts => {
                    warn!(batch = batch, attempt = attempt, error = %e, "Blast batch failed, retrying");
                    attempt += 1;
                    tokio::time::sleep(Duration::from_millis(self.config.batch_pause_ms)).await;
                }
                Err(e) => {
                    warn!(batch = batch, attempt = attempt, error = %e, "Blast batch failed");
                    return Err(e);
                }
            }
        }
    }

    /// Normalised, de-duplicated recipient addresses in a stable order
    async fn resolve_audience(&self, audience: &Audience) -> Result<Vec<String>> {
        let emails = match audience {
            Audience::All => {
                let mut emails = Vec::new();
                let mut offset = 0;
                loop {
                    let page = self.db.users.list(USER_PAGE_SIZE, offset).await?;
                    if page.is_empty() {
                        break;
                    }
                    offset += page.len() as i64;
                    emails.extend(page.into_iter().map(|u| u.email));
                }
                emails
            }
            Audience::ActiveMembers => self
                .db
                .users
                .list_active()
                .await?
                .into_iter()
                .map(|u| u.email)
                .collect(),
            Audience::Emails(list) => {
                if let Some(bad) = list.iter().find(|e| !is_valid_email(&normalize_email(e))) {
                    return Err(CourtsideError::InvalidInput(format!("Invalid email address: {}", bad)));
                }
                list.clone()
            }
        };

        let mut seen = HashSet::new();
        Ok(emails
            .iter()
            .map(|e| normalize_email(e))
            .filter(|e| seen.insert(e.clone()))
            .collect())
    }
}
