//! Mail delivery
//!
//! [`MailTransport`] is the seam to the outside mail provider. [`HttpMailer`]
//! posts JSON to a transactional mail API; [`LogMailer`] only logs and is used
//! when delivery is disabled.

use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use reqwest::{Client, StatusCode};
use serde::Serialize;
use tracing::{debug, info};

use crate::config::MailConfig;
use crate::utils::errors::{CourtsideError, Result};

/// One message as accepted by the mail API
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct OutgoingEmail {
    pub from: String,
    pub to: Vec<String>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub bcc: Vec<String>,
    pub subject: String,
    pub html: String,
}

impl OutgoingEmail {
    /// Every address the message is delivered to
    pub fn recipient_count(&self) -> usize {
        self.to.len() + self.bcc.len()
    }
}

#[async_trait]
pub trait MailTransport: Send + Sync {
    async fn send(&self, email: &OutgoingEmail) -> Result<()>;
}

/// Transport for a JSON mail API authenticated with a bearer key
#[derive(Debug, Clone)]
pub struct HttpMailer {
    client: Client,
    api_url: String,
    api_key: String,
}

impl HttpMailer {
    pub fn new(config: &MailConfig) -> Result<Self> {
        let client = Client::builder()
            .timeout(Duration::from_secs(config.timeout_seconds))
            .user_agent(concat!("courtside/", env!("CARGO_PKG_VERSION")))
            .build()?;

        Ok(Self {
            client,
            api_url: config.api_url.clone(),
            api_key: config.api_key.clone(),
        })
    }
}

#[async_trait]
impl MailTransport for HttpMailer {
    async fn send(&self, email: &OutgoingEmail) -> Result<()> {
        debug!(subject = %email.subject, recipients = email.recipient_count(), "Posting email to mail API");

        let response = self
            .client
            .post(&self.api_url)
            .bearer_auth(&self.api_key)
            .json(email)
            .send()
            .await
            .map_err(|e| {
                if e.is_timeout() {
                    CourtsideError::Mail("Mail API timed out".to_string())
                } else {
                    CourtsideError::Http(e)
                }
            })?;

        let status = response.status();
        if !status.is_success() {
            let error_text = response.text().await.unwrap_or_default();
            let message = format!("HTTP {}: {}", status, error_text);
            // Only throttling and provider-side failures are worth resending
            return Err(if status == StatusCode::TOO_MANY_REQUESTS || status.is_server_error() {
                CourtsideError::Mail(message)
            } else {
                CourtsideError::MailRejected(message)
            });
        }

        Ok(())
    }
}

/// Transport that records messages in the log instead of sending them
#[derive(Debug, Clone, Copy, Default)]
pub struct LogMailer;

#[async_trait]
impl MailTransport for LogMailer {
    async fn send(&self, email: &OutgoingEmail) -> Result<()> {
        info!(
            subject = %email.subject,
            to = ?email.to,
            bcc = email.bcc.len(),
            "Mail delivery disabled; message not sent"
        );
        Ok(())
    }
}

/// Pick the transport selected by `mail.enabled`
pub fn transport_from_config(config: &MailConfig) -> Result<Arc<dyn MailTransport>> {
    if config.enabled {
        Ok(Arc::new(HttpMailer::new(config)?))
    } else {
        Ok(Arc::new(LogMailer))
    }
}

/// `Name <address>` sender header
pub fn sender(config: &MailConfig) -> String {
    format!("{} <{}>", config.from_name, config.from_address)
}
