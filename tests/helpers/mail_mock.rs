//! Mail transports for tests
//!
//! [`RecordingMailer`] keeps every message in memory and can be told to fail.
//! [`MailApiMock`] stands in for the HTTP mail provider.

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Mutex;

use async_trait::async_trait;
use courtside::config::MailConfig;
use courtside::services::{MailTransport, OutgoingEmail};
use courtside::{CourtsideError, Result};
use wiremock::matchers::{header, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

/// Mail transport that records what it was asked to send
#[derive(Debug, Default)]
pub struct RecordingMailer {
    sent: Mutex<Vec<OutgoingEmail>>,
    /// Remaining sends that fail before deliveries succeed again
    failures_left: AtomicUsize,
    /// Recipients whose messages always fail
    failing_recipients: Mutex<Vec<String>>,
    attempts: AtomicUsize,
}

impl RecordingMailer {
    pub fn new() -> Self {
        Self::default()
    }

    /// Fail the next `count` sends
    pub fn fail_next(&self, count: usize) {
        self.failures_left.store(count, Ordering::SeqCst);
    }

    /// Fail every message addressed to `email`
    pub fn fail_for(&self, email: &str) {
        self.failing_recipients
            .lock()
            .unwrap()
            .push(email.to_string());
    }

    pub fn sent(&self) -> Vec<OutgoingEmail> {
        self.sent.lock().unwrap().clone()
    }

    pub fn sent_to(&self, email: &str) -> Vec<OutgoingEmail> {
        self.sent()
            .into_iter()
            .filter(|m| m.to.iter().any(|to| to == email))
            .collect()
    }

    /// Every call to `send`, including failed ones
    pub fn attempts(&self) -> usize {
        self.attempts.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl MailTransport for RecordingMailer {
    async fn send(&self, email: &OutgoingEmail) -> Result<()> {
        self.attempts.fetch_add(1, Ordering::SeqCst);

        let should_fail = self
            .failures_left
            .fetch_update(Ordering::SeqCst, Ordering::SeqCst, |left| left.checked_sub(1))
            .is_ok();
        if should_fail {
            return Err(CourtsideError::Mail("HTTP 503 Service Unavailable: try later".to_string()));
        }

        let failing = self.failing_recipients.lock().unwrap();
        if email.to.iter().any(|to| failing.contains(to)) {
            return Err(CourtsideError::MailRejected("HTTP 422 Unprocessable Entity: mailbox rejected".to_string()));
        }
        drop(failing);

        self.sent.lock().unwrap().push(email.clone());
        Ok(())
    }
}

/// Mock server for the JSON mail API
pub struct MailApiMock {
    pub server: MockServer,
}

pub const MAIL_API_KEY: &str = "test-mail-key";
pub const MAIL_API_PATH: &str = "/v1/emails";

impl MailApiMock {
    pub async fn new() -> Self {
        Self {
            server: MockServer::start().await,
        }
    }

    /// Mail settings pointing at this server
    pub fn config(&self) -> MailConfig {
        MailConfig {
            enabled: true,
            api_url: format!("{}{}", self.server.uri(), MAIL_API_PATH),
            api_key: MAIL_API_KEY.to_string(),
            timeout_seconds: 1,
            batch_pause_ms: 0,
            ..MailConfig::default()
        }
    }

    /// Accept authenticated posts with the given status
    pub async fn respond_with(&self, status: u16, body: &str) {
        Mock::given(method("POST"))
            .and(path(MAIL_API_PATH))
            .and(header("authorization", format!("Bearer {}", MAIL_API_KEY).as_str()))
            .respond_with(ResponseTemplate::new(status).set_body_string(body))
            .mount(&self.server)
            .await;
    }

    /// Bodies of every request the server received
    pub async fn received_json(&self) -> Vec<serde_json::Value> {
        self.server
            .received_requests()
            .await
            .unwrap_or_default()
            .iter()
            .map(|r| serde_json::from_slice(&r.body).unwrap())
            .collect()
    }
}
