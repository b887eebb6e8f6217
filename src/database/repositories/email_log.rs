//! Email log repository implementation

use async_trait::async_trait;
use sqlx::PgPool;

use crate::database::store::EmailLogStore;
use crate::models::email_log::{EmailLog, NewEmailLog};
use crate::utils::errors::Result;

#[derive(Clone, Debug)]
pub struct EmailLogRepository {
    pool: PgPool,
}

impl EmailLogRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl EmailLogStore for EmailLogRepository {
    async fn append(&self, entry: NewEmailLog) -> Result<EmailLog> {
        let log = sqlx::query_as::<_, EmailLog>(
            r#"
            INSERT INTO email_logs (subject, template, content, recipient_count, sender_id, sent_at)
            VALUES ($1, $2, $3, $4, $5, $6)
            RETURNING id, subject, template, content, recipient_count, sender_id, sent_at
            "#,
        )
        .bind(entry.subject)
        .bind(entry.template)
        .bind(entry.content)
        .bind(entry.recipient_count)
        .bind(entry.sender_id)
        .bind(entry.sent_at)
        .fetch_one(&self.pool)
        .await?;

        Ok(log)
    }

    async fn recent(&self, limit: i64) -> Result<Vec<EmailLog>> {
        let logs = sqlx::query_as::<_, EmailLog>(
            r#"
            SELECT id, subject, template, content, recipient_count, sender_id, sent_at
            FROM email_logs
            ORDER BY sent_at DESC, id DESC
            LIMIT $1
            "#,
        )
        .bind(limit)
        .fetch_all(&self.pool)
        .await?;

        Ok(logs)
    }
}
