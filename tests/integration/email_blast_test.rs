//! Bulk email batching, retries and the audit log

use assert_matches::assert_matches;
use courtside::services::{Audience, EmailBlastRequest};
use courtside::CourtsideError;

use crate::helpers::*;

fn blast(audience: Audience) -> EmailBlastRequest {
    EmailBlastRequest {
        subject: "Club night".to_string(),
        html: "<p>Friday from 18:00</p>".to_string(),
        audience,
        template: None,
    }
}

fn addresses(list: &[&str]) -> Audience {
    Audience::Emails(list.iter().map(|e| e.to_string()).collect())
}

#[tokio::test]
async fn test_blast_is_sent_in_bcc_batches() {
    let ctx = TestContext::new();
    let sender = admin(&ctx).await;

    let report = ctx
        .services()
        .email_blast_service
        .send_blast(
            sender.id,
            blast(addresses(&[
                "a@example.com",
                "b@example.com",
                "C@Example.com ",
                "d@example.com",
                "e@example.com",
                "c@example.com",
            ])),
        )
        .await
        .expect("Blast should be delivered");

    assert_eq!(report.recipients, 5);
    assert_eq!(report.batches, 3);
    assert_eq!(report.delivered, 5);
    assert_eq!(report.failed_batches, 0);

    let sent = ctx.mailer.sent();
    assert_eq!(sent.len(), 3);
    assert_eq!(sent[0].bcc, vec!["a@example.com", "b@example.com"]);
    assert_eq!(sent[1].bcc, vec!["c@example.com", "d@example.com"]);
    assert_eq!(sent[2].bcc, vec!["e@example.com"]);
    for email in &sent {
        assert_eq!(email.to, vec![ctx.settings.mail.from_address.clone()]);
        assert_eq!(email.subject, "Club night");
    }

    assert_eq!(report.log.recipient_count, 5);
    assert_eq!(report.log.template, "blast");
    assert_eq!(report.log.sender_id, sender.id);
    let logs = ctx.db.email_logs.recent(10).await.unwrap();
    assert_eq!(logs.len(), 1);
    assert_eq!(logs[0].subject, "Club night");
}

#[tokio::test]
async fn test_failed_batch_is_retried() {
    let ctx = TestContext::new();
    let sender = admin(&ctx).await;
    ctx.mailer.fail_next(1);

    let report = ctx
        .services()
        .email_blast_service
        .send_blast(sender.id, blast(addresses(&["a@example.com", "b@example.com", "c@example.com"])))
        .await
        .unwrap();

    assert_eq!(report.delivered, 3);
    assert_eq!(report.failed_batches, 0);
    assert_eq!(ctx.mailer.attempts(), 3);
}

#[tokio::test]
async fn test_partial_failure_is_logged_with_delivered_count() {
    let ctx = TestContext::new();
    let sender = admin(&ctx).await;
    // Both attempts of the first batch fail
    ctx.mailer.fail_next(2);

    let report = ctx
        .services()
        .email_blast_service
        .send_blast(sender.id, blast(addresses(&["a@example.com", "b@example.com", "c@example.com"])))
        .await
        .unwrap();

    assert_eq!(report.batches, 2);
    assert_eq!(report.failed_batches, 1);
    assert_eq!(report.delivered, 1);
    assert_eq!(report.log.recipient_count, 1);
}

#[tokio::test]
async fn test_total_failure_writes_no_log() {
    let ctx = TestContext::new();
    let sender = admin(&ctx).await;
    ctx.mailer.fail_next(100);

    let result = ctx
        .services()
        .email_blast_service
        .send_blast(sender.id, blast(addresses(&["a@example.com", "b@example.com", "c@example.com"])))
        .await;

    assert_matches!(result, Err(CourtsideError::Mail(_)));
    assert_eq!(ctx.mailer.attempts(), 4);
    assert!(ctx.db.email_logs.recent(10).await.unwrap().is_empty());
}

#[tokio::test]
async fn test_member_audiences() {
    let ctx = TestContext::new();
    let sender = admin(&ctx).await;
    active_member(&ctx, "Alice").await;
    inactive_user(&ctx, "Newcomer").await;
    let service = &ctx.services().email_blast_service;

    let report = service.send_blast(sender.id, blast(Audience::ActiveMembers)).await.unwrap();
    // The administrator is an active member too
    assert_eq!(report.recipients, 2);
    let bcc: Vec<String> = ctx.mailer.sent().into_iter().flat_map(|m| m.bcc).collect();
    assert!(!bcc.contains(&"newcomer@example.com".to_string()));

    let report = service.send_blast(sender.id, blast(Audience::All)).await.unwrap();
    assert_eq!(report.recipients, 3);
    assert_eq!(ctx.db.email_logs.recent(10).await.unwrap().len(), 2);
}

#[tokio::test]
async fn test_blast_validation() {
    let ctx = TestContext::new();
    let sender = admin(&ctx).await;
    let service = &ctx.services().email_blast_service;

    let mut request = blast(addresses(&["a@example.com"]));
    request.subject = "  ".to_string();
    assert_matches!(
        service.send_blast(sender.id, request).await,
        Err(CourtsideError::InvalidInput(_))
    );

    assert_matches!(
        service.send_blast(sender.id, blast(addresses(&["not-an-address"]))).await,
        Err(CourtsideError::InvalidInput(_))
    );

    assert_matches!(
        service.send_blast(sender.id, blast(addresses(&[]))).await,
        Err(CourtsideError::InvalidInput(_))
    );
    assert_eq!(ctx.mailer.attempts(), 0);
}
