//! Booking emails

use courtside::models::UserRole;

use crate::helpers::*;

#[tokio::test]
async fn test_confirmation_and_invitations_sent() {
    let ctx = TestContext::new();
    let alice = active_member(&ctx, "Alice").await;
    let bob = active_member(&ctx, "Bob").await;
    let cleo = active_member(&ctx, "Cleo").await;

    ctx.services()
        .booking_service
        .create_booking(
            alice.id,
            booking_request(2, &["2|2025-01-10|14:00", "2|2025-01-10|15:00"], &[bob.id, cleo.id]),
        )
        .await
        .unwrap();

    let sent = ctx.mailer.sent();
    assert_eq!(sent.len(), 3);
    assert_eq!(sent[0].to, vec![alice.email.clone()]);
    assert!(sent[0].subject.contains("Court 2"));
    assert!(sent[0].html.contains("Friday, 10 January 2025"));
    assert!(sent[0].html.contains("14:00"));
    assert!(sent[0].html.contains("15:00"));

    let invitation = &ctx.mailer.sent_to(&bob.email)[0];
    assert!(invitation.html.contains("Alice"));
    assert!(invitation.bcc.is_empty());
    assert_eq!(ctx.mailer.sent_to(&cleo.email).len(), 1);
}

#[tokio::test]
async fn test_failed_email_does_not_fail_booking() {
    let ctx = TestContext::new();
    let alice = active_member(&ctx, "Alice").await;
    let bob = active_member(&ctx, "Bob").await;
    ctx.mailer.fail_for(&bob.email);

    let outcome = ctx
        .services()
        .booking_service
        .create_booking(alice.id, booking_request(2, &["2|2025-01-10|14:00"], &[bob.id]))
        .await
        .expect("Booking stands even when an email fails");

    assert_eq!(outcome.bookings.len(), 1);
    assert_eq!(outcome.notifications.sent, 1);
    assert_eq!(outcome.notifications.failed.len(), 1);
    assert_eq!(outcome.notifications.failed[0].recipient, bob.email);
    assert_eq!(ctx.mailer.sent_to(&alice.email).len(), 1);
}

#[tokio::test]
async fn test_names_are_escaped() {
    let ctx = TestContext::new();
    let booker = create_user(
        &ctx,
        "<script>Mallory</script>",
        "mallory@example.com",
        UserRole::User,
        true,
    )
    .await;

    ctx.services()
        .booking_service
        .create_booking(booker.id, booking_request(4, &["4|2025-01-10|20:00"], &[]))
        .await
        .unwrap();

    let html = &ctx.mailer.sent()[0].html;
    assert!(!html.contains("<script>"));
    assert!(html.contains("&lt;script&gt;Mallory"));
}

#[tokio::test]
async fn test_subject_keeps_punctuation_in_names() {
    let ctx = TestContext::new();
    let booker = create_user(&ctx, "Dan O'Brien & Co", "dan@example.com", UserRole::Member, true).await;
    let bob = active_member(&ctx, "Bob").await;

    ctx.services()
        .booking_service
        .create_booking(booker.id, booking_request(2, &["2|2025-01-10|14:00"], &[bob.id]))
        .await
        .unwrap();

    let invitation = &ctx.mailer.sent_to(&bob.email)[0];
    assert_eq!(invitation.subject, "Dan O'Brien & Co invited you to play on Court 2");
    assert!(invitation.html.contains("Dan O&#39;Brien &amp; Co"));
    assert!(!invitation.html.contains("O'Brien"));
}

#[tokio::test]
async fn test_placeholder_in_name_is_not_expanded() {
    let ctx = TestContext::new();
    let booker = create_user(&ctx, "{booking_ids}", "braces@example.com", UserRole::Member, true).await;

    for hour in 6..16 {
        let slot = format!("3|2025-01-11|{:02}:00", hour);
        ctx.services()
            .booking_service
            .create_booking(booker.id, booking_request(3, &[slot.as_str()], &[]))
            .await
            .unwrap();
    }

    let sent = ctx.mailer.sent_to("braces@example.com");
    assert_eq!(sent.len(), 10);
    for email in sent {
        assert!(email.html.starts_with("<p>Hi {booking_ids},</p>"));
    }
}
