//! Booking creation, validation and cancellation

use assert_matches::assert_matches;
use courtside::models::UserRole;
use courtside::CourtsideError;

use crate::helpers::*;

#[tokio::test]
async fn test_books_several_slots_with_invitee() {
    let ctx = TestContext::new();
    let alice = active_member(&ctx, "Alice").await;
    let bob = active_member(&ctx, "Bob").await;

    let outcome = ctx
        .services()
        .booking_service
        .create_booking(
            alice.id,
            booking_request(2, &["2|2025-01-10|15:00", "2|2025-01-10|14:00"], &[bob.id]),
        )
        .await
        .expect("Booking should succeed");

    assert_eq!(outcome.bookings.len(), 2);
    let times: Vec<&str> = outcome.bookings.iter().map(|b| b.time.as_str()).collect();
    assert_eq!(times, vec!["14:00", "15:00"]);
    for booking in &outcome.bookings {
        assert_eq!(booking.court_id, 2);
        assert_eq!(booking.owner.id, alice.id);
        assert_eq!(booking.invited_players, vec![bob.summary()]);
    }
    assert_eq!(outcome.notifications.sent, 2);
    assert!(outcome.notifications.failed.is_empty());
}

#[tokio::test]
async fn test_legacy_slot_key_accepted() {
    let ctx = TestContext::new();
    let alice = active_member(&ctx, "Alice").await;

    let outcome = ctx
        .services()
        .booking_service
        .create_booking(alice.id, booking_request(2, &["2-2025-01-10-14:00"], &[]))
        .await
        .unwrap();

    assert_eq!(outcome.bookings[0].slot_key.to_string(), "2|2025-01-10|14:00");
}

#[tokio::test]
async fn test_request_validation() {
    let ctx = TestContext::new();
    let alice = active_member(&ctx, "Alice").await;
    let service = &ctx.services().booking_service;

    let result = service.create_booking(alice.id, booking_request(2, &[], &[])).await;
    assert_matches!(result, Err(CourtsideError::InvalidInput(_)));

    let result = service
        .create_booking(alice.id, booking_request(2, &["2|2025-01-10"], &[]))
        .await;
    assert_matches!(result, Err(CourtsideError::InvalidSlotKey(_)));

    let result = service
        .create_booking(alice.id, booking_request(2, &["2|2025-01-10|05:00"], &[]))
        .await;
    assert_matches!(result, Err(CourtsideError::InvalidSlotKey(_)));

    let result = service
        .create_booking(alice.id, booking_request(2, &["3|2025-01-10|14:00"], &[]))
        .await;
    assert_matches!(result, Err(CourtsideError::InvalidInput(_)));

    let result = service
        .create_booking(
            alice.id,
            booking_request(2, &["2|2025-01-10|14:00", "2-2025-01-10-14:00"], &[]),
        )
        .await;
    assert_matches!(result, Err(CourtsideError::InvalidInput(_)));

    let result = service
        .create_booking(alice.id, booking_request(9, &["9|2025-01-10|14:00"], &[]))
        .await;
    assert_matches!(result, Err(CourtsideError::NotFound { entity: "Court", .. }));
}

#[tokio::test]
async fn test_past_and_current_slots_rejected() {
    let ctx = TestContext::new();
    let alice = active_member(&ctx, "Alice").await;
    let service = &ctx.services().booking_service;

    // The clock reads 08:00 on 2025-01-10
    for slot in ["2|2025-01-10|07:00", "2|2025-01-10|08:00", "2|2025-01-09|20:00"] {
        let result = service.create_booking(alice.id, booking_request(2, &[slot], &[])).await;
        assert_matches!(result, Err(CourtsideError::SlotUnavailable(_)), "slot {}", slot);
    }

    let result = service
        .create_booking(alice.id, booking_request(2, &["2|2025-01-10|09:00"], &[]))
        .await;
    assert!(result.is_ok());
}

#[tokio::test]
async fn test_fourth_invitee_rejected_before_writing() {
    let ctx = TestContext::new();
    let alice = active_member(&ctx, "Alice").await;
    let mut invited = Vec::new();
    for name in ["Bob", "Cleo", "Dan", "Eve"] {
        invited.push(active_member(&ctx, name).await.id);
    }

    let result = ctx
        .services()
        .booking_service
        .create_booking(alice.id, booking_request(2, &["2|2025-01-10|14:00"], &invited))
        .await;
    assert_matches!(result, Err(CourtsideError::MaxPlayers { max: 4 }));

    let availability = ctx
        .services()
        .availability_service
        .lookup(2, date(2025, 1, 10))
        .await
        .unwrap();
    assert!(availability.booked_time_slots.is_empty());

    let outcome = ctx
        .services()
        .booking_service
        .create_booking(alice.id, booking_request(2, &["2|2025-01-10|14:00"], &invited[..3]))
        .await
        .unwrap();
    assert_eq!(outcome.bookings[0].participants().len(), 4);
}

#[tokio::test]
async fn test_invitee_checks() {
    let ctx = TestContext::new();
    let alice = active_member(&ctx, "Alice").await;
    let service = &ctx.services().booking_service;

    let result = service
        .create_booking(alice.id, booking_request(2, &["2|2025-01-10|14:00"], &[alice.id]))
        .await;
    assert_matches!(result, Err(CourtsideError::InvalidInput(_)));

    let result = service
        .create_booking(alice.id, booking_request(2, &["2|2025-01-10|14:00"], &[4242]))
        .await;
    assert_matches!(result, Err(CourtsideError::NotFound { entity: "User", .. }));
}

#[tokio::test]
async fn test_inactive_member_cannot_book() {
    let ctx = TestContext::new();
    let newcomer = inactive_user(&ctx, "Newcomer").await;

    let result = ctx
        .services()
        .booking_service
        .create_booking(newcomer.id, booking_request(2, &["2|2025-01-10|14:00"], &[]))
        .await;
    assert_matches!(result, Err(CourtsideError::PermissionDenied(_)));
}

#[tokio::test]
async fn test_multi_slot_request_is_all_or_nothing() {
    let ctx = TestContext::new();
    let alice = active_member(&ctx, "Alice").await;
    let bob = active_member(&ctx, "Bob").await;
    let service = &ctx.services().booking_service;

    service
        .create_booking(bob.id, booking_request(2, &["2|2025-01-10|15:00"], &[]))
        .await
        .unwrap();

    let result = service
        .create_booking(
            alice.id,
            booking_request(2, &["2|2025-01-10|14:00", "2|2025-01-10|15:00"], &[]),
        )
        .await;
    assert_matches!(result, Err(CourtsideError::SlotUnavailable(_)));

    let availability = ctx
        .services()
        .availability_service
        .lookup(2, date(2025, 1, 10))
        .await
        .unwrap();
    assert_eq!(availability.booked_time_slots, vec!["15:00".to_string()]);
    assert!(ctx.mailer.sent_to(&alice.email).is_empty());
}

#[tokio::test]
async fn test_concurrent_requests_for_one_slot() {
    let ctx = TestContext::new();
    let alice = active_member(&ctx, "Alice").await;
    let bob = active_member(&ctx, "Bob").await;
    let first = ctx.services().booking_service.clone();
    let second = ctx.services().booking_service.clone();

    let (a, b) = tokio::join!(
        first.create_booking(alice.id, booking_request(2, &["2|2025-01-10|16:00"], &[])),
        second.create_booking(bob.id, booking_request(2, &["2|2025-01-10|16:00"], &[])),
    );

    let results = [a, b];
    assert_eq!(results.iter().filter(|r| r.is_ok()).count(), 1);
    assert_eq!(
        results
            .iter()
            .filter(|r| matches!(r, Err(CourtsideError::SlotUnavailable(_))))
            .count(),
        1
    );

    let bookings = ctx.db.bookings.for_court_on(2, date(2025, 1, 10)).await.unwrap();
    assert_eq!(bookings.len(), 1);
}

#[tokio::test]
async fn test_cancel_permissions() {
    let ctx = TestContext::new();
    let alice = active_member(&ctx, "Alice").await;
    let bob = active_member(&ctx, "Bob").await;
    let service = &ctx.services().booking_service;

    let outcome = service
        .create_booking(
            alice.id,
            booking_request(1, &["1|2025-01-10|18:00", "1|2025-01-10|19:00"], &[bob.id]),
        )
        .await
        .unwrap();
    let first = outcome.bookings[0].id;
    let second = outcome.bookings[1].id;

    // Invited players do not own the booking
    let result = service.cancel_booking(bob.id, UserRole::Member, first).await;
    assert_matches!(result, Err(CourtsideError::PermissionDenied(_)));

    service.cancel_booking(alice.id, UserRole::Member, first).await.unwrap();
    service
        .cancel_booking(bob.id, UserRole::Administrator, second)
        .await
        .unwrap();

    let result = service.cancel_booking(alice.id, UserRole::Member, first).await;
    assert_matches!(result, Err(CourtsideError::NotFound { .. }));
    assert!(ctx.db.bookings.for_court_on(1, date(2025, 1, 10)).await.unwrap().is_empty());
}

#[tokio::test]
async fn test_user_booking_views() {
    let ctx = TestContext::new();
    let alice = active_member(&ctx, "Alice").await;
    let bob = active_member(&ctx, "Bob").await;
    let service = &ctx.services().booking_service;

    service
        .create_booking(alice.id, booking_request(3, &["3|2025-01-10|10:00"], &[bob.id]))
        .await
        .unwrap();
    service
        .create_booking(alice.id, booking_request(3, &["3|2025-01-12|10:00"], &[]))
        .await
        .unwrap();

    let upcoming = service.upcoming_for_user(bob.id).await.unwrap();
    assert_eq!(upcoming.len(), 1);
    assert!(upcoming[0].involves(bob.id));

    let upcoming = service.upcoming_for_user(alice.id).await.unwrap();
    assert_eq!(upcoming.len(), 2);

    let check = service.check_user_bookings(bob.id, date(2025, 1, 10)).await.unwrap();
    assert!(check.has_bookings);
    assert_eq!(check.bookings.len(), 1);

    let check = service.check_user_bookings(bob.id, date(2025, 1, 12)).await.unwrap();
    assert!(!check.has_bookings);
}
