//! Availability lookups and the day slot catalog

use assert_matches::assert_matches;
use courtside::CourtsideError;

use crate::helpers::*;

#[tokio::test]
async fn test_lookup_lists_owner_and_invitees() {
    let ctx = TestContext::new();
    let alice = active_member(&ctx, "Alice").await;
    let bob = active_member(&ctx, "Bob").await;

    ctx.services()
        .booking_service
        .create_booking(alice.id, booking_request(2, &["2|2025-01-10|14:00"], &[bob.id]))
        .await
        .unwrap();
    ctx.services()
        .booking_service
        .create_booking(bob.id, booking_request(1, &["1|2025-01-10|14:00"], &[]))
        .await
        .unwrap();

    let availability = ctx
        .services()
        .availability_service
        .lookup(2, date(2025, 1, 10))
        .await
        .unwrap();

    assert_eq!(availability.booked_time_slots, vec!["14:00".to_string()]);
    assert_eq!(
        availability.players_at("14:00"),
        &[alice.summary(), bob.summary()]
    );

    let json = serde_json::to_value(&availability).unwrap();
    assert_eq!(json["bookedTimeSlots"][0], "14:00");
    assert_eq!(json["currentPlayers"]["14:00"][0]["name"], "Alice");
}

#[tokio::test]
async fn test_other_dates_are_empty() {
    let ctx = TestContext::new();
    let alice = active_member(&ctx, "Alice").await;

    ctx.services()
        .booking_service
        .create_booking(alice.id, booking_request(2, &["2|2025-01-10|14:00"], &[]))
        .await
        .unwrap();

    let availability = ctx
        .services()
        .availability_service
        .lookup(2, date(2025, 1, 11))
        .await
        .unwrap();
    assert!(availability.booked_time_slots.is_empty());
    assert!(availability.current_players.is_empty());
}

#[tokio::test]
async fn test_day_slots_mark_past_and_booked() {
    let ctx = TestContext::new();
    let alice = active_member(&ctx, "Alice").await;

    ctx.services()
        .booking_service
        .create_booking(alice.id, booking_request(2, &["2|2025-01-10|14:00"], &[]))
        .await
        .unwrap();

    let slots = ctx
        .services()
        .availability_service
        .day_slots(2, date(2025, 1, 10))
        .await
        .unwrap();

    assert_eq!(slots.len(), 18);
    let past: Vec<&str> = slots.iter().filter(|s| s.past).map(|s| s.time.as_str()).collect();
    assert_eq!(past, vec!["06:00", "07:00", "08:00"]);

    let booked = slots.iter().find(|s| s.time == "14:00").unwrap();
    assert!(booked.booked);
    assert!(!booked.available);
    assert_eq!(booked.players, vec![alice.summary()]);

    let open = slots.iter().filter(|s| s.available).count();
    assert_eq!(open, 14);
}

#[tokio::test]
async fn test_unknown_court() {
    let ctx = TestContext::new();

    let result = ctx
        .services()
        .availability_service
        .day_slots(7, date(2025, 1, 10))
        .await;
    assert_matches!(result, Err(CourtsideError::NotFound { entity: "Court", .. }));

    let courts = ctx.services().availability_service.courts().await.unwrap();
    assert_eq!(courts.len(), 4);
}
