//! Attendance scanning and the rolling 24 hour window

use assert_matches::assert_matches;
use chrono::Duration;
use courtside::models::ScanRequest;
use courtside::utils::clock::Clock;
use courtside::CourtsideError;

use crate::helpers::*;

fn scan_request(code: &str) -> ScanRequest {
    ScanRequest {
        code: code.to_string(),
        location: Some("Front desk".to_string()),
        device: None,
    }
}

#[tokio::test]
async fn test_scan_records_member() {
    let ctx = TestContext::new();
    let door = viewer(&ctx).await;
    let alice = active_member(&ctx, "Alice").await;
    let code = ctx.services().user_service.generate_qr_code(alice.id).await.unwrap();

    let result = ctx
        .services()
        .scanner_service
        .scan(door.id, scan_request(&format!("  {}  ", code)))
        .await
        .expect("Scan should be recorded");

    assert_eq!(result.member, alice.summary());
    assert_eq!(result.scan.user_id, alice.id);
    assert_eq!(result.scan.scanned_by, Some(door.id));
    assert_eq!(result.scan.location, "Front desk");
    assert_eq!(result.scan.device, "Unknown");
    assert_eq!(result.scan.scanned_at, ctx.clock.now());
}

#[tokio::test]
async fn test_unknown_and_malformed_codes() {
    let ctx = TestContext::new();
    let door = viewer(&ctx).await;
    let scanner = &ctx.services().scanner_service;

    assert_matches!(
        scanner.scan(door.id, scan_request("USER_ZZZZZZZZZZ")).await,
        Err(CourtsideError::InvalidCode)
    );
    assert_matches!(
        scanner.scan(door.id, scan_request("not-a-code")).await,
        Err(CourtsideError::InvalidCode)
    );
    assert_matches!(scanner.scan(door.id, scan_request("")).await, Err(CourtsideError::InvalidCode));

    assert!(ctx.db.scans.recent(10).await.unwrap().is_empty());
}

#[tokio::test]
async fn test_second_scan_within_window_rejected() {
    let ctx = TestContext::new();
    let door = viewer(&ctx).await;
    let alice = active_member(&ctx, "Alice").await;
    let code = ctx.services().user_service.generate_qr_code(alice.id).await.unwrap();
    let scanner = &ctx.services().scanner_service;

    scanner.scan(door.id, scan_request(&code)).await.unwrap();

    ctx.clock.advance(Duration::hours(24) - Duration::seconds(1));
    let result = scanner.scan(door.id, scan_request(&code)).await;
    assert_matches!(result, Err(CourtsideError::DuplicateScan { user_id }) if user_id == alice.id);
    assert_eq!(ctx.db.scans.recent(10).await.unwrap().len(), 1);

    ctx.clock.advance(Duration::seconds(2));
    scanner
        .scan(door.id, scan_request(&code))
        .await
        .expect("Scan after the window should be recorded");
    assert_eq!(ctx.db.scans.recent(10).await.unwrap().len(), 2);
}

#[tokio::test]
async fn test_window_is_per_member() {
    let ctx = TestContext::new();
    let door = viewer(&ctx).await;
    let alice = active_member(&ctx, "Alice").await;
    let bob = active_member(&ctx, "Bob").await;
    let alice_code = ctx.services().user_service.generate_qr_code(alice.id).await.unwrap();
    let bob_code = ctx.services().user_service.generate_qr_code(bob.id).await.unwrap();
    let scanner = &ctx.services().scanner_service;

    scanner.scan(door.id, scan_request(&alice_code)).await.unwrap();
    scanner.scan(door.id, scan_request(&bob_code)).await.unwrap();

    let since = ctx.clock.now() - Duration::hours(1);
    assert_eq!(ctx.db.scans.count_since(since).await.unwrap(), 2);
}
