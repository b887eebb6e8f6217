//! Registration, login, profile and QR codes

use assert_matches::assert_matches;
use courtside::models::{ChangePasswordRequest, LoginRequest, RegisterRequest, UpdateProfileRequest, UserRole};
use courtside::utils::helpers::is_qr_token;
use courtside::CourtsideError;

use crate::helpers::*;

fn registration(email: &str) -> RegisterRequest {
    RegisterRequest {
        name: "Riley Park".to_string(),
        email: email.to_string(),
        password: TEST_PASSWORD.to_string(),
        phone: Some("0400 000 000".to_string()),
        address: Some(String::new()),
    }
}

#[tokio::test]
async fn test_register_then_login() {
    let ctx = TestContext::new();
    let service = &ctx.services().user_service;

    let user = service.register(registration(" Riley@Example.com ")).await.unwrap();
    assert_eq!(user.email, "riley@example.com");
    assert_eq!(user.role, UserRole::User);
    assert!(!user.email_verified);
    assert_eq!(user.renewal_date, date(2026, 1, 10));
    assert_eq!(user.phone.as_deref(), Some("0400 000 000"));
    assert_eq!(user.address, None);
    assert_ne!(user.password_hash, TEST_PASSWORD);

    let login = service
        .login(LoginRequest {
            email: "RILEY@example.com".to_string(),
            password: TEST_PASSWORD.to_string(),
        })
        .await
        .unwrap();
    assert_eq!(login.user.id, user.id);

    let claims = ctx.services().auth_service.verify_token(&login.token).unwrap();
    assert_eq!(claims.user_id().unwrap(), user.id);
    assert_eq!(claims.role, UserRole::User);
}

#[tokio::test]
async fn test_registration_rejections() {
    let ctx = TestContext::new();
    let service = &ctx.services().user_service;

    service.register(registration("riley@example.com")).await.unwrap();
    assert_matches!(
        service.register(registration("riley@example.com")).await,
        Err(CourtsideError::Conflict(_))
    );
    assert_matches!(
        service.register(registration("riley@example")).await,
        Err(CourtsideError::InvalidInput(_))
    );

    let mut weak = registration("weak@example.com");
    weak.password = "password".to_string();
    assert_matches!(service.register(weak).await, Err(CourtsideError::InvalidInput(_)));

    let mut nameless = registration("nameless@example.com");
    nameless.name = " ".to_string();
    assert_matches!(service.register(nameless).await, Err(CourtsideError::InvalidInput(_)));
}

#[tokio::test]
async fn test_login_failures_look_the_same() {
    let ctx = TestContext::new();
    let alice = active_member(&ctx, "Alice").await;
    let service = &ctx.services().user_service;

    let wrong_password = service
        .login(LoginRequest {
            email: alice.email.clone(),
            password: "wrong-password1".to_string(),
        })
        .await
        .unwrap_err();
    let unknown = service
        .login(LoginRequest {
            email: "nobody@example.com".to_string(),
            password: TEST_PASSWORD.to_string(),
        })
        .await
        .unwrap_err();

    assert_matches!(wrong_password, CourtsideError::Unauthorized(_));
    assert_eq!(wrong_password.to_string(), unknown.to_string());
}

#[tokio::test]
async fn test_profile_update_and_password_change() {
    let ctx = TestContext::new();
    let alice = active_member(&ctx, "Alice").await;
    let service = &ctx.services().user_service;

    let updated = service
        .update_profile(
            alice.id,
            UpdateProfileRequest {
                name: Some("Alice Smith".to_string()),
                avatar_url: Some("https://cdn.example.com/a.png".to_string()),
                ..Default::default()
            },
        )
        .await
        .unwrap();
    assert_eq!(updated.name, "Alice Smith");
    assert_eq!(updated.avatar_url.as_deref(), Some("https://cdn.example.com/a.png"));
    assert_eq!(updated.email, alice.email);

    let result = service
        .update_profile(
            alice.id,
            UpdateProfileRequest {
                name: Some("".to_string()),
                ..Default::default()
            },
        )
        .await;
    assert_matches!(result, Err(CourtsideError::InvalidInput(_)));

    let result = service
        .change_password(
            alice.id,
            ChangePasswordRequest {
                current_password: "not-my-password1".to_string(),
                new_password: "newpassword42".to_string(),
            },
        )
        .await;
    assert_matches!(result, Err(CourtsideError::Unauthorized(_)));

    service
        .change_password(
            alice.id,
            ChangePasswordRequest {
                current_password: TEST_PASSWORD.to_string(),
                new_password: "newpassword42".to_string(),
            },
        )
        .await
        .unwrap();

    let login = service
        .login(LoginRequest {
            email: alice.email.clone(),
            password: "newpassword42".to_string(),
        })
        .await;
    assert!(login.is_ok());
}

#[tokio::test]
async fn test_qr_code_issued_once() {
    let ctx = TestContext::new();
    let alice = active_member(&ctx, "Alice").await;
    let service = &ctx.services().user_service;

    let code = service.generate_qr_code(alice.id).await.unwrap();
    assert!(is_qr_token(&code));
    assert_eq!(service.profile(alice.id).await.unwrap().qr_code.as_deref(), Some(code.as_str()));

    assert_matches!(
        service.generate_qr_code(alice.id).await,
        Err(CourtsideError::Conflict(_))
    );
    assert_eq!(service.profile(alice.id).await.unwrap().qr_code, Some(code));
}

#[tokio::test]
async fn test_player_lookups() {
    let ctx = TestContext::new();
    let alice = active_member(&ctx, "Alice").await;
    active_member(&ctx, "Bob").await;
    inactive_user(&ctx, "Newcomer").await;
    let service = &ctx.services().user_service;

    let found = service.lookup_by_email("ALICE@example.com").await.unwrap();
    assert_eq!(found, alice.summary());
    assert_matches!(
        service.lookup_by_email("ghost@example.com").await,
        Err(CourtsideError::NotFound { .. })
    );

    let players = service.registered_players().await.unwrap();
    let names: Vec<&str> = players.iter().map(|p| p.name.as_str()).collect();
    assert_eq!(names, vec!["Alice", "Bob"]);
}
