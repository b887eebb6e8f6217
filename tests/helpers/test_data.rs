//! Test data factories

use chrono::{NaiveDate, NaiveDateTime};
use courtside::models::{CreateBookingRequest, NewUser, User, UserRole};
use courtside::utils::helpers::one_year_after;

use super::test_context::TestContext;

pub const TEST_PASSWORD: &str = "courtside123";

/// A user with the given role; `active` marks the membership paid
pub async fn create_user(ctx: &TestContext, name: &str, email: &str, role: UserRole, active: bool) -> User {
    let password_hash = ctx
        .services()
        .auth_service
        .hash_password(TEST_PASSWORD)
        .expect("Failed to hash test password");

    let renewal_date = one_year_after(super::default_now().date());
    let user = ctx
        .db
        .users
        .create(NewUser {
            name: name.to_string(),
            email: email.to_string(),
            password_hash,
            phone: None,
            address: None,
            role,
            renewal_date,
        })
        .await
        .expect("Failed to create test user");

    if active {
        ctx.db
            .users
            .activate(user.id, renewal_date)
            .await
            .expect("Failed to activate test user")
    } else {
        user
    }
}

pub async fn active_member(ctx: &TestContext, name: &str) -> User {
    let email = format!("{}@example.com", name.to_lowercase().replace(' ', "."));
    create_user(ctx, name, &email, UserRole::User, true).await
}

pub async fn inactive_user(ctx: &TestContext, name: &str) -> User {
    let email = format!("{}@example.com", name.to_lowercase().replace(' ', "."));
    create_user(ctx, name, &email, UserRole::User, false).await
}

pub async fn admin(ctx: &TestContext) -> User {
    create_user(ctx, "Ada Admin", "admin@example.com", UserRole::Administrator, true).await
}

pub async fn viewer(ctx: &TestContext) -> User {
    create_user(ctx, "Vic Viewer", "door@example.com", UserRole::Viewer, true).await
}

/// Bearer token for the user, signed with the test secret
pub fn token_for(ctx: &TestContext, user: &User) -> String {
    ctx.services()
        .auth_service
        .issue_token(user)
        .expect("Failed to issue test token")
}

pub fn date(y: i32, m: u32, d: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(y, m, d).unwrap()
}

pub fn at(y: i32, m: u32, d: u32, hour: u32, min: u32, sec: u32) -> NaiveDateTime {
    date(y, m, d).and_hms_opt(hour, min, sec).unwrap()
}

pub fn booking_request(court_id: i32, slots: &[&str], invited: &[i64]) -> CreateBookingRequest {
    CreateBookingRequest {
        court_id,
        selected_slots: slots.iter().map(|s| s.to_string()).collect(),
        invited_players: invited.to_vec(),
    }
}
