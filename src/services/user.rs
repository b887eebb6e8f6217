//! User service implementation
//!
//! This service handles registration, login, profile management, password
//! changes, QR token issuance and player lookups.

use std::sync::Arc;

use serde::Serialize;
use tracing::{debug, info, warn};

use crate::database::DatabaseService;
use crate::models::user::{
    ChangePasswordRequest, LoginRequest, NewUser, PlayerSummary, RegisterRequest,
    UpdateProfileRequest, User, UserRole,
};
use crate::services::auth::AuthService;
use crate::utils::clock::Clock;
use crate::utils::errors::{CourtsideError, Result};
use crate::utils::helpers::{
    check_password_strength, generate_qr_token, is_valid_email, normalize_email, one_year_after,
};
use crate::utils::logging::log_user_action;

/// Attempts at finding an unused QR token before giving up
const QR_GENERATION_ATTEMPTS: usize = 5;

/// Token plus the profile it was issued for
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct LoginResponse {
    pub token: String,
    pub user: User,
}

/// User service for managing user operations
#[derive(Clone)]
pub struct UserService {
    db: DatabaseService,
    auth: AuthService,
    clock: Arc<dyn Clock>,
}

impl UserService {
    /// Create a new UserService instance
    pub fn new(db: DatabaseService, auth: AuthService, clock: Arc<dyn Clock>) -> Self {
        Self { db, auth, clock }
    }

    /// Register a new, not yet activated user
    pub async fn register(&self, request: RegisterRequest) -> Result<User> {
        let email = normalize_email(&request.email);
        debug!(email = %email, "Registering user");

        let name = request.name.trim();
        if name.is_empty() {
            return Err(CourtsideError::InvalidInput("Name is required".to_string()));
        }
        if !is_valid_email(&email) {
            return Err(CourtsideError::InvalidInput("Invalid email address".to_string()));
        }
        check_password_strength(&request.password)
            .map_err(|msg| CourtsideError::InvalidInput(msg.to_string()))?;

        let new_user = NewUser {
            name: name.to_string(),
            email,
            password_hash: self.auth.hash_password(&request.password)?,
            phone: request.phone.filter(|p| !p.trim().is_empty()),
            address: request.address.filter(|a| !a.trim().is_empty()),
            role: UserRole::User,
            renewal_date: one_year_after(self.clock.local_now().date()),
        };

        let user = self.db.users.create(new_user).await?;
        log_user_action(user.id, "register", None);
        info!(user_id = user.id, "New user registered successfully");

        Ok(user)
    }

    /// Verify credentials and issue a token
    pub async fn login(&self, request: LoginRequest) -> Result<LoginResponse> {
        let email = normalize_email(&request.email);
        let invalid = || CourtsideError::Unauthorized("Invalid email or password".to_string());

        let user = self.db.users.find_by_email(&email).await?.ok_or_else(invalid)?;
        if !self.auth.verify_password(&request.password, &user.password_hash)? {
            warn!(user_id = user.id, "Failed login attempt");
            return Err(invalid());
        }

        let token = self.auth.issue_token(&user)?;
        log_user_action(user.id, "login", None);

        Ok(LoginResponse { token, user })
    }

    pub async fn profile(&self, user_id: i64) -> Result<User> {
        self.db
            .users
            .find_by_id(user_id)
            .await?
            .ok_or_else(|| CourtsideError::not_found("User", user_id))
    }

    pub async fn update_profile(&self, user_id: i64, update: UpdateProfileRequest) -> Result<User> {
        if update.name.as_deref().is_some_and(|n| n.trim().is_empty()) {
            return Err(CourtsideError::InvalidInput("Name cannot be empty".to_string()));
        }

        let user = self.db.users.update_profile(user_id, update).await?;
        log_user_action(user_id, "update_profile", None);
        Ok(user)
    }

    /// Change the password after re-checking the current one
    pub async fn change_password(&self, user_id: i64, request: ChangePasswordRequest) -> Result<()> {
        let user = self.profile(user_id).await?;
        if !self.auth.verify_password(&request.current_password, &user.password_hash)? {
            return Err(CourtsideError::Unauthorized(
                "Current password is incorrect".to_string(),
            ));
        }
        check_password_strength(&request.new_password)
            .map_err(|msg| CourtsideError::InvalidInput(msg.to_string()))?;

        let hash = self.auth.hash_password(&request.new_password)?;
        self.db.users.set_password_hash(user_id, &hash).await?;
        log_user_action(user_id, "change_password", None);
        Ok(())
    }

    /// Issue the user's QR token. A token is issued once and never replaced.
    pub async fn generate_qr_code(&self, user_id: i64) -> Result<String> {
        let user = self.profile(user_id).await?;
        if user.qr_code.is_some() {
            return Err(CourtsideError::Conflict("QR code already exists".to_string()));
        }

        for _ in 0..QR_GENERATION_ATTEMPTS {
            let token = generate_qr_token();
            if self.db.users.find_by_qr_code(&token).await?.is_some() {
                continue;
            }
            if self.db.users.set_qr_code_if_absent(user_id, &token).await? {
                log_user_action(user_id, "generate_qr_code", None);
                return Ok(token);
            }
            // Lost a race with a concurrent request for the same user
            let current = self.profile(user_id).await?;
            if current.qr_code.is_some() {
                return Err(CourtsideError::Conflict("QR code already exists".to_string()));
            }
        }

        Err(CourtsideError::Conflict("Could not allocate a unique QR code".to_string()))
    }

    /// Public summary of the user registered under `email`
    pub async fn lookup_by_email(&self, email: &str) -> Result<PlayerSummary> {
        let email = normalize_email(email);
        self.db
            .users
            .find_by_email(&email)
            .await?
            .map(|u| u.summary())
            .ok_or_else(|| CourtsideError::not_found("User", email))
    }

    /// Active members available to the invite picker
    pub async fn registered_players(&self) -> Result<Vec<PlayerSummary>> {
        let users = self.db.users.list_active().await?;
        Ok(users.iter().map(User::summary).collect())
    }
}
