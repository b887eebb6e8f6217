//! Authentication service implementation
//!
//! Issues and verifies HS256 bearer tokens, hashes passwords with bcrypt and
//! answers role-based access questions.

use std::sync::Arc;

use chrono::Duration;
use jsonwebtoken::{decode, encode, Algorithm, DecodingKey, EncodingKey, Header, Validation};
use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use crate::config::AuthConfig;
use crate::models::user::{User, UserRole};
use crate::utils::clock::Clock;
use crate::utils::errors::{CourtsideError, Result};

/// Token claims
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Claims {
    /// User id
    pub sub: String,
    pub role: UserRole,
    pub iat: i64,
    pub exp: i64,
}

impl Claims {
    pub fn user_id(&self) -> Result<i64> {
        self.sub
            .parse()
            .map_err(|_| CourtsideError::Unauthorized("Malformed token subject".to_string()))
    }
}

/// Authentication service for tokens, passwords and role checks
#[derive(Clone)]
pub struct AuthService {
    encoding_key: EncodingKey,
    decoding_key: DecodingKey,
    token_ttl: Duration,
    bcrypt_cost: u32,
    clock: Arc<dyn Clock>,
}

impl AuthService {
    /// Create a new AuthService instance
    pub fn new(config: &AuthConfig, clock: Arc<dyn Clock>) -> Self {
        let secret = config.jwt_secret.as_bytes();
        Self {
            encoding_key: EncodingKey::from_secret(secret),
            decoding_key: DecodingKey::from_secret(secret),
            token_ttl: Duration::hours(config.token_ttl_hours as i64),
            bcrypt_cost: config.bcrypt_cost,
            clock,
        }
    }

    /// Issue a bearer token for the user
    pub fn issue_token(&self, user: &User) -> Result<String> {
        let now = self.clock.now();
        let claims = Claims {
            sub: user.id.to_string(),
            role: user.role,
            iat: now.timestamp(),
            exp: (now + self.token_ttl).timestamp(),
        };

        Ok(encode(&Header::new(Algorithm::HS256), &claims, &self.encoding_key)?)
    }

    /// Verify a bearer token and return its claims
    pub fn verify_token(&self, token: &str) -> Result<Claims> {
        // Expiry is checked against the injected clock below
        let mut validation = Validation::new(Algorithm::HS256);
        validation.validate_exp = false;

        let data = decode::<Claims>(token, &self.decoding_key, &validation).map_err(|e| {
            debug!(error = %e, "Rejected bearer token");
            CourtsideError::Unauthorized("Invalid token".to_string())
        })?;

        if data.claims.exp <= self.clock.now().timestamp() {
            return Err(CourtsideError::Unauthorized("Token expired".to_string()));
        }

        Ok(data.claims)
    }

    pub fn hash_password(&self, password: &str) -> Result<String> {
        Ok(bcrypt::hash(password, self.bcrypt_cost)?)
    }

    pub fn verify_password(&self, password: &str, hash: &str) -> Result<bool> {
        match bcrypt::verify(password, hash) {
            Ok(valid) => Ok(valid),
            Err(e) => {
                warn!(error = %e, "Stored password hash could not be verified");
                Err(e.into())
            }
        }
    }

    /// Require the `Administrator` role
    pub fn require_admin(&self, role: UserRole) -> Result<()> {
        if role != UserRole::Administrator {
            return Err(CourtsideError::PermissionDenied(
                "Administrator role required".to_string(),
            ));
        }
        Ok(())
    }

    /// Require a role that may record attendance scans
    pub fn require_scanner(&self, role: UserRole) -> Result<()> {
        if !role.can_scan() {
            return Err(CourtsideError::PermissionDenied(
                "Scanning requires the Administrator or Viewer role".to_string(),
            ));
        }
        Ok(())
    }
}
