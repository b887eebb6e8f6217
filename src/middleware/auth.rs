//! Bearer-token extractors
//!
//! Handlers declare the caller they need as an argument: [`AuthenticatedUser`]
//! for any signed-in user, [`AdminUser`] for administrators.

use actix_web::dev::Payload;
use actix_web::http::header::AUTHORIZATION;
use actix_web::{web, FromRequest, HttpRequest};
use futures::future::{ready, Ready};

use crate::models::user::UserRole;
use crate::state::AppState;
use crate::utils::errors::{CourtsideError, Result};

const BEARER_PREFIX: &str = "Bearer ";

/// Caller identified by a valid bearer token
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AuthenticatedUser {
    pub user_id: i64,
    pub role: UserRole,
}

/// Caller holding the `Administrator` role
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AdminUser(pub AuthenticatedUser);

fn bearer_token(req: &HttpRequest) -> Result<&str> {
    let header = req
        .headers()
        .get(AUTHORIZATION)
        .ok_or_else(|| CourtsideError::Unauthorized("Authentication required".to_string()))?;

    header
        .to_str()
        .ok()
        .and_then(|value| value.strip_prefix(BEARER_PREFIX))
        .map(str::trim)
        .filter(|token| !token.is_empty())
        .ok_or_else(|| CourtsideError::Unauthorized("Malformed Authorization header".to_string()))
}

fn app_state(req: &HttpRequest) -> Result<&web::Data<AppState>> {
    req.app_data::<web::Data<AppState>>()
        .ok_or_else(|| CourtsideError::Config("Application state is not registered".to_string()))
}

fn authenticate(req: &HttpRequest) -> Result<AuthenticatedUser> {
    let state = app_state(req)?;
    let claims = state.services.auth_service.verify_token(bearer_token(req)?)?;
    Ok(AuthenticatedUser {
        user_id: claims.user_id()?,
        role: claims.role,
    })
}

impl FromRequest for AuthenticatedUser {
    type Error = CourtsideError;
    type Future = Ready<Result<Self>>;

    fn from_request(req: &HttpRequest, _payload: &mut Payload) -> Self::Future {
        ready(authenticate(req))
    }
}

impl FromRequest for AdminUser {
    type Error = CourtsideError;
    type Future = Ready<Result<Self>>;

    fn from_request(req: &HttpRequest, _payload: &mut Payload) -> Self::Future {
        ready(authenticate(req).and_then(|user| {
            app_state(req)?.services.auth_service.require_admin(user.role)?;
            Ok(AdminUser(user))
        }))
    }
}
