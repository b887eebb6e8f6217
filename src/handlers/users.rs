//! Registration, login and profile handlers

use actix_web::{web, HttpResponse};
use serde::Deserialize;
use serde_json::json;
use tracing::info;

use crate::middleware::AuthenticatedUser;
use crate::models::user::{ChangePasswordRequest, LoginRequest, RegisterRequest, UpdateProfileRequest};
use crate::state::AppState;
use crate::utils::errors::Result;

#[derive(Debug, Deserialize)]
pub struct LookupQuery {
    pub email: String,
}

/// POST /api/register
pub async fn register(state: web::Data<AppState>, body: web::Json<RegisterRequest>) -> Result<HttpResponse> {
    let user = state.services.user_service.register(body.into_inner()).await?;
    info!(user_id = user.id, "Registration completed");
    Ok(HttpResponse::Created().json(user))
}

/// POST /api/login
pub async fn login(state: web::Data<AppState>, body: web::Json<LoginRequest>) -> Result<HttpResponse> {
    let response = state.services.user_service.login(body.into_inner()).await?;
    Ok(HttpResponse::Ok().json(response))
}

/// GET /api/profile
pub async fn get_profile(state: web::Data<AppState>, user: AuthenticatedUser) -> Result<HttpResponse> {
    let profile = state.services.user_service.profile(user.user_id).await?;
    Ok(HttpResponse::Ok().json(profile))
}

/// PUT /api/profile
pub async fn update_profile(
    state: web::Data<AppState>,
    user: AuthenticatedUser,
    body: web::Json<UpdateProfileRequest>,
) -> Result<HttpResponse> {
    let profile = state
        .services
        .user_service
        .update_profile(user.user_id, body.into_inner())
        .await?;
    Ok(HttpResponse::Ok().json(profile))
}

/// POST /api/profile/password
pub async fn change_password(
    state: web::Data<AppState>,
    user: AuthenticatedUser,
    body: web::Json<ChangePasswordRequest>,
) -> Result<HttpResponse> {
    state
        .services
        .user_service
        .change_password(user.user_id, body.into_inner())
        .await?;
    Ok(HttpResponse::NoContent().finish())
}

/// POST /api/profile/qr-code
pub async fn generate_qr_code(state: web::Data<AppState>, user: AuthenticatedUser) -> Result<HttpResponse> {
    let code = state.services.user_service.generate_qr_code(user.user_id).await?;
    Ok(HttpResponse::Created().json(json!({ "qrCode": code })))
}

/// GET /api/users/lookup?email=
pub async fn lookup_user(
    state: web::Data<AppState>,
    _user: AuthenticatedUser,
    query: web::Query<LookupQuery>,
) -> Result<HttpResponse> {
    let player = state.services.user_service.lookup_by_email(&query.email).await?;
    Ok(HttpResponse::Ok().json(player))
}

/// GET /api/registered-players
pub async fn registered_players(state: web::Data<AppState>, _user: AuthenticatedUser) -> Result<HttpResponse> {
    let players = state.services.user_service.registered_players().await?;
    Ok(HttpResponse::Ok().json(players))
}
