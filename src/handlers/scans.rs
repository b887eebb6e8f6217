//! Attendance scan handler

use actix_web::{web, HttpResponse};

use crate::middleware::AuthenticatedUser;
use crate::models::scan::ScanRequest;
use crate::state::AppState;
use crate::utils::errors::Result;

/// POST /api/scan
pub async fn scan(
    state: web::Data<AppState>,
    user: AuthenticatedUser,
    body: web::Json<ScanRequest>,
) -> Result<HttpResponse> {
    state.services.auth_service.require_scanner(user.role)?;

    let result = state
        .services
        .scanner_service
        .scan(user.user_id, body.into_inner())
        .await?;
    Ok(HttpResponse::Created().json(result))
}
