//! Admin handlers

use actix_web::{web, HttpResponse};
use serde::Deserialize;
use tracing::info;

use crate::middleware::AdminUser;
use crate::services::email_blast::EmailBlastRequest;
use crate::state::AppState;
use crate::utils::errors::Result;

const DEFAULT_PAGE_SIZE: usize = 50;
const DEFAULT_LIMIT: usize = 50;

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PageQuery {
    pub page: Option<usize>,
    pub page_size: Option<usize>,
}

#[derive(Debug, Deserialize)]
pub struct LimitQuery {
    pub limit: Option<usize>,
}

/// GET /api/admin/dashboard
pub async fn dashboard(state: web::Data<AppState>, _admin: AdminUser) -> Result<HttpResponse> {
    let stats = state.services.admin_service.dashboard().await?;
    Ok(HttpResponse::Ok().json(stats))
}

/// GET /api/admin/users?page=&pageSize=
pub async fn list_users(
    state: web::Data<AppState>,
    _admin: AdminUser,
    query: web::Query<PageQuery>,
) -> Result<HttpResponse> {
    let users = state
        .services
        .admin_service
        .list_users(query.page.unwrap_or(1), query.page_size.unwrap_or(DEFAULT_PAGE_SIZE))
        .await?;
    Ok(HttpResponse::Ok().json(users))
}

/// POST /api/admin/users/{id}/activate
pub async fn activate_user(
    state: web::Data<AppState>,
    AdminUser(admin): AdminUser,
    path: web::Path<i64>,
) -> Result<HttpResponse> {
    let user = state
        .services
        .admin_service
        .activate_user(admin.user_id, path.into_inner())
        .await?;
    info!(admin_id = admin.user_id, user_id = user.id, "Membership activated");
    Ok(HttpResponse::Ok().json(user))
}

/// GET /api/admin/scans?limit=
pub async fn recent_scans(
    state: web::Data<AppState>,
    _admin: AdminUser,
    query: web::Query<LimitQuery>,
) -> Result<HttpResponse> {
    let scans = state
        .services
        .admin_service
        .recent_scans(query.limit.unwrap_or(DEFAULT_LIMIT))
        .await?;
    Ok(HttpResponse::Ok().json(scans))
}

/// GET /api/admin/email-logs?limit=
pub async fn email_logs(
    state: web::Data<AppState>,
    _admin: AdminUser,
    query: web::Query<LimitQuery>,
) -> Result<HttpResponse> {
    let logs = state
        .services
        .admin_service
        .email_logs(query.limit.unwrap_or(DEFAULT_LIMIT))
        .await?;
    Ok(HttpResponse::Ok().json(logs))
}

/// POST /api/admin/email-blast
pub async fn email_blast(
    state: web::Data<AppState>,
    AdminUser(admin): AdminUser,
    body: web::Json<EmailBlastRequest>,
) -> Result<HttpResponse> {
    let report = state
        .services
        .email_blast_service
        .send_blast(admin.user_id, body.into_inner())
        .await?;
    Ok(HttpResponse::Ok().json(report))
}
