//! Group handlers

use actix_web::{web, HttpResponse};

use crate::middleware::AuthenticatedUser;
use crate::models::group::{AddMemberRequest, CreateGroupRequest};
use crate::state::AppState;
use crate::utils::errors::Result;

/// GET /api/groups
pub async fn list_groups(state: web::Data<AppState>, user: AuthenticatedUser) -> Result<HttpResponse> {
    let groups = state.services.group_service.groups_for_user(user.user_id).await?;
    Ok(HttpResponse::Ok().json(groups))
}

/// POST /api/groups
pub async fn create_group(
    state: web::Data<AppState>,
    user: AuthenticatedUser,
    body: web::Json<CreateGroupRequest>,
) -> Result<HttpResponse> {
    let group = state
        .services
        .group_service
        .create_group(user.user_id, body.into_inner())
        .await?;
    Ok(HttpResponse::Created().json(group))
}

/// GET /api/groups/{id}/members
pub async fn list_members(
    state: web::Data<AppState>,
    user: AuthenticatedUser,
    path: web::Path<i64>,
) -> Result<HttpResponse> {
    let members = state
        .services
        .group_service
        .members(user.user_id, path.into_inner())
        .await?;
    Ok(HttpResponse::Ok().json(members))
}

/// POST /api/groups/{id}/members
pub async fn add_member(
    state: web::Data<AppState>,
    user: AuthenticatedUser,
    path: web::Path<i64>,
    body: web::Json<AddMemberRequest>,
) -> Result<HttpResponse> {
    let member = state
        .services
        .group_service
        .add_member(user.user_id, path.into_inner(), body.into_inner())
        .await?;
    Ok(HttpResponse::Created().json(member))
}

/// DELETE /api/groups/{id}/members/{user_id}
pub async fn remove_member(
    state: web::Data<AppState>,
    user: AuthenticatedUser,
    path: web::Path<(i64, i64)>,
) -> Result<HttpResponse> {
    let (group_id, member_id) = path.into_inner();
    state
        .services
        .group_service
        .remove_member(user.user_id, group_id, member_id)
        .await?;
    Ok(HttpResponse::NoContent().finish())
}

/// DELETE /api/groups/{id}
pub async fn delete_group(
    state: web::Data<AppState>,
    user: AuthenticatedUser,
    path: web::Path<i64>,
) -> Result<HttpResponse> {
    state
        .services
        .group_service
        .delete_group(user.user_id, path.into_inner())
        .await?;
    Ok(HttpResponse::NoContent().finish())
}
