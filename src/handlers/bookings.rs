//! Booking handlers

use actix_web::{web, HttpResponse};
use chrono::NaiveDate;
use serde::Deserialize;
use tracing::{debug, info};

use crate::middleware::AuthenticatedUser;
use crate::models::booking::CreateBookingRequest;
use crate::state::AppState;
use crate::utils::errors::Result;

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CheckUserBookingsQuery {
    pub user_id: i64,
    pub date: NaiveDate,
}

/// POST /api/bookings
pub async fn create_booking(
    state: web::Data<AppState>,
    user: AuthenticatedUser,
    body: web::Json<CreateBookingRequest>,
) -> Result<HttpResponse> {
    let request = body.into_inner();
    debug!(user_id = user.user_id, court_id = request.court_id, "Processing booking request");

    let outcome = state
        .services
        .booking_service
        .create_booking(user.user_id, request)
        .await?;

    info!(user_id = user.user_id, bookings = outcome.bookings.len(), "Booking request accepted");
    Ok(HttpResponse::Created().json(outcome))
}

/// DELETE /api/bookings/{id}
pub async fn cancel_booking(
    state: web::Data<AppState>,
    user: AuthenticatedUser,
    path: web::Path<i64>,
) -> Result<HttpResponse> {
    state
        .services
        .booking_service
        .cancel_booking(user.user_id, user.role, path.into_inner())
        .await?;
    Ok(HttpResponse::NoContent().finish())
}

/// GET /api/user-bookings
pub async fn user_bookings(state: web::Data<AppState>, user: AuthenticatedUser) -> Result<HttpResponse> {
    let bookings = state
        .services
        .booking_service
        .upcoming_for_user(user.user_id)
        .await?;
    Ok(HttpResponse::Ok().json(bookings))
}

/// GET /api/check-user-bookings?userId=&date=
pub async fn check_user_bookings(
    state: web::Data<AppState>,
    _user: AuthenticatedUser,
    query: web::Query<CheckUserBookingsQuery>,
) -> Result<HttpResponse> {
    let check = state
        .services
        .booking_service
        .check_user_bookings(query.user_id, query.date)
        .await?;
    Ok(HttpResponse::Ok().json(check))
}
