//! Court and availability handlers

use actix_web::{web, HttpResponse};
use chrono::NaiveDate;
use serde::Deserialize;
use tracing::debug;

use crate::state::AppState;
use crate::utils::errors::Result;

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FetchBookingsQuery {
    pub court_id: i32,
    pub date: NaiveDate,
}

#[derive(Debug, Deserialize)]
pub struct DateQuery {
    pub date: NaiveDate,
}

/// GET /api/courts
pub async fn list_courts(state: web::Data<AppState>) -> Result<HttpResponse> {
    let courts = state.services.availability_service.courts().await?;
    Ok(HttpResponse::Ok().json(courts))
}

/// GET /api/courts/{id}/slots?date=
pub async fn court_slots(
    state: web::Data<AppState>,
    path: web::Path<i32>,
    query: web::Query<DateQuery>,
) -> Result<HttpResponse> {
    let court_id = path.into_inner();
    debug!(court_id = court_id, date = %query.date, "Listing slots");

    let slots = state
        .services
        .availability_service
        .day_slots(court_id, query.date)
        .await?;
    Ok(HttpResponse::Ok().json(slots))
}

/// GET /api/fetch-bookings?courtId=&date=
pub async fn fetch_bookings(
    state: web::Data<AppState>,
    query: web::Query<FetchBookingsQuery>,
) -> Result<HttpResponse> {
    let availability = state
        .services
        .availability_service
        .lookup(query.court_id, query.date)
        .await?;
    Ok(HttpResponse::Ok().json(availability))
}
