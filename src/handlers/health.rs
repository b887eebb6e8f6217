//! Liveness endpoint

use actix_web::{web, HttpResponse};
use serde_json::json;
use tracing::error;

use crate::state::AppState;

pub async fn health(state: web::Data<AppState>) -> HttpResponse {
    match state.db.health_check().await {
        Ok(()) => HttpResponse::Ok().json(json!({
            "status": "ok",
            "database": state.db.backend(),
            "version": env!("CARGO_PKG_VERSION"),
        })),
        Err(e) => {
            error!(error = %e, "Health check failed");
            HttpResponse::ServiceUnavailable().json(json!({
                "status": "unavailable",
                "database": state.db.backend(),
            }))
        }
    }
}
