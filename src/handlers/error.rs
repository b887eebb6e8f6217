//! HTTP mapping for [`CourtsideError`]
//!
//! Client errors are returned as `{"error": "<message>"}`. Infrastructure
//! failures are logged in full and answered with a generic message.

use actix_web::http::StatusCode;
use actix_web::{error, HttpRequest, HttpResponse, ResponseError};
use serde::Serialize;
use tracing::error;

use crate::utils::errors::CourtsideError;

pub const INTERNAL_ERROR_MESSAGE: &str = "Internal server error";

#[derive(Debug, Serialize)]
pub struct ErrorBody {
    pub error: String,
}

impl ResponseError for CourtsideError {
    fn status_code(&self) -> StatusCode {
        match self {
            CourtsideError::Unauthorized(_) => StatusCode::UNAUTHORIZED,
            CourtsideError::PermissionDenied(_) => StatusCode::FORBIDDEN,
            CourtsideError::NotFound { .. } | CourtsideError::InvalidCode => StatusCode::NOT_FOUND,
            CourtsideError::InvalidInput(_)
            | CourtsideError::InvalidSlotKey(_)
            | CourtsideError::MaxPlayers { .. } => StatusCode::BAD_REQUEST,
            CourtsideError::SlotUnavailable(_)
            | CourtsideError::DuplicateScan { .. }
            | CourtsideError::Conflict(_) => StatusCode::CONFLICT,
            _ => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    fn error_response(&self) -> HttpResponse {
        let message = if self.is_internal() {
            error!(error = %self, severity = ?self.severity(), "Request failed with internal error");
            INTERNAL_ERROR_MESSAGE.to_string()
        } else {
            self.to_string()
        };

        HttpResponse::build(self.status_code()).json(ErrorBody { error: message })
    }
}

/// Turn JSON body rejections into `{"error": ...}` responses
pub fn json_error_handler(err: error::JsonPayloadError, _req: &HttpRequest) -> actix_web::Error {
    CourtsideError::InvalidInput(err.to_string()).into()
}

/// Turn query-string rejections into `{"error": ...}` responses
pub fn query_error_handler(err: error::QueryPayloadError, _req: &HttpRequest) -> actix_web::Error {
    CourtsideError::InvalidInput(err.to_string()).into()
}

/// Turn path rejections into `{"error": ...}` responses
pub fn path_error_handler(err: error::PathError, _req: &HttpRequest) -> actix_web::Error {
    CourtsideError::InvalidInput(err.to_string()).into()
}
