//! services/api/src/web/errors.rs
//!
//! Shared mapping from core errors to HTTP responses.

use axum::{http::StatusCode, Json};
use restaurant_core::{ports::PortError, ValidationError};
use tracing::error;

use crate::web::dto::ErrorResponse;

pub type HandlerError = (StatusCode, Json<ErrorResponse>);

pub fn error_response(status: StatusCode, message: impl Into<String>) -> HandlerError {
    (
        status,
        Json(ErrorResponse {
            error: message.into(),
            details: Vec::new(),
        }),
    )
}

/// Logs a port failure and converts it without leaking internals.
pub fn port_error(context: &str, e: PortError) -> HandlerError {
    match e {
        PortError::NotFound(what) => error_response(StatusCode::NOT_FOUND, what),
        PortError::Unexpected(_) => {
            error!("{}: {:?}", context, e);
            error_response(StatusCode::INTERNAL_SERVER_ERROR, context.to_string())
        }
    }
}

pub fn validation_errors(errors: Vec<ValidationError>) -> HandlerError {
    (
        StatusCode::BAD_REQUEST,
        Json(ErrorResponse {
            error: "Validation failed".to_string(),
            details: errors.iter().map(ToString::to_string).collect(),
        }),
    )
}

pub fn validation_error(e: ValidationError) -> HandlerError {
    validation_errors(vec![e])
}
