//! Mapping from storage errors to HTTP responses.
//!
//! Every failure renders as `{"error": kind, "reason": code, "message": text}`.
//! The status code depends only on the error kind. Rejections produced by
//! axum itself (body limits, unknown routes, unsupported methods) go through
//! the same shape.

use axum::{
    extract::rejection::BytesRejection,
    http::{Method, StatusCode, Uri},
    response::{IntoResponse, Response},
    Json,
};
use serde::Serialize;

use todo_core::{ErrorKind, StoreError, ValidationError};

/// Handler error wrapping a classified `StoreError`.
#[derive(Debug)]
pub struct ApiError(pub StoreError);

impl From<StoreError> for ApiError {
    fn from(err: StoreError) -> Self {
        ApiError(err)
    }
}

impl From<ValidationError> for ApiError {
    fn from(err: ValidationError) -> Self {
        ApiError(err.into())
    }
}

impl From<BytesRejection> for ApiError {
    fn from(rejection: BytesRejection) -> Self {
        let err = if rejection.status() == StatusCode::PAYLOAD_TOO_LARGE {
            ValidationError::BodyTooLarge
        } else {
            ValidationError::BodyUnreadable
        };
        ApiError(err.into())
    }
}

/// JSON body of an error response.
#[derive(Debug, Serialize)]
pub struct ErrorBody {
    pub error: &'static str,
    pub reason: &'static str,
    pub message: String,
}

pub fn status_for(kind: ErrorKind) -> StatusCode {
    match kind {
        ErrorKind::ValidationFailure => StatusCode::BAD_REQUEST,
        ErrorKind::NotFound => StatusCode::NOT_FOUND,
        ErrorKind::BackendUnavailable => StatusCode::SERVICE_UNAVAILABLE,
    }
}

impl ApiError {
    pub fn body(&self) -> ErrorBody {
        // Display of StoreError never includes backend text.
        ErrorBody {
            error: self.0.kind().as_str(),
            reason: self.0.reason(),
            message: self.0.to_string(),
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        (status_for(self.0.kind()), Json(self.body())).into_response()
    }
}

fn route_error(kind: ErrorKind, reason: &'static str, message: String) -> Response {
    let body = ErrorBody {
        error: kind.as_str(),
        reason,
        message,
    };
    (status_for(kind), Json(body)).into_response()
}

/// Router fallback for paths no route matches.
pub async fn route_not_found(method: Method, uri: Uri) -> Response {
    route_error(
        ErrorKind::NotFound,
        "route_not_found",
        format!("no route for {method} {}", uri.path()),
    )
}

/// Router fallback for a known path hit with an unsupported method.
pub async fn method_not_allowed(method: Method, uri: Uri) -> Response {
    route_error(
        ErrorKind::ValidationFailure,
        "method_not_allowed",
        format!("{method} is not supported on {}", uri.path()),
    )
}
