//! HTTP error responses.

use std::sync::atomic::{AtomicBool, Ordering};

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde_json::{json, Value};

/// Whether error bodies carry a `stack` entry. Off until configured.
static EXPOSE_DETAILS: AtomicBool = AtomicBool::new(false);

/// Enable or disable debug detail in error bodies (off in production).
pub fn set_expose_details(expose: bool) {
    EXPOSE_DETAILS.store(expose, Ordering::Relaxed);
}

fn expose_details() -> bool {
    EXPOSE_DETAILS.load(Ordering::Relaxed)
}

#[derive(Debug)]
pub enum ApiError {
    /// Anything not attributable to the caller.
    Internal(haven_core::Error),
    Unauthorized(String),
    Forbidden(String),
    NotFound(String),
    BadRequest(String),
}

impl From<haven_core::Error> for ApiError {
    fn from(err: haven_core::Error) -> Self {
        match &err {
            haven_core::Error::NotFound(msg) => ApiError::NotFound(msg.clone()),
            haven_core::Error::PropertyNotFound(_) => ApiError::NotFound(err.to_string()),
            haven_core::Error::InvalidInput(msg) => ApiError::BadRequest(msg.clone()),
            haven_core::Error::Unauthorized(msg) => ApiError::Unauthorized(msg.clone()),
            haven_core::Error::Forbidden(msg) => ApiError::Forbidden(msg.clone()),
            _ => ApiError::Internal(err),
        }
    }
}

impl ApiError {
    pub fn status(&self) -> StatusCode {
        match self {
            ApiError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
            ApiError::Unauthorized(_) => StatusCode::UNAUTHORIZED,
            ApiError::Forbidden(_) => StatusCode::FORBIDDEN,
            ApiError::NotFound(_) => StatusCode::NOT_FOUND,
            ApiError::BadRequest(_) => StatusCode::BAD_REQUEST,
        }
    }

    /// JSON body: `message`, plus `stack` when `expose` is set.
    pub fn body(&self, expose: bool) -> Value {
        let message = match self {
            ApiError::Internal(err) => err.to_string(),
            ApiError::Unauthorized(msg)
            | ApiError::Forbidden(msg)
            | ApiError::NotFound(msg)
            | ApiError::BadRequest(msg) => msg.clone(),
        };

        if expose {
            json!({ "message": message, "stack": format!("{:?}", self) })
        } else {
            json!({ "message": message })
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = self.status();
        if let ApiError::Internal(err) = &self {
            tracing::error!(subsystem = "api", error = %err, "Request failed");
        }
        (status, Json(self.body(expose_details()))).into_response()
    }
}
