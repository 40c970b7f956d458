//! JSON error bodies for non-2xx responses.

use axum::http::StatusCode;
use axum::response::{IntoResponse, Json, Response};
use serde::Serialize;
use serde_json::Value;

use crate::lookup::LookupError;
use crate::sms::AuthError;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ApiErrorCode {
    Forbidden,
    LookupFailed,
    LookupTimedOut,
    Unavailable,
    InternalError,
}

impl ApiErrorCode {
    pub fn status(self) -> StatusCode {
        match self {
            Self::Forbidden => StatusCode::FORBIDDEN,
            Self::LookupFailed | Self::LookupTimedOut | Self::InternalError => {
                StatusCode::INTERNAL_SERVER_ERROR
            }
            Self::Unavailable => StatusCode::SERVICE_UNAVAILABLE,
        }
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct ApiError {
    pub code: ApiErrorCode,
    pub message: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub details: Option<Value>,
}

impl ApiError {
    pub fn new(code: ApiErrorCode, message: impl Into<String>) -> Self {
        Self {
            code,
            message: message.into(),
            details: None,
        }
    }

    pub fn with_details(mut self, details: Value) -> Self {
        self.details = Some(details);
        self
    }

    pub fn forbidden(message: impl Into<String>) -> Self {
        Self::new(ApiErrorCode::Forbidden, message)
    }

    pub fn internal_error(message: impl Into<String>) -> Self {
        Self::new(ApiErrorCode::InternalError, message)
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        (self.code.status(), Json(self)).into_response()
    }
}

impl From<AuthError> for ApiError {
    fn from(e: AuthError) -> Self {
        Self::forbidden(e.to_string())
    }
}

impl From<LookupError> for ApiError {
    fn from(e: LookupError) -> Self {
        match &e {
            LookupError::TimedOut(after) => {
                Self::new(ApiErrorCode::LookupTimedOut, e.to_string()).with_details(
                    serde_json::json!({ "timeout_ms": after.as_millis() as u64 }),
                )
            }
            LookupError::Cancelled => Self::new(ApiErrorCode::Unavailable, "shutting down"),
            LookupError::Catalog(source) => Self::new(ApiErrorCode::LookupFailed, e.to_string())
                .with_details(serde_json::json!({ "cause": source.to_string() })),
            LookupError::Row(source) => Self::new(ApiErrorCode::LookupFailed, e.to_string())
                .with_details(serde_json::json!({ "cause": source.to_string() })),
            LookupError::Worker(_) => Self::internal_error(e.to_string()),
        }
    }
}
