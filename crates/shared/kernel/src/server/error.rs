//! Error type returned by every handler, with the API's HTTP mapping.

use super::state::ApiStateError;
use crate::pagination::PaginationError;
use axum::Json;
use axum::http::{HeaderValue, StatusCode, header};
use axum::response::{IntoResponse, Response};
use serde_json::json;
use std::borrow::Cow;
use tracing::error;

#[pdl_derive::pdl_error]
pub enum ApiError {
    /// Rejected parameter or missing item; answered with a plain-text 404.
    #[status(404)]
    #[error("{message}")]
    InvalidArgument { message: Cow<'static, str> },

    #[status(404)]
    #[error("{message}")]
    NotFound { message: Cow<'static, str> },

    #[status(400)]
    #[error("{message}")]
    BadRequest { message: Cow<'static, str> },

    #[status(401)]
    #[error("Invalid or missing API key")]
    Unauthorized {},

    #[status(502)]
    #[error("Upstream failure{}: {message}", format_context(.context))]
    Upstream { message: Cow<'static, str>, context: Option<Cow<'static, str>> },

    #[status(500)]
    #[error("Application state error{}: {source}", format_context(.context))]
    State { source: ApiStateError, context: Option<Cow<'static, str>> },

    #[status(500)]
    #[error("Internal error{}: {message}", format_context(.context))]
    Internal { message: Cow<'static, str>, context: Option<Cow<'static, str>> },
}

impl ApiError {
    pub fn invalid_argument(message: impl Into<Cow<'static, str>>) -> Self {
        Self::InvalidArgument { message: message.into() }
    }

    pub fn not_found(message: impl Into<Cow<'static, str>>) -> Self {
        Self::NotFound { message: message.into() }
    }

    pub fn bad_request(message: impl Into<Cow<'static, str>>) -> Self {
        Self::BadRequest { message: message.into() }
    }

    pub fn upstream(message: impl Into<Cow<'static, str>>) -> Self {
        Self::Upstream { message: message.into(), context: None }
    }

    /// The plain-text "Item not found" answer of show endpoints.
    #[must_use]
    pub const fn item_not_found() -> Self {
        Self::InvalidArgument { message: Cow::Borrowed("Item not found") }
    }
}

impl From<PaginationError> for ApiError {
    fn from(err: PaginationError) -> Self {
        Self::invalid_argument(err.to_string())
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status =
            StatusCode::from_u16(self.status_code()).unwrap_or(StatusCode::INTERNAL_SERVER_ERROR);

        match self {
            Self::InvalidArgument { message } => {
                let content_type = HeaderValue::from_static("text/plain; charset=utf-8");
                (status, [(header::CONTENT_TYPE, content_type)], message.into_owned())
                    .into_response()
            },
            Self::NotFound { message } | Self::BadRequest { message } => {
                (status, Json(json!({ "error": message }))).into_response()
            },
            Self::Unauthorized {} => {
                (status, Json(json!({ "error": "Invalid or missing API key" }))).into_response()
            },
            Self::Upstream { .. } => {
                error!(error = %self, "Upstream request failed");
                (status, Json(json!({ "error": self.to_string() }))).into_response()
            },
            Self::State { .. } | Self::Internal { .. } => {
                error!(error = %self, "Request failed");
                (status, Json(json!({ "error": "Internal server error" }))).into_response()
            },
        }
    }
}
