use std::error::Error as StdError;

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde::Serialize;
use utoipa::ToSchema;

use domain::error::{DomainErrorKind, Error as DomainError, InternalErrorKind};

pub type Result<T> = core::result::Result<T, Error>;

/// Body returned with every relay failure: `{"error": "..."}`.
#[derive(Debug, Serialize, ToSchema)]
pub struct ErrorResponse {
    #[schema(example = "Failed to send notification")]
    pub error: String,
}

const CONFIGURATION_MISSING: &str = "Gotify configuration missing";
const SEND_FAILED: &str = "Failed to send notification";

#[derive(Debug)]
pub struct Error(DomainError);

impl StdError for Error {}

impl std::fmt::Display for Error {
    fn fmt(&self, fmt: &mut std::fmt::Formatter) -> core::result::Result<(), std::fmt::Error> {
        write!(fmt, "{self:?}")
    }
}

// Every relay failure is a 500. Only the configuration case gets its own message;
// upstream detail stays in the server log.
impl IntoResponse for Error {
    fn into_response(self) -> Response {
        let message = match self.0.error_kind {
            DomainErrorKind::Internal(InternalErrorKind::Config) => CONFIGURATION_MISSING,
            DomainErrorKind::Internal(InternalErrorKind::Other(_))
            | DomainErrorKind::External(_) => SEND_FAILED,
        };

        (
            StatusCode::INTERNAL_SERVER_ERROR,
            Json(ErrorResponse {
                error: message.to_string(),
            }),
        )
            .into_response()
    }
}

impl<E> From<E> for Error
where
    E: Into<DomainError>,
{
    fn from(err: E) -> Self {
        Self(err.into())
    }
}
