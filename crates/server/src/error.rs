//! HTTP error mapping for the read API.
//!
//! Every failure a handler can produce is rendered as a uniform JSON body
//! with a three-tier status mapping: client input errors are 400, absent
//! orders are 404, everything else is 500. Internal details are logged
//! server-side and never exposed to clients.

use axum::Json;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use serde::Serialize;
use thiserror::Error;

use crate::service::ServiceError;

/// JSON body returned for every error response.
#[derive(Debug, Serialize)]
pub struct ErrorBody {
    /// Always `"error"`.
    pub status: String,
    /// Human-readable description safe to show a client.
    pub message: String,
}

/// Application-level error type for API handlers.
#[derive(Debug, Error)]
pub enum ApiError {
    /// The requested order does not exist.
    #[error("order not found")]
    NotFound,
    /// The supplied order id is not well-formed.
    #[error("invalid order id")]
    InvalidId,
    /// Anything else; the source is logged, the client sees a generic body.
    #[error(transparent)]
    Internal(ServiceError),
}

impl From<ServiceError> for ApiError {
    fn from(err: ServiceError) -> Self {
        match err {
            ServiceError::NotFound => Self::NotFound,
            ServiceError::InvalidId => Self::InvalidId,
            err => Self::Internal(err),
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        if let Self::Internal(ref err) = self {
            tracing::error!(error = %err, "request failed");
        }

        let status = match &self {
            Self::NotFound => StatusCode::NOT_FOUND,
            Self::InvalidId => StatusCode::BAD_REQUEST,
            Self::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        };

        let message = match &self {
            Self::NotFound => "order not found".to_string(),
            Self::InvalidId => "invalid order id".to_string(),
            Self::Internal(_) => "something went wrong, try again later".to_string(),
        };

        let body = ErrorBody {
            status: "error".to_string(),
            message,
        };

        (status, Json(body)).into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::StoreError;

    fn get_status(err: ApiError) -> StatusCode {
        err.into_response().status()
    }

    #[test]
    fn test_api_error_status_codes() {
        assert_eq!(get_status(ApiError::NotFound), StatusCode::NOT_FOUND);
        assert_eq!(get_status(ApiError::InvalidId), StatusCode::BAD_REQUEST);
        assert_eq!(
            get_status(ApiError::Internal(ServiceError::Store(
                StoreError::Database(sqlx::Error::PoolTimedOut)
            ))),
            StatusCode::INTERNAL_SERVER_ERROR
        );
    }

    #[test]
    fn test_service_error_mapping() {
        assert!(matches!(
            ApiError::from(ServiceError::NotFound),
            ApiError::NotFound
        ));
        assert!(matches!(
            ApiError::from(ServiceError::InvalidId),
            ApiError::InvalidId
        ));
        assert!(matches!(
            ApiError::from(ServiceError::AlreadyExists),
            ApiError::Internal(_)
        ));
    }
}
