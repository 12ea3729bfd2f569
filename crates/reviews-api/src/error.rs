//! HTTP error mapping.
//!
//! Client errors carry a descriptive plain-text body. Server errors log the
//! underlying cause and answer with a fixed message for the operation.

use axum::{http::StatusCode, response::IntoResponse};
use tracing::error;

/// Error returned by request handlers.
#[derive(Debug)]
pub enum ApiError {
    /// Missing or malformed client input (400).
    BadRequest(String),
    /// Store failure (500). `message` is what the client sees.
    Internal {
        message: &'static str,
        source: reviews_core::Error,
    },
}

impl ApiError {
    /// Map a store error to a 500 carrying `message`, for use with `map_err`.
    pub fn internal(message: &'static str) -> impl FnOnce(reviews_core::Error) -> ApiError {
        move |source| match source {
            reviews_core::Error::InvalidInput(msg) | reviews_core::Error::NotFound(msg) => {
                ApiError::BadRequest(msg)
            }
            source => ApiError::Internal { message, source },
        }
    }

    pub fn status(&self) -> StatusCode {
        match self {
            ApiError::BadRequest(_) => StatusCode::BAD_REQUEST,
            ApiError::Internal { .. } => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl From<reviews_core::Error> for ApiError {
    fn from(err: reviews_core::Error) -> Self {
        ApiError::internal("Internal server error")(err)
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> axum::response::Response {
        let status = self.status();
        match self {
            ApiError::BadRequest(msg) => (status, msg).into_response(),
            ApiError::Internal { message, source } => {
                error!(
                    subsystem = "api",
                    error = %source,
                    "{}",
                    message
                );
                (status, message).into_response()
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_invalid_input_maps_to_bad_request() {
        let err: ApiError = reviews_core::Error::InvalidInput("page must be >= 1".into()).into();
        match err {
            ApiError::BadRequest(msg) => assert_eq!(msg, "page must be >= 1"),
            other => panic!("expected BadRequest, got {:?}", other),
        }
    }

    #[test]
    fn test_database_error_maps_to_internal_with_message() {
        let err = ApiError::internal("An error occurred while fetching reviews")(
            reviews_core::Error::Database(sqlx::Error::PoolTimedOut),
        );
        assert_eq!(err.status(), StatusCode::INTERNAL_SERVER_ERROR);
        match err {
            ApiError::Internal { message, .. } => {
                assert_eq!(message, "An error occurred while fetching reviews")
            }
            other => panic!("expected Internal, got {:?}", other),
        }
    }

    #[test]
    fn test_response_status_codes() {
        let resp = ApiError::BadRequest("product_id is required".into()).into_response();
        assert_eq!(resp.status(), StatusCode::BAD_REQUEST);

        let resp = ApiError::from(reviews_core::Error::Internal("boom".into())).into_response();
        assert_eq!(resp.status(), StatusCode::INTERNAL_SERVER_ERROR);
    }
}
