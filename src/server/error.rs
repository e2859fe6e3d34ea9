//! HTTP error mapping for the fleet server.

use axum::Json;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use serde::Serialize;

use crate::Error;

/// Error returned by route handlers, carrying the HTTP status mapping.
#[derive(Debug)]
pub struct ApiError {
    status: StatusCode,
    message: String,
}

/// JSON body for error responses.
#[derive(Debug, Serialize)]
struct ErrorBody {
    status: &'static str,
    message: String,
}

impl From<Error> for ApiError {
    fn from(e: Error) -> Self {
        let status = match &e {
            Error::InvalidInput(_) => StatusCode::BAD_REQUEST,
            Error::Storage(_) => StatusCode::SERVICE_UNAVAILABLE,
        };
        if status.is_server_error() {
            tracing::error!(error = %e, "request failed");
        }
        Self {
            status,
            message: e.to_string(),
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let body = ErrorBody {
            status: "error",
            message: self.message,
        };
        (self.status, Json(body)).into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn should_map_invalid_input_to_bad_request() {
        // given
        let error = Error::InvalidInput("latitude out of range".to_string());

        // when
        let api_error = ApiError::from(error);

        // then
        assert_eq!(api_error.status, StatusCode::BAD_REQUEST);
    }

    #[test]
    fn should_map_storage_errors_to_service_unavailable() {
        // given
        let error = Error::Storage("disk full".to_string());

        // when
        let api_error = ApiError::from(error);

        // then
        assert_eq!(api_error.status, StatusCode::SERVICE_UNAVAILABLE);
    }
}
