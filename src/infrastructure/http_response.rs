// HTTP response utilities for JSON payloads and request errors
use crate::application::error::DashboardError;
use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::Serialize;

#[derive(Debug, Serialize)]
pub struct ErrorBody {
    pub error: String,
}

impl DashboardError {
    pub fn status_code(&self) -> StatusCode {
        match self {
            DashboardError::SessionNotFound(_) | DashboardError::RecordNotFound { .. } => {
                StatusCode::NOT_FOUND
            }
            DashboardError::InvalidParameter { .. } => StatusCode::BAD_REQUEST,
        }
    }
}

impl IntoResponse for DashboardError {
    fn into_response(self) -> Response {
        let status = self.status_code();
        tracing::debug!("Request failed with {}: {}", status, self);
        (status, Json(ErrorBody { error: self.to_string() })).into_response()
    }
}

/// JSON response with an explicit status code
pub fn json_with_status<T: Serialize>(status: StatusCode, body: T) -> Response {
    (status, Json(body)).into_response()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_status_codes() {
        assert_eq!(DashboardError::SessionNotFound(7).status_code(), StatusCode::NOT_FOUND);
        assert_eq!(
            DashboardError::InvalidParameter {
                name: "month",
                value: "smarch".to_string()
            }
            .status_code(),
            StatusCode::BAD_REQUEST
        );
    }

    #[test]
    fn test_error_response() {
        let response = DashboardError::SessionNotFound(7).into_response();
        assert_eq!(response.status(), StatusCode::NOT_FOUND);
    }
}
