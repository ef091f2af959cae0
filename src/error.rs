use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use serde_json::json;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum AppError {
    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),

    #[error("Validation error: {0}")]
    Validation(String),

    #[error("Not found: {0}")]
    NotFound(String),

    #[error("Unauthorized: {0}")]
    Unauthorized(String),

    #[error("Forbidden: {0}")]
    Forbidden(String),

    #[error("Slot conflict: {0}")]
    Conflict(String),

    #[error("Invalid transition: {0}")]
    InvalidTransition(String),

    #[error("Concurrent modification: {0}")]
    ConcurrentModification(String),

    #[error("Insufficient funds: {0}")]
    InsufficientFunds(String),

    #[error("No payout method: {0}")]
    NoPayoutMethod(String),
}

impl AppError {
    fn status_code(&self) -> StatusCode {
        match self {
            AppError::Database(_) => StatusCode::INTERNAL_SERVER_ERROR,
            AppError::Validation(_) => StatusCode::BAD_REQUEST,
            AppError::NotFound(_) => StatusCode::NOT_FOUND,
            AppError::Unauthorized(_) => StatusCode::UNAUTHORIZED,
            AppError::Forbidden(_) => StatusCode::FORBIDDEN,
            AppError::Conflict(_)
            | AppError::InvalidTransition(_)
            | AppError::ConcurrentModification(_) => StatusCode::CONFLICT,
            AppError::InsufficientFunds(_) | AppError::NoPayoutMethod(_) => {
                StatusCode::UNPROCESSABLE_ENTITY
            }
        }
    }

    /// Machine-readable code so the UI can render a specific failure reason
    /// instead of a generic "failed" message.
    pub fn code(&self) -> &'static str {
        match self {
            AppError::Database(_) => "storage",
            AppError::Validation(_) => "validation",
            AppError::NotFound(_) => "not_found",
            AppError::Unauthorized(_) => "unauthorized",
            AppError::Forbidden(_) => "forbidden",
            AppError::Conflict(_) => "slot_conflict",
            AppError::InvalidTransition(_) => "invalid_transition",
            AppError::ConcurrentModification(_) => "concurrent_modification",
            AppError::InsufficientFunds(_) => "insufficient_funds",
            AppError::NoPayoutMethod(_) => "no_payout_method",
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let status = self.status_code();
        let body = Json(json!({
            "error": self.to_string(),
            "code": self.code(),
            "status": status.as_u16(),
        }));

        (status, body).into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_validation_error_status_code() {
        let error = AppError::Validation("Invalid input".to_string());
        assert_eq!(error.status_code(), StatusCode::BAD_REQUEST);
    }

    #[test]
    fn test_not_found_error_status_code() {
        let error = AppError::NotFound("Resource not found".to_string());
        assert_eq!(error.status_code(), StatusCode::NOT_FOUND);
    }

    #[test]
    fn test_database_error_status_code() {
        let error = AppError::Database(sqlx::Error::RowNotFound);
        assert_eq!(error.status_code(), StatusCode::INTERNAL_SERVER_ERROR);
    }

    #[test]
    fn test_conflict_error_status_code() {
        let error = AppError::Conflict("slot already booked".to_string());
        assert_eq!(error.status_code(), StatusCode::CONFLICT);
        assert_eq!(error.code(), "slot_conflict");
    }

    #[test]
    fn test_invalid_transition_distinguishable_from_conflict() {
        let transition = AppError::InvalidTransition("completed is terminal".to_string());
        let conflict = AppError::Conflict("overlap".to_string());
        assert_eq!(transition.status_code(), conflict.status_code());
        assert_ne!(transition.code(), conflict.code());
    }

    #[test]
    fn test_insufficient_funds_status_code() {
        let error = AppError::InsufficientFunds("balance is 500".to_string());
        assert_eq!(error.status_code(), StatusCode::UNPROCESSABLE_ENTITY);
        assert_eq!(error.code(), "insufficient_funds");
    }

    #[test]
    fn test_no_payout_method_status_code() {
        let error = AppError::NoPayoutMethod("add a payout method first".to_string());
        assert_eq!(error.status_code(), StatusCode::UNPROCESSABLE_ENTITY);
    }

    #[tokio::test]
    async fn test_validation_error_response() {
        let error = AppError::Validation("Invalid duration".to_string());
        let response = error.into_response();

        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    }

    #[tokio::test]
    async fn test_concurrent_modification_response() {
        let error = AppError::ConcurrentModification("booking was updated".to_string());
        let response = error.into_response();

        assert_eq!(response.status(), StatusCode::CONFLICT);
    }
}
