//! HTTP error handling and response types.
//!
//! Every error body has a single `detail` key. Not-found and generic failures
//! carry a message string; validation failures carry the list of field errors.

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::{Deserialize, Serialize};

use crate::db::repository::RepositoryError;
use crate::validation::FieldError;

/// Message returned for missing bets.
pub const BET_NOT_FOUND: &str = "Bet not found";

/// Message returned for store failures; details go to the log only.
pub const INTERNAL_SERVER_ERROR: &str = "Internal Server Error";

/// API error response body.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ApiError {
    pub detail: ErrorDetail,
}

/// Payload of the `detail` key.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(untagged)]
pub enum ErrorDetail {
    Message(String),
    Fields(Vec<FieldError>),
}

impl ApiError {
    pub fn message(message: impl Into<String>) -> Self {
        Self {
            detail: ErrorDetail::Message(message.into()),
        }
    }

    pub fn fields(errors: Vec<FieldError>) -> Self {
        Self {
            detail: ErrorDetail::Fields(errors),
        }
    }
}

/// Application error type for HTTP handlers.
#[derive(Debug)]
pub enum AppError {
    /// Resource not found
    NotFound(String),
    /// Request body or path failed validation
    Validation(Vec<FieldError>),
    /// The request was rejected before validation (body too large, wrong method)
    Rejected { status: StatusCode, message: String },
    /// Repository error
    Repository(RepositoryError),
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, error) = match self {
            AppError::NotFound(msg) => (StatusCode::NOT_FOUND, ApiError::message(msg)),
            AppError::Validation(errors) => {
                tracing::debug!(?errors, "request validation failed");
                (StatusCode::UNPROCESSABLE_ENTITY, ApiError::fields(errors))
            }
            AppError::Rejected { status, message } => (status, ApiError::message(message)),
            AppError::Repository(RepositoryError::NotFound { .. }) => {
                (StatusCode::NOT_FOUND, ApiError::message(BET_NOT_FOUND))
            }
            AppError::Repository(e) => {
                tracing::error!(error = %e, "repository error");
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    ApiError::message(INTERNAL_SERVER_ERROR),
                )
            }
        };

        (status, Json(error)).into_response()
    }
}

impl From<RepositoryError> for AppError {
    fn from(err: RepositoryError) -> Self {
        AppError::Repository(err)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::api::BetId;

    async fn body_json(response: Response) -> serde_json::Value {
        let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();
        serde_json::from_slice(&bytes).unwrap()
    }

    #[tokio::test]
    async fn test_repository_not_found_maps_to_404() {
        let response =
            AppError::from(RepositoryError::bet_not_found("get_bet", BetId::new(1))).into_response();
        assert_eq!(response.status(), StatusCode::NOT_FOUND);
        assert_eq!(
            body_json(response).await,
            serde_json::json!({"detail": "Bet not found"})
        );
    }

    #[tokio::test]
    async fn test_store_errors_are_not_leaked() {
        let response =
            AppError::from(RepositoryError::connection("password authentication failed"))
                .into_response();
        assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(
            body_json(response).await,
            serde_json::json!({"detail": "Internal Server Error"})
        );
    }

    #[tokio::test]
    async fn test_validation_maps_to_422() {
        let response = AppError::Validation(vec![FieldError::new(
            ["body", "amount"],
            "Field required",
            "missing",
        )])
        .into_response();
        assert_eq!(response.status(), StatusCode::UNPROCESSABLE_ENTITY);
        assert_eq!(
            body_json(response).await,
            serde_json::json!({"detail": [{"loc": ["body", "amount"], "msg": "Field required", "type": "missing"}]})
        );
    }
}
