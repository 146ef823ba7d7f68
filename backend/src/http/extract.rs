//! Validating extractors.
//!
//! Handlers never see raw input: the path id and the JSON body are checked
//! here and rejected with [`AppError::Validation`] before the handler (and so
//! the repository) runs.

use axum::{
    body::Bytes,
    extract::{FromRequest, FromRequestParts, Path, Request},
    http::request::Parts,
};

use super::error::AppError;
use crate::api::{BetId, BetPayload};
use crate::validation::{parse_bet_id, parse_bet_payload, FieldError};

/// The `{bet_id}` path parameter, parsed as a 32-bit integer.
#[derive(Debug, Clone, Copy)]
pub struct BetIdPath(pub BetId);

impl<S> FromRequestParts<S> for BetIdPath
where
    S: Send + Sync,
{
    type Rejection = AppError;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        let Path(raw) = Path::<String>::from_request_parts(parts, state)
            .await
            .map_err(|e| {
                AppError::Validation(vec![FieldError::new(
                    ["path", "bet_id"],
                    e.body_text(),
                    "int_parsing",
                )])
            })?;

        parse_bet_id(&raw)
            .map(BetIdPath)
            .map_err(|e| AppError::Validation(vec![e]))
    }
}

/// A create/update request body that passed validation.
#[derive(Debug, Clone, Copy)]
pub struct ValidBet(pub BetPayload);

impl<S> FromRequest<S> for ValidBet
where
    S: Send + Sync,
{
    type Rejection = AppError;

    async fn from_request(req: Request, state: &S) -> Result<Self, Self::Rejection> {
        let body = Bytes::from_request(req, state)
            .await
            .map_err(|e| AppError::Rejected {
                status: e.status(),
                message: e.body_text(),
            })?;

        parse_bet_payload(&body)
            .map(ValidBet)
            .map_err(AppError::Validation)
    }
}
