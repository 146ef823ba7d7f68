//! HTTP handlers for the REST API.
//!
//! Each handler corresponds to an API endpoint and delegates to the
//! service layer for storage.

use axum::{extract::State, http::StatusCode, Json};

use super::dto::{BetResource, DetailResponse, HealthResponse};
use super::error::AppError;
use super::extract::{BetIdPath, ValidBet};
use super::state::AppState;
use crate::db::services as db_services;

/// Result type for handlers.
pub type HandlerResult<T> = Result<Json<T>, AppError>;

// =============================================================================
// Health Check
// =============================================================================

/// GET /health
///
/// Verify the service is running and the database is reachable.
pub async fn health_check(State(state): State<AppState>) -> HandlerResult<HealthResponse> {
    let db_status = match db_services::health_check(state.repository.as_ref()).await {
        Ok(true) => "connected".to_string(),
        Ok(false) => "disconnected".to_string(),
        Err(e) => format!("error: {}", e),
    };

    Ok(Json(HealthResponse {
        status: "ok".to_string(),
        version: env!("CARGO_PKG_VERSION").to_string(),
        database: db_status,
    }))
}

// =============================================================================
// Bet CRUD
// =============================================================================

/// GET /bets
pub async fn list_bets(State(state): State<AppState>) -> HandlerResult<Vec<BetResource>> {
    let bets = db_services::list_bets(state.repository.as_ref()).await?;
    Ok(Json(bets.into_iter().map(BetResource::from).collect()))
}

/// GET /bets/{bet_id}
pub async fn get_bet(
    State(state): State<AppState>,
    BetIdPath(id): BetIdPath,
) -> HandlerResult<BetResource> {
    let bet = db_services::get_bet(state.repository.as_ref(), id).await?;
    Ok(Json(bet.into()))
}

/// POST /bets
///
/// Returns the stored record, including its new id.
pub async fn create_bet(
    State(state): State<AppState>,
    ValidBet(payload): ValidBet,
) -> HandlerResult<BetResource> {
    let bet = db_services::create_bet(state.repository.as_ref(), &payload).await?;
    Ok(Json(bet.into()))
}

/// PUT /bets/{bet_id}
///
/// Full replace: all three fields are overwritten.
pub async fn update_bet(
    State(state): State<AppState>,
    BetIdPath(id): BetIdPath,
    ValidBet(payload): ValidBet,
) -> HandlerResult<BetResource> {
    let bet = db_services::update_bet(state.repository.as_ref(), id, &payload).await?;
    Ok(Json(bet.into()))
}

/// DELETE /bets/{bet_id}
pub async fn delete_bet(
    State(state): State<AppState>,
    BetIdPath(id): BetIdPath,
) -> HandlerResult<DetailResponse> {
    db_services::delete_bet(state.repository.as_ref(), id).await?;
    Ok(Json(DetailResponse::new("Bet deleted")))
}

/// Fallback for unknown routes.
pub async fn not_found() -> AppError {
    AppError::NotFound("Not Found".to_string())
}

/// Fallback for known routes hit with an unsupported method.
pub async fn method_not_allowed() -> AppError {
    AppError::Rejected {
        status: StatusCode::METHOD_NOT_ALLOWED,
        message: "Method Not Allowed".to_string(),
    }
}
