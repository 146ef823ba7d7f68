//! High-level database service layer.
//!
//! Repository-agnostic bet operations. These functions work with any
//! [`BetRepository`] implementation and are what the HTTP handlers call.
//!
//! # Usage
//!
//! ```no_run
//! use bet_service::api::BetPayload;
//! use bet_service::db::{services, repositories::LocalRepository};
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let repo = LocalRepository::new();
//!
//!     let payload = BetPayload::new(1, 2, 10.5)?;
//!     let bet = services::create_bet(&repo, &payload).await?;
//!     let bets = services::list_bets(&repo).await?;
//!     println!("Stored bet {} ({} total)", bet.id, bets.len());
//!
//!     Ok(())
//! }
//! ```

use log::{debug, info, warn};

use crate::api::{Bet, BetId, BetPayload};

use super::repository::{BetRepository, RepositoryResult};

// ==================== Health & Connection ====================

/// Check if the database connection is healthy.
pub async fn health_check<R: BetRepository + ?Sized>(repo: &R) -> RepositoryResult<bool> {
    repo.health_check().await
}

// ==================== Bet Operations ====================

/// List all bets in store order.
pub async fn list_bets<R: BetRepository + ?Sized>(repo: &R) -> RepositoryResult<Vec<Bet>> {
    let bets = repo.list_bets().await?;
    debug!("Service layer: listed {} bets", bets.len());
    Ok(bets)
}

/// Fetch a single bet.
///
/// # Errors
/// `RepositoryError::NotFound` if no bet has this id.
pub async fn get_bet<R: BetRepository + ?Sized>(repo: &R, id: BetId) -> RepositoryResult<Bet> {
    debug!("Service layer: loading bet {}", id);
    repo.get_bet(id).await
}

/// Store a new bet; the returned record carries the store-assigned id.
pub async fn create_bet<R: BetRepository + ?Sized>(
    repo: &R,
    payload: &BetPayload,
) -> RepositoryResult<Bet> {
    let bet = repo.create_bet(payload).await?;
    info!(
        "Service layer: created bet {} (player={}, game={}, amount={})",
        bet.id, bet.player_id, bet.game_id, bet.amount
    );
    Ok(bet)
}

/// Replace every mutable field of an existing bet.
///
/// # Errors
/// `RepositoryError::NotFound` if no bet has this id.
pub async fn update_bet<R: BetRepository + ?Sized>(
    repo: &R,
    id: BetId,
    payload: &BetPayload,
) -> RepositoryResult<Bet> {
    match repo.update_bet(id, payload).await {
        Ok(bet) => {
            info!("Service layer: updated bet {}", id);
            Ok(bet)
        }
        Err(e) => {
            if !e.is_not_found() {
                warn!("Service layer: update of bet {} failed: {}", id, e);
            }
            Err(e)
        }
    }
}

/// Permanently delete a bet.
///
/// # Errors
/// `RepositoryError::NotFound` if no bet has this id.
pub async fn delete_bet<R: BetRepository + ?Sized>(repo: &R, id: BetId) -> RepositoryResult<()> {
    repo.delete_bet(id).await?;
    info!("Service layer: deleted bet {}", id);
    Ok(())
}
