//! Repository trait for abstracting bet storage.
//!
//! The HTTP layer and the service functions only ever see `dyn BetRepository`,
//! so the Postgres and in-memory backends can be swapped via the factory.

use async_trait::async_trait;

use crate::api::{Bet, BetId, BetPayload};

pub mod error;

pub use error::{ErrorContext, RepositoryError, RepositoryResult};

/// Storage operations for bet records.
///
/// # Thread Safety
/// Implementations must be `Send + Sync`; a single instance is shared by all
/// request handlers.
///
/// # Errors
/// Operations addressing a single bet return [`RepositoryError::NotFound`]
/// when no record has the given id. Any other variant is a store failure.
#[async_trait]
pub trait BetRepository: Send + Sync {
    /// Check if the store is reachable.
    ///
    /// # Returns
    /// - `Ok(true)` if connection is healthy
    /// - `Ok(false)` if connection is unhealthy but no error occurred
    /// - `Err(RepositoryError)` if an error occurred during the check
    async fn health_check(&self) -> RepositoryResult<bool>;

    /// All bets, in store order.
    async fn list_bets(&self) -> RepositoryResult<Vec<Bet>>;

    /// Retrieve one bet.
    async fn get_bet(&self, id: BetId) -> RepositoryResult<Bet>;

    /// Persist a new bet and return it with its assigned id.
    async fn create_bet(&self, payload: &BetPayload) -> RepositoryResult<Bet>;

    /// Overwrite all mutable fields of an existing bet.
    async fn update_bet(&self, id: BetId, payload: &BetPayload) -> RepositoryResult<Bet>;

    /// Permanently remove a bet.
    async fn delete_bet(&self, id: BetId) -> RepositoryResult<()>;
}
