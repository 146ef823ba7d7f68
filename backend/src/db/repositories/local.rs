//! In-memory local repository implementation.
//!
//! Suitable for unit testing and local development. Bets live in a `BTreeMap`
//! keyed by id, so listing returns them in id order just like the Postgres
//! backend.

use async_trait::async_trait;
use parking_lot::RwLock;
use std::collections::BTreeMap;
use std::sync::Arc;

use crate::api::{Bet, BetId, BetPayload};
use crate::db::repository::{BetRepository, RepositoryError, RepositoryResult};

/// In-memory local repository.
///
/// Cloning shares the underlying storage.
///
/// # Example
/// ```
/// use bet_service::api::BetPayload;
/// use bet_service::db::repositories::LocalRepository;
/// use bet_service::db::repository::BetRepository;
///
/// # tokio::runtime::Runtime::new().unwrap().block_on(async {
/// let repo = LocalRepository::new();
/// let bet = repo.create_bet(&BetPayload::new(1, 2, 10.5).unwrap()).await.unwrap();
/// assert_eq!(bet.id.value(), 1);
/// assert_eq!(repo.bet_count(), 1);
/// # });
/// ```
#[derive(Clone, Default)]
pub struct LocalRepository {
    data: Arc<RwLock<LocalData>>,
}

struct LocalData {
    bets: BTreeMap<BetId, Bet>,
    // Like a SERIAL sequence: ids are never reused after deletion
    next_bet_id: i32,
    // Connection health
    is_healthy: bool,
}

impl Default for LocalData {
    fn default() -> Self {
        Self {
            bets: BTreeMap::new(),
            next_bet_id: 1,
            is_healthy: true,
        }
    }
}

impl LocalRepository {
    /// Create a new empty local repository.
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the health status for testing connection failures.
    ///
    /// While unhealthy, every operation fails with a connection error.
    pub fn set_healthy(&self, healthy: bool) {
        self.data.write().is_healthy = healthy;
    }

    /// Clear all data from the repository and restart the id sequence.
    pub fn clear(&self) {
        let mut data = self.data.write();
        *data = LocalData {
            is_healthy: data.is_healthy,
            ..Default::default()
        };
    }

    /// Get the number of bets stored.
    pub fn bet_count(&self) -> usize {
        self.data.read().bets.len()
    }

    /// Check if a bet exists.
    pub fn has_bet(&self, id: BetId) -> bool {
        self.data.read().bets.contains_key(&id)
    }

    fn ensure_healthy(data: &LocalData, operation: &str) -> RepositoryResult<()> {
        if data.is_healthy {
            Ok(())
        } else {
            Err(RepositoryError::connection("Local repository marked unhealthy")
                .with_operation(operation))
        }
    }
}

#[async_trait]
impl BetRepository for LocalRepository {
    async fn health_check(&self) -> RepositoryResult<bool> {
        Ok(self.data.read().is_healthy)
    }

    async fn list_bets(&self) -> RepositoryResult<Vec<Bet>> {
        let data = self.data.read();
        Self::ensure_healthy(&data, "list_bets")?;
        Ok(data.bets.values().cloned().collect())
    }

    async fn get_bet(&self, id: BetId) -> RepositoryResult<Bet> {
        let data = self.data.read();
        Self::ensure_healthy(&data, "get_bet")?;
        data.bets
            .get(&id)
            .cloned()
            .ok_or_else(|| RepositoryError::bet_not_found("get_bet", id))
    }

    async fn create_bet(&self, payload: &BetPayload) -> RepositoryResult<Bet> {
        let mut data = self.data.write();
        Self::ensure_healthy(&data, "create_bet")?;

        let id = BetId::new(data.next_bet_id);
        data.next_bet_id = data.next_bet_id.checked_add(1).ok_or_else(|| {
            RepositoryError::internal("bet id sequence exhausted").with_operation("create_bet")
        })?;

        let bet = Bet::from_payload(id, payload);
        data.bets.insert(id, bet.clone());
        Ok(bet)
    }

    async fn update_bet(&self, id: BetId, payload: &BetPayload) -> RepositoryResult<Bet> {
        let mut data = self.data.write();
        Self::ensure_healthy(&data, "update_bet")?;

        let bet = data
            .bets
            .get_mut(&id)
            .ok_or_else(|| RepositoryError::bet_not_found("update_bet", id))?;
        *bet = Bet::from_payload(id, payload);
        Ok(bet.clone())
    }

    async fn delete_bet(&self, id: BetId) -> RepositoryResult<()> {
        let mut data = self.data.write();
        Self::ensure_healthy(&data, "delete_bet")?;

        data.bets
            .remove(&id)
            .map(|_| ())
            .ok_or_else(|| RepositoryError::bet_not_found("delete_bet", id))
    }
}
