//! Postgres repository implementation using Diesel.
//!
//! ## Features
//!
//! - Connection pooling with r2d2
//! - One pooled connection per operation, returned to the pool when dropped
//! - Connection health monitoring
//! - Automatic creation of the `bets` table at startup
//!
//! ## Configuration
//!
//! Environment variables:
//! - `DATABASE_URL` or `PG_DATABASE_URL`: Connection string (required)
//! - `PG_POOL_MAX`: Maximum pool size (default: 10)
//! - `PG_POOL_MIN`: Minimum pool size (default: 1)
//! - `PG_CONN_TIMEOUT_SEC`: Connection timeout in seconds (default: 30)
//! - `PG_IDLE_TIMEOUT_SEC`: Idle connection timeout in seconds (default: 600)

use async_trait::async_trait;
use diesel::pg::PgConnection;
use diesel::prelude::*;
use diesel::r2d2::{ConnectionManager, Pool};
use diesel::sql_query;
use diesel_migrations::{embed_migrations, EmbeddedMigrations, MigrationHarness};
use log::{debug, info};
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;
use std::time::{Duration, Instant};
use tokio::task;

use crate::api::{Bet, BetId, BetPayload};
use crate::db::repository::{BetRepository, ErrorContext, RepositoryError, RepositoryResult};

mod models;
mod schema;

use models::{BetChangeset, BetRow, NewBetRow};
use schema::bets;

type PgPool = Pool<ConnectionManager<PgConnection>>;

const MIGRATIONS: EmbeddedMigrations = embed_migrations!("src/db/repositories/postgres/migrations");

/// Configuration for connecting to Postgres.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PostgresConfig {
    /// Database connection URL
    pub database_url: String,
    /// Maximum number of connections in the pool
    pub max_pool_size: u32,
    /// Minimum number of connections in the pool
    pub min_pool_size: u32,
    /// Connection timeout in seconds
    pub connection_timeout_sec: u64,
    /// Idle connection timeout in seconds
    pub idle_timeout_sec: u64,
}

impl Default for PostgresConfig {
    fn default() -> Self {
        Self {
            database_url: String::new(),
            max_pool_size: 10,
            min_pool_size: 1,
            connection_timeout_sec: 30,
            idle_timeout_sec: 600,
        }
    }
}

impl PostgresConfig {
    /// Create configuration from environment variables.
    ///
    /// See the module documentation for the variables read and their defaults.
    pub fn from_env() -> Result<Self, String> {
        let database_url = std::env::var("DATABASE_URL")
            .or_else(|_| std::env::var("PG_DATABASE_URL"))
            .map_err(|_| "DATABASE_URL or PG_DATABASE_URL must be set".to_string())?;

        let defaults = Self::default();

        let max_pool_size = std::env::var("PG_POOL_MAX")
            .ok()
            .and_then(|v| v.parse::<u32>().ok())
            .unwrap_or(defaults.max_pool_size);

        let min_pool_size = std::env::var("PG_POOL_MIN")
            .ok()
            .and_then(|v| v.parse::<u32>().ok())
            .unwrap_or(defaults.min_pool_size);

        let connection_timeout_sec = std::env::var("PG_CONN_TIMEOUT_SEC")
            .ok()
            .and_then(|v| v.parse::<u64>().ok())
            .unwrap_or(defaults.connection_timeout_sec);

        let idle_timeout_sec = std::env::var("PG_IDLE_TIMEOUT_SEC")
            .ok()
            .and_then(|v| v.parse::<u64>().ok())
            .unwrap_or(defaults.idle_timeout_sec);

        Ok(Self {
            database_url,
            max_pool_size,
            min_pool_size,
            connection_timeout_sec,
            idle_timeout_sec,
        })
    }

    /// Create a new configuration with a database URL.
    pub fn with_url(database_url: impl Into<String>) -> Self {
        Self {
            database_url: database_url.into(),
            ..Default::default()
        }
    }
}

/// Pool health statistics.
#[derive(Debug, Clone, Default)]
pub struct PoolStats {
    /// Number of connections currently in use
    pub connections_in_use: u32,
    /// Number of idle connections
    pub idle_connections: u32,
    /// Total number of connections in the pool
    pub total_connections: u32,
    /// Maximum pool size
    pub max_size: u32,
    /// Total queries executed
    pub total_queries: u64,
    /// Total failed queries
    pub failed_queries: u64,
}

/// Diesel-backed bet repository for Postgres.
#[derive(Clone, Debug)]
pub struct PostgresRepository {
    pool: PgPool,
    config: PostgresConfig,
    total_queries: Arc<AtomicU64>,
    failed_queries: Arc<AtomicU64>,
}

impl PostgresRepository {
    /// Create a new repository and make sure the `bets` table exists.
    ///
    /// # Errors
    /// Returns `ConnectionError` if the pool cannot be built and
    /// `InternalError` if the schema bootstrap fails.
    pub fn new(config: PostgresConfig) -> RepositoryResult<Self> {
        let manager = ConnectionManager::<PgConnection>::new(&config.database_url);

        let pool = Pool::builder()
            .max_size(config.max_pool_size)
            .min_idle(Some(config.min_pool_size))
            .connection_timeout(Duration::from_secs(config.connection_timeout_sec))
            .idle_timeout(Some(Duration::from_secs(config.idle_timeout_sec)))
            .test_on_check_out(true)
            .build(manager)
            .map_err(|e| {
                RepositoryError::connection_with_context(
                    e.to_string(),
                    ErrorContext::new("create_pool")
                        .with_details(format!("max_size={}", config.max_pool_size)),
                )
            })?;

        {
            let mut conn = pool.get().map_err(|e| {
                RepositoryError::connection_with_context(
                    e.to_string(),
                    ErrorContext::new("get_connection_for_migrations"),
                )
            })?;
            Self::run_migrations(&mut conn)?;
        }

        info!(
            "Postgres repository ready (max_pool_size={}, min_pool_size={})",
            config.max_pool_size, config.min_pool_size
        );

        Ok(Self {
            pool,
            config,
            total_queries: Arc::new(AtomicU64::new(0)),
            failed_queries: Arc::new(AtomicU64::new(0)),
        })
    }

    /// Run pending schema migrations.
    fn run_migrations(conn: &mut PgConnection) -> RepositoryResult<()> {
        let applied = conn.run_pending_migrations(MIGRATIONS).map_err(|e| {
            RepositoryError::internal_with_context(
                format!("Migration failed: {}", e),
                ErrorContext::new("run_migrations"),
            )
        })?;
        for version in applied {
            info!("Applied migration {}", version);
        }
        Ok(())
    }

    /// Run `f` on a connection checked out for this call only.
    ///
    /// The pooled connection is returned when the guard drops, whether `f`
    /// succeeds, fails or panics. Diesel is synchronous, so the work runs on the
    /// blocking thread pool. Failures are not retried.
    async fn with_conn<T, F>(&self, operation: &'static str, f: F) -> RepositoryResult<T>
    where
        T: Send + 'static,
        F: FnOnce(&mut PgConnection) -> RepositoryResult<T> + Send + 'static,
    {
        let pool = self.pool.clone();
        let total_queries = self.total_queries.clone();
        let failed_queries = self.failed_queries.clone();

        task::spawn_blocking(move || {
            let mut conn = pool.get().map_err(|e| {
                failed_queries.fetch_add(1, Ordering::Relaxed);
                RepositoryError::connection_with_context(
                    e.to_string(),
                    ErrorContext::new("get_connection").with_details(operation),
                )
            })?;

            total_queries.fetch_add(1, Ordering::Relaxed);
            let started = Instant::now();
            let result = f(&mut conn);
            debug!("{} finished in {:?}", operation, started.elapsed());

            if result.is_err() {
                failed_queries.fetch_add(1, Ordering::Relaxed);
            }
            result
        })
        .await
        .map_err(|e| {
            RepositoryError::internal_with_context(
                format!("Task join error: {}", e),
                ErrorContext::new("spawn_blocking").with_details(operation),
            )
        })?
    }

    /// Get pool health statistics.
    pub fn get_pool_stats(&self) -> PoolStats {
        let state = self.pool.state();
        PoolStats {
            connections_in_use: state.connections - state.idle_connections,
            idle_connections: state.idle_connections,
            total_connections: state.connections,
            max_size: self.config.max_pool_size,
            total_queries: self.total_queries.load(Ordering::Relaxed),
            failed_queries: self.failed_queries.load(Ordering::Relaxed),
        }
    }

    /// Check if the database connection is healthy.
    pub async fn is_healthy(&self) -> bool {
        self.health_check().await.unwrap_or(false)
    }
}

fn map_diesel_error(err: diesel::result::Error, operation: &str) -> RepositoryError {
    RepositoryError::from(err).with_operation(operation)
}

#[async_trait]
impl BetRepository for PostgresRepository {
    async fn health_check(&self) -> RepositoryResult<bool> {
        self.with_conn("health_check", |conn| {
            sql_query("SELECT 1")
                .execute(conn)
                .map(|_| true)
                .map_err(|e| map_diesel_error(e, "health_check"))
        })
        .await
    }

    async fn list_bets(&self) -> RepositoryResult<Vec<Bet>> {
        self.with_conn("list_bets", |conn| {
            let rows = bets::table
                .select(BetRow::as_select())
                .order(bets::id.asc())
                .load::<BetRow>(conn)
                .map_err(|e| map_diesel_error(e, "list_bets"))?;
            Ok(rows.into_iter().map(Bet::from).collect())
        })
        .await
    }

    async fn get_bet(&self, id: BetId) -> RepositoryResult<Bet> {
        self.with_conn("get_bet", move |conn| {
            bets::table
                .find(id.value())
                .select(BetRow::as_select())
                .first::<BetRow>(conn)
                .optional()
                .map_err(|e| map_diesel_error(e, "get_bet").with_bet(id))?
                .map(Bet::from)
                .ok_or_else(|| RepositoryError::bet_not_found("get_bet", id))
        })
        .await
    }

    async fn create_bet(&self, payload: &BetPayload) -> RepositoryResult<Bet> {
        let row = NewBetRow::from(payload);
        self.with_conn("create_bet", move |conn| {
            diesel::insert_into(bets::table)
                .values(&row)
                .returning(BetRow::as_returning())
                .get_result::<BetRow>(conn)
                .map(Bet::from)
                .map_err(|e| map_diesel_error(e, "create_bet"))
        })
        .await
    }

    async fn update_bet(&self, id: BetId, payload: &BetPayload) -> RepositoryResult<Bet> {
        let changes = BetChangeset::from(payload);
        // Existence check and write are one UPDATE ... RETURNING statement.
        self.with_conn("update_bet", move |conn| {
            diesel::update(bets::table.find(id.value()))
                .set(&changes)
                .returning(BetRow::as_returning())
                .get_result::<BetRow>(conn)
                .optional()
                .map_err(|e| map_diesel_error(e, "update_bet").with_bet(id))?
                .map(Bet::from)
                .ok_or_else(|| RepositoryError::bet_not_found("update_bet", id))
        })
        .await
    }

    async fn delete_bet(&self, id: BetId) -> RepositoryResult<()> {
        self.with_conn("delete_bet", move |conn| {
            let deleted = diesel::delete(bets::table.find(id.value()))
                .execute(conn)
                .map_err(|e| map_diesel_error(e, "delete_bet").with_bet(id))?;
            if deleted == 0 {
                return Err(RepositoryError::bet_not_found("delete_bet", id));
            }
            Ok(())
        })
        .await
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_config_defaults() {
        let config = PostgresConfig::with_url("postgres://localhost/bets");
        assert_eq!(config.database_url, "postgres://localhost/bets");
        assert_eq!(config.max_pool_size, 10);
        assert_eq!(config.min_pool_size, 1);
        assert_eq!(config.connection_timeout_sec, 30);
        assert_eq!(config.idle_timeout_sec, 600);
    }

    #[test]
    fn test_new_fails_for_unreachable_database() {
        let mut config = PostgresConfig::with_url("postgres://nobody@127.0.0.1:1/none");
        config.connection_timeout_sec = 1;
        config.min_pool_size = 0;
        let err = PostgresRepository::new(config).unwrap_err();
        assert!(matches!(err, RepositoryError::ConnectionError { .. }));
    }
}
