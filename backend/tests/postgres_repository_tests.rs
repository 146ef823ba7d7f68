//! Integration tests against a live Postgres.
//!
//! Skipped unless `DATABASE_URL` points at a reachable database. The tests
//! share the `bets` table, so each one works only with the ids it created.

#![cfg(feature = "postgres-repo")]

use bet_service::api::{BetId, BetPayload};
use bet_service::db::{services, BetRepository, PostgresConfig, RepositoryFactory};

async fn setup() -> Option<std::sync::Arc<bet_service::db::PostgresRepository>> {
    let config = match PostgresConfig::from_env() {
        Ok(config) => config,
        Err(_) => {
            eprintln!("DATABASE_URL not set; skipping Postgres test");
            return None;
        }
    };
    Some(
        RepositoryFactory::create_postgres(&config)
            .await
            .expect("Postgres repository should initialize"),
    )
}

fn payload(player_id: i32, game_id: i32, amount: f64) -> BetPayload {
    BetPayload::new(player_id, game_id, amount).unwrap()
}

#[tokio::test]
async fn test_health_check() {
    let Some(repo) = setup().await else { return };
    assert!(repo.health_check().await.unwrap());
    assert!(repo.is_healthy().await);
}

#[tokio::test]
async fn test_crud_lifecycle() {
    let Some(repo) = setup().await else { return };
    let repo = repo.as_ref();

    let created = services::create_bet(repo, &payload(1, 2, 10.5)).await.unwrap();
    assert_eq!(created.payload(), payload(1, 2, 10.5));

    let fetched = services::get_bet(repo, created.id).await.unwrap();
    assert_eq!(fetched, created);

    let updated = services::update_bet(repo, created.id, &payload(1, 2, 99.0))
        .await
        .unwrap();
    assert_eq!(updated.id, created.id);
    assert_eq!(updated.amount, 99.0);

    let listed = services::list_bets(repo).await.unwrap();
    assert!(listed.contains(&updated));

    services::delete_bet(repo, created.id).await.unwrap();
    assert!(services::get_bet(repo, created.id).await.unwrap_err().is_not_found());
    assert!(services::delete_bet(repo, created.id).await.unwrap_err().is_not_found());
}

#[tokio::test]
async fn test_missing_id_is_not_found() {
    let Some(repo) = setup().await else { return };
    let id = BetId::new(i32::MAX);

    assert!(repo.get_bet(id).await.unwrap_err().is_not_found());
    assert!(repo
        .update_bet(id, &payload(1, 1, 1.0))
        .await
        .unwrap_err()
        .is_not_found());
    assert!(repo.delete_bet(id).await.unwrap_err().is_not_found());
}

#[tokio::test]
async fn test_connections_are_returned_to_pool() {
    let Some(repo) = setup().await else { return };

    for _ in 0..(repo.get_pool_stats().max_size * 2) {
        let _ = repo.get_bet(BetId::new(i32::MAX)).await;
    }

    let stats = repo.get_pool_stats();
    assert_eq!(stats.connections_in_use, 0);
    assert!(stats.total_queries >= u64::from(stats.max_size) * 2);
}
