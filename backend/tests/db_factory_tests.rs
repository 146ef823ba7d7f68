//! Tests for repository selection from the environment and config files.

mod support;

use std::io::Write;
use std::str::FromStr;

use bet_service::db::{
    BetRepository, RepositoryConfig, RepositoryError, RepositoryFactory, RepositoryType,
};
use support::with_scoped_env;

#[test]
fn test_repository_type_parsing() {
    assert_eq!(RepositoryType::from_str("LOCAL").unwrap(), RepositoryType::Local);
    assert_eq!(RepositoryType::from_str("pg").unwrap(), RepositoryType::Postgres);
    assert!(RepositoryType::from_str("sqlite").is_err());
}

#[test]
fn test_repository_type_from_env_explicit() {
    let ty = with_scoped_env(&[("REPOSITORY_TYPE", Some("local"))], RepositoryType::from_env);
    assert_eq!(ty, RepositoryType::Local);

    let ty = with_scoped_env(&[("REPOSITORY_TYPE", Some("postgres"))], RepositoryType::from_env);
    assert_eq!(ty, RepositoryType::Postgres);
}

#[test]
fn test_repository_type_from_env_falls_back_to_local() {
    let ty = with_scoped_env(
        &[
            ("REPOSITORY_TYPE", None),
            ("DATABASE_URL", None),
            ("PG_DATABASE_URL", None),
        ],
        RepositoryType::from_env,
    );
    assert_eq!(ty, RepositoryType::Local);

    let ty = with_scoped_env(&[("REPOSITORY_TYPE", Some("nonsense"))], RepositoryType::from_env);
    assert_eq!(ty, RepositoryType::Local);
}

#[test]
fn test_database_url_implies_postgres() {
    let ty = with_scoped_env(
        &[
            ("REPOSITORY_TYPE", None),
            ("DATABASE_URL", Some("postgresql://localhost/bets")),
        ],
        RepositoryType::from_env,
    );
    assert_eq!(ty, RepositoryType::Postgres);
}

#[test]
fn test_config_parses_defaults() {
    let config = RepositoryConfig::from_toml_str(
        r#"
[repository]
type = "postgres"

[postgres]
database_url = "postgresql://localhost:5432/bets"
"#,
    )
    .unwrap();

    assert_eq!(config.repository_type().unwrap(), RepositoryType::Postgres);
    assert_eq!(config.postgres.database_url, "postgresql://localhost:5432/bets");
    assert_eq!(config.postgres.max_connections, 10);
    assert_eq!(config.postgres.min_connections, 1);
    assert_eq!(config.postgres.connect_timeout, 30);
    assert_eq!(config.postgres.idle_timeout, 600);
}

#[test]
fn test_config_rejects_missing_section() {
    let err = RepositoryConfig::from_toml_str("[postgres]\ndatabase_url = \"x\"\n").unwrap_err();
    assert!(matches!(err, RepositoryError::ConfigurationError { .. }));
}

#[test]
fn test_missing_config_file_is_configuration_error() {
    let dir = tempfile::tempdir().unwrap();
    let err = RepositoryConfig::from_file(dir.path().join("absent.toml")).unwrap_err();
    assert!(matches!(err, RepositoryError::ConfigurationError { .. }));
}

fn block_on<F: std::future::Future>(future: F) -> F::Output {
    tokio::runtime::Builder::new_current_thread()
        .build()
        .unwrap()
        .block_on(future)
}

const UNSET_BACKEND_ENV: [(&str, Option<&str>); 3] = [
    ("REPOSITORY_TYPE", None),
    ("DATABASE_URL", None),
    ("PG_DATABASE_URL", None),
];

#[test]
fn test_selected_in_env() {
    assert!(!with_scoped_env(&UNSET_BACKEND_ENV, RepositoryType::selected_in_env));
    assert!(with_scoped_env(
        &[("REPOSITORY_TYPE", Some("local"))],
        RepositoryType::selected_in_env
    ));
    assert!(with_scoped_env(
        &[("PG_DATABASE_URL", Some("postgresql://localhost/bets"))],
        RepositoryType::selected_in_env
    ));
}

#[test]
fn test_default_location_finds_packaged_config() {
    // Integration tests run from the package root, next to `repository.toml`.
    let path = RepositoryConfig::default_location().expect("repository.toml next to Cargo.toml");
    let config = RepositoryConfig::from_file(&path).unwrap();
    assert_eq!(config.repository_type().unwrap(), RepositoryType::Local);
}

#[test]
fn test_discover_uses_default_config_file() {
    let repo = with_scoped_env(&UNSET_BACKEND_ENV, || {
        block_on(RepositoryFactory::discover()).unwrap()
    });
    assert!(block_on(repo.health_check()).unwrap());
}

#[test]
fn test_discover_prefers_environment() {
    let repo = with_scoped_env(&[("REPOSITORY_TYPE", Some("local"))], || {
        block_on(RepositoryFactory::discover()).unwrap()
    });
    assert!(block_on(repo.list_bets()).unwrap().is_empty());
}

#[tokio::test]
async fn test_factory_from_local_config_file() {
    let mut file = tempfile::NamedTempFile::new().unwrap();
    writeln!(file, "[repository]\ntype = \"local\"").unwrap();

    let repo = RepositoryFactory::from_config_file(file.path()).await.unwrap();
    assert!(repo.health_check().await.unwrap());
    assert!(repo.list_bets().await.unwrap().is_empty());
}

#[tokio::test]
async fn test_factory_rejects_unknown_type_in_file() {
    let mut file = tempfile::NamedTempFile::new().unwrap();
    writeln!(file, "[repository]\ntype = \"mongo\"").unwrap();

    let result = RepositoryFactory::from_config_file(file.path()).await;
    assert!(matches!(
        result,
        Err(RepositoryError::ConfigurationError { .. })
    ));
}

#[cfg(feature = "postgres-repo")]
#[tokio::test]
async fn test_postgres_config_without_url_is_rejected() {
    let mut file = tempfile::NamedTempFile::new().unwrap();
    writeln!(file, "[repository]\ntype = \"postgres\"").unwrap();

    let result = RepositoryFactory::from_config_file(file.path()).await;
    assert!(matches!(
        result,
        Err(RepositoryError::ConfigurationError { .. })
    ));
}
