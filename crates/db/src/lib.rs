//! Database layer with `SeaORM` entities and repositories.
//!
//! This crate provides:
//! - `SeaORM` entity definitions for the `core`, `accounting`, `business`
//!   and `audit` schemas
//! - Repository abstractions for data access
//! - Database migrations

pub mod entities;
pub mod migration;
pub mod repositories;

pub use repositories::*;

use std::sync::Arc;
use std::time::Duration;

use sea_orm::{ConnectOptions, Database, DatabaseConnection, DbErr};
use sgbooks_shared::config::DatabaseConfig;

/// Shared handle to the connection pool held by repositories and managers.
///
/// `DatabaseConnection` is not `Clone` when `SeaORM`'s `mock` feature is on.
pub type DbConn = Arc<DatabaseConnection>;

/// Establishes a pooled connection using the `[database]` config section.
///
/// # Errors
///
/// Returns an error if the connection cannot be established.
pub async fn connect(config: &DatabaseConfig) -> Result<DatabaseConnection, DbErr> {
    tracing::info!(
        host = %config.host,
        port = config.port,
        database = %config.database,
        "Connecting to database"
    );
    Database::connect(connect_options(config)).await
}

/// Establishes a connection from a raw URL with default pool settings.
///
/// # Errors
///
/// Returns an error if the connection cannot be established.
pub async fn connect_url(database_url: &str) -> Result<DatabaseConnection, DbErr> {
    Database::connect(database_url).await
}

/// Builds pool options from the `[database]` config section.
#[must_use]
pub fn connect_options(config: &DatabaseConfig) -> ConnectOptions {
    let mut options = ConnectOptions::new(config.url());
    options
        .min_connections(config.pool_min_size)
        .max_connections(config.pool_max_size.max(config.pool_min_size))
        .max_lifetime(Duration::from_secs(config.pool_recycle_seconds))
        .sqlx_logging(config.echo_sql);
    options
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_connect_options_from_config() {
        let config = DatabaseConfig {
            pool_min_size: 3,
            pool_max_size: 8,
            pool_recycle_seconds: 120,
            ..DatabaseConfig::default()
        };
        let options = connect_options(&config);
        assert_eq!(options.get_min_connections(), Some(3));
        assert_eq!(options.get_max_connections(), Some(8));
        assert_eq!(options.get_max_lifetime(), Some(Duration::from_secs(120)));
        assert_eq!(
            options.get_url(),
            "postgres://sgbooks_user@localhost:5432/sgbooks"
        );
    }

    #[test]
    fn test_max_connections_never_below_min() {
        let config = DatabaseConfig {
            pool_min_size: 5,
            pool_max_size: 2,
            ..DatabaseConfig::default()
        };
        assert_eq!(connect_options(&config).get_max_connections(), Some(5));
    }
}
