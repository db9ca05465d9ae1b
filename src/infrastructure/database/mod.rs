pub mod entities;
pub mod migrator;
pub mod repositories;

use std::time::Duration;

use sea_orm::{ConnectOptions, Database, DatabaseConnection};
use serde::{Deserialize, Serialize};
use tracing::info;

pub const DEFAULT_DATABASE_URL: &str = "sqlite://./elections.db?mode=rwc";

/// Connection pool tuning, `[database.pool]` in the config file
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct PoolConfig {
    pub max_connections: u32,
    pub min_connections: u32,
    pub connect_timeout_secs: u64,
    pub acquire_timeout_secs: u64,
    /// Log every SQL statement at debug level
    pub sqlx_logging: bool,
}

impl Default for PoolConfig {
    fn default() -> Self {
        Self {
            max_connections: 5,
            min_connections: 1,
            connect_timeout_secs: 10,
            acquire_timeout_secs: 10,
            sqlx_logging: false,
        }
    }
}

/// Database configuration
#[derive(Debug, Clone)]
pub struct DatabaseConfig {
    /// Database URL (e.g., "sqlite://./elections.db?mode=rwc")
    pub url: String,
    pub pool: PoolConfig,
}

impl Default for DatabaseConfig {
    fn default() -> Self {
        Self {
            url: DEFAULT_DATABASE_URL.to_string(),
            pool: PoolConfig::default(),
        }
    }
}

impl DatabaseConfig {
    /// Create config for SQLite
    pub fn sqlite(path: &str) -> Self {
        Self {
            url: format!("sqlite://{}?mode=rwc", path),
            pool: PoolConfig::default(),
        }
    }

    /// Private in-memory database on a single connection
    pub fn in_memory() -> Self {
        Self {
            url: "sqlite::memory:".to_string(),
            pool: PoolConfig {
                max_connections: 1,
                min_connections: 1,
                ..PoolConfig::default()
            },
        }
    }
}

/// Initialize database connection
pub async fn init_database(config: &DatabaseConfig) -> Result<DatabaseConnection, sea_orm::DbErr> {
    info!("Connecting to database: {}", config.url);

    let mut opts = ConnectOptions::new(config.url.clone());
    opts.max_connections(config.pool.max_connections)
        .min_connections(config.pool.min_connections)
        .connect_timeout(Duration::from_secs(config.pool.connect_timeout_secs))
        .acquire_timeout(Duration::from_secs(config.pool.acquire_timeout_secs))
        .sqlx_logging(config.pool.sqlx_logging);

    let db = Database::connect(opts).await?;
    info!(
        max_connections = config.pool.max_connections,
        "Database connected successfully"
    );
    Ok(db)
}

/// Fresh migrated in-memory database for tests
#[cfg(test)]
pub(crate) async fn test_connection() -> DatabaseConnection {
    use sea_orm_migration::MigratorTrait;

    let db = init_database(&DatabaseConfig::in_memory())
        .await
        .expect("in-memory database");
    migrator::Migrator::up(&db, None)
        .await
        .expect("migrations");
    db
}

/// Fresh migrated SQLite file with a multi-connection pool, for tests that
/// need real contention between connections. Remove the returned path when
/// done.
#[cfg(test)]
pub(crate) async fn test_file_connection() -> (DatabaseConnection, std::path::PathBuf) {
    use sea_orm_migration::MigratorTrait;

    let path = std::env::temp_dir().join(format!("elections-{}.db", uuid::Uuid::new_v4()));
    let mut config = DatabaseConfig::sqlite(&path.to_string_lossy());
    config.pool.max_connections = 8;

    let db = init_database(&config).await.expect("file database");
    migrator::Migrator::up(&db, None)
        .await
        .expect("migrations");
    (db, path)
}
