//! Database repository implementations
//!
//! Per-aggregate SeaORM repositories + unified RepositoryProvider.

pub mod candidate_repository;
pub mod category_repository;
pub mod election_repository;
pub mod repository_provider;
pub mod user_repository;
pub mod vote_repository;

pub use repository_provider::SeaOrmRepositoryProvider;

use sea_orm::{ConnectionTrait, DatabaseTransaction, DbBackend, DbErr, SqlErr, Statement};

use crate::domain::DomainError;

pub(crate) fn db_err(e: DbErr) -> DomainError {
    DomainError::Storage(e.to_string())
}

/// Take SQLite's write lock as the first statement of `txn`.
///
/// A deferred transaction that reads first and writes later fails with
/// `SQLITE_BUSY` on the lock upgrade without waiting on `busy_timeout`.
/// Acquiring the lock before any read waits instead, so concurrent
/// read-then-write transactions run one after another.
pub(crate) async fn claim_write_lock(txn: &DatabaseTransaction, table: &str) -> Result<(), DbErr> {
    if txn.get_database_backend() != DbBackend::Sqlite {
        return Ok(());
    }
    txn.execute(Statement::from_string(
        DbBackend::Sqlite,
        format!("UPDATE {table} SET id = id WHERE 0"),
    ))
    .await?;
    Ok(())
}

pub(crate) fn is_unique_violation(e: &DbErr) -> bool {
    matches!(e.sql_err(), Some(SqlErr::UniqueConstraintViolation(_)))
        || e.to_string().contains("UNIQUE")
}
