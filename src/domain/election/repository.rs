//! Election repository interface

use async_trait::async_trait;

use super::model::{Election, NewElection};
use crate::domain::DomainResult;

#[async_trait]
pub trait ElectionRepository: Send + Sync {
    /// Insert an election after checking, in the same transaction, that no
    /// election in its category overlaps the window (`DomainError::Conflict`).
    async fn schedule(&self, election: NewElection) -> DomainResult<Election>;

    async fn find_by_id(&self, id: i32) -> DomainResult<Option<Election>>;

    /// All elections ordered by id. Rows with corrupt timestamps are logged
    /// and left out.
    async fn list(&self) -> DomainResult<Vec<Election>>;
}
