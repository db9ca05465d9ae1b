//! Candidate repository interface

use async_trait::async_trait;

use super::model::{Candidate, NewCandidate};
use crate::domain::DomainResult;

#[async_trait]
pub trait CandidateRepository: Send + Sync {
    async fn create(&self, candidate: NewCandidate) -> DomainResult<Candidate>;

    async fn find_by_id(&self, id: i32) -> DomainResult<Option<Candidate>>;

    /// Candidates with exactly this display name, ordered by id
    async fn list_by_name(&self, name: &str) -> DomainResult<Vec<Candidate>>;

    /// All candidates, ordered by id
    async fn list(&self) -> DomainResult<Vec<Candidate>>;

    /// Candidates running in a category, ordered by id
    async fn list_by_category(&self, category_id: i32) -> DomainResult<Vec<Candidate>>;
}
