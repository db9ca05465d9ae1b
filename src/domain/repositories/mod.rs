//! Repository traits for the domain layer
//!
//! - `RepositoryProvider`: unified access to all per-aggregate repositories
//! - `DomainResult`: standard result type for domain operations

use super::candidate::CandidateRepository;
use super::category::CategoryRepository;
use super::election::ElectionRepository;
use super::user::UserRepository;
use super::vote::VoteRepository;
use crate::shared::errors::DomainError;

/// Result type for domain operations
pub type DomainResult<T> = Result<T, DomainError>;

/// Provides access to all domain repositories.
///
/// ```ignore
/// async fn handle(repos: &dyn RepositoryProvider) {
///     let elections = repos.elections().list().await?;
///     let voted = repos.votes().has_voted(voter_id, election_id).await?;
/// }
/// ```
pub trait RepositoryProvider: Send + Sync {
    fn users(&self) -> &dyn UserRepository;
    fn categories(&self) -> &dyn CategoryRepository;
    fn candidates(&self) -> &dyn CandidateRepository;
    fn elections(&self) -> &dyn ElectionRepository;
    fn votes(&self) -> &dyn VoteRepository;
}
