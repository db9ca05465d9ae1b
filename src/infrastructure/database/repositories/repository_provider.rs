//! SeaORM implementation of RepositoryProvider

use sea_orm::DatabaseConnection;

use crate::domain::candidate::CandidateRepository;
use crate::domain::category::CategoryRepository;
use crate::domain::election::ElectionRepository;
use crate::domain::repositories::RepositoryProvider;
use crate::domain::user::UserRepository;
use crate::domain::vote::VoteRepository;

use super::candidate_repository::SeaOrmCandidateRepository;
use super::category_repository::SeaOrmCategoryRepository;
use super::election_repository::SeaOrmElectionRepository;
use super::user_repository::SeaOrmUserRepository;
use super::vote_repository::SeaOrmVoteRepository;

/// Unified repository provider backed by SeaORM.
///
/// Holds one connection pool and exposes per-aggregate repository accessors.
///
/// ```ignore
/// let repos = SeaOrmRepositoryProvider::new(db.clone());
/// let election = repos.elections().find_by_id(1).await?;
/// let tally = repos.votes().tally(&election).await?;
/// ```
pub struct SeaOrmRepositoryProvider {
    users: SeaOrmUserRepository,
    categories: SeaOrmCategoryRepository,
    candidates: SeaOrmCandidateRepository,
    elections: SeaOrmElectionRepository,
    votes: SeaOrmVoteRepository,
}

impl SeaOrmRepositoryProvider {
    pub fn new(db: DatabaseConnection) -> Self {
        Self {
            users: SeaOrmUserRepository::new(db.clone()),
            categories: SeaOrmCategoryRepository::new(db.clone()),
            candidates: SeaOrmCandidateRepository::new(db.clone()),
            elections: SeaOrmElectionRepository::new(db.clone()),
            votes: SeaOrmVoteRepository::new(db),
        }
    }
}

impl RepositoryProvider for SeaOrmRepositoryProvider {
    fn users(&self) -> &dyn UserRepository {
        &self.users
    }

    fn categories(&self) -> &dyn CategoryRepository {
        &self.categories
    }

    fn candidates(&self) -> &dyn CandidateRepository {
        &self.candidates
    }

    fn elections(&self) -> &dyn ElectionRepository {
        &self.elections
    }

    fn votes(&self) -> &dyn VoteRepository {
        &self.votes
    }
}
