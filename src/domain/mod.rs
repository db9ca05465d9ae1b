pub mod candidate;
pub mod category;
pub mod election;
pub mod ports;
pub mod repositories;
pub mod user;
pub mod vote;

// Re-export commonly used types
pub use candidate::{Candidate, CandidateRepository, NewCandidate};
pub use category::{Category, CategoryRepository};
pub use election::{Election, ElectionRepository, ElectionWindow, NewElection};
pub use ports::PhotoStore;
pub use repositories::{DomainResult, RepositoryProvider};
pub use user::{NewUser, User, UserRepository, UserRole};
pub use vote::{Ballot, Tally, TallyEntry, Vote, VoteRejection, VoteRepository};

// Re-export DomainError from shared for convenience
pub use crate::shared::errors::DomainError;
