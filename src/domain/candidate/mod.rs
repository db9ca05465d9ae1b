//! Candidate aggregate

pub mod model;
pub mod repository;

pub use model::{Candidate, NewCandidate};
pub use repository::CandidateRepository;
