//! Vote ledger repository interface

use async_trait::async_trait;
use chrono::{DateTime, Utc};

use super::model::{Ballot, Vote};
use super::tally::TallyEntry;
use crate::domain::election::Election;
use crate::domain::DomainResult;

#[async_trait]
pub trait VoteRepository: Send + Sync {
    /// Atomically admit and record a ballot.
    ///
    /// The lookups behind [`check_ballot`](super::check_ballot) and the insert
    /// run in one transaction. A unique-constraint violation on
    /// `(voter_id, election_id)` is reported as
    /// `DomainError::VoteRejected(VoteRejection::AlreadyVoted)`.
    async fn cast(&self, ballot: Ballot, now: DateTime<Utc>) -> DomainResult<Vote>;

    async fn has_voted(&self, voter_id: i32, election_id: i32) -> DomainResult<bool>;

    async fn count_for_election(&self, election_id: i32) -> DomainResult<u64>;

    /// Per-candidate counts for every candidate in the election's category,
    /// ordered by candidate id.
    async fn tally(&self, election: &Election) -> DomainResult<Vec<TallyEntry>>;
}
