//! Ballot admission rules
//!
//! Preconditions are evaluated in a fixed order and the first failure wins:
//! the election must be open, the voter must not have voted in it yet, and
//! the candidate must run in the election's category.

use chrono::{DateTime, Utc};
use thiserror::Error;

use crate::domain::candidate::Candidate;
use crate::domain::election::Election;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum VoteRejection {
    #[error("No active election for this ballot")]
    ElectionNotActive,

    #[error("Voter has already voted in this election")]
    AlreadyVoted,

    #[error("Candidate is not running in this election")]
    InvalidCandidate,
}

impl VoteRejection {
    /// Stable label for metrics and API payloads
    pub fn code(&self) -> &'static str {
        match self {
            Self::ElectionNotActive => "election_not_active",
            Self::AlreadyVoted => "already_voted",
            Self::InvalidCandidate => "invalid_candidate",
        }
    }
}

/// Decide whether a ballot may be recorded.
///
/// `election` and `candidate` are `None` when the referenced row does not
/// exist. `already_voted` reflects the ledger for `(voter, election)`.
pub fn check_ballot(
    now: DateTime<Utc>,
    election: Option<&Election>,
    already_voted: bool,
    candidate: Option<&Candidate>,
) -> Result<(), VoteRejection> {
    let election = match election {
        Some(e) if e.is_open_at(now) => e,
        _ => return Err(VoteRejection::ElectionNotActive),
    };

    if already_voted {
        return Err(VoteRejection::AlreadyVoted);
    }

    match candidate {
        Some(c) if c.runs_in(election.category.id) => Ok(()),
        _ => Err(VoteRejection::InvalidCandidate),
    }
}
