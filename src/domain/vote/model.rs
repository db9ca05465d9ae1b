use chrono::{DateTime, Utc};

/// A recorded vote. Never mutated or deleted.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Vote {
    pub id: i32,
    pub voter_id: i32,
    pub candidate_id: i32,
    pub election_id: i32,
    pub cast_at: DateTime<Utc>,
}

/// A voter's request to vote for a candidate in an election
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Ballot {
    pub voter_id: i32,
    pub candidate_id: i32,
    pub election_id: i32,
}
