//! Vote ledger service
//!
//! Resolves the target election, delegates the atomic admission + insert to
//! the vote repository and retries transient lock contention.

use std::sync::Arc;

use chrono::{DateTime, Utc};
use tracing::{info, warn};

use crate::domain::election::current_election;
use crate::domain::{
    Ballot, Candidate, DomainError, DomainResult, Election, RepositoryProvider, Vote,
    VoteRejection,
};
use crate::shared::retry::{retry_with_backoff, RetryConfig};

/// What a voter sees: the current election, its candidates and whether
/// the voter has already voted in it.
#[derive(Debug, Clone)]
pub struct BallotView {
    pub election: Option<Election>,
    pub candidates: Vec<Candidate>,
    pub has_voted: bool,
}

pub struct VoteLedger {
    repos: Arc<dyn RepositoryProvider>,
    retry: RetryConfig,
}

impl VoteLedger {
    pub fn new(repos: Arc<dyn RepositoryProvider>, retry: RetryConfig) -> Self {
        Self { repos, retry }
    }

    async fn current_election(&self, now: DateTime<Utc>) -> DomainResult<Option<Election>> {
        let elections = self.repos.elections().list().await?;
        Ok(current_election(now, &elections).cloned())
    }

    /// Record a vote. Without an explicit election the one open at `now`
    /// is used.
    pub async fn cast_vote(
        &self,
        voter_id: i32,
        candidate_id: i32,
        election_id: Option<i32>,
        now: DateTime<Utc>,
    ) -> DomainResult<Vote> {
        let election_id = match election_id {
            Some(id) => id,
            None => match self.current_election(now).await? {
                Some(election) => election.id,
                None => return Err(self.rejected(voter_id, VoteRejection::ElectionNotActive)),
            },
        };

        let ballot = Ballot {
            voter_id,
            candidate_id,
            election_id,
        };

        let result = retry_with_backoff(
            self.retry.clone(),
            || self.repos.votes().cast(ballot, now),
            DomainError::is_transient,
            "cast_vote",
        )
        .await;

        match result {
            Ok(vote) => {
                metrics::counter!("votes_cast_total").increment(1);
                info!(voter_id, election_id, candidate_id, "Vote cast");
                Ok(vote)
            }
            Err(DomainError::VoteRejected(reason)) => Err(self.rejected(voter_id, reason)),
            Err(e) => Err(e),
        }
    }

    fn rejected(&self, voter_id: i32, reason: VoteRejection) -> DomainError {
        metrics::counter!("votes_rejected_total", "reason" => reason.code()).increment(1);
        warn!(voter_id, reason = reason.code(), "Vote rejected");
        DomainError::VoteRejected(reason)
    }

    /// Ballot for the voter at `now`.
    pub async fn ballot(&self, voter_id: i32, now: DateTime<Utc>) -> DomainResult<BallotView> {
        let Some(election) = self.current_election(now).await? else {
            return Ok(BallotView {
                election: None,
                candidates: Vec::new(),
                has_voted: false,
            });
        };

        let candidates = self
            .repos
            .candidates()
            .list_by_category(election.category.id)
            .await?;
        let has_voted = self.repos.votes().has_voted(voter_id, election.id).await?;

        Ok(BallotView {
            election: Some(election),
            candidates,
            has_voted,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::{NewCandidate, NewUser, UserRole};
    use crate::infrastructure::database::repositories::SeaOrmRepositoryProvider;
    use crate::infrastructure::database::{test_connection, test_file_connection};
    use sea_orm::DatabaseConnection;
    use crate::application::ElectionService;
    use crate::shared::time::LocalZone;
    use chrono::TimeZone;

    struct Setup {
        ledger: VoteLedger,
        repos: Arc<dyn RepositoryProvider>,
        voter: i32,
        alice: i32,
        bob: i32,
    }

    /// Election 09:00-11:00 local (+05:30) for "president", candidates Alice, Bob.
    async fn setup() -> Setup {
        setup_on(test_connection().await).await
    }

    async fn setup_on(db: DatabaseConnection) -> Setup {
        let repos: Arc<dyn RepositoryProvider> = Arc::new(SeaOrmRepositoryProvider::new(db));
        let elections = ElectionService::new(repos.clone(), LocalZone::parse("+05:30").unwrap());
        let election = elections
            .schedule("president", "2024-03-01T09:00", "2024-03-01T11:00")
            .await
            .unwrap();

        let mut ids = Vec::new();
        for name in ["Alice", "Bob"] {
            let c = repos
                .candidates()
                .create(NewCandidate {
                    name: name.into(),
                    category_id: election.category.id,
                    photo: None,
                })
                .await
                .unwrap();
            ids.push(c.id);
        }

        let voter = repos
            .users()
            .create(NewUser {
                name: "Voter".into(),
                email: "voter@example.com".into(),
                username: "voter".into(),
                password_hash: "hash".into(),
                role: UserRole::Voter,
                id_number: Some("1".into()),
            })
            .await
            .unwrap();

        Setup {
            ledger: VoteLedger::new(repos.clone(), RetryConfig::default()),
            repos,
            voter: voter.id,
            alice: ids[0],
            bob: ids[1],
        }
    }

    fn local(hour: u32) -> DateTime<Utc> {
        // +05:30
        Utc.with_ymd_and_hms(2024, 3, 1, hour, 0, 0).unwrap() - chrono::Duration::minutes(330)
    }

    #[tokio::test]
    async fn cast_within_local_window_succeeds() {
        let s = setup().await;
        let vote = s.ledger.cast_vote(s.voter, s.alice, None, local(10)).await.unwrap();
        assert_eq!(vote.candidate_id, s.alice);
    }

    #[tokio::test]
    async fn cast_after_local_window_is_not_active() {
        let s = setup().await;
        let err = s.ledger.cast_vote(s.voter, s.alice, None, local(12)).await.unwrap_err();
        assert!(matches!(
            err,
            DomainError::VoteRejected(VoteRejection::ElectionNotActive)
        ));
    }

    #[tokio::test]
    async fn second_cast_is_already_voted() {
        let s = setup().await;
        let first = s.ledger.cast_vote(s.voter, s.alice, None, local(10)).await.unwrap();
        let err = s
            .ledger
            .cast_vote(s.voter, s.bob, Some(first.election_id), local(10))
            .await
            .unwrap_err();
        assert!(matches!(
            err,
            DomainError::VoteRejected(VoteRejection::AlreadyVoted)
        ));
    }

    #[tokio::test]
    async fn ballot_reflects_vote_state() {
        let s = setup().await;

        let before = s.ledger.ballot(s.voter, local(10)).await.unwrap();
        assert!(before.election.is_some());
        assert_eq!(before.candidates.len(), 2);
        assert!(!before.has_voted);

        s.ledger.cast_vote(s.voter, s.bob, None, local(10)).await.unwrap();
        assert!(s.ledger.ballot(s.voter, local(10)).await.unwrap().has_voted);

        let closed = s.ledger.ballot(s.voter, local(12)).await.unwrap();
        assert!(closed.election.is_none());
        assert!(closed.candidates.is_empty());
    }

    #[tokio::test(flavor = "multi_thread", worker_threads = 8)]
    async fn concurrent_voters_on_pooled_file_db_are_all_recorded() {
        let (db, path) = test_file_connection().await;
        let s = Arc::new(setup_on(db.clone()).await);

        let mut voters = Vec::new();
        for i in 0..20 {
            let u = s
                .repos
                .users()
                .create(NewUser {
                    name: format!("Voter {}", i),
                    email: format!("voter{}@example.com", i),
                    username: format!("voter{}", i),
                    password_hash: "hash".into(),
                    role: UserRole::Voter,
                    id_number: Some(format!("V-{}", i)),
                })
                .await
                .unwrap();
            voters.push(u.id);
        }

        let tasks: Vec<_> = voters
            .into_iter()
            .enumerate()
            .map(|(i, voter)| {
                let s = s.clone();
                let candidate = if i % 2 == 0 { s.alice } else { s.bob };
                tokio::spawn(async move { s.ledger.cast_vote(voter, candidate, None, local(10)).await })
            })
            .collect();

        let mut election_id = None;
        for task in tasks {
            let vote = task.await.unwrap().unwrap();
            election_id = Some(vote.election_id);
        }

        let election_id = election_id.unwrap();
        assert_eq!(s.repos.votes().count_for_election(election_id).await.unwrap(), 20);

        db.close().await.unwrap();
        let _ = std::fs::remove_file(path);
    }
}
