//! Tally service
//!
//! Results are always computed from the vote ledger on request.

use std::sync::Arc;

use chrono::{DateTime, Utc};
use tracing::warn;

use super::csv::render_csv;
use crate::domain::election::{active_elections, current_election};
use crate::domain::{
    Candidate, DomainError, DomainResult, Election, RepositoryProvider, Tally, User,
};

/// Candidate dashboard: own account, the matching candidate record and the
/// live tally of the election the candidate is running in.
#[derive(Debug, Clone)]
pub struct CandidateDashboard {
    pub user: User,
    pub candidate: Option<Candidate>,
    pub election: Option<Election>,
    pub tally: Option<Tally>,
}

pub struct TallyService {
    repos: Arc<dyn RepositoryProvider>,
}

impl TallyService {
    pub fn new(repos: Arc<dyn RepositoryProvider>) -> Self {
        Self { repos }
    }

    async fn tally_of(&self, election: Election) -> DomainResult<Tally> {
        let entries = self.repos.votes().tally(&election).await?;
        Ok(Tally { election, entries })
    }

    pub async fn tally(&self, election_id: i32) -> DomainResult<Tally> {
        let election = self
            .repos
            .elections()
            .find_by_id(election_id)
            .await?
            .ok_or_else(|| DomainError::not_found("Election", "id", election_id))?;
        self.tally_of(election).await
    }

    pub async fn results_csv(&self, election_id: i32) -> DomainResult<String> {
        Ok(render_csv(&self.tally(election_id).await?))
    }

    /// Tally of the election open at `now`, if any
    pub async fn current_results(&self, now: DateTime<Utc>) -> DomainResult<Option<Tally>> {
        let elections = self.repos.elections().list().await?;
        match current_election(now, &elections) {
            Some(election) => Ok(Some(self.tally_of(election.clone()).await?)),
            None => Ok(None),
        }
    }

    /// The candidate record is matched by display name. The election shown
    /// is the open one in the candidate's category, falling back to the
    /// overall current election.
    pub async fn candidate_dashboard(
        &self,
        user_id: i32,
        now: DateTime<Utc>,
    ) -> DomainResult<CandidateDashboard> {
        let user = self
            .repos
            .users()
            .find_by_id(user_id)
            .await?
            .ok_or_else(|| DomainError::not_found("User", "id", user_id))?;

        let matches = self.repos.candidates().list_by_name(&user.name).await?;
        let elections = self.repos.elections().list().await?;
        let open = active_elections(now, &elections);

        // Several candidates can share a display name. Prefer the lowest-id
        // one running in an open election, then the lowest id overall.
        let candidate = matches
            .iter()
            .find(|c| open.iter().any(|e| c.runs_in(e.category.id)))
            .or_else(|| matches.first())
            .cloned();
        if matches.len() > 1 {
            warn!(
                user_id,
                name = %user.name,
                matches = matches.len(),
                chosen = candidate.as_ref().map(|c| c.id),
                "Candidate account matches several candidate records"
            );
        }

        let election = candidate
            .as_ref()
            .and_then(|c| open.iter().copied().find(|e| c.runs_in(e.category.id)))
            .or_else(|| current_election(now, &elections))
            .cloned();

        let tally = match &election {
            Some(e) => Some(self.tally_of(e.clone()).await?),
            None => None,
        };

        Ok(CandidateDashboard {
            user,
            candidate,
            election,
            tally,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::application::{ElectionService, VoteLedger};
    use crate::domain::{NewCandidate, NewUser, UserRole};
    use crate::infrastructure::database::repositories::SeaOrmRepositoryProvider;
    use crate::infrastructure::database::test_connection;
    use crate::shared::retry::RetryConfig;
    use crate::shared::time::LocalZone;
    use chrono::{Duration, TimeZone};

    fn t0() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2024, 3, 1, 9, 0, 0).unwrap()
    }

    async fn user(repos: &Arc<dyn RepositoryProvider>, name: &str, role: UserRole) -> User {
        repos
            .users()
            .create(NewUser {
                name: name.into(),
                email: format!("{}@example.com", name.to_lowercase()),
                username: name.to_lowercase(),
                password_hash: "hash".into(),
                role,
                id_number: None,
            })
            .await
            .unwrap()
    }

    #[tokio::test]
    async fn president_scenario_tally_and_dashboard() {
        let repos: Arc<dyn RepositoryProvider> =
            Arc::new(SeaOrmRepositoryProvider::new(test_connection().await));
        let elections = ElectionService::new(repos.clone(), LocalZone::utc());
        let election = elections
            .schedule("president", "2024-03-01T09:00:00Z", "2024-03-01T10:00:00Z")
            .await
            .unwrap();

        let mut ids = Vec::new();
        for name in ["A", "B"] {
            ids.push(
                repos
                    .candidates()
                    .create(NewCandidate {
                        name: name.into(),
                        category_id: election.category.id,
                        photo: None,
                    })
                    .await
                    .unwrap()
                    .id,
            );
        }

        let voter = user(&repos, "Voter", UserRole::Voter).await;
        let account = user(&repos, "A", UserRole::Candidate).await;

        let ledger = VoteLedger::new(repos.clone(), RetryConfig::default());
        ledger
            .cast_vote(voter.id, ids[0], None, t0() + Duration::minutes(30))
            .await
            .unwrap();

        let results = TallyService::new(repos);
        let tally = results.tally(election.id).await.unwrap();
        let pairs: Vec<(&str, u64)> = tally
            .entries
            .iter()
            .map(|e| (e.candidate_name.as_str(), e.votes))
            .collect();
        assert_eq!(pairs, vec![("A", 1), ("B", 0)]);
        assert_eq!(tally.total_votes(), 1);

        let csv = results.results_csv(election.id).await.unwrap();
        assert_eq!(csv, "Candidate,Votes\r\nA,1\r\nB,0\r\n");

        let dashboard = results
            .candidate_dashboard(account.id, t0() + Duration::minutes(45))
            .await
            .unwrap();
        assert_eq!(dashboard.candidate.map(|c| c.id), Some(ids[0]));
        assert_eq!(dashboard.election.map(|e| e.id), Some(election.id));
        let leaders: Vec<String> = dashboard
            .tally
            .as_ref()
            .map(|t| t.leaders().into_iter().map(|e| e.candidate_name.clone()).collect())
            .unwrap_or_default();
        assert_eq!(leaders, vec!["A".to_string()]);

        assert!(results
            .current_results(t0() + Duration::hours(2))
            .await
            .unwrap()
            .is_none());
    }

    #[tokio::test]
    async fn unknown_election_is_not_found() {
        let repos: Arc<dyn RepositoryProvider> =
            Arc::new(SeaOrmRepositoryProvider::new(test_connection().await));
        let results = TallyService::new(repos);
        assert!(matches!(results.tally(99).await, Err(DomainError::NotFound { .. })));
        assert!(matches!(
            results.results_csv(99).await,
            Err(DomainError::NotFound { .. })
        ));
    }

    #[tokio::test]
    async fn shared_name_prefers_candidate_in_open_election() {
        let repos: Arc<dyn RepositoryProvider> =
            Arc::new(SeaOrmRepositoryProvider::new(test_connection().await));
        let elections = ElectionService::new(repos.clone(), LocalZone::utc());
        let mayor = elections
            .schedule("mayor", "2024-03-01T09:00:00Z", "2024-03-01T10:00:00Z")
            .await
            .unwrap();
        let treasurer = repos.categories().get_or_create("treasurer").await.unwrap();

        let mut ids = Vec::new();
        for category_id in [treasurer.id, mayor.category.id] {
            ids.push(
                repos
                    .candidates()
                    .create(NewCandidate {
                        name: "Sam".into(),
                        category_id,
                        photo: None,
                    })
                    .await
                    .unwrap()
                    .id,
            );
        }
        let account = user(&repos, "Sam", UserRole::Candidate).await;
        let results = TallyService::new(repos);

        let during = results
            .candidate_dashboard(account.id, t0() + Duration::minutes(5))
            .await
            .unwrap();
        assert_eq!(during.candidate.map(|c| c.id), Some(ids[1]));
        assert_eq!(during.election.map(|e| e.id), Some(mayor.id));

        // Nothing open: lowest id wins
        let after = results
            .candidate_dashboard(account.id, t0() + Duration::hours(3))
            .await
            .unwrap();
        assert_eq!(after.candidate.map(|c| c.id), Some(ids[0]));
        assert!(after.election.is_none());
    }
}
