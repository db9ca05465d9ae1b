//! Election service
//!
//! Converts admin local-time input to UTC, resolves the category and hands
//! the window to the repository, which rejects overlaps in the same category.

use std::sync::Arc;

use chrono::{DateTime, Utc};
use tracing::info;

use crate::domain::election::{active_elections, current_election};
use crate::domain::{
    DomainError, DomainResult, Election, ElectionWindow, NewElection, RepositoryProvider,
};
use crate::shared::time::{format_utc, LocalZone};

pub struct ElectionService {
    repos: Arc<dyn RepositoryProvider>,
    zone: LocalZone,
}

impl ElectionService {
    pub fn new(repos: Arc<dyn RepositoryProvider>, zone: LocalZone) -> Self {
        Self { repos, zone }
    }

    pub fn zone(&self) -> LocalZone {
        self.zone
    }

    /// Schedule an election from admin input in the configured local zone.
    pub async fn schedule(&self, category: &str, start: &str, end: &str) -> DomainResult<Election> {
        let starts_at = self.zone.to_utc(start)?;
        let ends_at = self.zone.to_utc(end)?;
        let window = ElectionWindow::new(starts_at, ends_at)?;

        let category = self.repos.categories().get_or_create(category).await?;
        let election = self
            .repos
            .elections()
            .schedule(NewElection {
                category_id: category.id,
                window,
            })
            .await?;

        info!(
            election_id = election.id,
            category = %election.category.name,
            starts_at = %format_utc(starts_at),
            ends_at = %format_utc(ends_at),
            "Election created"
        );
        Ok(election)
    }

    pub async fn list(&self) -> DomainResult<Vec<Election>> {
        self.repos.elections().list().await
    }

    pub async fn get(&self, id: i32) -> DomainResult<Election> {
        self.repos
            .elections()
            .find_by_id(id)
            .await?
            .ok_or_else(|| DomainError::not_found("Election", "id", id))
    }

    /// The election open at `now`, lowest id on ties
    pub async fn current(&self, now: DateTime<Utc>) -> DomainResult<Option<Election>> {
        let elections = self.list().await?;
        Ok(current_election(now, &elections).cloned())
    }

    /// Every election open at `now`, ordered by id
    pub async fn active(&self, now: DateTime<Utc>) -> DomainResult<Vec<Election>> {
        let elections = self.list().await?;
        Ok(active_elections(now, &elections)
            .into_iter()
            .cloned()
            .collect())
    }
}
