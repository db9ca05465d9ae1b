//! Response DTOs shared by several route groups

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use crate::domain::{Candidate, Category, Election, Tally, TallyEntry, User};
use crate::shared::time::LocalZone;

/// Account as returned by the API (never includes the password hash)
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct UserDto {
    pub id: i32,
    pub name: String,
    pub email: String,
    pub username: String,
    /// `admin`, `voter` or `candidate`
    pub role: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub id_number: Option<String>,
    pub created_at: DateTime<Utc>,
}

impl From<User> for UserDto {
    fn from(u: User) -> Self {
        Self {
            id: u.id,
            name: u.name,
            email: u.email,
            username: u.username,
            role: u.role.to_string(),
            id_number: u.id_number,
            created_at: u.created_at,
        }
    }
}

#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct CategoryDto {
    pub id: i32,
    pub name: String,
}

impl From<Category> for CategoryDto {
    fn from(c: Category) -> Self {
        Self {
            id: c.id,
            name: c.name,
        }
    }
}

#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct CandidateDto {
    pub id: i32,
    pub name: String,
    pub category: String,
    pub category_id: i32,
    /// Absolute path under which the photo is served, e.g. `/uploads/<file>`
    pub photo_url: Option<String>,
    pub created_at: DateTime<Utc>,
}

impl From<Candidate> for CandidateDto {
    fn from(c: Candidate) -> Self {
        Self {
            id: c.id,
            name: c.name,
            category: c.category.name,
            category_id: c.category.id,
            photo_url: c.photo.map(|p| format!("/{}", p.trim_start_matches('/'))),
            created_at: c.created_at,
        }
    }
}

/// Election window in UTC and in the configured local zone
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct ElectionDto {
    pub id: i32,
    pub category: String,
    pub category_id: i32,
    pub starts_at: DateTime<Utc>,
    pub ends_at: DateTime<Utc>,
    /// `YYYY-MM-DDTHH:MM` in the local zone
    pub starts_at_local: String,
    pub ends_at_local: String,
    pub is_open: bool,
}

impl ElectionDto {
    pub fn new(election: &Election, zone: LocalZone, now: DateTime<Utc>) -> Self {
        let local = |t: DateTime<Utc>| zone.to_local(t).format("%Y-%m-%dT%H:%M").to_string();
        Self {
            id: election.id,
            category: election.category.name.clone(),
            category_id: election.category.id,
            starts_at: election.window.starts_at(),
            ends_at: election.window.ends_at(),
            starts_at_local: local(election.window.starts_at()),
            ends_at_local: local(election.window.ends_at()),
            is_open: election.is_open_at(now),
        }
    }
}

#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct TallyEntryDto {
    pub candidate_id: i32,
    pub candidate_name: String,
    pub votes: u64,
}

impl From<&TallyEntry> for TallyEntryDto {
    fn from(e: &TallyEntry) -> Self {
        Self {
            candidate_id: e.candidate_id,
            candidate_name: e.candidate_name.clone(),
            votes: e.votes,
        }
    }
}

/// Results of one election, entries ordered by candidate id
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct TallyDto {
    pub election: ElectionDto,
    pub entries: Vec<TallyEntryDto>,
    pub total_votes: u64,
    /// Candidate ids sharing the highest count
    pub leaders: Vec<i32>,
}

impl TallyDto {
    pub fn new(tally: &Tally, zone: LocalZone, now: DateTime<Utc>) -> Self {
        Self {
            election: ElectionDto::new(&tally.election, zone, now),
            entries: tally.entries.iter().map(TallyEntryDto::from).collect(),
            total_votes: tally.total_votes(),
            leaders: tally.leaders().into_iter().map(|e| e.candidate_id).collect(),
        }
    }
}
