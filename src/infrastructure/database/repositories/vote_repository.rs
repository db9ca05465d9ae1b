//! SeaORM implementation of VoteRepository
//!
//! `cast` performs the admission lookups and the insert inside a single
//! database transaction that holds the write lock from its first statement.
//! The unique index on `(voter_id, election_id)` backs this up when two
//! casts race.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sea_orm::sea_query::{Expr, IntoCondition};
use sea_orm::{
    ActiveModelTrait, ColumnTrait, ConnectionTrait, DatabaseConnection, EntityTrait,
    FromQueryResult, JoinType, NotSet, PaginatorTrait, QueryFilter, QueryOrder, QuerySelect,
    RelationTrait, Set, TransactionTrait,
};
use tracing::{debug, info};

use super::candidate_repository::load_candidate;
use super::election_repository::load_election;
use super::{claim_write_lock, db_err, is_unique_violation};
use crate::domain::election::Election;
use crate::domain::vote::{check_ballot, Ballot, TallyEntry, Vote, VoteRejection, VoteRepository};
use crate::domain::{DomainError, DomainResult};
use crate::infrastructure::database::entities::{candidate, vote};

pub struct SeaOrmVoteRepository {
    db: DatabaseConnection,
}

impl SeaOrmVoteRepository {
    pub fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }
}

fn vote_model_to_domain(model: vote::Model) -> Vote {
    Vote {
        id: model.id,
        voter_id: model.voter_id,
        candidate_id: model.candidate_id,
        election_id: model.election_id,
        cast_at: model.cast_at,
    }
}

#[derive(Debug, FromQueryResult)]
struct TallyRow {
    id: i32,
    name: String,
    votes: i64,
}

async fn voted<C: ConnectionTrait>(conn: &C, voter_id: i32, election_id: i32) -> DomainResult<bool> {
    let count = vote::Entity::find()
        .filter(vote::Column::VoterId.eq(voter_id))
        .filter(vote::Column::ElectionId.eq(election_id))
        .count(conn)
        .await
        .map_err(db_err)?;
    Ok(count > 0)
}

#[async_trait]
impl VoteRepository for SeaOrmVoteRepository {
    async fn cast(&self, ballot: Ballot, now: DateTime<Utc>) -> DomainResult<Vote> {
        debug!(
            voter_id = ballot.voter_id,
            election_id = ballot.election_id,
            candidate_id = ballot.candidate_id,
            "Casting vote"
        );

        let txn = self.db.begin().await.map_err(db_err)?;
        claim_write_lock(&txn, "votes").await.map_err(db_err)?;

        let election = load_election(&txn, ballot.election_id).await?;
        let already_voted = voted(&txn, ballot.voter_id, ballot.election_id).await?;
        let candidate = load_candidate(&txn, ballot.candidate_id).await?;

        check_ballot(now, election.as_ref(), already_voted, candidate.as_ref())?;

        let model = vote::ActiveModel {
            id: NotSet,
            voter_id: Set(ballot.voter_id),
            candidate_id: Set(ballot.candidate_id),
            election_id: Set(ballot.election_id),
            cast_at: Set(now),
        };

        let inserted = model.insert(&txn).await.map_err(|e| {
            if is_unique_violation(&e) {
                DomainError::VoteRejected(VoteRejection::AlreadyVoted)
            } else {
                db_err(e)
            }
        })?;

        txn.commit().await.map_err(|e| {
            if is_unique_violation(&e) {
                DomainError::VoteRejected(VoteRejection::AlreadyVoted)
            } else {
                db_err(e)
            }
        })?;

        info!(
            vote_id = inserted.id,
            election_id = inserted.election_id,
            "Vote recorded"
        );
        Ok(vote_model_to_domain(inserted))
    }

    async fn has_voted(&self, voter_id: i32, election_id: i32) -> DomainResult<bool> {
        voted(&self.db, voter_id, election_id).await
    }

    async fn count_for_election(&self, election_id: i32) -> DomainResult<u64> {
        vote::Entity::find()
            .filter(vote::Column::ElectionId.eq(election_id))
            .count(&self.db)
            .await
            .map_err(db_err)
    }

    async fn tally(&self, election: &Election) -> DomainResult<Vec<TallyEntry>> {
        let election_id = election.id;

        // Votes are joined on the election id in the ON clause so candidates
        // without votes still produce a row with a zero count.
        let rows = candidate::Entity::find()
            .select_only()
            .column(candidate::Column::Id)
            .column(candidate::Column::Name)
            .column_as(Expr::col((vote::Entity, vote::Column::Id)).count(), "votes")
            .join(
                JoinType::LeftJoin,
                candidate::Relation::Votes
                    .def()
                    .on_condition(move |_left, right| {
                        Expr::col((right, vote::Column::ElectionId))
                            .eq(election_id)
                            .into_condition()
                    }),
            )
            .filter(candidate::Column::CategoryId.eq(election.category.id))
            .group_by(candidate::Column::Id)
            .group_by(candidate::Column::Name)
            .order_by_asc(candidate::Column::Id)
            .into_model::<TallyRow>()
            .all(&self.db)
            .await
            .map_err(db_err)?;

        Ok(rows
            .into_iter()
            .map(|row| TallyEntry {
                candidate_id: row.id,
                candidate_name: row.name,
                votes: row.votes.max(0) as u64,
            })
            .collect())
    }
}
