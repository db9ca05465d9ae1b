//! SeaORM implementation of ElectionRepository

use async_trait::async_trait;
use chrono::Utc;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, ConnectionTrait, DatabaseConnection, EntityTrait, NotSet,
    QueryFilter, QueryOrder, Set, TransactionTrait,
};
use tracing::{debug, error, info};

use super::category_repository::category_model_to_domain;
use super::{claim_write_lock, db_err};
use crate::domain::election::{find_overlap, Election, ElectionRepository, NewElection};
use crate::domain::{DomainError, DomainResult};
use crate::infrastructure::database::entities::{category, election};
use crate::shared::time::format_utc;

pub struct SeaOrmElectionRepository {
    db: DatabaseConnection,
}

impl SeaOrmElectionRepository {
    pub fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }
}

fn election_model_to_domain(
    model: election::Model,
    category: Option<category::Model>,
) -> DomainResult<Election> {
    let category = category.ok_or_else(|| {
        DomainError::Storage(format!(
            "election {} references missing category {}",
            model.id, model.category_id
        ))
    })?;

    Election::from_stored(
        model.id,
        category_model_to_domain(category),
        &model.start_time,
        &model.end_time,
        model.created_at,
    )
}

/// Corrupt rows are logged and dropped so that no window is ever treated
/// as open on the strength of an unreadable timestamp.
fn usable(row: (election::Model, Option<category::Model>)) -> Option<Election> {
    let id = row.0.id;
    match election_model_to_domain(row.0, row.1) {
        Ok(election) => Some(election),
        Err(e) => {
            error!(election_id = id, error = %e, "Skipping unreadable election row");
            None
        }
    }
}

/// Load one election with its category on any connection (pool or transaction).
pub(super) async fn load_election<C: ConnectionTrait>(
    conn: &C,
    id: i32,
) -> DomainResult<Option<Election>> {
    let row = election::Entity::find_by_id(id)
        .find_also_related(category::Entity)
        .one(conn)
        .await
        .map_err(db_err)?;
    Ok(row.and_then(usable))
}

async fn load_elections<C: ConnectionTrait>(
    conn: &C,
    category_id: Option<i32>,
) -> DomainResult<Vec<Election>> {
    let mut query = election::Entity::find();
    if let Some(category_id) = category_id {
        query = query.filter(election::Column::CategoryId.eq(category_id));
    }

    let rows = query
        .order_by_asc(election::Column::Id)
        .find_also_related(category::Entity)
        .all(conn)
        .await
        .map_err(db_err)?;

    Ok(rows.into_iter().filter_map(usable).collect())
}

#[async_trait]
impl ElectionRepository for SeaOrmElectionRepository {
    async fn schedule(&self, new_election: NewElection) -> DomainResult<Election> {
        let window = new_election.window;
        debug!(
            category_id = new_election.category_id,
            starts_at = %format_utc(window.starts_at()),
            ends_at = %format_utc(window.ends_at()),
            "Scheduling election"
        );

        let txn = self.db.begin().await.map_err(db_err)?;
        claim_write_lock(&txn, "elections").await.map_err(db_err)?;

        let category = category::Entity::find_by_id(new_election.category_id)
            .one(&txn)
            .await
            .map_err(db_err)?
            .ok_or_else(|| DomainError::not_found("Category", "id", new_election.category_id))?;

        let existing = load_elections(&txn, Some(category.id)).await?;
        if let Some(clash) = find_overlap(category.id, &window, &existing) {
            return Err(DomainError::Conflict(format!(
                "Election window overlaps election {} in category '{}' ({} to {})",
                clash.id,
                category.name,
                format_utc(clash.window.starts_at()),
                format_utc(clash.window.ends_at()),
            )));
        }

        let model = election::ActiveModel {
            id: NotSet,
            category_id: Set(category.id),
            start_time: Set(format_utc(window.starts_at())),
            end_time: Set(format_utc(window.ends_at())),
            created_at: Set(Utc::now()),
        };
        let inserted = model.insert(&txn).await.map_err(db_err)?;
        txn.commit().await.map_err(db_err)?;

        info!(
            election_id = inserted.id,
            category = %category.name,
            "Election scheduled"
        );
        election_model_to_domain(inserted, Some(category))
    }

    async fn find_by_id(&self, id: i32) -> DomainResult<Option<Election>> {
        load_election(&self.db, id).await
    }

    async fn list(&self) -> DomainResult<Vec<Election>> {
        load_elections(&self.db, None).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::category::CategoryRepository;
    use crate::domain::election::ElectionWindow;
    use crate::infrastructure::database::repositories::category_repository::SeaOrmCategoryRepository;
    use crate::infrastructure::database::test_connection;
    use chrono::{DateTime, Duration, TimeZone};

    fn t0() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2024, 3, 1, 9, 0, 0).unwrap()
    }

    fn window(start_h: i64, end_h: i64) -> ElectionWindow {
        ElectionWindow::new(t0() + Duration::hours(start_h), t0() + Duration::hours(end_h)).unwrap()
    }

    #[tokio::test]
    async fn schedule_stores_utc_and_reads_back() {
        let db = test_connection().await;
        let category = SeaOrmCategoryRepository::new(db.clone())
            .get_or_create("president")
            .await
            .unwrap();
        let repo = SeaOrmElectionRepository::new(db.clone());

        let scheduled = repo
            .schedule(NewElection {
                category_id: category.id,
                window: window(0, 2),
            })
            .await
            .unwrap();

        let raw = election::Entity::find_by_id(scheduled.id)
            .one(&db)
            .await
            .unwrap()
            .unwrap();
        assert_eq!(raw.start_time, "2024-03-01T09:00:00Z");

        let loaded = repo.find_by_id(scheduled.id).await.unwrap().unwrap();
        assert_eq!(loaded.window, scheduled.window);
        assert_eq!(loaded.category.name, "president");
    }

    #[tokio::test]
    async fn overlapping_window_in_same_category_conflicts() {
        let db = test_connection().await;
        let categories = SeaOrmCategoryRepository::new(db.clone());
        let president = categories.get_or_create("president").await.unwrap();
        let treasurer = categories.get_or_create("treasurer").await.unwrap();
        let repo = SeaOrmElectionRepository::new(db);

        repo.schedule(NewElection {
            category_id: president.id,
            window: window(0, 2),
        })
        .await
        .unwrap();

        let clash = repo
            .schedule(NewElection {
                category_id: president.id,
                window: window(1, 3),
            })
            .await;
        assert!(matches!(clash, Err(DomainError::Conflict(_))));

        // Other categories may run at the same time
        repo.schedule(NewElection {
            category_id: treasurer.id,
            window: window(1, 3),
        })
        .await
        .unwrap();

        assert_eq!(repo.list().await.unwrap().len(), 2);
    }

    #[tokio::test]
    async fn corrupt_rows_are_skipped() {
        let db = test_connection().await;
        let category = SeaOrmCategoryRepository::new(db.clone())
            .get_or_create("president")
            .await
            .unwrap();

        election::ActiveModel {
            id: NotSet,
            category_id: Set(category.id),
            start_time: Set("not a time".into()),
            end_time: Set("2024-03-01T10:00:00Z".into()),
            created_at: Set(Utc::now()),
        }
        .insert(&db)
        .await
        .unwrap();

        let repo = SeaOrmElectionRepository::new(db);
        assert!(repo.list().await.unwrap().is_empty());
    }
}
