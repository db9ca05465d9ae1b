//! SeaORM implementation of CandidateRepository

use async_trait::async_trait;
use chrono::Utc;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, ConnectionTrait, DatabaseConnection, EntityTrait, NotSet,
    QueryFilter, QueryOrder, Set,
};
use tracing::debug;

use super::category_repository::category_model_to_domain;
use super::db_err;
use crate::domain::candidate::{Candidate, CandidateRepository, NewCandidate};
use crate::domain::{DomainError, DomainResult};
use crate::infrastructure::database::entities::{candidate, category};

pub struct SeaOrmCandidateRepository {
    db: DatabaseConnection,
}

impl SeaOrmCandidateRepository {
    pub fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }
}

fn candidate_model_to_domain(
    model: candidate::Model,
    category: Option<category::Model>,
) -> DomainResult<Candidate> {
    let category = category.ok_or_else(|| {
        DomainError::Storage(format!(
            "candidate {} references missing category {}",
            model.id, model.category_id
        ))
    })?;

    Ok(Candidate {
        id: model.id,
        name: model.name,
        category: category_model_to_domain(category),
        photo: model.photo,
        created_at: model.created_at,
    })
}

/// Load one candidate with its category on any connection (pool or transaction).
pub(super) async fn load_candidate<C: ConnectionTrait>(
    conn: &C,
    id: i32,
) -> DomainResult<Option<Candidate>> {
    let row = candidate::Entity::find_by_id(id)
        .find_also_related(category::Entity)
        .one(conn)
        .await
        .map_err(db_err)?;

    row.map(|(model, category)| candidate_model_to_domain(model, category))
        .transpose()
}

#[async_trait]
impl CandidateRepository for SeaOrmCandidateRepository {
    async fn create(&self, new_candidate: NewCandidate) -> DomainResult<Candidate> {
        debug!(
            name = %new_candidate.name,
            category_id = new_candidate.category_id,
            "Creating candidate"
        );

        let category = category::Entity::find_by_id(new_candidate.category_id)
            .one(&self.db)
            .await
            .map_err(db_err)?
            .ok_or_else(|| DomainError::not_found("Category", "id", new_candidate.category_id))?;

        let model = candidate::ActiveModel {
            id: NotSet,
            name: Set(new_candidate.name),
            category_id: Set(new_candidate.category_id),
            photo: Set(new_candidate.photo),
            created_at: Set(Utc::now()),
        };
        let inserted = model.insert(&self.db).await.map_err(db_err)?;

        candidate_model_to_domain(inserted, Some(category))
    }

    async fn find_by_id(&self, id: i32) -> DomainResult<Option<Candidate>> {
        load_candidate(&self.db, id).await
    }

    async fn list_by_name(&self, name: &str) -> DomainResult<Vec<Candidate>> {
        let rows = candidate::Entity::find()
            .filter(candidate::Column::Name.eq(name))
            .order_by_asc(candidate::Column::Id)
            .find_also_related(category::Entity)
            .all(&self.db)
            .await
            .map_err(db_err)?;

        rows.into_iter()
            .map(|(model, category)| candidate_model_to_domain(model, category))
            .collect()
    }

    async fn list(&self) -> DomainResult<Vec<Candidate>> {
        let rows = candidate::Entity::find()
            .order_by_asc(candidate::Column::Id)
            .find_also_related(category::Entity)
            .all(&self.db)
            .await
            .map_err(db_err)?;

        rows.into_iter()
            .map(|(model, category)| candidate_model_to_domain(model, category))
            .collect()
    }

    async fn list_by_category(&self, category_id: i32) -> DomainResult<Vec<Candidate>> {
        let rows = candidate::Entity::find()
            .filter(candidate::Column::CategoryId.eq(category_id))
            .order_by_asc(candidate::Column::Id)
            .find_also_related(category::Entity)
            .all(&self.db)
            .await
            .map_err(db_err)?;

        rows.into_iter()
            .map(|(model, category)| candidate_model_to_domain(model, category))
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::category::CategoryRepository;
    use crate::infrastructure::database::repositories::category_repository::SeaOrmCategoryRepository;
    use crate::infrastructure::database::test_connection;

    #[tokio::test]
    async fn candidates_are_listed_per_category_in_id_order() {
        let db = test_connection().await;
        let categories = SeaOrmCategoryRepository::new(db.clone());
        let repo = SeaOrmCandidateRepository::new(db);

        let president = categories.get_or_create("president").await.unwrap();
        let treasurer = categories.get_or_create("treasurer").await.unwrap();

        for (name, category_id) in [("Ada", president.id), ("Bob", treasurer.id), ("Cy", president.id)] {
            repo.create(NewCandidate {
                name: name.into(),
                category_id,
                photo: None,
            })
            .await
            .unwrap();
        }

        let names: Vec<String> = repo
            .list_by_category(president.id)
            .await
            .unwrap()
            .into_iter()
            .map(|c| c.name)
            .collect();
        assert_eq!(names, vec!["Ada", "Cy"]);
        assert_eq!(repo.list().await.unwrap().len(), 3);

        let bobs = repo.list_by_name("Bob").await.unwrap();
        assert_eq!(bobs.len(), 1);
        assert_eq!(bobs[0].category.name, "treasurer");
        assert!(repo.list_by_name("bob").await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn unknown_category_is_not_found() {
        let repo = SeaOrmCandidateRepository::new(test_connection().await);
        let result = repo
            .create(NewCandidate {
                name: "Ada".into(),
                category_id: 99,
                photo: None,
            })
            .await;
        assert!(matches!(result, Err(DomainError::NotFound { .. })));
    }
}
