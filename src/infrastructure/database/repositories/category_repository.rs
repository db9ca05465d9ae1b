//! SeaORM implementation of CategoryRepository

use async_trait::async_trait;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, ConnectionTrait, DatabaseConnection, EntityTrait, NotSet,
    QueryFilter, QueryOrder, Set,
};
use tracing::debug;

use super::{db_err, is_unique_violation};
use crate::domain::category::{normalize_category_name, Category, CategoryRepository};
use crate::domain::{DomainError, DomainResult};
use crate::infrastructure::database::entities::category;

pub struct SeaOrmCategoryRepository {
    db: DatabaseConnection,
}

impl SeaOrmCategoryRepository {
    pub fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }
}

pub(super) fn category_model_to_domain(model: category::Model) -> Category {
    Category {
        id: model.id,
        name: model.name,
    }
}

async fn find_normalized<C: ConnectionTrait>(conn: &C, name: &str) -> DomainResult<Option<Category>> {
    let model = category::Entity::find()
        .filter(category::Column::Name.eq(name))
        .one(conn)
        .await
        .map_err(db_err)?;
    Ok(model.map(category_model_to_domain))
}

#[async_trait]
impl CategoryRepository for SeaOrmCategoryRepository {
    async fn get_or_create(&self, name: &str) -> DomainResult<Category> {
        let name = normalize_category_name(name)?;

        if let Some(existing) = find_normalized(&self.db, &name).await? {
            return Ok(existing);
        }

        debug!(category = %name, "Creating category");
        let model = category::ActiveModel {
            id: NotSet,
            name: Set(name.clone()),
        };

        match model.insert(&self.db).await {
            Ok(inserted) => Ok(category_model_to_domain(inserted)),
            // Lost a race with a concurrent insert of the same name
            Err(e) if is_unique_violation(&e) => find_normalized(&self.db, &name)
                .await?
                .ok_or_else(|| DomainError::not_found("Category", "name", &name)),
            Err(e) => Err(db_err(e)),
        }
    }

    async fn find_by_name(&self, name: &str) -> DomainResult<Option<Category>> {
        let name = normalize_category_name(name)?;
        find_normalized(&self.db, &name).await
    }

    async fn list(&self) -> DomainResult<Vec<Category>> {
        let models = category::Entity::find()
            .order_by_asc(category::Column::Name)
            .all(&self.db)
            .await
            .map_err(db_err)?;
        Ok(models.into_iter().map(category_model_to_domain).collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::infrastructure::database::test_connection;

    #[tokio::test]
    async fn get_or_create_is_idempotent_across_spellings() {
        let repo = SeaOrmCategoryRepository::new(test_connection().await);

        let first = repo.get_or_create("President").await.unwrap();
        let second = repo.get_or_create("  president  ").await.unwrap();
        assert_eq!(first, second);
        assert_eq!(first.name, "president");
        assert_eq!(repo.list().await.unwrap().len(), 1);
    }

    #[tokio::test]
    async fn find_by_name_normalizes_input() {
        let repo = SeaOrmCategoryRepository::new(test_connection().await);
        repo.get_or_create("Vice President").await.unwrap();

        assert!(repo.find_by_name("VICE   president").await.unwrap().is_some());
        assert!(repo.find_by_name("treasurer").await.unwrap().is_none());
    }

    #[tokio::test]
    async fn blank_name_is_rejected() {
        let repo = SeaOrmCategoryRepository::new(test_connection().await);
        assert!(matches!(
            repo.get_or_create("   ").await,
            Err(DomainError::Validation(_))
        ));
    }
}
