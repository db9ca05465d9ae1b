use async_trait::async_trait;

use super::model::Category;
use crate::domain::DomainResult;

#[async_trait]
pub trait CategoryRepository: Send + Sync {
    /// Look up a category by its normalized name, creating it if missing.
    async fn get_or_create(&self, name: &str) -> DomainResult<Category>;

    async fn find_by_name(&self, name: &str) -> DomainResult<Option<Category>>;

    async fn list(&self) -> DomainResult<Vec<Category>>;
}
