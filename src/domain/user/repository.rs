//! User repository interface

use async_trait::async_trait;

use super::model::{NewUser, User, UserRole};
use crate::domain::DomainResult;

#[async_trait]
pub trait UserRepository: Send + Sync {
    /// Insert a user. Duplicate username or email yields `DomainError::Conflict`.
    async fn create(&self, user: NewUser) -> DomainResult<User>;

    async fn find_by_id(&self, id: i32) -> DomainResult<Option<User>>;

    async fn find_by_username(&self, username: &str) -> DomainResult<Option<User>>;

    /// All users with the given role, ordered by id
    async fn list_by_role(&self, role: UserRole) -> DomainResult<Vec<User>>;

    async fn count_by_role(&self, role: UserRole) -> DomainResult<u64>;
}
