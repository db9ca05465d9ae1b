//! User aggregate
//!
//! Contains the User entity, its closed role set, and the repository interface.

pub mod model;
pub mod repository;

pub use model::{NewUser, User, UserRole};
pub use repository::UserRepository;
