//! Database entities module

pub mod candidate;
pub mod category;
pub mod election;
pub mod user;
pub mod vote;

pub use candidate::Entity as Candidate;
pub use category::Entity as Category;
pub use election::Entity as Election;
pub use user::Entity as User;
pub use vote::Entity as Vote;
