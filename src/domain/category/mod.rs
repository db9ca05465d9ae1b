//! Category aggregate
//!
//! Candidates and elections both point at a category row, so a typo in one
//! place can no longer silently detach a ballot from its candidates.

pub mod model;
pub mod repository;

pub use model::{normalize_category_name, Category};
pub use repository::CategoryRepository;
