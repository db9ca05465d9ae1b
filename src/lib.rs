//! # Election service
//!
//! Timed, category-scoped elections: admins schedule voting windows per
//! category, voters cast at most one vote per election while its window is
//! open, and results are tallied per election with CSV export.
//!
//! ## Architecture
//!
//! - **domain**: entities, the election window and ballot rules, repository traits
//! - **application**: use-case services (identity, elections, ballot, results)
//! - **infrastructure**: SeaORM persistence, JWT/bcrypt, photo storage
//! - **interfaces**: REST API with Swagger documentation
//! - **server**: startup, migrations and graceful shutdown

pub mod application;
pub mod config;
pub mod domain;
pub mod infrastructure;
pub mod interfaces;
pub mod server;
pub mod shared;

pub use config::{default_config_path, AppConfig};
pub use infrastructure::database::repositories::SeaOrmRepositoryProvider;
pub use infrastructure::{init_database, DatabaseConfig};
pub use interfaces::http::{create_api_router, ApiContext};
