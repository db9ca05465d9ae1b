//! Admin panel: candidates, voters, accounts, categories, elections

pub mod dto;
pub mod handlers;

pub use dto::*;
pub use handlers::*;
