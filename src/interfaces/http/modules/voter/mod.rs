//! Voter ballot and vote casting

pub mod dto;
pub mod handlers;

pub use dto::*;
pub use handlers::*;
