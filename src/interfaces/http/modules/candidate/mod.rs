//! Candidate dashboard

pub mod handlers;

pub use handlers::*;
