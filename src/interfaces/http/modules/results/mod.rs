//! Election results: JSON tally and CSV export

pub mod handlers;

pub use handlers::*;
