//! Election aggregate
//!
//! An election is a category plus an inclusive UTC time window. The
//! [`window`] module decides which elections are open at a given instant.

pub mod model;
pub mod repository;
pub mod window;

pub use model::{Election, ElectionWindow, NewElection};
pub use repository::ElectionRepository;
pub use window::{active_elections, current_election, find_overlap};
