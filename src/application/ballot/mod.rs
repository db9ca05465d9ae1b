//! Vote casting and the voter's ballot view

pub mod service;

pub use service::{BallotView, VoteLedger};
