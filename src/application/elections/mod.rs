//! Election scheduling and window queries

pub mod service;

pub use service::ElectionService;
