//! Candidate registration

pub mod service;

pub use service::{CandidateService, PhotoUpload};
