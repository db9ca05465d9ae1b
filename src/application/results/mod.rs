//! Tallies, CSV export and the candidate dashboard

pub mod csv;
pub mod service;

pub use csv::{csv_filename, render_csv};
pub use service::{CandidateDashboard, TallyService};
