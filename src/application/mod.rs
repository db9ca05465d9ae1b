//! Application layer: use-case orchestration over the domain repositories
//!
//! HTTP handlers are thin wrappers that delegate to these services.

pub mod ballot;
pub mod candidates;
pub mod elections;
pub mod identity;
pub mod results;

pub use ballot::{BallotView, VoteLedger};
pub use candidates::{CandidateService, PhotoUpload};
pub use elections::ElectionService;
pub use identity::{AuthResult, NewAccount, UserService, VoterRegistration};
pub use results::{csv_filename, render_csv, CandidateDashboard, TallyService};
