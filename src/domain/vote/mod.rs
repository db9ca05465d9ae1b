//! Vote ledger aggregate
//!
//! Append-only record of cast votes. The ledger is the source of truth for
//! both single-vote enforcement and counting.

pub mod ledger;
pub mod model;
pub mod repository;
pub mod tally;

pub use ledger::{check_ballot, VoteRejection};
pub use model::{Ballot, Vote};
pub use repository::VoteRepository;
pub use tally::{Tally, TallyEntry};
