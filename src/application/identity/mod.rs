//! Identity module: accounts & authentication
//!
//! Contains the `UserService` which orchestrates login, voter
//! registration and admin-side account creation.

pub mod service;

pub use service::{AuthResult, NewAccount, UserService, VoterRegistration};
