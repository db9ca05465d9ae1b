pub mod admin;
pub mod auth;
pub mod candidate;
pub mod health;
pub mod metrics;
pub mod request_id;
pub mod results;
pub mod voter;
