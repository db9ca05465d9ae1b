//! HTTP REST API interfaces
//!
//! - `middleware`: JWT authentication and role gates
//! - `modules`: request handlers and DTOs per area
//! - `router`: API router with Swagger documentation

pub mod common;
pub mod dto;
pub mod middleware;
pub mod modules;
pub mod router;

pub use router::{create_api_router, ApiContext};
