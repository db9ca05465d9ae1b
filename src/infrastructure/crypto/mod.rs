//! Cryptographic helpers: JWT session tokens and bcrypt password hashing

pub mod jwt;
pub mod password;

pub use jwt::{create_token, verify_token, AuthError, JwtConfig, TokenClaims};
pub use password::{generate_password, hash_password, verify_password};
