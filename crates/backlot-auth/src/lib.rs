//! # backlot-auth
//!
//! Bearer-token authentication for the API: HS256 JWTs, argon2 password
//! hashing, and the principal type handlers check roles against.

pub mod jwt;
pub mod password;
pub mod principal;

pub use jwt::{Claims, JwtError, JwtService};
pub use password::{hash_password, verify_password, PasswordError};
pub use principal::Principal;
