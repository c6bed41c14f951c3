//! # backlot-api
//!
//! Axum handlers and routing for the REST CRUD surface of both consoles.
//! Every response uses the `{ success, data | error }` envelope; the error
//! half is produced in exactly one place ([`error::ApiError`]).

pub mod envelope;
pub mod error;
pub mod extractors;
pub mod handlers;
pub mod routes;

pub use error::{ApiError, ApiResult};
pub use extractors::AppState;
pub use routes::api_router;
