//! # backlot-core
//!
//! Shared foundations for the Backlot workspace: the error taxonomy,
//! validation-error collection, environment-driven configuration, and
//! pagination primitives used by every other crate.

pub mod config;
pub mod error;
pub mod pagination;

pub use config::AppConfig;
pub use error::{AppError, AppResult, ValidationErrors};
pub use pagination::{PageMeta, PageParams, Paginated};

/// Primary key type shared by every entity. All tables use BIGSERIAL ids.
pub type Id = i64;
