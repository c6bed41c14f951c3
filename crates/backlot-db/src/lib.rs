//! # backlot-db
//!
//! PostgreSQL access for Backlot: pool management, migrations, and one
//! repository per entity. Repositories classify driver errors into the
//! shared taxonomy (not-found, unique violation, dangling reference) so the
//! API layer maps them to HTTP statuses in exactly one place.

pub mod assistants;
pub mod calls;
pub mod campaigns;
pub mod collections;
pub mod contacts;
pub mod customers;
pub mod orders;
pub mod phone_numbers;
pub mod pool;
pub mod products;
pub mod repository;
pub mod suppliers;
pub mod users;

pub use pool::{Database, DatabaseConfig};
pub use repository::{RepoError, RepoResult};

pub use assistants::AssistantRepo;
pub use calls::CallRepo;
pub use campaigns::CampaignRepo;
pub use collections::CollectionRepo;
pub use contacts::ContactRepo;
pub use customers::CustomerRepo;
pub use orders::OrderRepo;
pub use phone_numbers::PhoneNumberRepo;
pub use products::ProductRepo;
pub use suppliers::SupplierRepo;
pub use users::UserRepo;

/// Embedded SQL migrations from `migrations/` at the workspace root.
pub static MIGRATOR: sqlx::migrate::Migrator = sqlx::migrate!("../../migrations");
