//! Repository error classification.
//!
//! Postgres reports constraint violations with SQLSTATE codes and constraint
//! names like `users_email_key` or `calls_assistant_id_fkey`. Repositories
//! pass their table name so the offending field or referenced entity can be
//! recovered from the constraint name.

use backlot_core::{AppError, Id};
use thiserror::Error;

#[derive(Debug, Error)]
pub enum RepoError {
    #[error("{entity} with id {id} not found")]
    NotFound { entity: &'static str, id: Id },

    #[error("{field} already exists")]
    Unique { field: String },

    #[error("referenced {entity} does not exist")]
    DanglingReference { entity: String },

    #[error("database error: {0}")]
    Database(#[from] sqlx::Error),
}

pub type RepoResult<T> = Result<T, RepoError>;

const UNIQUE_VIOLATION: &str = "23505";
const FOREIGN_KEY_VIOLATION: &str = "23503";

impl RepoError {
    /// Classify a driver error raised while writing to `table`.
    pub fn classify(err: sqlx::Error, table: &str) -> Self {
        if let sqlx::Error::Database(db_err) = &err {
            let constraint = db_err.constraint().unwrap_or_default().to_string();
            match db_err.code().as_deref() {
                Some(UNIQUE_VIOLATION) => {
                    return RepoError::Unique {
                        field: constraint_column(&constraint, table, "_key"),
                    }
                }
                Some(FOREIGN_KEY_VIOLATION) => {
                    let column = constraint_column(&constraint, table, "_fkey");
                    return RepoError::DanglingReference {
                        entity: column.trim_end_matches("_id").to_string(),
                    };
                }
                _ => {}
            }
        }
        RepoError::Database(err)
    }
}

/// `users_email_key` on table `users` -> `email`.
fn constraint_column(constraint: &str, table: &str, suffix: &str) -> String {
    constraint
        .strip_prefix(table)
        .and_then(|rest| rest.strip_prefix('_'))
        .and_then(|rest| rest.strip_suffix(suffix))
        .unwrap_or(constraint)
        .to_string()
}

impl From<RepoError> for AppError {
    fn from(err: RepoError) -> Self {
        match err {
            RepoError::NotFound { entity, id } => AppError::NotFound { entity, id },
            RepoError::Unique { field } => AppError::UniqueViolation { field },
            RepoError::DanglingReference { entity } => AppError::DanglingReference { entity },
            RepoError::Database(e) => {
                tracing::error!(error = %e, "database failure");
                AppError::Database(e.to_string())
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn constraint_names_yield_columns() {
        assert_eq!(constraint_column("users_email_key", "users", "_key"), "email");
        assert_eq!(
            constraint_column("phone_numbers_number_key", "phone_numbers", "_key"),
            "number"
        );
        assert_eq!(
            constraint_column("calls_phone_number_id_fkey", "calls", "_fkey"),
            "phone_number_id"
        );
    }

    #[test]
    fn unrecognized_constraint_falls_through_verbatim() {
        assert_eq!(constraint_column("weird", "users", "_key"), "weird");
    }

    #[test]
    fn repo_errors_map_into_the_core_taxonomy() {
        let err: AppError = RepoError::NotFound { entity: "Call", id: 9 }.into();
        assert_eq!(err.status_code(), 404);

        let err: AppError = RepoError::Unique { field: "sku".into() }.into();
        assert_eq!(err.status_code(), 409);
        assert_eq!(err.to_string(), "sku already exists");

        let err: AppError = RepoError::DanglingReference { entity: "contact".into() }.into();
        assert_eq!(err.status_code(), 422);
    }
}
