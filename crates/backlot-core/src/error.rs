//! Core error taxonomy
//!
//! Every layer converges on [`AppError`]; the API crate maps it to an HTTP
//! status and the `{ success: false, error }` envelope exactly once.

use std::collections::HashMap;

use thiserror::Error;

/// Application-wide error type.
#[derive(Error, Debug)]
pub enum AppError {
    #[error("{entity} with id {id} not found")]
    NotFound { entity: &'static str, id: i64 },

    #[error("{0}")]
    Unauthorized(String),

    #[error("{0}")]
    Forbidden(String),

    #[error("{0}")]
    Validation(#[from] ValidationErrors),

    #[error("{field} already exists")]
    UniqueViolation { field: String },

    #[error("referenced {entity} does not exist")]
    DanglingReference { entity: String },

    #[error("{0}")]
    BadRequest(String),

    #[error("database error: {0}")]
    Database(String),

    #[error("internal error: {0}")]
    Internal(String),

    #[error("configuration error: {0}")]
    Config(String),
}

impl AppError {
    pub fn not_found(entity: &'static str, id: i64) -> Self {
        AppError::NotFound { entity, id }
    }

    pub fn unauthorized(message: impl Into<String>) -> Self {
        AppError::Unauthorized(message.into())
    }

    pub fn forbidden(message: impl Into<String>) -> Self {
        AppError::Forbidden(message.into())
    }

    /// HTTP status code this error maps to at the API boundary.
    pub fn status_code(&self) -> u16 {
        match self {
            AppError::NotFound { .. } => 404,
            AppError::Unauthorized(_) => 401,
            AppError::Forbidden(_) => 403,
            AppError::Validation(_) | AppError::DanglingReference { .. } => 422,
            AppError::UniqueViolation { .. } => 409,
            AppError::BadRequest(_) => 400,
            AppError::Database(_) | AppError::Internal(_) | AppError::Config(_) => 500,
        }
    }
}

pub type AppResult<T> = Result<T, AppError>;

/// Field-keyed validation errors, collected before any database access.
#[derive(Error, Debug, Default, Clone)]
#[error("{}", self.full_messages().join(", "))]
pub struct ValidationErrors {
    /// field name -> messages
    pub errors: HashMap<String, Vec<String>>,
}

impl ValidationErrors {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add(&mut self, field: impl Into<String>, message: impl Into<String>) {
        self.errors
            .entry(field.into())
            .or_default()
            .push(message.into());
    }

    pub fn is_empty(&self) -> bool {
        self.errors.is_empty()
    }

    pub fn has_error(&self, field: &str) -> bool {
        self.errors.contains_key(field)
    }

    pub fn merge(&mut self, other: ValidationErrors) {
        for (field, messages) in other.errors {
            self.errors.entry(field).or_default().extend(messages);
        }
    }

    pub fn full_messages(&self) -> Vec<String> {
        let mut fields: Vec<_> = self.errors.iter().collect();
        fields.sort_by_key(|(field, _)| field.clone());
        fields
            .into_iter()
            .flat_map(|(field, messages)| {
                messages.iter().map(move |m| format!("{} {}", field, m))
            })
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn status_codes_follow_the_envelope_table() {
        assert_eq!(AppError::not_found("Assistant", 7).status_code(), 404);
        assert_eq!(AppError::unauthorized("nope").status_code(), 401);
        assert_eq!(AppError::forbidden("nope").status_code(), 403);
        assert_eq!(
            AppError::UniqueViolation { field: "email".into() }.status_code(),
            409
        );
        assert_eq!(
            AppError::DanglingReference { entity: "contact".into() }.status_code(),
            422
        );
        assert_eq!(AppError::Database("boom".into()).status_code(), 500);
    }

    #[test]
    fn not_found_message_names_entity_and_id() {
        let err = AppError::not_found("Supplier", 42);
        assert_eq!(err.to_string(), "Supplier with id 42 not found");
    }

    #[test]
    fn validation_errors_collect_and_merge() {
        let mut errors = ValidationErrors::new();
        errors.add("name", "must not be empty");
        errors.add("name", "is too long");

        let mut other = ValidationErrors::new();
        other.add("email", "is invalid");
        errors.merge(other);

        assert!(errors.has_error("name"));
        assert!(errors.has_error("email"));
        assert_eq!(errors.full_messages().len(), 3);
    }
}
