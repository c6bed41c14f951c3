//! User repository.
//!
//! Takes pre-hashed passwords; hashing lives in `backlot-services`.

use backlot_core::{Id, PageParams, Paginated};
use backlot_models::{User, UserRole};
use serde::Deserialize;
use sqlx::PgPool;

use crate::repository::{RepoError, RepoResult};

const TABLE: &str = "users";
const COLUMNS: &str = "id, email, name, password_hash, role, active, created_at, updated_at";

/// Insert payload with the password already hashed.
#[derive(Debug, Clone)]
pub struct NewUser {
    pub email: String,
    pub name: String,
    pub password_hash: String,
    pub role: UserRole,
    pub active: bool,
}

/// Partial update; `None` leaves the column untouched.
#[derive(Debug, Clone, Default)]
pub struct UserChanges {
    pub email: Option<String>,
    pub name: Option<String>,
    pub password_hash: Option<String>,
    pub role: Option<UserRole>,
    pub active: Option<bool>,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UserFilter {
    pub active: Option<bool>,
    pub search: Option<String>,
}

#[derive(Clone)]
pub struct UserRepo {
    pool: PgPool,
}

impl UserRepo {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    pub async fn list(
        &self,
        filter: &UserFilter,
        page: PageParams,
    ) -> RepoResult<Paginated<User>> {
        let items = sqlx::query_as::<_, User>(&format!(
            r#"
            SELECT {COLUMNS} FROM users
            WHERE ($1::bool IS NULL OR active = $1)
              AND ($2::text IS NULL OR name ILIKE '%' || $2 || '%' OR email ILIKE '%' || $2 || '%')
            ORDER BY id
            LIMIT $3 OFFSET $4
            "#
        ))
        .bind(filter.active)
        .bind(&filter.search)
        .bind(page.limit())
        .bind(page.offset())
        .fetch_all(&self.pool)
        .await?;

        let total = sqlx::query_scalar::<_, i64>(
            r#"
            SELECT COUNT(*) FROM users
            WHERE ($1::bool IS NULL OR active = $1)
              AND ($2::text IS NULL OR name ILIKE '%' || $2 || '%' OR email ILIKE '%' || $2 || '%')
            "#,
        )
        .bind(filter.active)
        .bind(&filter.search)
        .fetch_one(&self.pool)
        .await?;

        Ok(Paginated::new(items, total, page))
    }

    pub async fn find(&self, id: Id) -> RepoResult<User> {
        sqlx::query_as::<_, User>(&format!("SELECT {COLUMNS} FROM users WHERE id = $1"))
            .bind(id)
            .fetch_optional(&self.pool)
            .await?
            .ok_or(RepoError::NotFound { entity: "User", id })
    }

    pub async fn find_by_email(&self, email: &str) -> RepoResult<Option<User>> {
        let row = sqlx::query_as::<_, User>(&format!(
            "SELECT {COLUMNS} FROM users WHERE email = $1"
        ))
        .bind(email)
        .fetch_optional(&self.pool)
        .await?;

        Ok(row)
    }

    pub async fn create(&self, new: NewUser) -> RepoResult<User> {
        sqlx::query_as::<_, User>(&format!(
            r#"
            INSERT INTO users (email, name, password_hash, role, active)
            VALUES ($1, $2, $3, $4, $5)
            RETURNING {COLUMNS}
            "#
        ))
        .bind(&new.email)
        .bind(&new.name)
        .bind(&new.password_hash)
        .bind(new.role)
        .bind(new.active)
        .fetch_one(&self.pool)
        .await
        .map_err(|e| RepoError::classify(e, TABLE))
    }

    pub async fn update(&self, id: Id, changes: UserChanges) -> RepoResult<User> {
        sqlx::query_as::<_, User>(&format!(
            r#"
            UPDATE users SET
                email = COALESCE($1, email),
                name = COALESCE($2, name),
                password_hash = COALESCE($3, password_hash),
                role = COALESCE($4, role),
                active = COALESCE($5, active),
                updated_at = NOW()
            WHERE id = $6
            RETURNING {COLUMNS}
            "#
        ))
        .bind(&changes.email)
        .bind(&changes.name)
        .bind(&changes.password_hash)
        .bind(changes.role)
        .bind(changes.active)
        .bind(id)
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| RepoError::classify(e, TABLE))?
        .ok_or(RepoError::NotFound { entity: "User", id })
    }

    pub async fn delete(&self, id: Id) -> RepoResult<()> {
        let result = sqlx::query("DELETE FROM users WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await?;

        if result.rows_affected() == 0 {
            return Err(RepoError::NotFound { entity: "User", id });
        }
        Ok(())
    }
}
