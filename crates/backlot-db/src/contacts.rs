//! Contact repository.

use backlot_core::{Id, PageParams, Paginated};
use backlot_models::{Contact, CreateContact, UpdateContact};
use serde::Deserialize;
use sqlx::PgPool;

use crate::repository::{RepoError, RepoResult};

const TABLE: &str = "contacts";
const COLUMNS: &str = "id, user_id, name, phone, email, notes, created_at, updated_at";

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ContactFilter {
    pub search: Option<String>,
}

#[derive(Clone)]
pub struct ContactRepo {
    pool: PgPool,
}

impl ContactRepo {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    pub async fn list(
        &self,
        filter: &ContactFilter,
        page: PageParams,
    ) -> RepoResult<Paginated<Contact>> {
        let items = sqlx::query_as::<_, Contact>(&format!(
            r#"
            SELECT {COLUMNS} FROM contacts
            WHERE ($1::text IS NULL
                   OR name ILIKE '%' || $1 || '%'
                   OR phone ILIKE '%' || $1 || '%'
                   OR email ILIKE '%' || $1 || '%')
            ORDER BY id
            LIMIT $2 OFFSET $3
            "#
        ))
        .bind(&filter.search)
        .bind(page.limit())
        .bind(page.offset())
        .fetch_all(&self.pool)
        .await?;

        let total = sqlx::query_scalar::<_, i64>(
            r#"
            SELECT COUNT(*) FROM contacts
            WHERE ($1::text IS NULL
                   OR name ILIKE '%' || $1 || '%'
                   OR phone ILIKE '%' || $1 || '%'
                   OR email ILIKE '%' || $1 || '%')
            "#,
        )
        .bind(&filter.search)
        .fetch_one(&self.pool)
        .await?;

        Ok(Paginated::new(items, total, page))
    }

    pub async fn find(&self, id: Id) -> RepoResult<Contact> {
        sqlx::query_as::<_, Contact>(&format!("SELECT {COLUMNS} FROM contacts WHERE id = $1"))
            .bind(id)
            .fetch_optional(&self.pool)
            .await?
            .ok_or(RepoError::NotFound { entity: "Contact", id })
    }

    pub async fn create(&self, user_id: Id, dto: CreateContact) -> RepoResult<Contact> {
        sqlx::query_as::<_, Contact>(&format!(
            r#"
            INSERT INTO contacts (user_id, name, phone, email, notes)
            VALUES ($1, $2, $3, $4, $5)
            RETURNING {COLUMNS}
            "#
        ))
        .bind(user_id)
        .bind(&dto.name)
        .bind(&dto.phone)
        .bind(&dto.email)
        .bind(&dto.notes)
        .fetch_one(&self.pool)
        .await
        .map_err(|e| RepoError::classify(e, TABLE))
    }

    pub async fn update(&self, id: Id, dto: UpdateContact) -> RepoResult<Contact> {
        sqlx::query_as::<_, Contact>(&format!(
            r#"
            UPDATE contacts SET
                name = COALESCE($1, name),
                phone = COALESCE($2, phone),
                email = COALESCE($3, email),
                notes = COALESCE($4, notes),
                updated_at = NOW()
            WHERE id = $5
            RETURNING {COLUMNS}
            "#
        ))
        .bind(&dto.name)
        .bind(&dto.phone)
        .bind(&dto.email)
        .bind(&dto.notes)
        .bind(id)
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| RepoError::classify(e, TABLE))?
        .ok_or(RepoError::NotFound { entity: "Contact", id })
    }

    pub async fn delete(&self, id: Id) -> RepoResult<()> {
        let result = sqlx::query("DELETE FROM contacts WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await?;

        if result.rows_affected() == 0 {
            return Err(RepoError::NotFound { entity: "Contact", id });
        }
        Ok(())
    }
}
