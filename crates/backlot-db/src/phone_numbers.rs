//! Phone number repository.

use backlot_core::{Id, PageParams, Paginated};
use backlot_models::{CreatePhoneNumber, PhoneNumber, UpdatePhoneNumber};
use serde::Deserialize;
use sqlx::PgPool;

use crate::repository::{RepoError, RepoResult};

const TABLE: &str = "phone_numbers";
const COLUMNS: &str =
    "id, number, label, provider, assistant_id, active, created_at, updated_at";

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PhoneNumberFilter {
    pub active: Option<bool>,
    pub assistant_id: Option<Id>,
}

#[derive(Clone)]
pub struct PhoneNumberRepo {
    pool: PgPool,
}

impl PhoneNumberRepo {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    pub async fn list(
        &self,
        filter: &PhoneNumberFilter,
        page: PageParams,
    ) -> RepoResult<Paginated<PhoneNumber>> {
        let items = sqlx::query_as::<_, PhoneNumber>(&format!(
            r#"
            SELECT {COLUMNS} FROM phone_numbers
            WHERE ($1::bool IS NULL OR active = $1)
              AND ($2::bigint IS NULL OR assistant_id = $2)
            ORDER BY id
            LIMIT $3 OFFSET $4
            "#
        ))
        .bind(filter.active)
        .bind(filter.assistant_id)
        .bind(page.limit())
        .bind(page.offset())
        .fetch_all(&self.pool)
        .await?;

        let total = sqlx::query_scalar::<_, i64>(
            r#"
            SELECT COUNT(*) FROM phone_numbers
            WHERE ($1::bool IS NULL OR active = $1)
              AND ($2::bigint IS NULL OR assistant_id = $2)
            "#,
        )
        .bind(filter.active)
        .bind(filter.assistant_id)
        .fetch_one(&self.pool)
        .await?;

        Ok(Paginated::new(items, total, page))
    }

    pub async fn find(&self, id: Id) -> RepoResult<PhoneNumber> {
        sqlx::query_as::<_, PhoneNumber>(&format!(
            "SELECT {COLUMNS} FROM phone_numbers WHERE id = $1"
        ))
        .bind(id)
        .fetch_optional(&self.pool)
        .await?
        .ok_or(RepoError::NotFound { entity: "PhoneNumber", id })
    }

    pub async fn create(&self, dto: CreatePhoneNumber) -> RepoResult<PhoneNumber> {
        sqlx::query_as::<_, PhoneNumber>(&format!(
            r#"
            INSERT INTO phone_numbers (number, label, provider, assistant_id, active)
            VALUES ($1, $2, $3, $4, $5)
            RETURNING {COLUMNS}
            "#
        ))
        .bind(&dto.number)
        .bind(&dto.label)
        .bind(&dto.provider)
        .bind(dto.assistant_id)
        .bind(dto.active)
        .fetch_one(&self.pool)
        .await
        .map_err(|e| RepoError::classify(e, TABLE))
    }

    pub async fn update(&self, id: Id, dto: UpdatePhoneNumber) -> RepoResult<PhoneNumber> {
        sqlx::query_as::<_, PhoneNumber>(&format!(
            r#"
            UPDATE phone_numbers SET
                number = COALESCE($1, number),
                label = COALESCE($2, label),
                provider = COALESCE($3, provider),
                assistant_id = COALESCE($4, assistant_id),
                active = COALESCE($5, active),
                updated_at = NOW()
            WHERE id = $6
            RETURNING {COLUMNS}
            "#
        ))
        .bind(&dto.number)
        .bind(&dto.label)
        .bind(&dto.provider)
        .bind(dto.assistant_id)
        .bind(dto.active)
        .bind(id)
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| RepoError::classify(e, TABLE))?
        .ok_or(RepoError::NotFound { entity: "PhoneNumber", id })
    }

    pub async fn delete(&self, id: Id) -> RepoResult<()> {
        let result = sqlx::query("DELETE FROM phone_numbers WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await?;

        if result.rows_affected() == 0 {
            return Err(RepoError::NotFound { entity: "PhoneNumber", id });
        }
        Ok(())
    }
}
