//! Call repository.

use backlot_core::{Id, PageParams, Paginated};
use backlot_models::{Call, CallStatus, CreateCall, UpdateCall};
use serde::Deserialize;
use sqlx::PgPool;

use crate::repository::{RepoError, RepoResult};

const TABLE: &str = "calls";
const COLUMNS: &str = "id, assistant_id, contact_id, phone_number_id, status, started_at, \
                       ended_at, duration_secs, transcript, recording_url, created_at, updated_at";

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CallFilter {
    pub status: Option<CallStatus>,
    pub assistant_id: Option<Id>,
}

#[derive(Clone)]
pub struct CallRepo {
    pool: PgPool,
}

impl CallRepo {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    pub async fn list(
        &self,
        filter: &CallFilter,
        page: PageParams,
    ) -> RepoResult<Paginated<Call>> {
        let items = sqlx::query_as::<_, Call>(&format!(
            r#"
            SELECT {COLUMNS} FROM calls
            WHERE ($1::call_status IS NULL OR status = $1)
              AND ($2::bigint IS NULL OR assistant_id = $2)
            ORDER BY id DESC
            LIMIT $3 OFFSET $4
            "#
        ))
        .bind(filter.status)
        .bind(filter.assistant_id)
        .bind(page.limit())
        .bind(page.offset())
        .fetch_all(&self.pool)
        .await?;

        let total = sqlx::query_scalar::<_, i64>(
            r#"
            SELECT COUNT(*) FROM calls
            WHERE ($1::call_status IS NULL OR status = $1)
              AND ($2::bigint IS NULL OR assistant_id = $2)
            "#,
        )
        .bind(filter.status)
        .bind(filter.assistant_id)
        .fetch_one(&self.pool)
        .await?;

        Ok(Paginated::new(items, total, page))
    }

    pub async fn find(&self, id: Id) -> RepoResult<Call> {
        sqlx::query_as::<_, Call>(&format!("SELECT {COLUMNS} FROM calls WHERE id = $1"))
            .bind(id)
            .fetch_optional(&self.pool)
            .await?
            .ok_or(RepoError::NotFound { entity: "Call", id })
    }

    pub async fn create(&self, dto: CreateCall) -> RepoResult<Call> {
        sqlx::query_as::<_, Call>(&format!(
            r#"
            INSERT INTO calls (assistant_id, contact_id, phone_number_id, status, started_at)
            VALUES ($1, $2, $3, $4, $5)
            RETURNING {COLUMNS}
            "#
        ))
        .bind(dto.assistant_id)
        .bind(dto.contact_id)
        .bind(dto.phone_number_id)
        .bind(dto.status)
        .bind(dto.started_at)
        .fetch_one(&self.pool)
        .await
        .map_err(|e| RepoError::classify(e, TABLE))
    }

    pub async fn update(&self, id: Id, dto: UpdateCall) -> RepoResult<Call> {
        sqlx::query_as::<_, Call>(&format!(
            r#"
            UPDATE calls SET
                status = COALESCE($1, status),
                started_at = COALESCE($2, started_at),
                ended_at = COALESCE($3, ended_at),
                duration_secs = COALESCE($4, duration_secs),
                transcript = COALESCE($5, transcript),
                recording_url = COALESCE($6, recording_url),
                updated_at = NOW()
            WHERE id = $7
            RETURNING {COLUMNS}
            "#
        ))
        .bind(dto.status)
        .bind(dto.started_at)
        .bind(dto.ended_at)
        .bind(dto.duration_secs)
        .bind(&dto.transcript)
        .bind(&dto.recording_url)
        .bind(id)
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| RepoError::classify(e, TABLE))?
        .ok_or(RepoError::NotFound { entity: "Call", id })
    }

    pub async fn delete(&self, id: Id) -> RepoResult<()> {
        let result = sqlx::query("DELETE FROM calls WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await?;

        if result.rows_affected() == 0 {
            return Err(RepoError::NotFound { entity: "Call", id });
        }
        Ok(())
    }
}
