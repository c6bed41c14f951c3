//! Assistant repository.

use backlot_core::{Id, PageParams, Paginated};
use backlot_models::{Assistant, CreateAssistant, UpdateAssistant};
use serde::Deserialize;
use sqlx::PgPool;

use crate::repository::{RepoError, RepoResult};

const TABLE: &str = "assistants";
const COLUMNS: &str = "id, user_id, name, description, model, voice, first_message, \
                       system_prompt, active, created_at, updated_at";

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AssistantFilter {
    pub active: Option<bool>,
    pub search: Option<String>,
}

#[derive(Clone)]
pub struct AssistantRepo {
    pool: PgPool,
}

impl AssistantRepo {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    pub async fn list(
        &self,
        filter: &AssistantFilter,
        page: PageParams,
    ) -> RepoResult<Paginated<Assistant>> {
        let items = sqlx::query_as::<_, Assistant>(&format!(
            r#"
            SELECT {COLUMNS} FROM assistants
            WHERE ($1::bool IS NULL OR active = $1)
              AND ($2::text IS NULL OR name ILIKE '%' || $2 || '%')
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
            SELECT COUNT(*) FROM assistants
            WHERE ($1::bool IS NULL OR active = $1)
              AND ($2::text IS NULL OR name ILIKE '%' || $2 || '%')
            "#,
        )
        .bind(filter.active)
        .bind(&filter.search)
        .fetch_one(&self.pool)
        .await?;

        Ok(Paginated::new(items, total, page))
    }

    pub async fn find(&self, id: Id) -> RepoResult<Assistant> {
        sqlx::query_as::<_, Assistant>(&format!(
            "SELECT {COLUMNS} FROM assistants WHERE id = $1"
        ))
        .bind(id)
        .fetch_optional(&self.pool)
        .await?
        .ok_or(RepoError::NotFound { entity: "Assistant", id })
    }

    pub async fn create(&self, user_id: Id, dto: CreateAssistant) -> RepoResult<Assistant> {
        sqlx::query_as::<_, Assistant>(&format!(
            r#"
            INSERT INTO assistants
                (user_id, name, description, model, voice, first_message, system_prompt, active)
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8)
            RETURNING {COLUMNS}
            "#
        ))
        .bind(user_id)
        .bind(&dto.name)
        .bind(&dto.description)
        .bind(&dto.model)
        .bind(&dto.voice)
        .bind(&dto.first_message)
        .bind(&dto.system_prompt)
        .bind(dto.active)
        .fetch_one(&self.pool)
        .await
        .map_err(|e| RepoError::classify(e, TABLE))
    }

    pub async fn update(&self, id: Id, dto: UpdateAssistant) -> RepoResult<Assistant> {
        sqlx::query_as::<_, Assistant>(&format!(
            r#"
            UPDATE assistants SET
                name = COALESCE($1, name),
                description = COALESCE($2, description),
                model = COALESCE($3, model),
                voice = COALESCE($4, voice),
                first_message = COALESCE($5, first_message),
                system_prompt = COALESCE($6, system_prompt),
                active = COALESCE($7, active),
                updated_at = NOW()
            WHERE id = $8
            RETURNING {COLUMNS}
            "#
        ))
        .bind(&dto.name)
        .bind(&dto.description)
        .bind(&dto.model)
        .bind(&dto.voice)
        .bind(&dto.first_message)
        .bind(&dto.system_prompt)
        .bind(dto.active)
        .bind(id)
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| RepoError::classify(e, TABLE))?
        .ok_or(RepoError::NotFound { entity: "Assistant", id })
    }

    pub async fn delete(&self, id: Id) -> RepoResult<()> {
        let result = sqlx::query("DELETE FROM assistants WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await?;

        if result.rows_affected() == 0 {
            return Err(RepoError::NotFound { entity: "Assistant", id });
        }
        Ok(())
    }
}
