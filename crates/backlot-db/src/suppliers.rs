//! Supplier repository.

use backlot_core::{Id, PageParams, Paginated};
use backlot_models::{CreateSupplier, Supplier, UpdateSupplier};
use serde::Deserialize;
use sqlx::PgPool;

use crate::repository::{RepoError, RepoResult};

const TABLE: &str = "suppliers";
const COLUMNS: &str = "id, name, contact_name, email, phone, address, lead_time_days, \
                       active, created_at, updated_at";

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SupplierFilter {
    pub active: Option<bool>,
    pub search: Option<String>,
}

#[derive(Clone)]
pub struct SupplierRepo {
    pool: PgPool,
}

impl SupplierRepo {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    pub async fn list(
        &self,
        filter: &SupplierFilter,
        page: PageParams,
    ) -> RepoResult<Paginated<Supplier>> {
        let items = sqlx::query_as::<_, Supplier>(&format!(
            r#"
            SELECT {COLUMNS} FROM suppliers
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
            SELECT COUNT(*) FROM suppliers
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

    pub async fn find(&self, id: Id) -> RepoResult<Supplier> {
        sqlx::query_as::<_, Supplier>(&format!("SELECT {COLUMNS} FROM suppliers WHERE id = $1"))
            .bind(id)
            .fetch_optional(&self.pool)
            .await?
            .ok_or(RepoError::NotFound { entity: "Supplier", id })
    }

    pub async fn create(&self, dto: CreateSupplier) -> RepoResult<Supplier> {
        sqlx::query_as::<_, Supplier>(&format!(
            r#"
            INSERT INTO suppliers
                (name, contact_name, email, phone, address, lead_time_days, active)
            VALUES ($1, $2, $3, $4, $5, $6, $7)
            RETURNING {COLUMNS}
            "#
        ))
        .bind(&dto.name)
        .bind(&dto.contact_name)
        .bind(&dto.email)
        .bind(&dto.phone)
        .bind(&dto.address)
        .bind(dto.lead_time_days)
        .bind(dto.active)
        .fetch_one(&self.pool)
        .await
        .map_err(|e| RepoError::classify(e, TABLE))
    }

    pub async fn update(&self, id: Id, dto: UpdateSupplier) -> RepoResult<Supplier> {
        sqlx::query_as::<_, Supplier>(&format!(
            r#"
            UPDATE suppliers SET
                name = COALESCE($1, name),
                contact_name = COALESCE($2, contact_name),
                email = COALESCE($3, email),
                phone = COALESCE($4, phone),
                address = COALESCE($5, address),
                lead_time_days = COALESCE($6, lead_time_days),
                active = COALESCE($7, active),
                updated_at = NOW()
            WHERE id = $8
            RETURNING {COLUMNS}
            "#
        ))
        .bind(&dto.name)
        .bind(&dto.contact_name)
        .bind(&dto.email)
        .bind(&dto.phone)
        .bind(&dto.address)
        .bind(dto.lead_time_days)
        .bind(dto.active)
        .bind(id)
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| RepoError::classify(e, TABLE))?
        .ok_or(RepoError::NotFound { entity: "Supplier", id })
    }

    pub async fn delete(&self, id: Id) -> RepoResult<()> {
        let result = sqlx::query("DELETE FROM suppliers WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await?;

        if result.rows_affected() == 0 {
            return Err(RepoError::NotFound { entity: "Supplier", id });
        }
        Ok(())
    }
}
