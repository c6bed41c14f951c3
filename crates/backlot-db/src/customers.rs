//! Customer repository.

use backlot_core::{Id, PageParams, Paginated};
use backlot_models::{CreateCustomer, Customer, UpdateCustomer};
use serde::Deserialize;
use sqlx::PgPool;

use crate::repository::{RepoError, RepoResult};

const TABLE: &str = "customers";
const COLUMNS: &str = "id, name, email, phone, company, address, created_at, updated_at";

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CustomerFilter {
    pub search: Option<String>,
}

#[derive(Clone)]
pub struct CustomerRepo {
    pool: PgPool,
}

impl CustomerRepo {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    pub async fn list(
        &self,
        filter: &CustomerFilter,
        page: PageParams,
    ) -> RepoResult<Paginated<Customer>> {
        let items = sqlx::query_as::<_, Customer>(&format!(
            r#"
            SELECT {COLUMNS} FROM customers
            WHERE ($1::text IS NULL OR name ILIKE '%' || $1 || '%' OR email ILIKE '%' || $1 || '%')
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
            SELECT COUNT(*) FROM customers
            WHERE ($1::text IS NULL OR name ILIKE '%' || $1 || '%' OR email ILIKE '%' || $1 || '%')
            "#,
        )
        .bind(&filter.search)
        .fetch_one(&self.pool)
        .await?;

        Ok(Paginated::new(items, total, page))
    }

    pub async fn find(&self, id: Id) -> RepoResult<Customer> {
        sqlx::query_as::<_, Customer>(&format!("SELECT {COLUMNS} FROM customers WHERE id = $1"))
            .bind(id)
            .fetch_optional(&self.pool)
            .await?
            .ok_or(RepoError::NotFound { entity: "Customer", id })
    }

    pub async fn create(&self, dto: CreateCustomer) -> RepoResult<Customer> {
        sqlx::query_as::<_, Customer>(&format!(
            r#"
            INSERT INTO customers (name, email, phone, company, address)
            VALUES ($1, $2, $3, $4, $5)
            RETURNING {COLUMNS}
            "#
        ))
        .bind(&dto.name)
        .bind(&dto.email)
        .bind(&dto.phone)
        .bind(&dto.company)
        .bind(&dto.address)
        .fetch_one(&self.pool)
        .await
        .map_err(|e| RepoError::classify(e, TABLE))
    }

    pub async fn update(&self, id: Id, dto: UpdateCustomer) -> RepoResult<Customer> {
        sqlx::query_as::<_, Customer>(&format!(
            r#"
            UPDATE customers SET
                name = COALESCE($1, name),
                email = COALESCE($2, email),
                phone = COALESCE($3, phone),
                company = COALESCE($4, company),
                address = COALESCE($5, address),
                updated_at = NOW()
            WHERE id = $6
            RETURNING {COLUMNS}
            "#
        ))
        .bind(&dto.name)
        .bind(&dto.email)
        .bind(&dto.phone)
        .bind(&dto.company)
        .bind(&dto.address)
        .bind(id)
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| RepoError::classify(e, TABLE))?
        .ok_or(RepoError::NotFound { entity: "Customer", id })
    }

    pub async fn delete(&self, id: Id) -> RepoResult<()> {
        let result = sqlx::query("DELETE FROM customers WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await?;

        if result.rows_affected() == 0 {
            return Err(RepoError::NotFound { entity: "Customer", id });
        }
        Ok(())
    }
}
