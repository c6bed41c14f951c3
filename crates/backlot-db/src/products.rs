//! Product repository.

use backlot_core::{Id, PageParams, Paginated};
use backlot_models::{CreateProduct, Product, UpdateProduct};
use serde::Deserialize;
use sqlx::PgPool;

use crate::repository::{RepoError, RepoResult};

const TABLE: &str = "products";
const COLUMNS: &str = "id, supplier_id, sku, name, description, price_cents, stock, \
                       active, created_at, updated_at";

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProductFilter {
    pub supplier_id: Option<Id>,
    pub active: Option<bool>,
    pub search: Option<String>,
}

#[derive(Clone)]
pub struct ProductRepo {
    pool: PgPool,
}

impl ProductRepo {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    pub async fn list(
        &self,
        filter: &ProductFilter,
        page: PageParams,
    ) -> RepoResult<Paginated<Product>> {
        let items = sqlx::query_as::<_, Product>(&format!(
            r#"
            SELECT {COLUMNS} FROM products
            WHERE ($1::bigint IS NULL OR supplier_id = $1)
              AND ($2::bool IS NULL OR active = $2)
              AND ($3::text IS NULL OR name ILIKE '%' || $3 || '%' OR sku ILIKE '%' || $3 || '%')
            ORDER BY id
            LIMIT $4 OFFSET $5
            "#
        ))
        .bind(filter.supplier_id)
        .bind(filter.active)
        .bind(&filter.search)
        .bind(page.limit())
        .bind(page.offset())
        .fetch_all(&self.pool)
        .await?;

        let total = sqlx::query_scalar::<_, i64>(
            r#"
            SELECT COUNT(*) FROM products
            WHERE ($1::bigint IS NULL OR supplier_id = $1)
              AND ($2::bool IS NULL OR active = $2)
              AND ($3::text IS NULL OR name ILIKE '%' || $3 || '%' OR sku ILIKE '%' || $3 || '%')
            "#,
        )
        .bind(filter.supplier_id)
        .bind(filter.active)
        .bind(&filter.search)
        .fetch_one(&self.pool)
        .await?;

        Ok(Paginated::new(items, total, page))
    }

    pub async fn find(&self, id: Id) -> RepoResult<Product> {
        sqlx::query_as::<_, Product>(&format!("SELECT {COLUMNS} FROM products WHERE id = $1"))
            .bind(id)
            .fetch_optional(&self.pool)
            .await?
            .ok_or(RepoError::NotFound { entity: "Product", id })
    }

    /// Fetch several products at once; used for order placement pricing.
    pub async fn find_many(&self, ids: &[Id]) -> RepoResult<Vec<Product>> {
        let rows = sqlx::query_as::<_, Product>(&format!(
            "SELECT {COLUMNS} FROM products WHERE id = ANY($1)"
        ))
        .bind(ids)
        .fetch_all(&self.pool)
        .await?;

        Ok(rows)
    }

    pub async fn create(&self, dto: CreateProduct) -> RepoResult<Product> {
        sqlx::query_as::<_, Product>(&format!(
            r#"
            INSERT INTO products
                (supplier_id, sku, name, description, price_cents, stock, active)
            VALUES ($1, $2, $3, $4, $5, $6, $7)
            RETURNING {COLUMNS}
            "#
        ))
        .bind(dto.supplier_id)
        .bind(&dto.sku)
        .bind(&dto.name)
        .bind(&dto.description)
        .bind(dto.price_cents)
        .bind(dto.stock)
        .bind(dto.active)
        .fetch_one(&self.pool)
        .await
        .map_err(|e| RepoError::classify(e, TABLE))
    }

    pub async fn update(&self, id: Id, dto: UpdateProduct) -> RepoResult<Product> {
        sqlx::query_as::<_, Product>(&format!(
            r#"
            UPDATE products SET
                supplier_id = COALESCE($1, supplier_id),
                sku = COALESCE($2, sku),
                name = COALESCE($3, name),
                description = COALESCE($4, description),
                price_cents = COALESCE($5, price_cents),
                stock = COALESCE($6, stock),
                active = COALESCE($7, active),
                updated_at = NOW()
            WHERE id = $8
            RETURNING {COLUMNS}
            "#
        ))
        .bind(dto.supplier_id)
        .bind(&dto.sku)
        .bind(&dto.name)
        .bind(&dto.description)
        .bind(dto.price_cents)
        .bind(dto.stock)
        .bind(dto.active)
        .bind(id)
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| RepoError::classify(e, TABLE))?
        .ok_or(RepoError::NotFound { entity: "Product", id })
    }

    pub async fn delete(&self, id: Id) -> RepoResult<()> {
        let result = sqlx::query("DELETE FROM products WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await?;

        if result.rows_affected() == 0 {
            return Err(RepoError::NotFound { entity: "Product", id });
        }
        Ok(())
    }
}
