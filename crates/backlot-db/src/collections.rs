//! Collection repository, including the collection/product association.

use backlot_core::{Id, PageParams, Paginated};
use backlot_models::{Collection, CreateCollection, Product, UpdateCollection};
use serde::Deserialize;
use sqlx::PgPool;

use crate::repository::{RepoError, RepoResult};

const TABLE: &str = "collections";
const COLUMNS: &str = "id, name, description, active, created_at, updated_at";

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CollectionFilter {
    pub active: Option<bool>,
}

#[derive(Clone)]
pub struct CollectionRepo {
    pool: PgPool,
}

impl CollectionRepo {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    pub async fn list(
        &self,
        filter: &CollectionFilter,
        page: PageParams,
    ) -> RepoResult<Paginated<Collection>> {
        let items = sqlx::query_as::<_, Collection>(&format!(
            r#"
            SELECT {COLUMNS} FROM collections
            WHERE ($1::bool IS NULL OR active = $1)
            ORDER BY id
            LIMIT $2 OFFSET $3
            "#
        ))
        .bind(filter.active)
        .bind(page.limit())
        .bind(page.offset())
        .fetch_all(&self.pool)
        .await?;

        let total = sqlx::query_scalar::<_, i64>(
            "SELECT COUNT(*) FROM collections WHERE ($1::bool IS NULL OR active = $1)",
        )
        .bind(filter.active)
        .fetch_one(&self.pool)
        .await?;

        Ok(Paginated::new(items, total, page))
    }

    pub async fn find(&self, id: Id) -> RepoResult<Collection> {
        sqlx::query_as::<_, Collection>(&format!(
            "SELECT {COLUMNS} FROM collections WHERE id = $1"
        ))
        .bind(id)
        .fetch_optional(&self.pool)
        .await?
        .ok_or(RepoError::NotFound { entity: "Collection", id })
    }

    pub async fn create(&self, dto: CreateCollection) -> RepoResult<Collection> {
        sqlx::query_as::<_, Collection>(&format!(
            r#"
            INSERT INTO collections (name, description, active)
            VALUES ($1, $2, $3)
            RETURNING {COLUMNS}
            "#
        ))
        .bind(&dto.name)
        .bind(&dto.description)
        .bind(dto.active)
        .fetch_one(&self.pool)
        .await
        .map_err(|e| RepoError::classify(e, TABLE))
    }

    pub async fn update(&self, id: Id, dto: UpdateCollection) -> RepoResult<Collection> {
        sqlx::query_as::<_, Collection>(&format!(
            r#"
            UPDATE collections SET
                name = COALESCE($1, name),
                description = COALESCE($2, description),
                active = COALESCE($3, active),
                updated_at = NOW()
            WHERE id = $4
            RETURNING {COLUMNS}
            "#
        ))
        .bind(&dto.name)
        .bind(&dto.description)
        .bind(dto.active)
        .bind(id)
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| RepoError::classify(e, TABLE))?
        .ok_or(RepoError::NotFound { entity: "Collection", id })
    }

    pub async fn delete(&self, id: Id) -> RepoResult<()> {
        let result = sqlx::query("DELETE FROM collections WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await?;

        if result.rows_affected() == 0 {
            return Err(RepoError::NotFound { entity: "Collection", id });
        }
        Ok(())
    }

    /// Products currently in a collection.
    pub async fn products(&self, collection_id: Id) -> RepoResult<Vec<Product>> {
        let rows = sqlx::query_as::<_, Product>(
            r#"
            SELECT p.id, p.supplier_id, p.sku, p.name, p.description, p.price_cents,
                   p.stock, p.active, p.created_at, p.updated_at
            FROM products p
            JOIN collection_products cp ON cp.product_id = p.id
            WHERE cp.collection_id = $1
            ORDER BY p.id
            "#,
        )
        .bind(collection_id)
        .fetch_all(&self.pool)
        .await?;

        Ok(rows)
    }

    /// Attach products; already-attached ids are skipped.
    pub async fn attach_products(&self, collection_id: Id, product_ids: &[Id]) -> RepoResult<u64> {
        let result = sqlx::query(
            r#"
            INSERT INTO collection_products (collection_id, product_id)
            SELECT $1, unnest($2::bigint[])
            ON CONFLICT (collection_id, product_id) DO NOTHING
            "#,
        )
        .bind(collection_id)
        .bind(product_ids)
        .execute(&self.pool)
        .await
        .map_err(|e| RepoError::classify(e, "collection_products"))?;

        Ok(result.rows_affected())
    }

    pub async fn detach_product(&self, collection_id: Id, product_id: Id) -> RepoResult<()> {
        let result = sqlx::query(
            "DELETE FROM collection_products WHERE collection_id = $1 AND product_id = $2",
        )
        .bind(collection_id)
        .bind(product_id)
        .execute(&self.pool)
        .await?;

        if result.rows_affected() == 0 {
            return Err(RepoError::NotFound { entity: "Product", id: product_id });
        }
        Ok(())
    }
}
