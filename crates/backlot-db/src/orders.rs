//! Order repository.
//!
//! Orders and their line items are written in one transaction; the stored
//! total is always the sum over items at placement time.

use backlot_core::{Id, PageParams, Paginated};
use backlot_models::{Order, OrderItem, OrderStatus, OrderWithItems};
use serde::Deserialize;
use sqlx::PgPool;

use crate::repository::{RepoError, RepoResult};

const TABLE: &str = "orders";
const COLUMNS: &str =
    "id, customer_id, status, total_cents, notes, placed_at, created_at, updated_at";
const ITEM_COLUMNS: &str = "id, order_id, product_id, quantity, unit_price_cents";

/// A priced line item ready for insertion. Pricing happens in the service
/// layer, which captures the product's current price.
#[derive(Debug, Clone)]
pub struct NewOrderItem {
    pub product_id: Id,
    pub quantity: i32,
    pub unit_price_cents: i64,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OrderFilter {
    pub status: Option<OrderStatus>,
    pub customer_id: Option<Id>,
}

#[derive(Clone)]
pub struct OrderRepo {
    pool: PgPool,
}

impl OrderRepo {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    pub async fn list(
        &self,
        filter: &OrderFilter,
        page: PageParams,
    ) -> RepoResult<Paginated<Order>> {
        let items = sqlx::query_as::<_, Order>(&format!(
            r#"
            SELECT {COLUMNS} FROM orders
            WHERE ($1::order_status IS NULL OR status = $1)
              AND ($2::bigint IS NULL OR customer_id = $2)
            ORDER BY id DESC
            LIMIT $3 OFFSET $4
            "#
        ))
        .bind(filter.status)
        .bind(filter.customer_id)
        .bind(page.limit())
        .bind(page.offset())
        .fetch_all(&self.pool)
        .await?;

        let total = sqlx::query_scalar::<_, i64>(
            r#"
            SELECT COUNT(*) FROM orders
            WHERE ($1::order_status IS NULL OR status = $1)
              AND ($2::bigint IS NULL OR customer_id = $2)
            "#,
        )
        .bind(filter.status)
        .bind(filter.customer_id)
        .fetch_one(&self.pool)
        .await?;

        Ok(Paginated::new(items, total, page))
    }

    pub async fn find(&self, id: Id) -> RepoResult<Order> {
        sqlx::query_as::<_, Order>(&format!("SELECT {COLUMNS} FROM orders WHERE id = $1"))
            .bind(id)
            .fetch_optional(&self.pool)
            .await?
            .ok_or(RepoError::NotFound { entity: "Order", id })
    }

    pub async fn find_with_items(&self, id: Id) -> RepoResult<OrderWithItems> {
        let order = self.find(id).await?;
        let items = sqlx::query_as::<_, OrderItem>(&format!(
            "SELECT {ITEM_COLUMNS} FROM order_items WHERE order_id = $1 ORDER BY id"
        ))
        .bind(id)
        .fetch_all(&self.pool)
        .await?;

        Ok(OrderWithItems { order, items })
    }

    /// Insert the order and all line items atomically. The total is computed
    /// here from the priced items.
    pub async fn create(
        &self,
        customer_id: Id,
        notes: Option<String>,
        items: Vec<NewOrderItem>,
    ) -> RepoResult<OrderWithItems> {
        let total_cents: i64 = items
            .iter()
            .map(|i| i.quantity as i64 * i.unit_price_cents)
            .sum();

        let mut tx = self.pool.begin().await?;

        let order = sqlx::query_as::<_, Order>(&format!(
            r#"
            INSERT INTO orders (customer_id, status, total_cents, notes)
            VALUES ($1, 'pending', $2, $3)
            RETURNING {COLUMNS}
            "#
        ))
        .bind(customer_id)
        .bind(total_cents)
        .bind(&notes)
        .fetch_one(&mut *tx)
        .await
        .map_err(|e| RepoError::classify(e, TABLE))?;

        let mut inserted = Vec::with_capacity(items.len());
        for item in &items {
            let row = sqlx::query_as::<_, OrderItem>(&format!(
                r#"
                INSERT INTO order_items (order_id, product_id, quantity, unit_price_cents)
                VALUES ($1, $2, $3, $4)
                RETURNING {ITEM_COLUMNS}
                "#
            ))
            .bind(order.id)
            .bind(item.product_id)
            .bind(item.quantity)
            .bind(item.unit_price_cents)
            .fetch_one(&mut *tx)
            .await
            .map_err(|e| RepoError::classify(e, "order_items"))?;
            inserted.push(row);
        }

        tx.commit().await?;

        Ok(OrderWithItems { order, items: inserted })
    }

    pub async fn update(
        &self,
        id: Id,
        status: Option<OrderStatus>,
        notes: Option<String>,
    ) -> RepoResult<Order> {
        sqlx::query_as::<_, Order>(&format!(
            r#"
            UPDATE orders SET
                status = COALESCE($1, status),
                notes = COALESCE($2, notes),
                updated_at = NOW()
            WHERE id = $3
            RETURNING {COLUMNS}
            "#
        ))
        .bind(status)
        .bind(&notes)
        .bind(id)
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| RepoError::classify(e, TABLE))?
        .ok_or(RepoError::NotFound { entity: "Order", id })
    }

    pub async fn delete(&self, id: Id) -> RepoResult<()> {
        let result = sqlx::query("DELETE FROM orders WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await?;

        if result.rows_affected() == 0 {
            return Err(RepoError::NotFound { entity: "Order", id });
        }
        Ok(())
    }
}
