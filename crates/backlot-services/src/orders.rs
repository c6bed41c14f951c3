//! Order placement and status transitions.

use std::collections::HashMap;

use backlot_core::{AppError, AppResult, Id, ValidationErrors};
use backlot_db::orders::NewOrderItem;
use backlot_db::{OrderRepo, ProductRepo};
use backlot_models::{CreateOrder, Order, OrderWithItems, UpdateOrder};
use sqlx::PgPool;

#[derive(Clone)]
pub struct OrderService {
    orders: OrderRepo,
    products: ProductRepo,
}

impl OrderService {
    pub fn new(pool: PgPool) -> Self {
        Self {
            orders: OrderRepo::new(pool.clone()),
            products: ProductRepo::new(pool),
        }
    }

    /// Price the line items against the current catalog and store the order
    /// atomically. The unit price is captured at placement time, so later
    /// catalog changes never rewrite history.
    pub async fn place(&self, dto: CreateOrder) -> AppResult<OrderWithItems> {
        let product_ids: Vec<Id> = dto.items.iter().map(|i| i.product_id).collect();
        let products = self.products.find_many(&product_ids).await?;
        let by_id: HashMap<Id, _> = products.into_iter().map(|p| (p.id, p)).collect();

        let mut errors = ValidationErrors::new();
        let mut items = Vec::with_capacity(dto.items.len());
        for (index, item) in dto.items.iter().enumerate() {
            match by_id.get(&item.product_id) {
                Some(product) if product.active => items.push(NewOrderItem {
                    product_id: item.product_id,
                    quantity: item.quantity,
                    unit_price_cents: product.price_cents,
                }),
                Some(_) => errors.add(
                    format!("items[{}].productId", index),
                    "refers to an inactive product",
                ),
                None => errors.add(
                    format!("items[{}].productId", index),
                    "refers to an unknown product",
                ),
            }
        }
        if !errors.is_empty() {
            return Err(AppError::Validation(errors));
        }

        let placed = self.orders.create(dto.customer_id, dto.notes, items).await?;
        tracing::info!(
            order_id = placed.order.id,
            total_cents = placed.order.total_cents,
            "order placed"
        );
        Ok(placed)
    }

    /// Apply a status change and/or notes edit. Status changes must follow
    /// the transition matrix.
    pub async fn update(&self, id: Id, dto: UpdateOrder) -> AppResult<Order> {
        if let Some(next) = dto.status {
            let current = self.orders.find(id).await?;
            if !current.status.can_transition_to(next) {
                let mut errors = ValidationErrors::new();
                errors.add(
                    "status",
                    format!(
                        "cannot transition from {} to {}",
                        current.status.as_str(),
                        next.as_str()
                    ),
                );
                return Err(AppError::Validation(errors));
            }
        }

        Ok(self.orders.update(id, dto.status, dto.notes).await?)
    }

    pub async fn find_with_items(&self, id: Id) -> AppResult<OrderWithItems> {
        Ok(self.orders.find_with_items(id).await?)
    }
}
