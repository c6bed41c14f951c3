//! Wholesale orders, line items, and the status transition matrix.

use backlot_core::Id;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use validator::Validate;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, sqlx::Type)]
#[serde(rename_all = "snake_case")]
#[sqlx(type_name = "order_status", rename_all = "snake_case")]
pub enum OrderStatus {
    Pending,
    Confirmed,
    Processing,
    Shipped,
    Delivered,
    Cancelled,
}

impl OrderStatus {
    /// Allowed forward transitions. Cancellation is possible until the order
    /// ships; delivered and cancelled are terminal.
    pub fn can_transition_to(&self, next: OrderStatus) -> bool {
        use OrderStatus::*;

        if *self == next {
            return true;
        }
        match (*self, next) {
            (Pending, Confirmed) | (Pending, Cancelled) => true,
            (Confirmed, Processing) | (Confirmed, Cancelled) => true,
            (Processing, Shipped) | (Processing, Cancelled) => true,
            (Shipped, Delivered) => true,
            _ => false,
        }
    }

    pub fn is_terminal(&self) -> bool {
        matches!(self, OrderStatus::Delivered | OrderStatus::Cancelled)
    }

    /// Wire-format name, as serialized into JSON and Postgres.
    pub fn as_str(&self) -> &'static str {
        match self {
            OrderStatus::Pending => "pending",
            OrderStatus::Confirmed => "confirmed",
            OrderStatus::Processing => "processing",
            OrderStatus::Shipped => "shipped",
            OrderStatus::Delivered => "delivered",
            OrderStatus::Cancelled => "cancelled",
        }
    }
}

#[derive(Debug, Clone, Serialize, sqlx::FromRow)]
#[serde(rename_all = "camelCase")]
pub struct Order {
    pub id: Id,
    pub customer_id: Id,
    pub status: OrderStatus,
    /// Derived at placement time: sum of quantity * unit price over items.
    pub total_cents: i64,
    pub notes: Option<String>,
    pub placed_at: DateTime<Utc>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Serialize, sqlx::FromRow)]
#[serde(rename_all = "camelCase")]
pub struct OrderItem {
    pub id: Id,
    pub order_id: Id,
    pub product_id: Id,
    pub quantity: i32,
    /// Product price captured when the order was placed.
    pub unit_price_cents: i64,
}

/// An order with its line items embedded, as returned by `GET /orders/:id`.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct OrderWithItems {
    #[serde(flatten)]
    pub order: Order,
    pub items: Vec<OrderItem>,
}

#[derive(Debug, Clone, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct OrderItemInput {
    pub product_id: Id,
    #[validate(range(min = 1, message = "must be at least 1"))]
    pub quantity: i32,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateOrder {
    pub customer_id: Id,
    pub notes: Option<String>,
    pub items: Vec<OrderItemInput>,
}

// Hand-written so the item list can carry both its own length rule and
// per-index nested errors (`items[2].quantity`).
impl Validate for CreateOrder {
    fn validate(&self) -> Result<(), validator::ValidationErrors> {
        let mut errors = validator::ValidationErrors::new();

        if let Some(notes) = &self.notes {
            if notes.chars().count() > 5000 {
                let mut error = validator::ValidationError::new("length");
                error.message = Some("must be at most 5000 characters".into());
                errors.add("notes", error);
            }
        }
        if self.items.is_empty() {
            let mut error = validator::ValidationError::new("length");
            error.message = Some("must contain at least one item".into());
            errors.add("items", error);
        }

        let parent = if errors.is_empty() { Ok(()) } else { Err(errors) };
        let children = self.items.iter().map(|item| item.validate()).collect();
        validator::ValidationErrors::merge_all(parent, "items", children)
    }
}

#[derive(Debug, Clone, Default, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct UpdateOrder {
    pub status: Option<OrderStatus>,
    #[validate(length(max = 5000, message = "must be at most 5000 characters"))]
    pub notes: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn happy_path_transitions_are_allowed() {
        use OrderStatus::*;
        assert!(Pending.can_transition_to(Confirmed));
        assert!(Confirmed.can_transition_to(Processing));
        assert!(Processing.can_transition_to(Shipped));
        assert!(Shipped.can_transition_to(Delivered));
    }

    #[test]
    fn backwards_and_skipping_transitions_are_rejected() {
        use OrderStatus::*;
        assert!(!Delivered.can_transition_to(Pending));
        assert!(!Pending.can_transition_to(Shipped));
        assert!(!Shipped.can_transition_to(Cancelled));
        assert!(!Cancelled.can_transition_to(Confirmed));
    }

    #[test]
    fn cancellation_window_closes_at_shipping() {
        use OrderStatus::*;
        assert!(Pending.can_transition_to(Cancelled));
        assert!(Confirmed.can_transition_to(Cancelled));
        assert!(Processing.can_transition_to(Cancelled));
        assert!(!Shipped.can_transition_to(Cancelled));
    }

    #[test]
    fn terminal_states() {
        assert!(OrderStatus::Delivered.is_terminal());
        assert!(OrderStatus::Cancelled.is_terminal());
        assert!(!OrderStatus::Shipped.is_terminal());
    }
}
