//! # backlot-models
//!
//! Domain entities and request payloads for both consoles: the assistant
//! console (users, assistants, contacts, campaigns, phone numbers, calls)
//! and the wholesale console (suppliers, products, collections, customers,
//! orders). Rows map straight out of Postgres via `sqlx::FromRow`; payloads
//! carry `validator` rules checked before any database access.

pub(crate) mod patterns;

pub mod assistant;
pub mod call;
pub mod campaign;
pub mod collection;
pub mod contact;
pub mod customer;
pub mod order;
pub mod phone_number;
pub mod product;
pub mod supplier;
pub mod user;

pub use assistant::{Assistant, CreateAssistant, UpdateAssistant};
pub use call::{Call, CallStatus, CreateCall, UpdateCall};
pub use campaign::{AttachContacts, Campaign, CampaignStatus, CreateCampaign, UpdateCampaign};
pub use collection::{AttachProducts, Collection, CreateCollection, UpdateCollection};
pub use contact::{Contact, CreateContact, UpdateContact};
pub use customer::{CreateCustomer, Customer, UpdateCustomer};
pub use order::{
    CreateOrder, Order, OrderItem, OrderItemInput, OrderStatus, OrderWithItems, UpdateOrder,
};
pub use phone_number::{CreatePhoneNumber, PhoneNumber, UpdatePhoneNumber};
pub use product::{CreateProduct, Product, UpdateProduct};
pub use supplier::{CreateSupplier, Supplier, UpdateSupplier};
pub use user::{CreateUser, LoginRequest, UpdateUser, User, UserRole};

use backlot_core::ValidationErrors;
use validator::Validate;

/// Run `validator` rules on a payload and translate failures into the core
/// field-keyed collection.
pub fn validate(payload: &impl Validate) -> Result<(), ValidationErrors> {
    match payload.validate() {
        Ok(()) => Ok(()),
        Err(errors) => {
            let mut out = ValidationErrors::new();
            for (field, kinds) in errors.errors() {
                collect_field_errors(&mut out, field, kinds);
            }
            Err(out)
        }
    }
}

fn collect_field_errors(
    out: &mut ValidationErrors,
    field: &str,
    kinds: &validator::ValidationErrorsKind,
) {
    use validator::ValidationErrorsKind;

    match kinds {
        ValidationErrorsKind::Field(errors) => {
            for error in errors {
                let message = error
                    .message
                    .as_ref()
                    .map(|m| m.to_string())
                    .unwrap_or_else(|| format!("is invalid ({})", error.code));
                out.add(field, message);
            }
        }
        ValidationErrorsKind::Struct(nested) => {
            for (nested_field, nested_kinds) in nested.errors() {
                collect_field_errors(out, &format!("{}.{}", field, nested_field), nested_kinds);
            }
        }
        ValidationErrorsKind::List(items) => {
            for (index, nested) in items {
                for (nested_field, nested_kinds) in nested.errors() {
                    collect_field_errors(
                        out,
                        &format!("{}[{}].{}", field, index, nested_field),
                        nested_kinds,
                    );
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn failed_validation_is_keyed_by_field() {
        let payload = CreateContact {
            name: "".into(),
            phone: "bad".into(),
            email: Some("not-an-email".into()),
            notes: None,
        };

        let errors = validate(&payload).unwrap_err();
        assert!(errors.has_error("name"));
        assert!(errors.has_error("phone"));
        assert!(errors.has_error("email"));
    }

    #[test]
    fn nested_order_item_errors_carry_their_index() {
        let payload = CreateOrder {
            customer_id: 1,
            notes: None,
            items: vec![OrderItemInput { product_id: 1, quantity: 0 }],
        };

        let errors = validate(&payload).unwrap_err();
        assert!(errors.has_error("items[0].quantity"));
    }
}
