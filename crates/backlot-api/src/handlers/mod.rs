//! Request handlers, one module per resource.

pub mod assistants;
pub mod auth;
pub mod calls;
pub mod campaigns;
pub mod collections;
pub mod contacts;
pub mod customers;
pub mod orders;
pub mod phone_numbers;
pub mod products;
pub mod suppliers;
pub mod users;
