//! Domain models for the customer records application.

pub mod customer;

pub use customer::{Customer, CustomerFields};
