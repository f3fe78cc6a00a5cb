//! Core types for customer records.
//!
//! This module provides type-safe wrappers for the customer's fields.

pub mod birth_date;
pub mod email;
pub mod gender;
pub mod id;

pub use birth_date::{BirthDate, BirthDateError};
pub use email::{Email, EmailError};
pub use gender::{Gender, GenderError};
pub use id::{CustomerId, CustomerIdError};
