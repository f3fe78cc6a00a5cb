//! Customer records core - domain types and validation.
//!
//! This crate holds everything about a customer record that does not touch
//! I/O: identifiers, the email grammar, the gender enumeration, birth-date
//! display rules, the write validator, and search-term parsing.
//!
//! # Architecture
//!
//! The core crate contains only types and pure functions - no database
//! access, no HTTP. The `web` crate depends on it for every write and search.
//!
//! # Modules
//!
//! - [`types`] - Newtype wrappers for ids, emails, genders, and birth dates
//! - [`validation`] - The field-level validator guarding every write
//! - [`search`] - Whitespace tokenization of name searches

#![cfg_attr(not(test), forbid(unsafe_code))]

pub mod search;
pub mod types;
pub mod validation;

pub use search::{SearchError, SearchTerms};
pub use types::*;
pub use validation::{ValidationError, check, validate};
