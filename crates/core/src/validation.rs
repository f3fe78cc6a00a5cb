//! Field-level validation of customer writes.
//!
//! Every create and update runs through [`validate`] before anything is sent
//! to the store. Note the polarity: `validate` answers "is this record
//! invalid?", and handlers reject the request when it returns `true`.
//!
//! # Rules
//!
//! | Field | Rule |
//! |---|---|
//! | first name | 1-100 characters |
//! | last name | 1-100 characters |
//! | gender | exactly `Male` or `Female` |
//! | address | 1-200 characters |
//! | email | matches the [`Email`] grammar |
//!
//! Lengths count characters, not bytes.

use crate::types::{Email, EmailError, Gender, GenderError};

/// Maximum length of the first and last name fields.
pub const MAX_NAME_LEN: usize = 100;

/// Maximum length of the address field.
pub const MAX_ADDRESS_LEN: usize = 200;

/// The first rule a candidate record broke.
#[derive(thiserror::Error, Debug, Clone, PartialEq, Eq)]
pub enum ValidationError {
    #[error("first name must be 1-100 characters")]
    FirstName,
    #[error("last name must be 1-100 characters")]
    LastName,
    #[error(transparent)]
    Gender(#[from] GenderError),
    #[error("address must be 1-200 characters")]
    Address,
    #[error(transparent)]
    Email(#[from] EmailError),
}

/// Check a candidate record and report the first rule it breaks.
///
/// Rules are evaluated in the order first name, last name, gender, address,
/// email.
///
/// # Errors
///
/// Returns the [`ValidationError`] for the first failing rule.
pub fn check(
    first_name: &str,
    last_name: &str,
    gender: &str,
    address: &str,
    email: &str,
) -> Result<(), ValidationError> {
    if !within(first_name, MAX_NAME_LEN) {
        return Err(ValidationError::FirstName);
    }
    if !within(last_name, MAX_NAME_LEN) {
        return Err(ValidationError::LastName);
    }
    Gender::parse(gender)?;
    if !within(address, MAX_ADDRESS_LEN) {
        return Err(ValidationError::Address);
    }
    Email::parse(email)?;
    Ok(())
}

/// Returns `true` when the record is **invalid** and must be rejected.
///
/// ```
/// use crm_core::validate;
///
/// assert!(validate("maksin", "guberniev", "null", "undefined", "email.com"));
/// assert!(!validate("Jane", "Doe", "Female", "1 Main St", "jane.doe@example.com"));
/// ```
#[must_use]
pub fn validate(
    first_name: &str,
    last_name: &str,
    gender: &str,
    address: &str,
    email: &str,
) -> bool {
    check(first_name, last_name, gender, address, email).is_err()
}

fn within(value: &str, max: usize) -> bool {
    !value.is_empty() && value.chars().count() <= max
}
