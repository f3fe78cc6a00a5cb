//! Customer model types.

use chrono::NaiveDate;

use crm_core::{BirthDate, CustomerId, Email, Gender};

/// A customer row as read back from the store.
///
/// Request-scoped copy; the store stays the source of truth. `gender` and
/// `email` are shown exactly as stored: rows written before validation
/// existed may hold values the forms would now reject, and they still list.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Customer {
    /// Store-assigned identifier.
    pub id: CustomerId,
    pub first_name: String,
    pub last_name: String,
    /// Date portion of the stored birth date.
    pub birth_date: BirthDate,
    pub gender: String,
    pub email: String,
    pub address: String,
}

impl Customer {
    /// Returns the customer's full name for display.
    #[must_use]
    pub fn full_name(&self) -> String {
        format!("{} {}", self.first_name, self.last_name)
    }
}

/// Every mutable column of a customer, already validated.
///
/// Used for both inserts (the store assigns the id) and updates (the id is
/// passed alongside).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CustomerFields {
    pub first_name: String,
    pub last_name: String,
    pub birth_date: NaiveDate,
    pub gender: Gender,
    pub email: Email,
    pub address: String,
}
