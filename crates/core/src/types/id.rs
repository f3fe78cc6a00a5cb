//! Customer identifier.
//!
//! Identifiers are assigned by the record store on insert and never change
//! afterwards. Requests carry them as decimal strings (`?id=42`, `ID=42`), so
//! the type knows how to parse itself from that form.

use core::fmt;
use core::num::ParseIntError;

use serde::{Deserialize, Serialize};

/// Errors that can occur when parsing a [`CustomerId`] from request input.
#[derive(thiserror::Error, Debug, Clone, PartialEq, Eq)]
pub enum CustomerIdError {
    /// The input string is empty.
    #[error("customer id cannot be empty")]
    Empty,
    /// The input is not a decimal integer.
    #[error("customer id must be an integer: {0}")]
    NotANumber(#[from] ParseIntError),
    /// The input is zero or negative; the store only assigns positive ids.
    #[error("customer id must be positive (got {0})")]
    NotPositive(i32),
}

/// Store-assigned identifier of a customer row.
///
/// ## Examples
///
/// ```
/// use crm_core::CustomerId;
///
/// let id = CustomerId::parse("42").unwrap();
/// assert_eq!(id.as_i32(), 42);
///
/// assert!(CustomerId::parse("").is_err());
/// assert!(CustomerId::parse("abc").is_err());
/// assert!(CustomerId::parse("0").is_err());
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct CustomerId(i32);

impl CustomerId {
    /// Wrap an id read back from the store.
    #[must_use]
    pub const fn new(id: i32) -> Self {
        Self(id)
    }

    /// Parse an id supplied by a client.
    ///
    /// Surrounding whitespace is ignored.
    ///
    /// # Errors
    ///
    /// Returns an error if the input is empty, not an integer, or not
    /// positive.
    pub fn parse(s: &str) -> Result<Self, CustomerIdError> {
        let s = s.trim();
        if s.is_empty() {
            return Err(CustomerIdError::Empty);
        }

        let id: i32 = s.parse()?;
        if id <= 0 {
            return Err(CustomerIdError::NotPositive(id));
        }

        Ok(Self(id))
    }

    /// Get the underlying i32 value.
    #[must_use]
    pub const fn as_i32(&self) -> i32 {
        self.0
    }
}

impl fmt::Display for CustomerId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl std::str::FromStr for CustomerId {
    type Err = CustomerIdError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

#[cfg(feature = "postgres")]
impl sqlx::Type<sqlx::Postgres> for CustomerId {
    fn type_info() -> sqlx::postgres::PgTypeInfo {
        <i32 as sqlx::Type<sqlx::Postgres>>::type_info()
    }

    fn compatible(ty: &sqlx::postgres::PgTypeInfo) -> bool {
        <i32 as sqlx::Type<sqlx::Postgres>>::compatible(ty)
    }
}

#[cfg(feature = "postgres")]
impl<'r> sqlx::Decode<'r, sqlx::Postgres> for CustomerId {
    fn decode(value: sqlx::postgres::PgValueRef<'r>) -> Result<Self, sqlx::error::BoxDynError> {
        let id = <i32 as sqlx::Decode<sqlx::Postgres>>::decode(value)?;
        Ok(Self(id))
    }
}

#[cfg(feature = "postgres")]
impl sqlx::Encode<'_, sqlx::Postgres> for CustomerId {
    fn encode_by_ref(
        &self,
        buf: &mut sqlx::postgres::PgArgumentBuffer,
    ) -> Result<sqlx::encode::IsNull, sqlx::error::BoxDynError> {
        <i32 as sqlx::Encode<sqlx::Postgres>>::encode_by_ref(&self.0, buf)
    }
}
