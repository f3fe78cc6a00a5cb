//! Customer gender.

use core::fmt;

use serde::{Deserialize, Serialize};

/// Error returned when a string is not one of the accepted gender values.
#[derive(thiserror::Error, Debug, Clone, PartialEq, Eq)]
#[error("gender must be exactly \"Male\" or \"Female\" (got {0:?})")]
pub struct GenderError(pub String);

/// Gender as recorded on a customer row.
///
/// Stored and submitted as the exact strings `"Male"` and `"Female"`.
/// Matching is case-sensitive: `"male"` is rejected.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Gender {
    Male,
    Female,
}

impl Gender {
    /// Every accepted value, in the order the forms list them.
    pub const ALL: [Self; 2] = [Self::Male, Self::Female];

    /// Parse a submitted or stored gender value.
    ///
    /// # Errors
    ///
    /// Returns `GenderError` for anything other than `"Male"` or `"Female"`.
    pub fn parse(s: &str) -> Result<Self, GenderError> {
        match s {
            "Male" => Ok(Self::Male),
            "Female" => Ok(Self::Female),
            other => Err(GenderError(other.to_owned())),
        }
    }

    /// The stored representation.
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Male => "Male",
            Self::Female => "Female",
        }
    }
}

impl fmt::Display for Gender {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl std::str::FromStr for Gender {
    type Err = GenderError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

#[cfg(feature = "postgres")]
impl sqlx::Type<sqlx::Postgres> for Gender {
    fn type_info() -> sqlx::postgres::PgTypeInfo {
        <&str as sqlx::Type<sqlx::Postgres>>::type_info()
    }

    fn compatible(ty: &sqlx::postgres::PgTypeInfo) -> bool {
        <&str as sqlx::Type<sqlx::Postgres>>::compatible(ty)
    }
}

#[cfg(feature = "postgres")]
impl sqlx::Encode<'_, sqlx::Postgres> for Gender {
    fn encode_by_ref(
        &self,
        buf: &mut sqlx::postgres::PgArgumentBuffer,
    ) -> Result<sqlx::encode::IsNull, sqlx::error::BoxDynError> {
        <&str as sqlx::Encode<sqlx::Postgres>>::encode_by_ref(&self.as_str(), buf)
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_accepted_values() {
        assert_eq!(Gender::parse("Male").unwrap(), Gender::Male);
        assert_eq!(Gender::parse("Female").unwrap(), Gender::Female);
    }

    #[test]
    fn test_parse_is_case_sensitive() {
        assert!(Gender::parse("male").is_err());
        assert!(Gender::parse("FEMALE").is_err());
        assert!(Gender::parse(" Male").is_err());
    }

    #[test]
    fn test_parse_rejects_other_values() {
        assert_eq!(Gender::parse(""), Err(GenderError(String::new())));
        assert_eq!(Gender::parse("null"), Err(GenderError("null".to_owned())));
    }

    #[test]
    fn test_display_round_trips() {
        for gender in Gender::ALL {
            assert_eq!(Gender::parse(&gender.to_string()).unwrap(), gender);
        }
    }
}
