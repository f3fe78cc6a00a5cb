//! Email address type.

use core::fmt;
use std::sync::LazyLock;

use regex::Regex;
use serde::{Deserialize, Serialize};

/// Characters allowed in the local part, one or more of them.
static LOCAL_PART_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^[a-zA-Z0-9.!#$%&'*+/=?^_`{|}~-]+$").expect("Invalid local part regex")
});

/// Dot-separated DNS labels: 1-63 alphanumerics, hyphens only inside a label.
static DOMAIN_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(
        r"^[a-zA-Z0-9](?:[a-zA-Z0-9-]{0,61}[a-zA-Z0-9])?(?:\.[a-zA-Z0-9](?:[a-zA-Z0-9-]{0,61}[a-zA-Z0-9])?)*$",
    )
    .expect("Invalid domain regex")
});

/// Errors that can occur when parsing an [`Email`].
#[derive(thiserror::Error, Debug, Clone, PartialEq, Eq)]
pub enum EmailError {
    /// The input string is empty.
    #[error("email cannot be empty")]
    Empty,
    /// The input does not contain an @ symbol.
    #[error("email must contain an @ symbol")]
    MissingAtSymbol,
    /// The local part (before @) is empty or has disallowed characters.
    #[error("email local part is invalid")]
    InvalidLocalPart,
    /// The domain part (after @) is not a sequence of DNS labels.
    #[error("email domain is invalid")]
    InvalidDomain,
}

/// An email address accepted by the customer form.
///
/// ## Grammar
///
/// - Local part: one or more of letters, digits, and
///   ``. ! # $ % & ' * + / = ? ^ _ ` { | } ~ -``
/// - Exactly one `@` (the local part cannot contain one, so a second `@`
///   lands in the domain and is rejected there)
/// - Domain: one or more dot-separated labels, each 1-63 characters,
///   alphanumeric with hyphens allowed only between the first and last
///   character
///
/// There is no overall length cap and no requirement that the domain have a
/// dot: `user@localhost` is accepted.
///
/// ## Examples
///
/// ```
/// use crm_core::Email;
///
/// // Valid emails
/// assert!(Email::parse("jane.doe@example.com").is_ok());
/// assert!(Email::parse("a@b.co").is_ok());
///
/// // Invalid emails
/// assert!(Email::parse("").is_err());             // empty
/// assert!(Email::parse("plainaddress").is_err()); // missing @
/// assert!(Email::parse("@domain.com").is_err());  // empty local part
/// assert!(Email::parse("user@-bad.com").is_err()); // leading hyphen
/// ```
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(try_from = "String", into = "String")]
pub struct Email(String);

impl Email {
    /// Parse an `Email` from a string.
    ///
    /// # Errors
    ///
    /// Returns an error if the input:
    /// - Is empty
    /// - Does not contain an @ symbol
    /// - Has an empty local part or one with disallowed characters
    /// - Has a domain that is not a sequence of valid DNS labels
    pub fn parse(s: &str) -> Result<Self, EmailError> {
        if s.is_empty() {
            return Err(EmailError::Empty);
        }

        let (local, domain) = s.split_once('@').ok_or(EmailError::MissingAtSymbol)?;

        if !LOCAL_PART_RE.is_match(local) {
            return Err(EmailError::InvalidLocalPart);
        }

        if !DOMAIN_RE.is_match(domain) {
            return Err(EmailError::InvalidDomain);
        }

        Ok(Self(s.to_owned()))
    }

    /// Returns the email address as a string slice.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for Email {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl std::str::FromStr for Email {
    type Err = EmailError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

impl TryFrom<String> for Email {
    type Error = EmailError;

    fn try_from(s: String) -> Result<Self, Self::Error> {
        Self::parse(&s)
    }
}

impl From<Email> for String {
    fn from(email: Email) -> Self {
        email.0
    }
}

// SQLx support (with postgres feature). Rows are read back as plain text,
// so only the write direction is needed.
#[cfg(feature = "postgres")]
impl sqlx::Type<sqlx::Postgres> for Email {
    fn type_info() -> sqlx::postgres::PgTypeInfo {
        <String as sqlx::Type<sqlx::Postgres>>::type_info()
    }

    fn compatible(ty: &sqlx::postgres::PgTypeInfo) -> bool {
        <String as sqlx::Type<sqlx::Postgres>>::compatible(ty)
    }
}

#[cfg(feature = "postgres")]
impl sqlx::Encode<'_, sqlx::Postgres> for Email {
    fn encode_by_ref(
        &self,
        buf: &mut sqlx::postgres::PgArgumentBuffer,
    ) -> Result<sqlx::encode::IsNull, sqlx::error::BoxDynError> {
        <String as sqlx::Encode<sqlx::Postgres>>::encode_by_ref(&self.0, buf)
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_valid_emails() {
        assert!(Email::parse("user@example.com").is_ok());
        assert!(Email::parse("jane.doe@example.com").is_ok());
        assert!(Email::parse("user+tag@example.com").is_ok());
        assert!(Email::parse("user@sub.example.co.uk").is_ok());
        assert!(Email::parse("a@b.co").is_ok());
        assert!(Email::parse("user@localhost").is_ok());
        assert!(Email::parse("x-y@my-host.example").is_ok());
        assert!(Email::parse("o'brien!#$%&*+/=?^_`{|}~-@example.com").is_ok());
    }

    #[test]
    fn test_parse_empty() {
        assert_eq!(Email::parse(""), Err(EmailError::Empty));
    }

    #[test]
    fn test_parse_missing_at() {
        assert_eq!(
            Email::parse("plainaddress"),
            Err(EmailError::MissingAtSymbol)
        );
        assert_eq!(Email::parse("email.com"), Err(EmailError::MissingAtSymbol));
    }

    #[test]
    fn test_parse_bad_local_part() {
        assert_eq!(
            Email::parse("@domain.com"),
            Err(EmailError::InvalidLocalPart)
        );
        assert_eq!(
            Email::parse("john doe@example.com"),
            Err(EmailError::InvalidLocalPart)
        );
        assert_eq!(
            Email::parse("jöhn@example.com"),
            Err(EmailError::InvalidLocalPart)
        );
    }

    #[test]
    fn test_parse_bad_domain() {
        assert_eq!(Email::parse("user@"), Err(EmailError::InvalidDomain));
        assert_eq!(Email::parse("user@-host.com"), Err(EmailError::InvalidDomain));
        assert_eq!(Email::parse("user@host-.com"), Err(EmailError::InvalidDomain));
        assert_eq!(
            Email::parse("user@example..com"),
            Err(EmailError::InvalidDomain)
        );
        assert_eq!(Email::parse("user@example.com."), Err(EmailError::InvalidDomain));
        assert_eq!(Email::parse("a@b@c.com"), Err(EmailError::InvalidDomain));
        assert_eq!(Email::parse("user@exa_mple.com"), Err(EmailError::InvalidDomain));
    }

    #[test]
    fn test_label_length_limit() {
        let ok = format!("user@{}.com", "a".repeat(63));
        assert!(Email::parse(&ok).is_ok());

        let too_long = format!("user@{}.com", "a".repeat(64));
        assert_eq!(Email::parse(&too_long), Err(EmailError::InvalidDomain));
    }

    #[test]
    fn test_serde_rejects_invalid() {
        let parsed: Result<Email, _> = serde_json::from_str("\"not-an-email\"");
        assert!(parsed.is_err());

        let parsed: Email = serde_json::from_str("\"a@b.co\"").unwrap();
        assert_eq!(parsed.as_str(), "a@b.co");
    }
}
