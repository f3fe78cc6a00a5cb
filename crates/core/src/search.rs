//! Name search terms.
//!
//! A search string is split on whitespace. The first token is matched
//! against first names and the second against last names, OR'ed together.
//! A query therefore needs at least two tokens; with fewer, parsing fails
//! with [`SearchError::TooFewTokens`] instead of inventing the missing one.
//! Tokens after the second are ignored.

/// Errors that can occur when parsing a search string.
#[derive(thiserror::Error, Debug, Clone, PartialEq, Eq)]
pub enum SearchError {
    /// The search string was empty or whitespace only.
    #[error("search parameter cannot be empty")]
    Empty,
    /// The search string did not contain both a first and a last name.
    #[error("search needs a first and a last name (got {found})")]
    TooFewTokens {
        /// Number of tokens found.
        found: usize,
    },
}

/// The two tokens a name search is made of.
///
/// ```
/// use crm_core::{SearchError, SearchTerms};
///
/// let terms = SearchTerms::parse("  Jane   Doe ").unwrap();
/// assert_eq!(terms.first_name(), "Jane");
/// assert_eq!(terms.last_name(), "Doe");
///
/// assert_eq!(
///     SearchTerms::parse("Jane"),
///     Err(SearchError::TooFewTokens { found: 1 })
/// );
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SearchTerms {
    first_name: String,
    last_name: String,
}

impl SearchTerms {
    /// Split a search string into its first-name and last-name tokens.
    ///
    /// # Errors
    ///
    /// Returns `SearchError::Empty` for a blank string and
    /// `SearchError::TooFewTokens` when only one token is present.
    pub fn parse(query: &str) -> Result<Self, SearchError> {
        let mut tokens = query.split_whitespace();

        let Some(first_name) = tokens.next() else {
            return Err(SearchError::Empty);
        };
        let Some(last_name) = tokens.next() else {
            return Err(SearchError::TooFewTokens { found: 1 });
        };

        Ok(Self {
            first_name: first_name.to_owned(),
            last_name: last_name.to_owned(),
        })
    }

    /// Token matched against the first-name column.
    #[must_use]
    pub fn first_name(&self) -> &str {
        &self.first_name
    }

    /// Token matched against the last-name column.
    #[must_use]
    pub fn last_name(&self) -> &str {
        &self.last_name
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_two_tokens() {
        let terms = SearchTerms::parse("Jane Doe").unwrap();
        assert_eq!(terms.first_name(), "Jane");
        assert_eq!(terms.last_name(), "Doe");
    }

    #[test]
    fn test_extra_tokens_ignored() {
        let terms = SearchTerms::parse("Jane Doe Smith").unwrap();
        assert_eq!(terms.first_name(), "Jane");
        assert_eq!(terms.last_name(), "Doe");
    }

    #[test]
    fn test_any_whitespace_separates() {
        let terms = SearchTerms::parse("\tJane\n Doe\r\n").unwrap();
        assert_eq!(terms.first_name(), "Jane");
        assert_eq!(terms.last_name(), "Doe");
    }

    #[test]
    fn test_single_token_is_an_error() {
        assert_eq!(
            SearchTerms::parse("Jane"),
            Err(SearchError::TooFewTokens { found: 1 })
        );
        assert_eq!(
            SearchTerms::parse("  Jane  "),
            Err(SearchError::TooFewTokens { found: 1 })
        );
    }

    #[test]
    fn test_blank_is_an_error() {
        assert_eq!(SearchTerms::parse(""), Err(SearchError::Empty));
        assert_eq!(SearchTerms::parse(" \t "), Err(SearchError::Empty));
    }
}
