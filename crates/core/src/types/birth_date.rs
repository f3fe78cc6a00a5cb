//! Birth date handling.
//!
//! The column holds a date with a time component (`1990-05-02 00:00:00`,
//! or `1990-05-02T00:00:00Z` depending on how it is rendered). Views only
//! ever show the date, so reads keep the first ten characters and drop the
//! rest. Writes go the other way: the form submits `YYYY-MM-DD`, which is
//! parsed into a [`NaiveDate`] before it reaches the store.

use core::fmt;

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

/// Input format of the date field in the create and update forms.
pub const INPUT_FORMAT: &str = "%Y-%m-%d";

/// Errors that can occur when parsing a submitted birth date.
#[derive(thiserror::Error, Debug, Clone, PartialEq, Eq)]
pub enum BirthDateError {
    /// The field was empty.
    #[error("birth date cannot be empty")]
    Empty,
    /// The field was not a `YYYY-MM-DD` calendar date.
    #[error("birth date must be a YYYY-MM-DD date (got {0:?})")]
    InvalidFormat(String),
}

/// Date-only display form of a stored birth date.
///
/// ## Examples
///
/// ```
/// use crm_core::BirthDate;
///
/// let date = BirthDate::from_stored("1990-05-02T00:00:00Z");
/// assert_eq!(date.as_str(), "1990-05-02");
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct BirthDate(String);

impl BirthDate {
    /// Number of leading characters kept from the stored value.
    pub const DISPLAY_LEN: usize = 10;

    /// Truncate a stored value to its date portion.
    ///
    /// Values shorter than [`Self::DISPLAY_LEN`] are kept whole.
    #[must_use]
    pub fn from_stored(raw: &str) -> Self {
        let end = raw
            .char_indices()
            .nth(Self::DISPLAY_LEN)
            .map_or(raw.len(), |(idx, _)| idx);
        Self(raw.get(..end).unwrap_or(raw).to_owned())
    }

    /// Parse the date submitted by a form.
    ///
    /// # Errors
    ///
    /// Returns an error if the value is blank or not a `YYYY-MM-DD` date.
    pub fn parse_input(s: &str) -> Result<NaiveDate, BirthDateError> {
        let s = s.trim();
        if s.is_empty() {
            return Err(BirthDateError::Empty);
        }
        NaiveDate::parse_from_str(s, INPUT_FORMAT)
            .map_err(|_| BirthDateError::InvalidFormat(s.to_owned()))
    }

    /// Returns the date portion as a string slice.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl From<NaiveDate> for BirthDate {
    fn from(date: NaiveDate) -> Self {
        Self(date.format(INPUT_FORMAT).to_string())
    }
}

impl fmt::Display for BirthDate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}
