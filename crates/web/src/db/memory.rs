//! In-process customer store.
//!
//! Mirrors the `PostgreSQL` store's semantics closely enough to exercise
//! handlers without a database:
//!
//! - ids are assigned sequentially from 1
//! - updates are staged, then committed as a unit
//! - birth dates are kept as timestamps and truncated on read
//! - gender and email are kept as text, like the table columns
//!
//! Failures can be injected with [`MemoryCustomerStore::fail_next_statement`]
//! and [`MemoryCustomerStore::fail_next_commit`]; each arms a single failure
//! that is consumed by the next operation it applies to.

use std::collections::BTreeMap;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Mutex, MutexGuard, PoisonError};

use chrono::NaiveDateTime;

use crm_core::{BirthDate, CustomerId, SearchTerms};

use super::{CustomerStore, RepositoryError, WriteError};
use crate::models::{Customer, CustomerFields};

#[derive(Debug, Clone)]
struct StoredCustomer {
    first_name: String,
    last_name: String,
    birth_date: NaiveDateTime,
    gender: String,
    email: String,
    address: String,
}

impl StoredCustomer {
    fn from_fields(fields: CustomerFields) -> Self {
        Self {
            first_name: fields.first_name,
            last_name: fields.last_name,
            birth_date: fields.birth_date.and_time(chrono::NaiveTime::MIN),
            gender: fields.gender.to_string(),
            email: fields.email.as_str().to_string(),
            address: fields.address,
        }
    }

    fn to_customer(&self, id: CustomerId) -> Customer {
        Customer {
            id,
            first_name: self.first_name.clone(),
            last_name: self.last_name.clone(),
            birth_date: BirthDate::from_stored(&self.birth_date.to_string()),
            gender: self.gender.clone(),
            email: self.email.clone(),
            address: self.address.clone(),
        }
    }
}

#[derive(Debug, Default)]
struct Table {
    rows: BTreeMap<CustomerId, StoredCustomer>,
    last_id: i32,
}

/// Customer store that keeps rows in memory.
#[derive(Debug, Default)]
pub struct MemoryCustomerStore {
    table: Mutex<Table>,
    fail_statement: AtomicBool,
    fail_commit: AtomicBool,
}

impl MemoryCustomerStore {
    /// Create an empty store.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Make the next statement (read or write) fail.
    pub fn fail_next_statement(&self) {
        self.fail_statement.store(true, Ordering::SeqCst);
    }

    /// Make the next update fail at commit, after its statement succeeded.
    pub fn fail_next_commit(&self) {
        self.fail_commit.store(true, Ordering::SeqCst);
    }

    /// Number of stored customers.
    #[must_use]
    pub fn len(&self) -> usize {
        self.table().rows.len()
    }

    /// Whether the store has no customers.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Store a row without validating its gender or email, as rows written
    /// by older clients may be.
    #[cfg(test)]
    pub(crate) fn insert_unchecked(
        &self,
        first_name: &str,
        last_name: &str,
        gender: &str,
        email: &str,
    ) -> CustomerId {
        let mut table = self.table();
        table.last_id += 1;
        let id = CustomerId::new(table.last_id);
        let row = StoredCustomer {
            first_name: first_name.to_string(),
            last_name: last_name.to_string(),
            birth_date: NaiveDateTime::default(),
            gender: gender.to_string(),
            email: email.to_string(),
            address: String::new(),
        };
        table.rows.insert(id, row);
        id
    }

    fn table(&self) -> MutexGuard<'_, Table> {
        self.table.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Consume an armed statement failure, if any.
    fn statement(&self) -> Result<(), sqlx::Error> {
        if self.fail_statement.swap(false, Ordering::SeqCst) {
            return Err(sqlx::Error::Protocol("injected statement failure".to_string()));
        }
        Ok(())
    }

    fn commit(&self) -> Result<(), sqlx::Error> {
        if self.fail_commit.swap(false, Ordering::SeqCst) {
            return Err(sqlx::Error::Protocol("injected commit failure".to_string()));
        }
        Ok(())
    }

    fn select(&self, filter: impl Fn(&StoredCustomer) -> bool) -> Result<Vec<Customer>, RepositoryError> {
        self.statement()?;
        Ok(self
            .table()
            .rows
            .iter()
            .filter(|(_, row)| filter(row))
            .map(|(id, row)| row.to_customer(*id))
            .collect())
    }
}

impl CustomerStore for MemoryCustomerStore {
    async fn ping(&self) -> Result<(), RepositoryError> {
        self.statement()?;
        Ok(())
    }

    async fn list_all(&self) -> Result<Vec<Customer>, RepositoryError> {
        self.select(|_| true)
    }

    async fn find_by_id(&self, id: CustomerId) -> Result<Option<Customer>, RepositoryError> {
        self.statement()?;
        Ok(self.table().rows.get(&id).map(|row| row.to_customer(id)))
    }

    async fn find_by_names(&self, terms: SearchTerms) -> Result<Vec<Customer>, RepositoryError> {
        self.select(|row| {
            row.first_name == terms.first_name() || row.last_name == terms.last_name()
        })
    }

    async fn create(&self, fields: CustomerFields) -> Result<CustomerId, WriteError> {
        self.statement().map_err(WriteError::StatementFailed)?;

        let mut table = self.table();
        table.last_id += 1;
        let id = CustomerId::new(table.last_id);
        table.rows.insert(id, StoredCustomer::from_fields(fields));
        Ok(id)
    }

    async fn update(&self, id: CustomerId, fields: CustomerFields) -> Result<(), WriteError> {
        let mut table = self.table();

        // The staged row only replaces the stored one once the commit succeeds.
        self.statement().map_err(WriteError::StatementFailed)?;
        if !table.rows.contains_key(&id) {
            return Err(WriteError::NotFound(id));
        }
        let staged = StoredCustomer::from_fields(fields);

        self.commit().map_err(WriteError::CommitFailed)?;
        table.rows.insert(id, staged);
        Ok(())
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use chrono::NaiveDate;
    use crm_core::{Email, Gender};

    use super::*;

    fn fields(first: &str, last: &str) -> CustomerFields {
        CustomerFields {
            first_name: first.to_string(),
            last_name: last.to_string(),
            birth_date: NaiveDate::from_ymd_opt(1990, 5, 2).unwrap(),
            gender: Gender::Female,
            email: Email::parse("jane.doe@example.com").unwrap(),
            address: "1 Main St".to_string(),
        }
    }

    #[tokio::test]
    async fn test_create_assigns_sequential_ids() {
        let store = MemoryCustomerStore::new();
        let a = store.create(fields("Jane", "Doe")).await.unwrap();
        let b = store.create(fields("John", "Roe")).await.unwrap();
        assert_eq!(a, CustomerId::new(1));
        assert_eq!(b, CustomerId::new(2));
        assert_eq!(store.len(), 2);
    }

    #[tokio::test]
    async fn test_reads_truncate_birth_date() {
        let store = MemoryCustomerStore::new();
        let id = store.create(fields("Jane", "Doe")).await.unwrap();
        let customer = store.find_by_id(id).await.unwrap().unwrap();
        assert_eq!(customer.birth_date.as_str(), "1990-05-02");
    }

    #[tokio::test]
    async fn test_find_by_id_missing_returns_none() {
        let store = MemoryCustomerStore::new();
        assert!(store.find_by_id(CustomerId::new(9)).await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_find_by_names_matches_first_or_last() {
        let store = MemoryCustomerStore::new();
        store.create(fields("Jane", "Doe")).await.unwrap();
        store.create(fields("John", "Smith")).await.unwrap();
        store.create(fields("Alice", "Jones")).await.unwrap();

        let terms = SearchTerms::parse("Jane Smith").unwrap();
        let found = store.find_by_names(terms).await.unwrap();
        let names: Vec<_> = found.iter().map(Customer::full_name).collect();
        assert_eq!(names, ["Jane Doe", "John Smith"]);
    }

    #[tokio::test]
    async fn test_find_by_names_does_not_cross_columns() {
        let store = MemoryCustomerStore::new();
        store.create(fields("Doe", "Jane")).await.unwrap();

        let terms = SearchTerms::parse("Jane Doe").unwrap();
        assert!(store.find_by_names(terms).await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_update_replaces_all_fields() {
        let store = MemoryCustomerStore::new();
        let id = store.create(fields("Jane", "Doe")).await.unwrap();

        let mut changed = fields("Janet", "Dough");
        changed.gender = Gender::Male;
        store.update(id, changed).await.unwrap();

        let customer = store.find_by_id(id).await.unwrap().unwrap();
        assert_eq!(customer.full_name(), "Janet Dough");
        assert_eq!(customer.gender, "Male");
    }

    #[tokio::test]
    async fn test_update_statement_failure_leaves_row_unchanged() {
        let store = MemoryCustomerStore::new();
        let id = store.create(fields("Jane", "Doe")).await.unwrap();

        store.fail_next_statement();
        let err = store.update(id, fields("Janet", "Dough")).await.unwrap_err();
        assert!(matches!(err, WriteError::StatementFailed(_)));

        let customer = store.find_by_id(id).await.unwrap().unwrap();
        assert_eq!(customer.full_name(), "Jane Doe");
    }

    #[tokio::test]
    async fn test_update_commit_failure_leaves_row_unchanged() {
        let store = MemoryCustomerStore::new();
        let id = store.create(fields("Jane", "Doe")).await.unwrap();

        store.fail_next_commit();
        let err = store.update(id, fields("Janet", "Dough")).await.unwrap_err();
        assert!(matches!(err, WriteError::CommitFailed(_)));

        let customer = store.find_by_id(id).await.unwrap().unwrap();
        assert_eq!(customer.full_name(), "Jane Doe");
    }

    #[tokio::test]
    async fn test_update_missing_row_is_not_found() {
        let store = MemoryCustomerStore::new();
        let err = store
            .update(CustomerId::new(42), fields("Jane", "Doe"))
            .await
            .unwrap_err();
        assert!(matches!(err, WriteError::NotFound(id) if id == CustomerId::new(42)));
        assert!(store.is_empty());
    }

    #[tokio::test]
    async fn test_unchecked_rows_read_back_verbatim() {
        let store = MemoryCustomerStore::new();
        let id = store.insert_unchecked("maksin", "guberniev", "null", "email.com");

        let customer = store.find_by_id(id).await.unwrap().unwrap();
        assert_eq!(customer.gender, "null");
        assert_eq!(customer.email, "email.com");
    }

    #[tokio::test]
    async fn test_injected_failure_is_consumed_once() {
        let store = MemoryCustomerStore::new();
        store.fail_next_statement();
        assert!(store.list_all().await.is_err());
        assert!(store.list_all().await.is_ok());
    }
}
