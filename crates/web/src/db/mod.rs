//! Record store access.
//!
//! # Table: `customers`
//!
//! | Column | Type |
//! |---|---|
//! | `id` | `SERIAL PRIMARY KEY` |
//! | `first_name`, `last_name` | `VARCHAR(100)` |
//! | `birth_date` | `TIMESTAMP` |
//! | `gender` | `VARCHAR(6)` |
//! | `email` | `TEXT` |
//! | `address` | `VARCHAR(200)` |
//!
//! The table is expected to exist; `crates/web/schema.sql` holds the
//! reference DDL. The application never creates or migrates it.
//!
//! # Backends
//!
//! Handlers talk to a [`CustomerStore`]. [`PgCustomerStore`] is the
//! production backend; [`MemoryCustomerStore`] keeps rows in process and
//! can inject statement and commit failures.

pub mod customers;
pub mod memory;

use std::future::Future;
use std::time::Duration;

use secrecy::ExposeSecret;
use sqlx::PgPool;
use sqlx::postgres::PgPoolOptions;
use thiserror::Error;

use crm_core::{CustomerId, SearchTerms};

use crate::models::{Customer, CustomerFields};

pub use customers::PgCustomerStore;
pub use memory::MemoryCustomerStore;

/// Errors that can occur on the read paths.
#[derive(Debug, Error)]
pub enum RepositoryError {
    /// Database error from sqlx.
    #[error("database error: {0}")]
    Database(#[from] sqlx::Error),
}

/// Errors that can occur on the create and update paths.
#[derive(Debug, Error)]
pub enum WriteError {
    /// The update transaction could not be opened.
    #[error("could not begin transaction: {0}")]
    Begin(#[source] sqlx::Error),

    /// The INSERT or UPDATE statement failed. Updates were rolled back.
    #[error("statement failed: {0}")]
    StatementFailed(#[source] sqlx::Error),

    /// The statement succeeded but the commit did not.
    #[error("commit failed: {0}")]
    CommitFailed(#[source] sqlx::Error),

    /// No row has the given id. Updates were rolled back.
    #[error("customer {0} not found")]
    NotFound(CustomerId),
}

/// Abstraction over the customer record store.
///
/// All methods return `Send` futures so the store can be shared by axum
/// handlers running on a multi-threaded runtime.
pub trait CustomerStore: Send + Sync + 'static {
    /// Check that the backend is reachable.
    fn ping(&self) -> impl Future<Output = Result<(), RepositoryError>> + Send + '_;

    /// Every customer, ordered by id.
    fn list_all(&self) -> impl Future<Output = Result<Vec<Customer>, RepositoryError>> + Send + '_;

    /// The customer with the given id, or `None`.
    fn find_by_id(
        &self,
        id: CustomerId,
    ) -> impl Future<Output = Result<Option<Customer>, RepositoryError>> + Send + '_;

    /// Customers whose first name equals the first token OR whose last name
    /// equals the second token.
    fn find_by_names(
        &self,
        terms: SearchTerms,
    ) -> impl Future<Output = Result<Vec<Customer>, RepositoryError>> + Send + '_;

    /// Insert a customer with a single statement and return its new id.
    fn create(
        &self,
        fields: CustomerFields,
    ) -> impl Future<Output = Result<CustomerId, WriteError>> + Send + '_;

    /// Overwrite every mutable column of an existing customer inside a
    /// transaction.
    ///
    /// On statement failure or a missing row the transaction is rolled back
    /// and the stored row is unchanged.
    fn update(
        &self,
        id: CustomerId,
        fields: CustomerFields,
    ) -> impl Future<Output = Result<(), WriteError>> + Send + '_;
}

/// Create a `PostgreSQL` connection pool with sensible defaults.
///
/// # Arguments
///
/// * `database_url` - `PostgreSQL` connection string (wrapped in `SecretString`)
///
/// # Errors
///
/// Returns `sqlx::Error` if the connection cannot be established.
pub async fn create_pool(database_url: &secrecy::SecretString) -> Result<PgPool, sqlx::Error> {
    PgPoolOptions::new()
        .max_connections(10)
        .min_connections(2)
        .acquire_timeout(Duration::from_secs(10))
        .connect(database_url.expose_secret())
        .await
}
