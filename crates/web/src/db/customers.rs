//! `PostgreSQL` customer repository.
//!
//! Queries are built at runtime with `sqlx::query`/`query_as` and bound
//! parameters; nothing user-supplied is ever interpolated into SQL.
//!
//! `birth_date` is selected as text so the date portion can be cut from
//! whatever the column renders, whether it is `DATE`, `TIMESTAMP`, or
//! `TIMESTAMPTZ`.

use sqlx::{PgPool, Postgres, Transaction};

use crm_core::{BirthDate, CustomerId, SearchTerms};

use super::{CustomerStore, RepositoryError, WriteError};
use crate::models::{Customer, CustomerFields};

const LIST_ALL: &str = r"
    SELECT id, first_name, last_name, birth_date::text AS birth_date, gender, email, address
    FROM customers
    ORDER BY id
";

const FIND_BY_ID: &str = r"
    SELECT id, first_name, last_name, birth_date::text AS birth_date, gender, email, address
    FROM customers
    WHERE id = $1
";

const FIND_BY_NAMES: &str = r"
    SELECT id, first_name, last_name, birth_date::text AS birth_date, gender, email, address
    FROM customers
    WHERE first_name = $1 OR last_name = $2
    ORDER BY id
";

const INSERT: &str = r"
    INSERT INTO customers (first_name, last_name, birth_date, gender, email, address)
    VALUES ($1, $2, $3, $4, $5, $6)
    RETURNING id
";

const UPDATE: &str = r"
    UPDATE customers
    SET first_name = $1, last_name = $2, birth_date = $3, gender = $4, email = $5, address = $6
    WHERE id = $7
";

/// Raw `customers` row before the typed fields are checked.
#[derive(Debug, sqlx::FromRow)]
struct CustomerRow {
    id: i32,
    first_name: String,
    last_name: String,
    birth_date: String,
    gender: String,
    email: String,
    address: String,
}

impl From<CustomerRow> for Customer {
    fn from(row: CustomerRow) -> Self {
        Self {
            id: CustomerId::new(row.id),
            first_name: row.first_name,
            last_name: row.last_name,
            birth_date: BirthDate::from_stored(&row.birth_date),
            gender: row.gender,
            email: row.email,
            address: row.address,
        }
    }
}

/// Customer store backed by a `PostgreSQL` connection pool.
#[derive(Debug, Clone)]
pub struct PgCustomerStore {
    pool: PgPool,
}

impl PgCustomerStore {
    /// Create a new customer store over an existing pool.
    #[must_use]
    pub const fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

fn into_customers(rows: Vec<CustomerRow>) -> Vec<Customer> {
    rows.into_iter().map(Customer::from).collect()
}

/// Roll back an update transaction, logging (not returning) any failure.
///
/// The caller is already returning the error that caused the rollback.
/// Dropping a `Transaction` also rolls it back, so a failed explicit
/// rollback leaves nothing committed.
async fn rollback(tx: Transaction<'_, Postgres>, id: CustomerId) {
    if let Err(e) = tx.rollback().await {
        tracing::warn!(customer_id = %id, error = %e, "Rollback failed");
    }
}

impl CustomerStore for PgCustomerStore {
    async fn ping(&self) -> Result<(), RepositoryError> {
        sqlx::query("SELECT 1").execute(&self.pool).await?;
        Ok(())
    }

    async fn list_all(&self) -> Result<Vec<Customer>, RepositoryError> {
        let rows = sqlx::query_as::<_, CustomerRow>(LIST_ALL)
            .fetch_all(&self.pool)
            .await?;

        Ok(into_customers(rows))
    }

    async fn find_by_id(&self, id: CustomerId) -> Result<Option<Customer>, RepositoryError> {
        let row = sqlx::query_as::<_, CustomerRow>(FIND_BY_ID)
            .bind(id)
            .fetch_optional(&self.pool)
            .await?;

        Ok(row.map(Customer::from))
    }

    async fn find_by_names(&self, terms: SearchTerms) -> Result<Vec<Customer>, RepositoryError> {
        let rows = sqlx::query_as::<_, CustomerRow>(FIND_BY_NAMES)
            .bind(terms.first_name())
            .bind(terms.last_name())
            .fetch_all(&self.pool)
            .await?;

        Ok(into_customers(rows))
    }

    async fn create(&self, fields: CustomerFields) -> Result<CustomerId, WriteError> {
        let id = sqlx::query_scalar::<_, i32>(INSERT)
            .bind(&fields.first_name)
            .bind(&fields.last_name)
            .bind(fields.birth_date)
            .bind(fields.gender)
            .bind(&fields.email)
            .bind(&fields.address)
            .fetch_one(&self.pool)
            .await
            .map_err(WriteError::StatementFailed)?;

        Ok(CustomerId::new(id))
    }

    async fn update(&self, id: CustomerId, fields: CustomerFields) -> Result<(), WriteError> {
        let mut tx = self.pool.begin().await.map_err(WriteError::Begin)?;

        let result = sqlx::query(UPDATE)
            .bind(&fields.first_name)
            .bind(&fields.last_name)
            .bind(fields.birth_date)
            .bind(fields.gender)
            .bind(&fields.email)
            .bind(&fields.address)
            .bind(id)
            .execute(&mut *tx)
            .await;

        let rows_affected = match result {
            Ok(done) => done.rows_affected(),
            Err(e) => {
                rollback(tx, id).await;
                return Err(WriteError::StatementFailed(e));
            }
        };

        if rows_affected == 0 {
            rollback(tx, id).await;
            return Err(WriteError::NotFound(id));
        }

        tx.commit().await.map_err(WriteError::CommitFailed)
    }
}
