//! Application state shared across handlers.

use std::sync::Arc;

use crate::db::CustomerStore;

/// Application state shared across all handlers.
///
/// This struct is cheaply cloneable via `Arc`. It is generic over the
/// record store so the same router runs against `PostgreSQL` in production
/// and an in-memory store in tests.
pub struct AppState<S> {
    inner: Arc<AppStateInner<S>>,
}

struct AppStateInner<S> {
    store: S,
}

// Manual impl: `S` itself does not need to be `Clone`.
impl<S> Clone for AppState<S> {
    fn clone(&self) -> Self {
        Self {
            inner: Arc::clone(&self.inner),
        }
    }
}

impl<S: CustomerStore> AppState<S> {
    /// Create a new application state around a record store.
    #[must_use]
    pub fn new(store: S) -> Self {
        Self {
            inner: Arc::new(AppStateInner { store }),
        }
    }

    /// Get a reference to the customer record store.
    #[must_use]
    pub fn store(&self) -> &S {
        &self.inner.store
    }
}
