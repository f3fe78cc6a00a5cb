//! HTTP route handlers.
//!
//! # Route Structure
//!
//! ```text
//! GET  /                      - Redirect to /customers
//! GET  /customers             - Listing of every customer
//! GET  /editcustomer?id=ID    - Edit form for one customer
//! POST /editcustomeraction    - Apply an edit (transactional)
//! GET  /createcustomer        - Blank create form
//! POST /createcustomeraction  - Insert a customer
//! GET  /search?param=Q        - Name search
//! POST /search                - Name search (param in body)
//!
//! GET  /health                - Liveness
//! GET  /health/ready          - Readiness (pings the store)
//! ```
//!
//! Successful writes answer `303 See Other` to `/customers`. Any other
//! method on a known path is `405`; unknown paths are `404`.

pub mod customers;
pub mod health;
pub mod search;

use axum::{
    Router,
    body::Body,
    http::Request,
    middleware,
    routing::{get, post},
};
use tower_http::trace::TraceLayer;

use crate::db::CustomerStore;
use crate::error::AppError;
use crate::middleware::request_id_middleware;
use crate::state::AppState;

/// Create all customer routes.
pub fn routes<S: CustomerStore>() -> Router<AppState<S>> {
    Router::new()
        .route("/", get(customers::index))
        .route("/customers", get(customers::list::<S>))
        .route("/editcustomer", get(customers::edit_form::<S>))
        .route("/editcustomeraction", post(customers::edit_action::<S>))
        .route("/createcustomer", get(customers::create_form))
        .route("/createcustomeraction", post(customers::create_action::<S>))
        .route(
            "/search",
            get(search::search_query::<S>).post(search::search_form::<S>),
        )
}

/// Build the complete application router over a record store.
///
/// Sentry layers are added by the binary, outside this router.
pub fn app<S: CustomerStore>(state: AppState<S>) -> Router {
    Router::new()
        .route("/health", get(health::health))
        .route("/health/ready", get(health::readiness::<S>))
        .merge(routes())
        .method_not_allowed_fallback(method_not_allowed)
        .fallback(not_found)
        .layer(middleware::from_fn(request_id_middleware))
        .layer(
            TraceLayer::new_for_http().make_span_with(|request: &Request<Body>| {
                tracing::info_span!(
                    "http_request",
                    method = %request.method(),
                    uri = %request.uri(),
                    request_id = tracing::field::Empty,
                )
            }),
        )
        .with_state(state)
}

async fn method_not_allowed() -> AppError {
    AppError::MethodNotAllowed
}

async fn not_found() -> AppError {
    AppError::NotFound("no such route".to_string())
}
