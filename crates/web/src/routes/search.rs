//! Name search route handlers.
//!
//! `/search` accepts `param` in the query string (GET) or in a urlencoded
//! body (POST). When both carry it, the body wins.

use askama::Template;
use askama_web::WebTemplate;
use axum::{
    Form,
    extract::{
        Query, State,
        rejection::{FormRejection, QueryRejection},
    },
};
use serde::Deserialize;
use tracing::instrument;

use crm_core::SearchTerms;

use crate::db::CustomerStore;
use crate::error::{AppError, Result};
use crate::models::Customer;
use crate::state::AppState;

/// Search parameters, from either the query string or the body.
#[derive(Debug, Default, Deserialize)]
pub struct SearchParams {
    #[serde(default)]
    pub param: Option<String>,
}

/// Search results page.
#[derive(Template, WebTemplate)]
#[template(path = "search.html")]
pub struct SearchTemplate {
    pub customers: Vec<Customer>,
    /// The query exactly as submitted, echoed back into the form.
    pub search_parameter: String,
}

/// GET /search?param=STRING
#[instrument(skip(state, query))]
pub async fn search_query<S: CustomerStore>(
    State(state): State<AppState<S>>,
    query: std::result::Result<Query<SearchParams>, QueryRejection>,
) -> Result<SearchTemplate> {
    let Query(query) = query.map_err(|e| AppError::MalformedInput(e.body_text()))?;
    run_search(&state, query.param.unwrap_or_default()).await
}

/// POST /search
#[instrument(skip(state, query, form))]
pub async fn search_form<S: CustomerStore>(
    State(state): State<AppState<S>>,
    query: std::result::Result<Query<SearchParams>, QueryRejection>,
    form: std::result::Result<Form<SearchParams>, FormRejection>,
) -> Result<SearchTemplate> {
    let Query(query) = query.map_err(|e| AppError::MalformedInput(e.body_text()))?;
    let form = match form {
        Ok(Form(form)) => form,
        // No urlencoded body: fall back to the query string alone.
        Err(FormRejection::InvalidFormContentType(_)) => SearchParams::default(),
        Err(e) => return Err(AppError::MalformedInput(e.body_text())),
    };

    let param = form.param.or(query.param).unwrap_or_default();
    run_search(&state, param).await
}

async fn run_search<S: CustomerStore>(
    state: &AppState<S>,
    search_parameter: String,
) -> Result<SearchTemplate> {
    let terms = SearchTerms::parse(&search_parameter)?;

    let customers = state.store().find_by_names(terms).await?;
    tracing::debug!(
        query = %search_parameter,
        matches = customers.len(),
        "Customer search"
    );

    Ok(SearchTemplate {
        customers,
        search_parameter,
    })
}
