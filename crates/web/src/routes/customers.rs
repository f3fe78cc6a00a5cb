//! Customer listing, create, and edit route handlers.

use askama::Template;
use askama_web::WebTemplate;
use axum::{
    Form,
    extract::{
        Query, State,
        rejection::{FormRejection, QueryRejection},
    },
    response::Redirect,
};
use serde::Deserialize;
use tracing::instrument;

use crm_core::{BirthDate, CustomerId, Email, Gender, ValidationError, check};

use crate::db::CustomerStore;
use crate::error::{AppError, Result};
use crate::models::{Customer, CustomerFields};
use crate::state::AppState;

/// Where every successful write sends the browser.
pub const LISTING_PATH: &str = "/customers";

// =============================================================================
// Forms
// =============================================================================

/// Create/edit form body.
///
/// Absent fields deserialize as empty strings so they fail validation
/// rather than the extractor.
#[derive(Debug, Default, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct CustomerForm {
    /// Only sent by the edit form.
    #[serde(rename = "ID")]
    pub id: String,
    pub first_name: String,
    pub last_name: String,
    pub birth_date: String,
    pub gender: String,
    pub email: String,
    pub address: String,
}

impl CustomerForm {
    /// Validate the submitted fields and convert them to typed values.
    ///
    /// # Errors
    ///
    /// Returns `AppError::Validation` when a field breaks a rule and
    /// `AppError::MalformedInput` when the birth date is not `YYYY-MM-DD`.
    pub fn into_fields(self) -> Result<CustomerFields> {
        check(
            &self.first_name,
            &self.last_name,
            &self.gender,
            &self.address,
            &self.email,
        )?;

        let birth_date = BirthDate::parse_input(&self.birth_date)
            .map_err(|e| AppError::MalformedInput(e.to_string()))?;
        let gender = Gender::parse(&self.gender).map_err(ValidationError::from)?;
        let email = Email::parse(&self.email).map_err(ValidationError::from)?;

        Ok(CustomerFields {
            first_name: self.first_name,
            last_name: self.last_name,
            birth_date,
            gender,
            email,
            address: self.address,
        })
    }
}

/// `?id=` query for the edit page.
#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub struct EditQuery {
    pub id: String,
}

fn parse_id(raw: &str) -> Result<CustomerId> {
    CustomerId::parse(raw).map_err(|e| AppError::MalformedInput(format!("customer id: {e}")))
}

// =============================================================================
// Templates
// =============================================================================

/// Listing of every customer.
#[derive(Template, WebTemplate)]
#[template(path = "all.html")]
pub struct AllTemplate {
    pub customers: Vec<Customer>,
}

/// Edit form prefilled with one customer.
#[derive(Template, WebTemplate)]
#[template(path = "update.html")]
pub struct UpdateTemplate {
    pub customer: Customer,
    pub genders: &'static [Gender],
}

/// Blank create form.
#[derive(Template, WebTemplate)]
#[template(path = "create.html")]
pub struct CreateTemplate {
    pub genders: &'static [Gender],
}

// =============================================================================
// Handlers
// =============================================================================

/// GET /
#[instrument]
pub async fn index() -> Redirect {
    Redirect::to(LISTING_PATH)
}

/// GET /customers
#[instrument(skip(state))]
pub async fn list<S: CustomerStore>(State(state): State<AppState<S>>) -> Result<AllTemplate> {
    let customers = state.store().list_all().await?;
    tracing::debug!(count = customers.len(), "Listed customers");

    Ok(AllTemplate { customers })
}

/// GET /editcustomer?id=ID
#[instrument(skip(state, query))]
pub async fn edit_form<S: CustomerStore>(
    State(state): State<AppState<S>>,
    query: std::result::Result<Query<EditQuery>, QueryRejection>,
) -> Result<UpdateTemplate> {
    let Query(query) = query.map_err(|e| AppError::MalformedInput(e.body_text()))?;
    let id = parse_id(&query.id)?;

    let customer = state
        .store()
        .find_by_id(id)
        .await?
        .ok_or_else(|| AppError::NotFound(format!("customer {id}")))?;

    Ok(UpdateTemplate {
        customer,
        genders: &Gender::ALL,
    })
}

/// POST /editcustomeraction
///
/// Overwrites every field of the customer named by the `ID` field, inside a
/// transaction.
#[instrument(skip(state, form))]
pub async fn edit_action<S: CustomerStore>(
    State(state): State<AppState<S>>,
    form: std::result::Result<Form<CustomerForm>, FormRejection>,
) -> Result<Redirect> {
    let Form(form) = form.map_err(|e| AppError::MalformedInput(e.body_text()))?;
    let id = parse_id(&form.id)?;
    let fields = form.into_fields()?;

    state.store().update(id, fields).await?;
    tracing::info!(customer_id = %id, "Customer updated");

    Ok(Redirect::to(LISTING_PATH))
}

/// GET /createcustomer
#[instrument]
pub async fn create_form() -> CreateTemplate {
    CreateTemplate {
        genders: &Gender::ALL,
    }
}

/// POST /createcustomeraction
#[instrument(skip(state, form))]
pub async fn create_action<S: CustomerStore>(
    State(state): State<AppState<S>>,
    form: std::result::Result<Form<CustomerForm>, FormRejection>,
) -> Result<Redirect> {
    let Form(form) = form.map_err(|e| AppError::MalformedInput(e.body_text()))?;
    let fields = form.into_fields()?;

    let id = state.store().create(fields).await?;
    tracing::info!(customer_id = %id, "Customer created");

    Ok(Redirect::to(LISTING_PATH))
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    fn valid_form() -> CustomerForm {
        CustomerForm {
            id: String::new(),
            first_name: "Jane".to_string(),
            last_name: "Doe".to_string(),
            birth_date: "1990-05-02".to_string(),
            gender: "Female".to_string(),
            email: "jane.doe@example.com".to_string(),
            address: "1 Main St".to_string(),
        }
    }

    #[test]
    fn test_into_fields_valid() {
        let fields = valid_form().into_fields().unwrap();
        assert_eq!(fields.gender, Gender::Female);
        assert_eq!(fields.birth_date.to_string(), "1990-05-02");
        assert_eq!(fields.email.as_str(), "jane.doe@example.com");
    }

    #[test]
    fn test_into_fields_rejects_invalid_gender() {
        let mut form = valid_form();
        form.gender = "null".to_string();
        assert!(matches!(
            form.into_fields(),
            Err(AppError::Validation(ValidationError::Gender(_)))
        ));
    }

    #[test]
    fn test_into_fields_rejects_bad_birth_date() {
        let mut form = valid_form();
        form.birth_date = "02/05/1990".to_string();
        assert!(matches!(form.into_fields(), Err(AppError::MalformedInput(_))));

        let mut form = valid_form();
        form.birth_date = String::new();
        assert!(matches!(form.into_fields(), Err(AppError::MalformedInput(_))));
    }

    #[tokio::test]
    async fn test_form_field_names() {
        let form = decode_form(
            "ID=4&firstName=Jane&lastName=Doe&birthDate=1990-05-02&gender=Female&email=a%40b.co&address=x",
        )
        .await;
        assert_eq!(form.id, "4");
        assert_eq!(form.first_name, "Jane");
        assert_eq!(form.birth_date, "1990-05-02");
        assert_eq!(form.email, "a@b.co");
    }

    #[tokio::test]
    async fn test_form_missing_fields_are_empty() {
        let form = decode_form("firstName=Jane").await;
        assert_eq!(form.first_name, "Jane");
        assert!(form.last_name.is_empty());
        assert!(matches!(
            form.into_fields(),
            Err(AppError::Validation(ValidationError::LastName))
        ));
    }

    #[test]
    fn test_parse_id() {
        assert_eq!(parse_id("12").unwrap(), CustomerId::new(12));
        assert!(matches!(parse_id(""), Err(AppError::MalformedInput(_))));
        assert!(matches!(parse_id("abc"), Err(AppError::MalformedInput(_))));
        assert!(matches!(parse_id("-1"), Err(AppError::MalformedInput(_))));
    }

    /// Decode a form body the same way the `Form` extractor does.
    async fn decode_form(body: &str) -> CustomerForm {
        use axum::extract::FromRequest;

        let request = axum::http::Request::post("/")
            .header("content-type", "application/x-www-form-urlencoded")
            .body(axum::body::Body::from(body.to_string()))
            .unwrap();
        let Form(form) = Form::<CustomerForm>::from_request(request, &()).await.unwrap();
        form
    }
}
