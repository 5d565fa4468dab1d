//! Route handlers. Each handler makes at most one trip to the store through
//! [`crate::db::Database::run`] and turns the outcome into a page, a redirect
//! carrying a banner, or a re-rendered form.

use axum::{
    extract::{Path, State},
    http::{HeaderMap, StatusCode},
    response::{Html, IntoResponse, Redirect, Response},
    Form,
};

use crate::billing;
use crate::db;
use crate::error::Error;
use crate::models::{Customer, NewCustomer};
use crate::web::flash::{self, Flash};
use crate::web::forms::{BillForm, CustomerForm};
use crate::web::{views, AppState};

/// Render a page, consuming any banner a previous redirect left behind.
fn render(headers: &HeaderMap, page: impl FnOnce(Option<&Flash>) -> String) -> Response {
    match Flash::from_headers(headers) {
        Some(pending) => ([flash::clear_cookie()], Html(page(Some(&pending)))).into_response(),
        None => Html(page(None)).into_response(),
    }
}

/// 303 to `location` with `message` queued for the next page that renders.
fn redirect_with(location: &str, message: Flash) -> Response {
    ([message.to_cookie()], Redirect::to(location)).into_response()
}

/// A read failed before anything could be shown. The landing page carries
/// the message instead.
fn store_failure(err: Error) -> Response {
    tracing::error!(error = %err, "store read failed");
    let message = Flash::danger(format!("Could not load data: {err}"));
    (
        StatusCode::INTERNAL_SERVER_ERROR,
        Html(views::index(Some(&message))),
    )
        .into_response()
}

/// GET /
///
/// Landing page. Shows a banner left by an earlier redirect, if any.
pub async fn index(headers: HeaderMap) -> Response {
    render(&headers, views::index)
}

/// GET /add_customer
///
/// Empty customer form.
pub async fn add_customer_form(headers: HeaderMap) -> Response {
    render(&headers, |flash| {
        views::add_customer(flash, &NewCustomer::default())
    })
}

/// POST /add_customer
///
/// Stores the customer and redirects to the customer list with a success
/// banner. Missing fields, a duplicate email or a store failure re-render the
/// form with the submitted values and a `danger` banner.
pub async fn add_customer(State(state): State<AppState>, Form(form): Form<CustomerForm>) -> Response {
    let customer = NewCustomer::from(form);
    let submitted = customer.clone();

    match state
        .db
        .run(move |conn| db::add_customer(conn, &customer))
        .await
    {
        Ok(_) => redirect_with(
            "/view_customers",
            Flash::success("Customer added successfully!"),
        ),
        Err(err) => {
            let message = match &err {
                Error::Validation(_) | Error::DuplicateEmail { .. } => {
                    tracing::warn!(error = %err, "customer rejected");
                    err.to_string()
                }
                _ => {
                    tracing::error!(error = %err, "failed to add customer");
                    format!("Error adding customer: {err}")
                }
            };
            Html(views::add_customer(Some(&Flash::danger(message)), &submitted)).into_response()
        }
    }
}

/// GET /view_customers
///
/// Every customer, ordered by name. A failed read falls back to the landing
/// page with HTTP 500.
pub async fn view_customers(State(state): State<AppState>, headers: HeaderMap) -> Response {
    match state.db.run(|conn| db::list_customers(conn)).await {
        Ok(customers) => render(&headers, |flash| views::view_customers(flash, &customers)),
        Err(err) => store_failure(err),
    }
}

/// GET /generate_bill
///
/// Bill form with the customer dropdown filled from the store and a single
/// blank item row.
pub async fn generate_bill_form(State(state): State<AppState>, headers: HeaderMap) -> Response {
    match state.db.run(|conn| db::list_customers(conn)).await {
        Ok(customers) => render(&headers, |flash| {
            views::generate_bill(flash, &customers, "", &[])
        }),
        Err(err) => store_failure(err),
    }
}

/// Result of the single store trip made by [`generate_bill`]. A rejected bill
/// also carries the customer list needed to re-render the form.
enum BillOutcome {
    Created(i64),
    Rejected { error: Error, customers: Vec<Customer> },
}

/// POST /generate_bill
///
/// The body is decoded as raw pairs because the item fields repeat. On
/// success the browser is sent to the new bill's detail page. Any rejection,
/// including a rolled-back write, re-renders the form with what was submitted.
/// Nothing is stored in that case.
pub async fn generate_bill(
    State(state): State<AppState>,
    Form(pairs): Form<Vec<(String, String)>>,
) -> Response {
    let form = BillForm::from_pairs(pairs);
    let submitted = form.clone();

    let outcome = state
        .db
        .run(move |conn| {
            match billing::compose_bill(conn, &form.customer_id, &form.rows) {
                Ok(id) => Ok(BillOutcome::Created(id)),
                Err(error) => Ok(BillOutcome::Rejected {
                    error,
                    customers: db::list_customers(conn)?,
                }),
            }
        })
        .await;

    match outcome {
        Ok(BillOutcome::Created(id)) => redirect_with(
            &format!("/view_bill/{id}"),
            Flash::success(format!("Bill #{id} successfully added!")),
        ),
        Ok(BillOutcome::Rejected { error, customers }) => {
            let message = match &error {
                Error::Validation(_) => {
                    tracing::warn!(error = %error, "bill rejected");
                    error.to_string()
                }
                _ => {
                    tracing::error!(error = %error, "failed to write bill");
                    format!("An error occurred while adding the bill: {error}")
                }
            };
            Html(views::generate_bill(
                Some(&Flash::danger(message)),
                &customers,
                &submitted.customer_id,
                &submitted.rows,
            ))
            .into_response()
        }
        Err(err) => store_failure(err),
    }
}

/// GET /view_bills
///
/// Bill history, newest first.
pub async fn view_bills(State(state): State<AppState>, headers: HeaderMap) -> Response {
    match state.db.run(|conn| db::list_bills(conn)).await {
        Ok(bills) => render(&headers, |flash| views::view_bills(flash, &bills)),
        Err(err) => store_failure(err),
    }
}

/// GET /view_bill/{id}
///
/// One bill with its items. An unknown id redirects to the bill list with a
/// "Bill not found." banner.
pub async fn view_bill(
    State(state): State<AppState>,
    Path(bill_id): Path<i64>,
    headers: HeaderMap,
) -> Response {
    match state
        .db
        .run(move |conn| db::get_bill_detail(conn, bill_id))
        .await
    {
        Ok(detail) => render(&headers, |flash| views::bill_details(flash, &detail)),
        Err(Error::NotFound { .. }) => {
            tracing::warn!(bill_id, "bill not found");
            redirect_with("/view_bills", Flash::danger("Bill not found."))
        }
        Err(err) => store_failure(err),
    }
}
