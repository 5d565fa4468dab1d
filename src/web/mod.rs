//! HTTP surface: routes, per-request handlers and the HTML they render.

pub mod flash;
mod forms;
mod handlers;
mod views;

use axum::{routing::get, Router};
use tower_http::trace::TraceLayer;

use crate::db::Database;

/// Shared router state. Handlers open their own connection through `db`.
#[derive(Debug, Clone)]
pub struct AppState {
    pub db: Database,
}

impl AppState {
    pub fn new(db: Database) -> Self {
        Self { db }
    }
}

pub fn router(state: AppState) -> Router {
    Router::new()
        .route("/", get(handlers::index))
        .route(
            "/add_customer",
            get(handlers::add_customer_form).post(handlers::add_customer),
        )
        .route("/view_customers", get(handlers::view_customers))
        .route(
            "/generate_bill",
            get(handlers::generate_bill_form).post(handlers::generate_bill),
        )
        .route("/view_bills", get(handlers::view_bills))
        .route("/view_bill/{id}", get(handlers::view_bill))
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}
