//! Small business billing: register customers, compose bills from line
//! items and browse bill history, served as HTML over axum on top of an
//! embedded SQLite store.
pub mod billing;
pub mod config;
pub mod db;
pub mod error;
pub mod logging;
pub mod models;
pub mod web;

pub use billing::{compose_bill, validate_items};
pub use config::Config;
pub use db::{add_customer, get_bill_detail, list_bills, list_customers, Database};
pub use error::{Error, Result, ValidationError};
pub use models::{BillDetail, BillSummary, Customer, NewCustomer, RawItemRow};
pub use web::{router, AppState};
