//! Persistence module split across logical submodules.

mod bills;
mod connection;
mod customers;

pub use bills::{get_bill_detail, insert_bill, list_bills};
pub use connection::{ensure_schema, Database};
pub use customers::{add_customer, list_customers};
