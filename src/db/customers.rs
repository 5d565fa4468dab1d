use rusqlite::{ffi, params, Connection, Error as SqlError, ErrorCode};

use crate::error::{Error, Result, StoreContext, ValidationError};
use crate::models::{Customer, NewCustomer};

/// Validate and insert a customer, returning the new id. Name and email are
/// required; address and phone are stored as NULL when left blank.
pub fn add_customer(conn: &Connection, customer: &NewCustomer) -> Result<i64> {
    let name = customer.name.trim();
    let email = customer.email.trim();
    if name.is_empty() || email.is_empty() {
        return Err(ValidationError::MissingCustomerFields.into());
    }

    conn.execute(
        "INSERT INTO customers (name, address, phone, email) VALUES (?1, ?2, ?3, ?4)",
        params![
            name,
            optional(&customer.address),
            optional(&customer.phone),
            email
        ],
    )
    .map_err(|err| map_unique_constraint(err, email))?;

    let id = conn.last_insert_rowid();
    tracing::info!(customer_id = id, "customer added");
    Ok(id)
}

/// Every customer ordered by name, using SQLite's default binary collation
/// so uppercase names sort before lowercase ones. Ties fall back to id. Backs
/// both the customer list page and the dropdown on the bill form.
pub fn list_customers(conn: &Connection) -> Result<Vec<Customer>> {
    let mut stmt = conn
        .prepare(
            "SELECT id, name, address, phone, email
             FROM customers
             ORDER BY name, id",
        )
        .store_context("failed to prepare customer query")?;

    let customers = stmt
        .query_map([], |row| {
            Ok(Customer {
                id: row.get(0)?,
                name: row.get(1)?,
                address: row.get(2)?,
                phone: row.get(3)?,
                email: row.get(4)?,
            })
        })
        .store_context("failed to load customers")?
        .collect::<std::result::Result<Vec<_>, _>>()
        .store_context("failed to collect customers")?;

    Ok(customers)
}

fn optional(value: &str) -> Option<&str> {
    let value = value.trim();
    (!value.is_empty()).then_some(value)
}

/// Only the email column carries a UNIQUE constraint, so a unique violation
/// here always means a duplicate email. Anything else stays a store failure.
fn map_unique_constraint(err: SqlError, email: &str) -> Error {
    if let SqlError::SqliteFailure(cause, _) = &err {
        if cause.code == ErrorCode::ConstraintViolation
            && cause.extended_code == ffi::SQLITE_CONSTRAINT_UNIQUE
        {
            return Error::DuplicateEmail {
                email: email.to_string(),
            };
        }
    }
    Error::Persistence {
        context: "failed to insert customer",
        source: err,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::ensure_schema;

    fn conn() -> Connection {
        let conn = Connection::open_in_memory().unwrap();
        ensure_schema(&conn).unwrap();
        conn
    }

    fn customer(name: &str, email: &str) -> NewCustomer {
        NewCustomer {
            name: name.into(),
            email: email.into(),
            ..NewCustomer::default()
        }
    }

    fn count(conn: &Connection) -> i64 {
        conn.query_row("SELECT COUNT(*) FROM customers", [], |row| row.get(0))
            .unwrap()
    }

    #[test]
    fn empty_store_lists_nothing() {
        assert!(list_customers(&conn()).unwrap().is_empty());
    }

    #[test]
    fn adds_and_lists_by_binary_name_order() {
        let conn = conn();
        let zed = add_customer(
            &conn,
            &NewCustomer {
                name: "Zed".into(),
                address: "1 Main St".into(),
                phone: "  ".into(),
                email: "zed@example.com".into(),
            },
        )
        .unwrap();
        let amy = add_customer(&conn, &customer("amy", "amy@example.com")).unwrap();

        let customers = list_customers(&conn).unwrap();
        assert_eq!(
            customers.iter().map(|c| c.id).collect::<Vec<_>>(),
            [zed, amy]
        );
        assert_eq!(customers[0].address.as_deref(), Some("1 Main St"));
        assert_eq!(customers[0].phone, None);
    }

    #[test]
    fn requires_name_and_email() {
        let conn = conn();
        for (name, email) in [("", "a@example.com"), ("Ann", ""), ("   ", "a@example.com")] {
            let err = add_customer(&conn, &customer(name, email)).unwrap_err();
            assert!(matches!(
                err,
                Error::Validation(ValidationError::MissingCustomerFields)
            ));
        }
        assert_eq!(count(&conn), 0);
    }

    #[test]
    fn duplicate_email_is_rejected_without_changes() {
        let conn = conn();
        add_customer(&conn, &customer("Ann", "ann@example.com")).unwrap();

        let err = add_customer(&conn, &customer("Another Ann", "ann@example.com")).unwrap_err();
        assert!(matches!(err, Error::DuplicateEmail { ref email } if email == "ann@example.com"));

        // Rejection is stable on repeat.
        let err = add_customer(&conn, &customer("Ann", " ann@example.com ")).unwrap_err();
        assert!(matches!(err, Error::DuplicateEmail { .. }));
        assert_eq!(count(&conn), 1);
    }
}
