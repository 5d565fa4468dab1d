use std::str::FromStr;

use rusqlite::types::Type;
use rusqlite::{params, Connection, OptionalExtension, Row};
use rust_decimal::Decimal;

use crate::error::{Error, Result, StoreContext};
use crate::models::{Bill, BillDetail, BillItem, BillSummary, ValidatedBill};

/// Write a bill and all of its items in one transaction. If any insert fails
/// the transaction is dropped without committing, which rolls back every row
/// written so far.
pub fn insert_bill(conn: &mut Connection, customer_id: i64, bill: &ValidatedBill) -> Result<i64> {
    let tx = conn
        .transaction()
        .store_context("failed to start bill transaction")?;

    tx.execute(
        "INSERT INTO bills (customer_id, total_amount) VALUES (?1, ?2)",
        params![customer_id, bill.total_amount.to_string()],
    )
    .store_context("failed to insert bill")?;
    let bill_id = tx.last_insert_rowid();

    {
        let mut stmt = tx
            .prepare(
                "INSERT INTO bill_items (bill_id, item_name, quantity, unit_price, total_item_price)
                 VALUES (?1, ?2, ?3, ?4, ?5)",
            )
            .store_context("failed to prepare bill item insert")?;
        for item in &bill.items {
            stmt.execute(params![
                bill_id,
                item.name,
                item.quantity,
                item.unit_price.to_string(),
                item.extended.to_string()
            ])
            .store_context("failed to insert bill item")?;
        }
    }

    tx.commit().store_context("failed to commit bill")?;
    Ok(bill_id)
}

/// Bill history, newest first. Bills created within the same second fall
/// back to id order so the latest one still comes first.
pub fn list_bills(conn: &Connection) -> Result<Vec<BillSummary>> {
    let mut stmt = conn
        .prepare(
            "SELECT b.id, c.name, b.bill_date, b.total_amount, b.status
             FROM bills b
             INNER JOIN customers c ON b.customer_id = c.id
             ORDER BY b.bill_date DESC, b.id DESC",
        )
        .store_context("failed to prepare bill list query")?;

    let bills = stmt
        .query_map([], |row| {
            Ok(BillSummary {
                id: row.get(0)?,
                customer_name: row.get(1)?,
                bill_date: row.get(2)?,
                total_amount: decimal_column(row, 3)?,
                status: row.get(4)?,
            })
        })
        .store_context("failed to load bills")?
        .collect::<std::result::Result<Vec<_>, _>>()
        .store_context("failed to collect bills")?;

    Ok(bills)
}

/// Load one bill with its customer and items. An unknown id is
/// [`Error::NotFound`]; a header is never returned without its items.
pub fn get_bill_detail(conn: &Connection, bill_id: i64) -> Result<BillDetail> {
    let bill = conn
        .query_row(
            "SELECT b.id, c.name, c.address, c.phone, c.email, b.bill_date, b.total_amount, b.status
             FROM bills b
             INNER JOIN customers c ON b.customer_id = c.id
             WHERE b.id = ?1",
            [bill_id],
            |row| {
                Ok(Bill {
                    id: row.get(0)?,
                    customer_name: row.get(1)?,
                    address: row.get(2)?,
                    phone: row.get(3)?,
                    email: row.get(4)?,
                    bill_date: row.get(5)?,
                    total_amount: decimal_column(row, 6)?,
                    status: row.get(7)?,
                })
            },
        )
        .optional()
        .store_context("failed to load bill")?;

    let Some(bill) = bill else {
        return Err(Error::NotFound {
            entity: "Bill",
            id: bill_id,
        });
    };

    let mut stmt = conn
        .prepare(
            "SELECT id, bill_id, item_name, quantity, unit_price, total_item_price
             FROM bill_items
             WHERE bill_id = ?1
             ORDER BY id",
        )
        .store_context("failed to prepare bill items query")?;

    let items = stmt
        .query_map([bill_id], |row| {
            Ok(BillItem {
                id: row.get(0)?,
                bill_id: row.get(1)?,
                item_name: row.get(2)?,
                quantity: row.get(3)?,
                unit_price: decimal_column(row, 4)?,
                total_item_price: decimal_column(row, 5)?,
            })
        })
        .store_context("failed to load bill items")?
        .collect::<std::result::Result<Vec<_>, _>>()
        .store_context("failed to collect bill items")?;

    Ok(BillDetail { bill, items })
}

/// Amounts live in TEXT columns; parse them back into exact decimals.
fn decimal_column(row: &Row<'_>, idx: usize) -> rusqlite::Result<Decimal> {
    let raw: String = row.get(idx)?;
    Decimal::from_str(&raw)
        .map_err(|err| rusqlite::Error::FromSqlConversionFailure(idx, Type::Text, Box::new(err)))
}
