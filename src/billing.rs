//! Bill composition: turn the rows of the bill form into a validated bill and
//! persist it together with its items.
//!
//! Validation runs completely before anything is written. The only failures
//! left for the write phase are store failures, which roll the whole bill
//! back.

use rusqlite::Connection;
use rust_decimal::Decimal;

use crate::db;
use crate::error::{Result, ValidationError};
use crate::models::{RawItemRow, ValidatedBill, ValidatedItem};

/// Validate `rows` and write the bill for `customer_id` atomically, returning
/// the new bill id.
pub fn compose_bill(conn: &mut Connection, customer_id: &str, rows: &[RawItemRow]) -> Result<i64> {
    let customer_id = parse_customer_id(customer_id)?;
    let bill = validate_items(rows)?;
    let bill_id = db::insert_bill(conn, customer_id, &bill)?;
    tracing::info!(
        bill_id,
        customer_id,
        items = bill.items.len(),
        total = %bill.total_amount,
        "bill composed"
    );
    Ok(bill_id)
}

/// The customer select sends its value as text; an empty value means nothing
/// was chosen.
pub fn parse_customer_id(raw: &str) -> std::result::Result<i64, ValidationError> {
    let raw = raw.trim();
    if raw.is_empty() {
        return Err(ValidationError::MissingCustomer);
    }
    raw.parse().map_err(|_| ValidationError::InvalidCustomer)
}

/// Walk the submitted rows in order and stop at the first bad one.
///
/// Blank rows are skipped. For every other row the checks run in a fixed
/// order: name present, numbers parse, quantity positive, price not negative.
/// Row numbers in errors are 1-based and count skipped rows too.
pub fn validate_items(rows: &[RawItemRow]) -> std::result::Result<ValidatedBill, ValidationError> {
    let mut items = Vec::new();
    let mut total_amount = Decimal::ZERO;

    for (idx, row) in rows.iter().enumerate() {
        if row.is_blank() {
            continue;
        }
        let item = validate_row(idx + 1, row)?;
        let running = total_amount
            .checked_add(item.extended)
            .ok_or_else(|| ValidationError::AmountTooLarge {
                item: item.name.clone(),
            })?;
        // Addition rounds silently when the scales no longer fit.
        if running.checked_sub(item.extended) != Some(total_amount) {
            return Err(ValidationError::AmountTooPrecise { item: item.name });
        }
        total_amount = running;
        items.push(item);
    }

    if items.is_empty() {
        return Err(ValidationError::NoValidItems);
    }

    Ok(ValidatedBill {
        items,
        total_amount,
    })
}

fn validate_row(row_number: usize, row: &RawItemRow) -> std::result::Result<ValidatedItem, ValidationError> {
    let name = row.name.trim();
    if name.is_empty() {
        return Err(ValidationError::EmptyItemName { row: row_number });
    }

    let invalid = || ValidationError::InvalidNumber { row: row_number };
    let quantity = row.quantity.trim().parse::<i64>().map_err(|_| invalid())?;
    // `from_str_exact` rejects prices that would lose digits when parsed.
    let unit_price = Decimal::from_str_exact(row.unit_price.trim()).map_err(|_| invalid())?;

    if quantity <= 0 {
        return Err(ValidationError::NonPositiveQuantity { item: name.into() });
    }
    if unit_price < Decimal::ZERO {
        return Err(ValidationError::NegativeUnitPrice { item: name.into() });
    }

    let quantity_dec = Decimal::from(quantity);
    let extended = unit_price
        .checked_mul(quantity_dec)
        .ok_or_else(|| ValidationError::AmountTooLarge { item: name.into() })?;
    // Multiplication rounds instead of failing once the product needs more
    // digits than a Decimal holds; dividing back exposes that.
    if extended.checked_div(quantity_dec) != Some(unit_price) {
        return Err(ValidationError::AmountTooPrecise { item: name.into() });
    }

    Ok(ValidatedItem {
        name: name.to_string(),
        quantity,
        unit_price,
        extended,
    })
}
