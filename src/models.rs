//! Domain models that mirror the SQLite schema and get passed between the
//! persistence layer and the web handlers. The intent is that these types stay
//! light-weight data holders so the other layers can focus on validation,
//! storage and rendering. Money is always a `Decimal` so totals never pick up
//! floating point noise on the way in or out of the database.

use chrono::NaiveDateTime;
use rust_decimal::Decimal;

/// Status every bill starts with. The schema uses the same value as its
/// column default and nothing in the application changes it afterwards.
pub const DEFAULT_BILL_STATUS: &str = "pending";

#[derive(Debug, Clone, PartialEq, Eq)]
/// A registered customer as stored in the `customers` table. Customers are
/// created once and never edited, so the struct doubles as the read model for
/// the customer list and the dropdown on the bill form.
pub struct Customer {
    /// Primary key assigned by SQLite. Bills reference customers by this id.
    pub id: i64,
    /// Display name; required and stored trimmed.
    pub name: String,
    /// Postal address. `None` when the form field was left blank.
    pub address: Option<String>,
    /// Phone number kept as free text so formatting is up to the user.
    pub phone: Option<String>,
    /// Contact email. The table enforces uniqueness, which is how duplicate
    /// registrations are detected.
    pub email: String,
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
/// Customer fields as submitted by the "add customer" form, before
/// validation. Optional fields arrive as empty strings when left blank, and
/// the persistence layer decides how to store them.
pub struct NewCustomer {
    /// Raw name input; must be non-empty after trimming.
    pub name: String,
    /// Raw address input; blank means "not provided".
    pub address: String,
    /// Raw phone input; blank means "not provided".
    pub phone: String,
    /// Raw email input; must be non-empty after trimming.
    pub email: String,
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
/// One line of the bill form exactly as the browser sent it. Every field is
/// untyped text; [`crate::billing::validate_items`] turns a sequence of these
/// into typed [`ValidatedItem`]s. Keeping the raw text around also lets the
/// form be re-rendered with the user's input after a rejection.
pub struct RawItemRow {
    /// Item description as typed.
    pub name: String,
    /// Quantity as typed; must parse as a whole number.
    pub quantity: String,
    /// Unit price as typed; must parse as an exact decimal.
    pub unit_price: String,
}

impl RawItemRow {
    /// Build a row from anything string-like. Mostly used by tests and by the
    /// form decoder.
    pub fn new(
        name: impl Into<String>,
        quantity: impl Into<String>,
        unit_price: impl Into<String>,
    ) -> Self {
        Self {
            name: name.into(),
            quantity: quantity.into(),
            unit_price: unit_price.into(),
        }
    }

    /// A row where all three fields are empty or whitespace. The form always
    /// ships a trailing empty row, so these are dropped instead of rejected.
    pub fn is_blank(&self) -> bool {
        self.name.trim().is_empty()
            && self.quantity.trim().is_empty()
            && self.unit_price.trim().is_empty()
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
/// A line item that passed validation and is ready to be written. Every
/// instance satisfies `quantity > 0`, `unit_price >= 0` and a non-empty name.
pub struct ValidatedItem {
    /// Trimmed item name.
    pub name: String,
    /// Strictly positive quantity.
    pub quantity: i64,
    /// Non-negative unit price, parsed without rounding.
    pub unit_price: Decimal,
    /// `quantity * unit_price`, computed exactly.
    pub extended: Decimal,
}

#[derive(Debug, Clone, PartialEq, Eq)]
/// Output of the validation phase: at least one item and the exact total.
/// Only this type reaches the write path, so an empty bill cannot be stored.
pub struct ValidatedBill {
    /// Accepted items in submission order, blank rows removed.
    pub items: Vec<ValidatedItem>,
    /// Sum of every item's extended price.
    pub total_amount: Decimal,
}

#[derive(Debug, Clone, PartialEq, Eq)]
/// Row of the bill history list, joined with the owning customer's name.
pub struct BillSummary {
    pub id: i64,
    pub customer_name: String,
    /// Creation time assigned by SQLite's `CURRENT_TIMESTAMP` (UTC).
    pub bill_date: NaiveDateTime,
    pub total_amount: Decimal,
    pub status: String,
}

#[derive(Debug, Clone, PartialEq, Eq)]
/// Bill header joined with the customer's full contact details, as shown at
/// the top of the bill detail page.
pub struct Bill {
    pub id: i64,
    pub customer_name: String,
    pub address: Option<String>,
    pub phone: Option<String>,
    pub email: String,
    pub bill_date: NaiveDateTime,
    /// Stored copy of the items' sum, written in the same transaction.
    pub total_amount: Decimal,
    pub status: String,
}

#[derive(Debug, Clone, PartialEq, Eq)]
/// A persisted line item. Items are immutable once their bill is committed.
pub struct BillItem {
    pub id: i64,
    /// Owning bill.
    pub bill_id: i64,
    pub item_name: String,
    pub quantity: i64,
    pub unit_price: Decimal,
    /// Extended price (`quantity * unit_price`) captured at creation time.
    pub total_item_price: Decimal,
}

#[derive(Debug, Clone, PartialEq, Eq)]
/// Everything the bill detail page shows: the header plus its items in
/// insertion order.
pub struct BillDetail {
    pub bill: Bill,
    pub items: Vec<BillItem>,
}
