//! Error taxonomy shared by the persistence layer, the bill composer and the
//! web handlers. Handlers match on the variants to pick a banner message and
//! decide between re-rendering a form and redirecting.

use thiserror::Error;

/// User input that was malformed or out of range. Nothing has been written
/// when one of these is returned.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum ValidationError {
    #[error("Customer name and email are required!")]
    MissingCustomerFields,

    #[error("Please select a customer.")]
    MissingCustomer,

    #[error("Selected customer is not valid.")]
    InvalidCustomer,

    /// `row` is 1-based, matching what the user sees on the form.
    #[error("Item name for row {row} cannot be empty.")]
    EmptyItemName { row: usize },

    #[error("Quantity and Unit Price for row {row} must be valid numbers.")]
    InvalidNumber { row: usize },

    #[error("Quantity for item \"{item}\" must be a positive number.")]
    NonPositiveQuantity { item: String },

    #[error("Unit price for item \"{item}\" cannot be negative.")]
    NegativeUnitPrice { item: String },

    #[error("Amount for item \"{item}\" is too large.")]
    AmountTooLarge { item: String },

    /// The amount only fits by rounding away digits.
    #[error("Amount for item \"{item}\" has too many digits to be stored exactly.")]
    AmountTooPrecise { item: String },

    #[error("Please add at least one valid item to the bill.")]
    NoValidItems,
}

#[derive(Debug, Error)]
pub enum Error {
    #[error(transparent)]
    Validation(#[from] ValidationError),

    #[error("Error: Customer with this email already exists.")]
    DuplicateEmail { email: String },

    #[error("{entity} {id} not found")]
    NotFound { entity: &'static str, id: i64 },

    #[error("{context}: {source}")]
    Persistence {
        context: &'static str,
        #[source]
        source: rusqlite::Error,
    },

    /// The blocking worker that owned the request's connection died.
    #[error("store worker failed: {0}")]
    Worker(String),
}

pub type Result<T> = std::result::Result<T, Error>;

/// Attach a short description to a raw SQLite failure, the same way
/// `anyhow::Context` would, while keeping the error typed.
pub trait StoreContext<T> {
    fn store_context(self, context: &'static str) -> Result<T>;
}

impl<T> StoreContext<T> for std::result::Result<T, rusqlite::Error> {
    fn store_context(self, context: &'static str) -> Result<T> {
        self.map_err(|source| Error::Persistence { context, source })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn row_errors_name_the_row_and_item() {
        assert_eq!(
            ValidationError::EmptyItemName { row: 3 }.to_string(),
            "Item name for row 3 cannot be empty."
        );
        assert_eq!(
            ValidationError::NonPositiveQuantity {
                item: "Widget".into()
            }
            .to_string(),
            "Quantity for item \"Widget\" must be a positive number."
        );
    }

    #[test]
    fn store_context_wraps_sqlite_errors() {
        let raw: std::result::Result<(), rusqlite::Error> =
            Err(rusqlite::Error::QueryReturnedNoRows);
        let err = raw.store_context("failed to load bill").unwrap_err();
        assert!(matches!(
            err,
            Error::Persistence {
                context: "failed to load bill",
                ..
            }
        ));
        assert!(err.to_string().starts_with("failed to load bill: "));
    }
}
