use serde::Deserialize;

use crate::models::{NewCustomer, RawItemRow};

/// Fields posted by the "add customer" form. Browsers omit nothing here, but
/// hand-written requests may, so every field defaults to empty.
#[derive(Debug, Default, Clone, Deserialize)]
#[serde(default)]
pub(crate) struct CustomerForm {
    pub(crate) name: String,
    pub(crate) address: String,
    pub(crate) phone: String,
    pub(crate) email: String,
}

impl From<CustomerForm> for NewCustomer {
    fn from(form: CustomerForm) -> Self {
        Self {
            name: form.name,
            address: form.address,
            phone: form.phone,
            email: form.email,
        }
    }
}

/// The bill form after its parallel `item_name[]`, `quantity[]` and
/// `unit_price[]` arrays have been zipped into rows.
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub(crate) struct BillForm {
    pub(crate) customer_id: String,
    pub(crate) rows: Vec<RawItemRow>,
}

impl BillForm {
    /// Build the form from raw key/value pairs in submission order. A shorter
    /// array leaves the missing cells empty.
    pub(crate) fn from_pairs(pairs: Vec<(String, String)>) -> Self {
        let mut customer_id = String::new();
        let mut names = Vec::new();
        let mut quantities = Vec::new();
        let mut unit_prices = Vec::new();

        for (key, value) in pairs {
            match key.as_str() {
                "customer_id" => customer_id = value,
                "item_name[]" => names.push(value),
                "quantity[]" => quantities.push(value),
                "unit_price[]" => unit_prices.push(value),
                _ => {}
            }
        }

        let len = names.len().max(quantities.len()).max(unit_prices.len());
        let mut names = names.into_iter();
        let mut quantities = quantities.into_iter();
        let mut unit_prices = unit_prices.into_iter();
        let rows = (0..len)
            .map(|_| RawItemRow {
                name: names.next().unwrap_or_default(),
                quantity: quantities.next().unwrap_or_default(),
                unit_price: unit_prices.next().unwrap_or_default(),
            })
            .collect();

        Self { customer_id, rows }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn pairs(raw: &[(&str, &str)]) -> Vec<(String, String)> {
        raw.iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect()
    }

    #[test]
    fn zips_parallel_arrays_in_order() {
        let form = BillForm::from_pairs(pairs(&[
            ("customer_id", "3"),
            ("item_name[]", "Widget"),
            ("quantity[]", "2"),
            ("unit_price[]", "9.99"),
            ("item_name[]", "Gadget"),
            ("quantity[]", "1"),
            ("unit_price[]", "5.00"),
        ]));
        assert_eq!(form.customer_id, "3");
        assert_eq!(
            form.rows,
            [
                RawItemRow::new("Widget", "2", "9.99"),
                RawItemRow::new("Gadget", "1", "5.00"),
            ]
        );
    }

    #[test]
    fn short_arrays_pad_with_empty_cells() {
        let form = BillForm::from_pairs(pairs(&[
            ("item_name[]", "Widget"),
            ("item_name[]", ""),
            ("quantity[]", "2"),
            ("unusual", "ignored"),
        ]));
        assert_eq!(form.customer_id, "");
        assert_eq!(
            form.rows,
            [RawItemRow::new("Widget", "2", ""), RawItemRow::new("", "", "")]
        );
    }
}
