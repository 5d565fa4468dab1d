//! Server-rendered HTML pages. Every page goes through [`layout`] so the
//! navigation and the banner slot stay identical everywhere.

use crate::models::{BillDetail, BillSummary, Customer, NewCustomer, RawItemRow};
use crate::web::flash::Flash;

/// How bill timestamps are shown; SQLite stores them in UTC.
const DATE_FORMAT: &str = "%Y-%m-%d %H:%M:%S";

/// Escape text for use in element content and quoted attribute values.
pub(crate) fn escape(raw: &str) -> String {
    let mut out = String::with_capacity(raw.len());
    for ch in raw.chars() {
        match ch {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#39;"),
            _ => out.push(ch),
        }
    }
    out
}

/// Optional contact fields render as a dash rather than an empty cell.
fn or_dash(value: Option<&str>) -> String {
    value.map(escape).unwrap_or_else(|| "-".to_string())
}

/// Wrap a page body in the shared document: head, navigation, the banner
/// slot for `flash`, and the page heading.
fn layout(title: &str, flash: Option<&Flash>, body: &str) -> String {
    let banner = flash
        .map(|f| {
            format!(
                r#"<div class="alert alert-{}">{}</div>"#,
                f.level.as_str(),
                escape(&f.message)
            )
        })
        .unwrap_or_default();

    format!(
        r#"<!DOCTYPE html>
<html lang="en">
<head>
<meta charset="utf-8">
<title>{title} - Billing Desk</title>
<style>
body {{ font-family: sans-serif; margin: 2rem; }}
nav a {{ margin-right: 1rem; }}
table {{ border-collapse: collapse; }}
th, td {{ border: 1px solid #ccc; padding: 0.3rem 0.6rem; }}
.alert {{ padding: 0.6rem; margin: 1rem 0; }}
.alert-success {{ background: #d4edda; }}
.alert-danger {{ background: #f8d7da; }}
</style>
</head>
<body>
<nav>
<a href="/">Home</a>
<a href="/add_customer">Add Customer</a>
<a href="/view_customers">Customers</a>
<a href="/generate_bill">Generate Bill</a>
<a href="/view_bills">Bills</a>
</nav>
{banner}
<h1>{title}</h1>
{body}
</body>
</html>
"#,
        title = escape(title),
    )
}

/// Landing page with a short description of what the application does.
pub(crate) fn index(flash: Option<&Flash>) -> String {
    layout(
        "Billing Desk",
        flash,
        "<p>Register customers, generate bills from line items and review bill history.</p>",
    )
}

/// "Add customer" form. `values` pre-fills the inputs so a rejected
/// submission comes back with what the user typed.
pub(crate) fn add_customer(flash: Option<&Flash>, values: &NewCustomer) -> String {
    let body = format!(
        r#"<form method="post" action="/add_customer">
<p><label>Name <input name="name" required value="{}"></label></p>
<p><label>Address <input name="address" value="{}"></label></p>
<p><label>Phone <input name="phone" value="{}"></label></p>
<p><label>Email <input name="email" type="email" required value="{}"></label></p>
<p><button type="submit">Add Customer</button></p>
</form>"#,
        escape(&values.name),
        escape(&values.address),
        escape(&values.phone),
        escape(&values.email),
    );
    layout("Add Customer", flash, &body)
}

/// Customer table in the order the store returned it, or a short notice when
/// there are no customers yet.
pub(crate) fn view_customers(flash: Option<&Flash>, customers: &[Customer]) -> String {
    if customers.is_empty() {
        return layout("Customers", flash, "<p>No customers yet.</p>");
    }

    let rows: String = customers
        .iter()
        .map(|c| {
            format!(
                "<tr><td>{}</td><td>{}</td><td>{}</td><td>{}</td><td>{}</td></tr>\n",
                c.id,
                escape(&c.name),
                or_dash(c.address.as_deref()),
                or_dash(c.phone.as_deref()),
                escape(&c.email),
            )
        })
        .collect();
    let body = format!(
        "<table>\n<tr><th>ID</th><th>Name</th><th>Address</th><th>Phone</th><th>Email</th></tr>\n{rows}</table>"
    );
    layout("Customers", flash, &body)
}

/// Lets the user add and remove item rows. The last remaining row cannot be
/// removed.
const ITEM_ROW_SCRIPT: &str = r#"<script>
(function () {
  var container = document.getElementById('bill-items-container');
  function sync() {
    var buttons = container.querySelectorAll('.remove-item');
    buttons.forEach(function (b) { b.disabled = buttons.length <= 1; });
  }
  container.addEventListener('click', function (e) {
    if (e.target.classList.contains('remove-item')) {
      e.target.closest('.bill-item-row').remove();
      sync();
    }
  });
  document.getElementById('add-item').addEventListener('click', function () {
    var row = container.querySelector('.bill-item-row').cloneNode(true);
    row.querySelectorAll('input').forEach(function (i) { i.value = ''; });
    container.appendChild(row);
    sync();
  });
  sync();
})();
</script>"#;

/// Bill form with the customer dropdown and one input row per item.
///
/// `selected` and `rows` carry a rejected submission back into the form.
/// With no rows a single blank row is shown.
pub(crate) fn generate_bill(
    flash: Option<&Flash>,
    customers: &[Customer],
    selected: &str,
    rows: &[RawItemRow],
) -> String {
    let options: String = customers
        .iter()
        .map(|c| {
            let id = c.id.to_string();
            let marker = if id == selected.trim() { " selected" } else { "" };
            format!(
                r#"<option value="{id}"{marker}>{}</option>"#,
                escape(&c.name)
            )
        })
        .collect();

    let blank = [RawItemRow::default()];
    let rows = if rows.is_empty() { &blank[..] } else { rows };
    let items: String = rows
        .iter()
        .map(|row| {
            format!(
                r#"<div class="bill-item-row">
<input name="item_name[]" placeholder="Item" value="{}">
<input name="quantity[]" placeholder="Qty" value="{}">
<input name="unit_price[]" placeholder="Unit price" value="{}">
<button type="button" class="remove-item">Remove</button>
</div>
"#,
                escape(&row.name),
                escape(&row.quantity),
                escape(&row.unit_price),
            )
        })
        .collect();

    let body = format!(
        r#"<form method="post" action="/generate_bill">
<p><label>Customer <select name="customer_id"><option value="">-- Select a customer --</option>{options}</select></label></p>
<div id="bill-items-container">
{items}</div>
<p><button type="button" id="add-item">Add Item</button></p>
<p><button type="submit">Generate Bill</button></p>
</form>
{ITEM_ROW_SCRIPT}"#
    );
    layout("Generate Bill", flash, &body)
}

/// Bill history table; each bill id links to its detail page.
pub(crate) fn view_bills(flash: Option<&Flash>, bills: &[BillSummary]) -> String {
    if bills.is_empty() {
        return layout("Bills", flash, "<p>No bills yet.</p>");
    }

    let rows: String = bills
        .iter()
        .map(|b| {
            format!(
                "<tr><td><a href=\"/view_bill/{id}\">#{id}</a></td><td>{}</td><td>{}</td><td>{}</td><td>{}</td></tr>\n",
                escape(&b.customer_name),
                b.bill_date.format(DATE_FORMAT),
                b.total_amount,
                escape(&b.status),
                id = b.id,
            )
        })
        .collect();
    let body = format!(
        "<table>\n<tr><th>Bill</th><th>Customer</th><th>Date</th><th>Total</th><th>Status</th></tr>\n{rows}</table>"
    );
    layout("Bills", flash, &body)
}

/// Bill detail page: customer contact block, then the items in insertion
/// order followed by the stored total. Amounts are shown exactly as stored.
pub(crate) fn bill_details(flash: Option<&Flash>, detail: &BillDetail) -> String {
    let bill = &detail.bill;
    let items: String = detail
        .items
        .iter()
        .map(|item| {
            format!(
                "<tr><td>{}</td><td>{}</td><td>{}</td><td>{}</td></tr>\n",
                escape(&item.item_name),
                item.quantity,
                item.unit_price,
                item.total_item_price,
            )
        })
        .collect();
    let body = format!(
        r#"<p><strong>Customer:</strong> {}</p>
<p><strong>Address:</strong> {}</p>
<p><strong>Phone:</strong> {}</p>
<p><strong>Email:</strong> {}</p>
<p><strong>Date:</strong> {}</p>
<p><strong>Status:</strong> {}</p>
<table>
<tr><th>Item</th><th>Quantity</th><th>Unit Price</th><th>Total</th></tr>
{items}<tr><th colspan="3">Total</th><th>{}</th></tr>
</table>
<p><a href="/view_bills">Back to bills</a></p>"#,
        escape(&bill.customer_name),
        or_dash(bill.address.as_deref()),
        or_dash(bill.phone.as_deref()),
        escape(&bill.email),
        bill.bill_date.format(DATE_FORMAT),
        escape(&bill.status),
        bill.total_amount,
    );
    layout(&format!("Bill #{}", bill.id), flash, &body)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn escapes_markup() {
        assert_eq!(
            escape(r#"<b>"Tom" & 'Jerry'</b>"#),
            "&lt;b&gt;&quot;Tom&quot; &amp; &#39;Jerry&#39;&lt;/b&gt;"
        );
    }

    #[test]
    fn bill_form_keeps_submitted_rows_and_selection() {
        let customers = vec![Customer {
            id: 4,
            name: "Ann <Co>".into(),
            address: None,
            phone: None,
            email: "ann@example.com".into(),
        }];
        let html = generate_bill(
            Some(&Flash::danger("Please select a customer.")),
            &customers,
            "4",
            &[RawItemRow::new("Widget", "2", "9.99")],
        );
        assert!(html.contains(r#"<option value="4" selected>Ann &lt;Co&gt;</option>"#));
        assert!(html.contains(r#"value="Widget""#));
        assert!(html.contains(r#"<div class="alert alert-danger">Please select a customer.</div>"#));
    }

    #[test]
    fn bill_details_show_stored_amounts_and_total_row() {
        use crate::models::{Bill, BillItem};
        use chrono::NaiveDate;
        use rust_decimal::Decimal;

        let bill_date = NaiveDate::from_ymd_opt(2024, 3, 1)
            .unwrap()
            .and_hms_opt(9, 30, 0)
            .unwrap();
        let detail = BillDetail {
            bill: Bill {
                id: 7,
                customer_name: "Ann".into(),
                address: None,
                phone: Some("555-0100".into()),
                email: "ann@example.com".into(),
                bill_date,
                total_amount: Decimal::new(30_375, 3),
                status: "pending".into(),
            },
            items: vec![BillItem {
                id: 1,
                bill_id: 7,
                item_name: "Bolt & nut".into(),
                quantity: 3,
                unit_price: Decimal::new(10_125, 3),
                total_item_price: Decimal::new(30_375, 3),
            }],
        };

        let html = bill_details(None, &detail);
        assert!(html.contains("<td>Bolt &amp; nut</td><td>3</td><td>10.125</td><td>30.375</td>"));
        assert!(html.contains(r#"<tr><th colspan="3">Total</th><th>30.375</th></tr>"#));
        assert!(html.contains("<p><strong>Address:</strong> -</p>"));
        assert!(html.contains("2024-03-01 09:30:00"));
    }

    #[test]
    fn empty_bill_form_has_one_blank_row() {
        let html = generate_bill(None, &[], "", &[]);
        assert_eq!(html.matches(r#"class="bill-item-row""#).count(), 1);
    }
}
