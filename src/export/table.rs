use crate::ledger::Ledger;

/// Sheet name used by sheet-aware spreadsheet consumers.
pub const SHEET_NAME: &str = "Budget";

/// Column labels in persisted-field order. The two money columns get the
/// currency symbol appended when a snapshot is built.
pub const FIELD_LABELS: [&str; 8] = [
    "Room",
    "Category",
    "Subcategory",
    "Product",
    "Unit type",
    "Quantity",
    "Unit price",
    "Total cost",
];

/// Header row plus one stringified row per ledger entry, in insertion
/// order. Both the spreadsheet export and the terminal table feed on this.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TableSnapshot {
    pub headers: Vec<String>,
    pub rows: Vec<Vec<String>>,
}

impl TableSnapshot {
    pub fn column_count(&self) -> usize {
        self.headers.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }
}

pub fn snapshot(ledger: &Ledger, currency_symbol: &str) -> TableSnapshot {
    let mut headers: Vec<String> = FIELD_LABELS[..6].iter().map(|s| s.to_string()).collect();
    headers.push(format!("{} ({})", FIELD_LABELS[6], currency_symbol));
    headers.push(format!("{} ({})", FIELD_LABELS[7], currency_symbol));

    let rows = ledger
        .entries()
        .iter()
        .map(|entry| {
            vec![
                entry.room.clone(),
                entry.category.clone(),
                entry.subcategory.clone(),
                entry.product.clone(),
                entry.unit_type.label().to_string(),
                format_quantity(entry.quantity),
                format_money(entry.unit_price),
                format_money(entry.total_cost),
            ]
        })
        .collect();

    TableSnapshot { headers, rows }
}

/// Quantities print without spurious decimals: `10` instead of `10.0`,
/// `2.5` untouched.
pub fn format_quantity(value: f64) -> String {
    if value.fract() == 0.0 && value.abs() < 1e15 {
        format!("{}", value as i64)
    } else {
        format!("{}", value)
    }
}

/// Money always prints with two decimals.
pub fn format_money(value: f64) -> String {
    format!("{:.2}", value)
}
