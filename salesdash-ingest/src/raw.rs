//! Untyped ledger rows as they come out of a CSV export.

use std::collections::HashMap;

use serde::{Deserialize, Serialize};

/// Ledger column headers.
pub mod columns {
    pub const ORDER_ID: &str = "Order ID";
    pub const DATE: &str = "Date";
    pub const PRODUCT: &str = "Product";
    pub const SELLER: &str = "Seller";
    pub const PAYMENT_TYPE: &str = "Payment Type";
    pub const CHANNEL: &str = "Channel";
    pub const BUYER: &str = "Buyer";
    pub const PAYMENT_AMOUNT: &str = "Payment Amount";
    pub const AMOUNT: &str = "Amount";
}

/// Column name → raw cell text. Columns missing from the source are simply absent.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct RawRow(HashMap<String, String>);

impl RawRow {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with(mut self, column: impl Into<String>, value: impl Into<String>) -> Self {
        self.insert(column, value);
        self
    }

    pub fn insert(&mut self, column: impl Into<String>, value: impl Into<String>) {
        self.0.insert(column.into().trim().to_string(), value.into());
    }

    pub fn get(&self, column: &str) -> Option<&str> {
        self.0.get(column).map(String::as_str)
    }

    /// Cell text trimmed; `None` when absent or blank.
    pub fn non_blank(&self, column: &str) -> Option<&str> {
        self.get(column).map(str::trim).filter(|s| !s.is_empty())
    }
}

impl<K: Into<String>, V: Into<String>> FromIterator<(K, V)> for RawRow {
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        let mut row = RawRow::new();
        for (k, v) in iter {
            row.insert(k, v);
        }
        row
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_header_whitespace_is_ignored() {
        let row = RawRow::new().with(" Payment Amount ", "S/.10");
        assert_eq!(row.get(columns::PAYMENT_AMOUNT), Some("S/.10"));
    }

    #[test]
    fn test_non_blank() {
        let row: RawRow = [("Buyer", "   "), ("Seller", " Ana ")].into_iter().collect();
        assert_eq!(row.non_blank(columns::BUYER), None);
        assert_eq!(row.non_blank(columns::SELLER), Some("Ana"));
        assert_eq!(row.non_blank(columns::PRODUCT), None);
    }
}
