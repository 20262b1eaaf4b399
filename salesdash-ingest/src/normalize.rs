//! Record normalizer: untyped ledger rows → typed `Transaction`s.
//!
//! Malformed dates and money strings become `None` instead of failing the row.
//! The unit quantity is the one field a row cannot do without; a row missing
//! it yields a `DataIntegrityError` and the batch policy decides what happens.
//!
//! Money strings lose their currency symbol first, including the abbreviation
//! dot of symbols like `S/.`, then everything but digits and dots. So `S/.45`
//! is 45 and `S/..50` is 0.50.

use std::sync::LazyLock;

use chrono::{NaiveDate, NaiveDateTime};
use regex::Regex;
use salesdash_core::{Ledger, Transaction};
use serde::{Deserialize, Serialize};
use tracing::{info, warn};

use crate::error::{DataIntegrityError, Result};
use crate::raw::{RawRow, columns};

static NON_NUMERIC: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"[^0-9.]").expect("static pattern is valid"));

/// Leading currency symbol (`S/.`, `$`, `US$`, `Bs.`) and its optional trailing dot.
static CURRENCY_PREFIX: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^[^0-9.]*[^0-9.\s]\.?").expect("static pattern is valid"));

/// Date formats tried in order when none are configured.
pub const DEFAULT_DATE_FORMATS: [&str; 4] = ["%Y-%m-%d", "%m/%d/%Y", "%Y-%m-%d %H:%M:%S", "%d-%m-%Y"];

/// What to do with a row whose unit quantity is missing or not an integer.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum QuantityPolicy {
    /// Drop the row, log it, keep going.
    #[default]
    Skip,
    /// Fail the whole batch on the first such row.
    Abort,
}

/// Parse a money string, ignoring currency symbols and thousands separators.
pub fn parse_money(raw: &str) -> Option<f64> {
    let unprefixed = CURRENCY_PREFIX.replace(raw.trim(), "");
    let digits = NON_NUMERIC.replace_all(&unprefixed, "");
    if digits.is_empty() || digits == "." {
        return None;
    }
    digits.parse::<f64>().ok()
}

/// Parse a unit quantity. Integral float spellings such as `"2.0"` are accepted.
pub fn parse_quantity(raw: &str) -> Option<i64> {
    let raw = raw.trim();
    if let Ok(n) = raw.parse::<i64>() {
        return Some(n);
    }
    let f = raw.parse::<f64>().ok()?;
    (f.is_finite() && f.fract() == 0.0 && f.abs() < i64::MAX as f64).then_some(f as i64)
}

#[derive(Debug, Clone, PartialEq)]
pub struct Normalizer {
    date_formats: Vec<String>,
}

impl Default for Normalizer {
    fn default() -> Self {
        Self::new(DEFAULT_DATE_FORMATS)
    }
}

/// Result of normalizing a batch under a `QuantityPolicy`.
#[derive(Debug, Clone, Default)]
pub struct NormalizeReport {
    pub transactions: Vec<Transaction>,
    /// Rows dropped under `QuantityPolicy::Skip`.
    pub skipped: Vec<DataIntegrityError>,
    pub undated: usize,
    pub unpriced: usize,
}

impl NormalizeReport {
    pub fn into_ledger(self) -> Ledger {
        Ledger::new(self.transactions)
    }
}

impl Normalizer {
    pub fn new<I, S>(date_formats: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            date_formats: date_formats.into_iter().map(Into::into).collect(),
        }
    }

    /// First configured format that parses wins; time components are dropped.
    pub fn parse_date(&self, raw: &str) -> Option<NaiveDate> {
        let raw = raw.trim();
        if raw.is_empty() {
            return None;
        }
        self.date_formats.iter().find_map(|fmt| {
            NaiveDate::parse_from_str(raw, fmt)
                .ok()
                .or_else(|| NaiveDateTime::parse_from_str(raw, fmt).ok().map(|dt| dt.date()))
        })
    }

    /// Normalize one row. `index` is only used to label errors.
    pub fn normalize_row(&self, index: usize, row: &RawRow) -> std::result::Result<Transaction, DataIntegrityError> {
        let amount = row
            .get(columns::AMOUNT)
            .and_then(parse_quantity)
            .ok_or_else(|| DataIntegrityError {
                row: index,
                column: columns::AMOUNT,
                value: row.get(columns::AMOUNT).map(str::to_string),
            })?;

        let text = |column: &str| row.non_blank(column).unwrap_or_default().to_string();

        Ok(Transaction {
            order_id: row.non_blank(columns::ORDER_ID).map(str::to_string),
            date: row.get(columns::DATE).and_then(|s| self.parse_date(s)),
            product: text(columns::PRODUCT),
            seller: text(columns::SELLER),
            payment_type: text(columns::PAYMENT_TYPE),
            channel: text(columns::CHANNEL),
            buyer: text(columns::BUYER),
            payment_amount: row.get(columns::PAYMENT_AMOUNT).and_then(parse_money),
            amount,
        })
    }

    /// One result per input row, in input order. Never fails as a whole.
    pub fn normalize_rows(&self, rows: &[RawRow]) -> Vec<std::result::Result<Transaction, DataIntegrityError>> {
        rows.iter()
            .enumerate()
            .map(|(i, row)| self.normalize_row(i, row))
            .collect()
    }

    /// Normalize a batch and apply `policy` to rows without a usable quantity.
    pub fn normalize_batch(&self, rows: &[RawRow], policy: QuantityPolicy) -> Result<NormalizeReport> {
        let mut report = NormalizeReport::default();

        for result in self.normalize_rows(rows) {
            match result {
                Ok(txn) => {
                    report.undated += usize::from(txn.date.is_none());
                    report.unpriced += usize::from(txn.payment_amount.is_none());
                    report.transactions.push(txn);
                }
                Err(err) => match policy {
                    QuantityPolicy::Abort => return Err(err.into()),
                    QuantityPolicy::Skip => {
                        warn!(row = err.row, value = ?err.value, "skipping row without a unit quantity");
                        report.skipped.push(err);
                    }
                },
            }
        }

        if report.undated > 0 || report.unpriced > 0 {
            warn!(
                undated = report.undated,
                unpriced = report.unpriced,
                "rows kept with null date or payment amount"
            );
        }
        info!(
            rows = rows.len(),
            kept = report.transactions.len(),
            skipped = report.skipped.len(),
            "normalized ledger rows"
        );

        Ok(report)
    }
}
