//! Filter engine: narrows a ledger to the rows a caller selected.
//!
//! Rules:
//! - An empty allowed-set for a field means "no constraint", never "exclude all".
//! - The date range is inclusive on both ends. A row with no date fails it.
//! - All predicates are ANDed, so evaluation order does not matter and applying
//!   the same selection twice is the same as applying it once.
//! - The input slice is only borrowed; the result is a view of references.

use std::collections::BTreeSet;

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::error::{CoreError, Result};
use crate::transaction::{CategoryField, Transaction};

/// Inclusive `[start, end]` calendar range.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct DateRange {
    start: NaiveDate,
    end: NaiveDate,
}

impl DateRange {
    pub fn new(start: NaiveDate, end: NaiveDate) -> Result<Self> {
        if start > end {
            return Err(CoreError::InvalidDateRange { start, end });
        }
        Ok(Self { start, end })
    }

    pub fn start(&self) -> NaiveDate {
        self.start
    }

    pub fn end(&self) -> NaiveDate {
        self.end
    }

    pub fn contains(&self, date: NaiveDate) -> bool {
        self.start <= date && date <= self.end
    }
}

/// Per-request filter choices. Built fresh for every render.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct FilterSelection {
    #[serde(default)]
    pub products: BTreeSet<String>,
    #[serde(default)]
    pub sellers: BTreeSet<String>,
    #[serde(default)]
    pub payment_types: BTreeSet<String>,
    #[serde(default)]
    pub channels: BTreeSet<String>,
    #[serde(default)]
    pub date_range: Option<DateRange>,
}

impl FilterSelection {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_products<I, S>(mut self, values: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.products.extend(values.into_iter().map(Into::into));
        self
    }

    pub fn with_sellers<I, S>(mut self, values: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.sellers.extend(values.into_iter().map(Into::into));
        self
    }

    pub fn with_payment_types<I, S>(mut self, values: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.payment_types.extend(values.into_iter().map(Into::into));
        self
    }

    pub fn with_channels<I, S>(mut self, values: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.channels.extend(values.into_iter().map(Into::into));
        self
    }

    pub fn with_date_range(mut self, range: DateRange) -> Self {
        self.date_range = Some(range);
        self
    }

    pub fn allowed(&self, field: CategoryField) -> &BTreeSet<String> {
        match field {
            CategoryField::Product => &self.products,
            CategoryField::Seller => &self.sellers,
            CategoryField::PaymentType => &self.payment_types,
            CategoryField::Channel => &self.channels,
        }
    }

    /// True when every row passes.
    pub fn is_unconstrained(&self) -> bool {
        self.date_range.is_none() && CategoryField::ALL.iter().all(|f| self.allowed(*f).is_empty())
    }

    pub fn matches(&self, txn: &Transaction) -> bool {
        let categories_ok = CategoryField::ALL.iter().all(|field| {
            let allowed = self.allowed(*field);
            allowed.is_empty() || allowed.contains(field.value_of(txn))
        });
        if !categories_ok {
            return false;
        }

        match (self.date_range, txn.date) {
            (None, _) => true,
            (Some(range), Some(date)) => range.contains(date),
            (Some(_), None) => false,
        }
    }
}

/// Apply `selection` to `txns`, keeping input order.
pub fn apply<'a>(txns: &'a [Transaction], selection: &FilterSelection) -> Vec<&'a Transaction> {
    let out: Vec<&Transaction> = txns.iter().filter(|t| selection.matches(t)).collect();
    debug!(input = txns.len(), kept = out.len(), "applied filter selection");
    out
}
