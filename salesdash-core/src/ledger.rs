//! Immutable ledger snapshot and the pipeline entry point.

use std::sync::Arc;

use indexmap::IndexSet;
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::aggregate;
use crate::filter::{self, DateRange, FilterSelection};
use crate::transaction::{CategoryField, Transaction};
use crate::view::AggregateView;

/// Read-only set of normalized rows. Cloning shares the same rows, so one
/// snapshot can serve any number of concurrent filter requests.
#[derive(Debug, Clone, Default)]
pub struct Ledger {
    rows: Arc<[Transaction]>,
}

/// Values a caller can choose from, per filterable field, in first-seen order.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct FilterDomains {
    pub products: Vec<String>,
    pub sellers: Vec<String>,
    pub payment_types: Vec<String>,
    pub channels: Vec<String>,
    /// Earliest to latest dated row; `None` if no row has a date.
    pub date_span: Option<DateRange>,
}

impl FilterDomains {
    pub fn values(&self, field: CategoryField) -> &[String] {
        match field {
            CategoryField::Product => &self.products,
            CategoryField::Seller => &self.sellers,
            CategoryField::PaymentType => &self.payment_types,
            CategoryField::Channel => &self.channels,
        }
    }
}

impl Ledger {
    pub fn new(rows: Vec<Transaction>) -> Self {
        Self { rows: rows.into() }
    }

    pub fn transactions(&self) -> &[Transaction] {
        &self.rows
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    pub fn domains(&self) -> FilterDomains {
        let distinct = |field: CategoryField| -> Vec<String> {
            self.rows
                .iter()
                .map(|t| field.value_of(t))
                .collect::<IndexSet<&str>>()
                .into_iter()
                .map(str::to_string)
                .collect()
        };

        let dates = self.rows.iter().filter_map(|t| t.date);
        let date_span = match (dates.clone().min(), dates.max()) {
            (Some(start), Some(end)) => DateRange::new(start, end).ok(),
            _ => None,
        };

        FilterDomains {
            products: distinct(CategoryField::Product),
            sellers: distinct(CategoryField::Seller),
            payment_types: distinct(CategoryField::PaymentType),
            channels: distinct(CategoryField::Channel),
            date_span,
        }
    }

    /// Filter, aggregate and assemble the view for one selection.
    pub fn view(&self, selection: &FilterSelection) -> AggregateView {
        let filtered = filter::apply(&self.rows, selection);
        let view = aggregate::compute(&filtered);
        debug!(
            rows = self.rows.len(),
            filtered = filtered.len(),
            orders = view.summary.total_orders,
            "computed aggregate view"
        );
        view
    }
}

impl From<Vec<Transaction>> for Ledger {
    fn from(rows: Vec<Transaction>) -> Self {
        Self::new(rows)
    }
}
