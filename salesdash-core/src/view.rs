//! View assembly: the named, immutable bundle handed to a presentation layer,
//! plus the capability trait presentation adapters implement.

use serde::{Deserialize, Serialize};

use crate::aggregate::{Breakdowns, DailySeries, SalesSummary, TopBuyers};

/// Everything a dashboard renders for one filter selection.
///
/// Every field is always present. An empty selection yields zero scalars and
/// empty collections, never an error.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct AggregateView {
    pub summary: SalesSummary,
    pub breakdowns: Breakdowns,
    pub top_buyers: TopBuyers,
    pub daily: DailySeries,
}

impl AggregateView {
    pub fn assemble(
        summary: SalesSummary,
        breakdowns: Breakdowns,
        top_buyers: TopBuyers,
        daily: DailySeries,
    ) -> Self {
        Self {
            summary,
            breakdowns,
            top_buyers,
            daily,
        }
    }

    /// True when no row survived the filters.
    pub fn is_empty(&self) -> bool {
        self.breakdowns.by_product.is_empty()
    }
}

/// A presentation adapter (terminal table, JSON document, chart backend, ...).
pub trait Renderer {
    type Output;
    type Error;

    fn render(&self, view: &AggregateView) -> Result<Self::Output, Self::Error>;
}
