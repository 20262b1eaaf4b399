//! salesdash-core: typed sales ledger, filter engine, aggregation engine and view bundle.
//!
//! Data flows one way: normalized rows → filtered rows → aggregates → view bundle.
//! Nothing in this crate performs I/O or keeps state between calls.

pub mod aggregate;
pub mod error;
pub mod filter;
pub mod ledger;
pub mod transaction;
pub mod view;

pub use aggregate::{
    Breakdowns, BuyerTotals, DailySeries, GroupTotals, RankMetric, RankedBuyer, SalesSummary, TOP_BUYERS,
    TopBuyers, compute,
};
pub use error::CoreError;
pub use filter::{DateRange, FilterSelection};
pub use ledger::{FilterDomains, Ledger};
pub use transaction::{CategoryField, Transaction};
pub use view::{AggregateView, Renderer};
