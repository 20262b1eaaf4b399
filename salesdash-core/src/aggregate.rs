//! Aggregation engine: scalar metrics, categorical breakdowns, top-N buyers and
//! daily series over an already-filtered set of rows.
//!
//! Every function here is pure. Null `payment_amount` sums as 0, rows without an
//! order id never count towards distinct orders, and rows without a date are
//! left out of the daily series only. Unit totals saturate at `i64::MAX`/`MIN`
//! instead of overflowing.

use std::cmp::Ordering;
use std::collections::{BTreeMap, HashSet};

use chrono::NaiveDate;
use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

use crate::transaction::Transaction;
use crate::view::AggregateView;

/// Length of each top-buyer ranking.
pub const TOP_BUYERS: usize = 10;

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct SalesSummary {
    pub total_revenue: f64,
    pub total_units: i64,
    pub total_orders: usize,
    /// 0 when there are no orders.
    pub avg_revenue_per_order: f64,
    /// 0 when no units were sold.
    pub avg_price_per_unit: f64,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct GroupTotals {
    pub revenue: f64,
    pub units: i64,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct BuyerTotals {
    pub revenue: f64,
    pub orders: usize,
}

/// Sums per category value, keyed in first-seen order of the input rows.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Breakdowns {
    pub by_product: IndexMap<String, GroupTotals>,
    pub by_seller: IndexMap<String, GroupTotals>,
    pub by_payment_type: IndexMap<String, f64>,
    pub by_channel: IndexMap<String, GroupTotals>,
    pub by_buyer: IndexMap<String, BuyerTotals>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RankedBuyer<T> {
    pub buyer: String,
    pub value: T,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct TopBuyers {
    pub by_revenue: Vec<RankedBuyer<f64>>,
    pub by_orders: Vec<RankedBuyer<usize>>,
}

/// Per-day totals, ascending by day. Sparse: days without rows are absent.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct DailySeries {
    pub revenue: BTreeMap<NaiveDate, f64>,
    pub units: BTreeMap<NaiveDate, i64>,
    pub orders: BTreeMap<NaiveDate, usize>,
}

fn ratio(numerator: f64, denominator: f64) -> f64 {
    if denominator == 0.0 { 0.0 } else { numerator / denominator }
}

pub fn summarize(rows: &[&Transaction]) -> SalesSummary {
    let total_revenue: f64 = rows.iter().map(|t| t.revenue()).sum();
    let total_units = rows.iter().fold(0i64, |acc, t| acc.saturating_add(t.amount));
    let total_orders = rows
        .iter()
        .filter_map(|t| t.order_key())
        .collect::<HashSet<_>>()
        .len();

    SalesSummary {
        total_revenue,
        total_units,
        total_orders,
        avg_revenue_per_order: ratio(total_revenue, total_orders as f64),
        avg_price_per_unit: ratio(total_revenue, total_units as f64),
    }
}

fn group_totals(rows: &[&Transaction], key: impl Fn(&Transaction) -> &str) -> IndexMap<String, GroupTotals> {
    let mut out: IndexMap<String, GroupTotals> = IndexMap::new();
    for txn in rows {
        let entry = out.entry(key(*txn).to_string()).or_default();
        entry.revenue += txn.revenue();
        entry.units = entry.units.saturating_add(txn.amount);
    }
    out
}

fn buyer_totals(rows: &[&Transaction]) -> IndexMap<String, BuyerTotals> {
    let mut acc: IndexMap<&str, (f64, HashSet<&str>)> = IndexMap::new();
    for txn in rows {
        let (revenue, orders) = acc.entry(txn.buyer.as_str()).or_default();
        *revenue += txn.revenue();
        if let Some(order) = txn.order_key() {
            orders.insert(order);
        }
    }

    acc.into_iter()
        .map(|(buyer, (revenue, orders))| {
            (
                buyer.to_string(),
                BuyerTotals {
                    revenue,
                    orders: orders.len(),
                },
            )
        })
        .collect()
}

pub fn breakdowns(rows: &[&Transaction]) -> Breakdowns {
    let mut by_payment_type: IndexMap<String, f64> = IndexMap::new();
    for txn in rows {
        *by_payment_type.entry(txn.payment_type.clone()).or_default() += txn.revenue();
    }

    Breakdowns {
        by_product: group_totals(rows, |t| t.product.as_str()),
        by_seller: group_totals(rows, |t| t.seller.as_str()),
        by_payment_type,
        by_channel: group_totals(rows, |t| t.channel.as_str()),
        by_buyer: buyer_totals(rows),
    }
}

/// A value buyers can be ranked by.
pub trait RankMetric: Copy {
    /// Total order with larger values first.
    fn cmp_desc(&self, other: &Self) -> Ordering;
}

impl RankMetric for f64 {
    fn cmp_desc(&self, other: &Self) -> Ordering {
        other.total_cmp(self)
    }
}

impl RankMetric for usize {
    fn cmp_desc(&self, other: &Self) -> Ordering {
        other.cmp(self)
    }
}

/// The `n` largest entries, metric descending, ties broken by buyer name ascending.
pub fn rank<T, F>(buyers: &IndexMap<String, BuyerTotals>, n: usize, metric: F) -> Vec<RankedBuyer<T>>
where
    T: RankMetric,
    F: Fn(&BuyerTotals) -> T,
{
    let mut ranked: Vec<RankedBuyer<T>> = buyers
        .iter()
        .map(|(buyer, totals)| RankedBuyer {
            buyer: buyer.clone(),
            value: metric(totals),
        })
        .collect();

    ranked.sort_by(|a, b| a.value.cmp_desc(&b.value).then_with(|| a.buyer.cmp(&b.buyer)));
    ranked.truncate(n);
    ranked
}

pub fn top_buyers(buyers: &IndexMap<String, BuyerTotals>) -> TopBuyers {
    TopBuyers {
        by_revenue: rank(buyers, TOP_BUYERS, |b| b.revenue),
        by_orders: rank(buyers, TOP_BUYERS, |b| b.orders),
    }
}

pub fn daily_series(rows: &[&Transaction]) -> DailySeries {
    let mut series = DailySeries::default();
    let mut orders: BTreeMap<NaiveDate, HashSet<&str>> = BTreeMap::new();

    for txn in rows {
        let Some(day) = txn.date else { continue };
        *series.revenue.entry(day).or_default() += txn.revenue();
        let units = series.units.entry(day).or_default();
        *units = units.saturating_add(txn.amount);
        let day_orders = orders.entry(day).or_default();
        if let Some(order) = txn.order_key() {
            day_orders.insert(order);
        }
    }

    series.orders = orders.into_iter().map(|(day, ids)| (day, ids.len())).collect();
    series
}

/// Full aggregation pass over a filtered set of rows.
pub fn compute(rows: &[&Transaction]) -> AggregateView {
    let summary = summarize(rows);
    let breakdowns = breakdowns(rows);
    let top_buyers = top_buyers(&breakdowns.by_buyer);
    let daily = daily_series(rows);
    AggregateView::assemble(summary, breakdowns, top_buyers, daily)
}
