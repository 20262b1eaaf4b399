use chrono::NaiveDate;
use salesdash_core::{DateRange, FilterSelection, Ledger, Transaction};
use salesdash_ingest::csv_source::{read_rows, read_rows_from_path};
use salesdash_ingest::{Normalizer, QuantityPolicy};
use std::path::PathBuf;

fn sales_path() -> PathBuf {
    PathBuf::from(env!("CARGO_MANIFEST_DIR"))
        .parent()
        .unwrap()
        .join("sales.csv")
}

fn d(y: i32, m: u32, day: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(y, m, day).unwrap()
}

fn fixture_ledger() -> Ledger {
    let rows = read_rows_from_path(sales_path()).expect("should read sales.csv");
    Normalizer::default()
        .normalize_batch(&rows, QuantityPolicy::Skip)
        .unwrap()
        .into_ledger()
}

/// Three line items, two orders, two days.
#[test]
fn test_three_row_scenario_end_to_end() {
    let text = "\
Order ID,Date,Product,Seller,Payment Type,Channel,Buyer,Payment Amount,Amount
1,2024-01-01,X,s,p,c,b,50,2
1,2024-01-01,X,s,p,c,b,50,1
2,2024-01-02,Y,s,p,c,b,30,1
";
    let rows = read_rows(text.as_bytes()).unwrap();
    let ledger = Normalizer::default()
        .normalize_batch(&rows, QuantityPolicy::Abort)
        .unwrap()
        .into_ledger();

    let view = ledger.view(&FilterSelection::new());
    assert_eq!(view.summary.total_revenue, 130.0);
    assert_eq!(view.summary.total_units, 4);
    assert_eq!(view.summary.total_orders, 2);

    let by_product: Vec<(&str, f64)> = view
        .breakdowns
        .by_product
        .iter()
        .map(|(k, v)| (k.as_str(), v.revenue))
        .collect();
    assert_eq!(by_product, [("X", 100.0), ("Y", 30.0)]);

    let daily: Vec<(NaiveDate, f64)> = view.daily.revenue.into_iter().collect();
    assert_eq!(daily, [(d(2024, 1, 1), 100.0), (d(2024, 1, 2), 30.0)]);
}

#[test]
fn test_fixture_skips_row_without_quantity() {
    let rows = read_rows_from_path(sales_path()).unwrap();
    let report = Normalizer::default()
        .normalize_batch(&rows, QuantityPolicy::Skip)
        .unwrap();
    assert_eq!(rows.len(), 13);
    assert_eq!(report.transactions.len(), 12);
    assert_eq!(report.skipped.len(), 1);
    assert_eq!(report.undated, 1);
    assert_eq!(report.unpriced, 1);

    let aborted = Normalizer::default().normalize_batch(&rows, QuantityPolicy::Abort);
    assert!(aborted.is_err());
}

#[test]
fn test_fixture_currency_and_null_handling() {
    fn find<'a>(ledger: &'a Ledger, order: &str) -> &'a Transaction {
        ledger
            .transactions()
            .iter()
            .find(|t| t.order_id.as_deref() == Some(order))
            .unwrap()
    }

    let ledger = fixture_ledger();
    assert_eq!(find(&ledger, "1008").payment_amount, Some(0.50));
    assert_eq!(find(&ledger, "1003").payment_amount, Some(1050.0));
    // Whole soles written without cents.
    assert_eq!(find(&ledger, "1002").payment_amount, Some(15.0));
    assert_eq!(find(&ledger, "1011").payment_amount, Some(75.0));
    assert_eq!(find(&ledger, "1006").date, Some(d(2024, 3, 4)));
    assert_eq!(find(&ledger, "1007").date, None);
    assert_eq!(find(&ledger, "1009").payment_amount, None);
}

#[test]
fn test_undated_row_in_breakdowns_not_series() {
    let ledger = fixture_ledger();
    let view = ledger.view(&FilterSelection::new().with_channels(["WhatsApp"]));

    // 1003 (1050), 1007 (undated, 15), 1012 (15)
    assert_eq!(view.breakdowns.by_channel["WhatsApp"].revenue, 1080.0);
    assert_eq!(view.daily.revenue.values().sum::<f64>(), 1065.0);
    assert_eq!(view.daily.orders.values().sum::<usize>(), 2);
}

#[test]
fn test_conservation_across_filters() {
    let ledger = fixture_ledger();
    let selections = [
        FilterSelection::new(),
        FilterSelection::new().with_sellers(["Ana", "Luis"]),
        FilterSelection::new().with_payment_types(["Yape"]),
        FilterSelection::new().with_date_range(DateRange::new(d(2024, 3, 2), d(2024, 3, 5)).unwrap()),
    ];

    for sel in &selections {
        let view = ledger.view(sel);
        let total = view.summary.total_revenue;
        let by_product: f64 = view.breakdowns.by_product.values().map(|g| g.revenue).sum();
        let by_payment: f64 = view.breakdowns.by_payment_type.values().sum();
        let units: i64 = view.breakdowns.by_seller.values().map(|g| g.units).sum();
        assert!((total - by_product).abs() < 1e-9, "{sel:?}");
        assert!((total - by_payment).abs() < 1e-9, "{sel:?}");
        assert_eq!(units, view.summary.total_units, "{sel:?}");
    }
}

#[test]
fn test_boundary_dates_inclusive() {
    let ledger = fixture_ledger();
    let sel = FilterSelection::new().with_date_range(DateRange::new(d(2024, 3, 3), d(2024, 3, 4)).unwrap());
    let mut buyers: Vec<String> = ledger
        .view(&sel)
        .breakdowns
        .by_buyer
        .keys()
        .cloned()
        .collect();
    buyers.sort();
    // 1004 and 1005 on the 3rd, 1006 on the 4th; 1003 (2nd) and 1008 (5th) are out.
    assert_eq!(buyers, ["Lucia Diaz", "Miguel Soto", "Rosa Quispe"]);
}

#[test]
fn test_top_buyers_on_fixture() {
    let ledger = fixture_ledger();
    let view = ledger.view(&FilterSelection::new());

    let first = &view.top_buyers.by_revenue[0];
    assert_eq!(first.buyer, "Carla Rojas");
    assert_eq!(first.value, 1050.0);

    // Rosa Quispe has orders 1001, 1005, 1012.
    let by_orders = &view.top_buyers.by_orders[0];
    assert_eq!((by_orders.buyer.as_str(), by_orders.value), ("Rosa Quispe", 3));
    assert!(view.top_buyers.by_revenue.len() <= salesdash_core::TOP_BUYERS);
}

#[test]
fn test_selection_with_no_matches_renders_empty() {
    let ledger = fixture_ledger();
    let view = ledger.view(&FilterSelection::new().with_products(["Pouch Fresa"]));
    assert!(view.is_empty());
    assert_eq!(view.summary.avg_revenue_per_order, 0.0);
    assert_eq!(view.summary.avg_price_per_unit, 0.0);
    assert!(view.top_buyers.by_orders.is_empty());
    assert!(view.daily.units.is_empty());
}
