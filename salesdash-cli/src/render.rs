//! Terminal and JSON presentation of an `AggregateView`.

use anyhow::{Context, Result};
use salesdash_core::{AggregateView, CategoryField, FilterDomains, GroupTotals, Renderer};
use std::fmt::Write;

use crate::config::OutputFormat;

/// Section layout of the sales dashboard, as plain text.
pub struct TextRenderer {
    pub currency: String,
}

pub struct JsonRenderer;

/// `1234.5` → `1,234.50`
pub fn fmt_money(value: f64) -> String {
    let fixed = format!("{:.2}", value.abs());
    let (int_part, frac) = fixed.split_once('.').unwrap_or((fixed.as_str(), "00"));
    let mut grouped = String::new();
    for (i, ch) in int_part.chars().enumerate() {
        if i > 0 && (int_part.len() - i) % 3 == 0 {
            grouped.push(',');
        }
        grouped.push(ch);
    }
    let sign = if value < 0.0 { "-" } else { "" };
    format!("{sign}{grouped}.{frac}")
}

impl TextRenderer {
    fn money(&self, value: f64) -> String {
        format!("{}{}", self.currency, fmt_money(value))
    }

    fn revenue_and_units<'a>(
        &self,
        out: &mut String,
        title: &str,
        groups: impl IntoIterator<Item = (&'a String, &'a GroupTotals)>,
    ) -> Result<()> {
        writeln!(out, "\n{title}")?;
        for (key, totals) in groups {
            writeln!(
                out,
                "  {:<24} {:>16} {:>8} units",
                label(key),
                self.money(totals.revenue),
                totals.units
            )?;
        }
        Ok(())
    }
}

fn label(key: &str) -> &str {
    if key.is_empty() { "(blank)" } else { key }
}

impl Renderer for TextRenderer {
    type Output = String;
    type Error = anyhow::Error;

    fn render(&self, view: &AggregateView) -> Result<String> {
        let mut out = String::new();
        let s = &view.summary;

        writeln!(out, "# Sales Overview\n")?;
        writeln!(out, "Total Revenue              {}", self.money(s.total_revenue))?;
        writeln!(out, "Total Units Sold           {}", s.total_units)?;
        writeln!(out, "Total Orders               {}", s.total_orders)?;
        writeln!(out, "Average Revenue per Order  {}", self.money(s.avg_revenue_per_order))?;
        writeln!(out, "Average Price per Unit     {}", self.money(s.avg_price_per_unit))?;

        if view.is_empty() {
            writeln!(out, "\n(no transactions match the current filters)")?;
            return Ok(out);
        }

        let b = &view.breakdowns;
        writeln!(out, "\n# Sales Breakdown")?;
        self.revenue_and_units(&mut out, "By Product", &b.by_product)?;
        self.revenue_and_units(&mut out, "By Seller", &b.by_seller)?;
        writeln!(out, "\nBy Payment Type")?;
        for (key, revenue) in &b.by_payment_type {
            writeln!(out, "  {:<24} {:>16}", label(key), self.money(*revenue))?;
        }
        self.revenue_and_units(&mut out, "By Sales Channel", &b.by_channel)?;

        writeln!(out, "\n# Time Series (days with sales only)\n")?;
        writeln!(out, "  {:<12} {:>16} {:>8} {:>8}", "Day", "Revenue", "Units", "Orders")?;
        for (day, revenue) in &view.daily.revenue {
            let units = view.daily.units.get(day).copied().unwrap_or_default();
            let orders = view.daily.orders.get(day).copied().unwrap_or_default();
            writeln!(out, "  {:<12} {:>16} {:>8} {:>8}", day.to_string(), self.money(*revenue), units, orders)?;
        }

        writeln!(out, "\n# Top Buyers\n")?;
        writeln!(out, "By Revenue")?;
        for (i, r) in view.top_buyers.by_revenue.iter().enumerate() {
            writeln!(out, "  {:>2}. {:<24} {:>16}", i + 1, label(&r.buyer), self.money(r.value))?;
        }
        writeln!(out, "\nBy Number of Orders")?;
        for (i, r) in view.top_buyers.by_orders.iter().enumerate() {
            writeln!(out, "  {:>2}. {:<24} {:>16}", i + 1, label(&r.buyer), r.value)?;
        }

        Ok(out)
    }
}

impl Renderer for JsonRenderer {
    type Output = String;
    type Error = anyhow::Error;

    fn render(&self, view: &AggregateView) -> Result<String> {
        serde_json::to_string_pretty(view).context("serialize view")
    }
}

pub fn render_view(view: &AggregateView, format: OutputFormat, currency: &str) -> Result<String> {
    match format {
        OutputFormat::Text => TextRenderer {
            currency: currency.to_string(),
        }
        .render(view),
        OutputFormat::Json => JsonRenderer.render(view),
    }
}

pub fn render_domains(domains: &FilterDomains, format: OutputFormat) -> Result<String> {
    if format == OutputFormat::Json {
        return serde_json::to_string_pretty(domains).context("serialize domains");
    }

    let mut out = String::new();
    for field in CategoryField::ALL {
        let shown: Vec<&str> = domains.values(field).iter().map(|v| label(v)).collect();
        writeln!(out, "{}: {}", field.column(), shown.join(", "))?;
    }
    match domains.date_span {
        Some(span) => writeln!(out, "Date: {} .. {}", span.start(), span.end())?,
        None => writeln!(out, "Date: (no dated rows)")?,
    }
    Ok(out)
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;
    use salesdash_core::{FilterSelection, Ledger, Transaction};

    fn ledger() -> Ledger {
        Ledger::new(vec![
            Transaction::new("1")
                .with_date(NaiveDate::from_ymd_opt(2024, 1, 1).unwrap())
                .with_product("Mango")
                .with_seller("Ana")
                .with_payment_type("Yape")
                .with_buyer("Rosa")
                .with_payment(1250.0)
                .with_amount(2),
        ])
    }

    #[test]
    fn test_fmt_money() {
        assert_eq!(fmt_money(0.5), "0.50");
        assert_eq!(fmt_money(1234.5), "1,234.50");
        assert_eq!(fmt_money(1_000_000.0), "1,000,000.00");
        assert_eq!(fmt_money(-12.0), "-12.00");
    }

    #[test]
    fn test_text_sections() {
        let view = ledger().view(&FilterSelection::new());
        let text = render_view(&view, OutputFormat::Text, "S/.").unwrap();
        assert!(text.contains("Total Revenue              S/.1,250.00"));
        assert!(text.contains("# Top Buyers"));
        assert!(text.contains("2024-01-01"));
        assert!(text.contains("(blank)"), "empty channel should be labelled");
    }

    #[test]
    fn test_text_empty_state() {
        let view = ledger().view(&FilterSelection::new().with_products(["Cacao"]));
        let text = render_view(&view, OutputFormat::Text, "$").unwrap();
        assert!(text.contains("Total Orders               0"));
        assert!(text.contains("no transactions match"));
    }

    #[test]
    fn test_json_is_the_view() {
        let view = ledger().view(&FilterSelection::new());
        let json = render_view(&view, OutputFormat::Json, "S/.").unwrap();
        let back: AggregateView = serde_json::from_str(&json).unwrap();
        assert_eq!(back, view);
    }

    #[test]
    fn test_domains_text() {
        let text = render_domains(&ledger().domains(), OutputFormat::Text).unwrap();
        assert!(text.contains("Product: Mango"));
        assert!(text.contains("Payment Type: Yape"));
        assert!(text.contains("Channel: (blank)"));
        assert!(text.contains("Date: 2024-01-01 .. 2024-01-01"));
    }
}
