//! Typed ledger row.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

/// One line item of the sales ledger, after normalization.
///
/// Categorical fields are never absent: a missing source value is the empty
/// string and behaves as its own category.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Transaction {
    /// Not unique per row; one order may span several line items.
    /// `None` when the source cell was blank, which keeps the row out of order counts.
    pub order_id: Option<String>,
    /// `None` when the source date could not be parsed.
    pub date: Option<NaiveDate>,
    pub product: String,
    pub seller: String,
    pub payment_type: String,
    pub channel: String,
    pub buyer: String,
    /// Revenue contribution. `None` for unparseable money strings; summed as 0.
    pub payment_amount: Option<f64>,
    /// Units sold in this line item.
    pub amount: i64,
}

impl Transaction {
    pub fn new(order_id: impl Into<String>) -> Self {
        let order_id = order_id.into();
        Self {
            order_id: (!order_id.is_empty()).then_some(order_id),
            date: None,
            product: String::new(),
            seller: String::new(),
            payment_type: String::new(),
            channel: String::new(),
            buyer: String::new(),
            payment_amount: None,
            amount: 0,
        }
    }

    pub fn with_date(mut self, date: NaiveDate) -> Self {
        self.date = Some(date);
        self
    }

    pub fn with_product(mut self, product: impl Into<String>) -> Self {
        self.product = product.into();
        self
    }

    pub fn with_seller(mut self, seller: impl Into<String>) -> Self {
        self.seller = seller.into();
        self
    }

    pub fn with_payment_type(mut self, payment_type: impl Into<String>) -> Self {
        self.payment_type = payment_type.into();
        self
    }

    pub fn with_channel(mut self, channel: impl Into<String>) -> Self {
        self.channel = channel.into();
        self
    }

    pub fn with_buyer(mut self, buyer: impl Into<String>) -> Self {
        self.buyer = buyer.into();
        self
    }

    pub fn with_payment(mut self, payment_amount: f64) -> Self {
        self.payment_amount = Some(payment_amount);
        self
    }

    pub fn with_amount(mut self, amount: i64) -> Self {
        self.amount = amount;
        self
    }

    /// Revenue with null treated as zero.
    pub fn revenue(&self) -> f64 {
        self.payment_amount.unwrap_or(0.0)
    }

    pub fn order_key(&self) -> Option<&str> {
        self.order_id.as_deref()
    }
}

/// The categorical fields a caller can filter on.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CategoryField {
    Product,
    Seller,
    PaymentType,
    Channel,
}

impl CategoryField {
    pub const ALL: [CategoryField; 4] = [
        CategoryField::Product,
        CategoryField::Seller,
        CategoryField::PaymentType,
        CategoryField::Channel,
    ];

    pub fn value_of<'a>(&self, txn: &'a Transaction) -> &'a str {
        match self {
            CategoryField::Product => &txn.product,
            CategoryField::Seller => &txn.seller,
            CategoryField::PaymentType => &txn.payment_type,
            CategoryField::Channel => &txn.channel,
        }
    }

    /// Ledger column header this field is read from.
    pub fn column(&self) -> &'static str {
        match self {
            CategoryField::Product => "Product",
            CategoryField::Seller => "Seller",
            CategoryField::PaymentType => "Payment Type",
            CategoryField::Channel => "Channel",
        }
    }
}
