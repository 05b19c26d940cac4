use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;

use super::product::Product;

/// A sale record. `product_id` is a weak reference (the entry outlives
/// its product) and `product_name` is the name snapshot taken when the
/// entry was created, untouched by later renames or deletions.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Entry {
    #[serde(default)]
    pub id: i64,
    #[serde(rename = "productId")]
    pub product_id: i64,
    #[serde(rename = "productName")]
    pub product_name: String,
    pub quantity: f64,
    pub total: f64,
    pub timestamp: DateTime<Utc>,
}

impl Entry {
    /// Builds an entry for `quantity` of `product`, snapshotting its name
    /// and computing the total at the product's current price.
    pub fn new(product: &Product, quantity: f64) -> Self {
        Self {
            id: 0,
            product_id: product.id,
            product_name: product.name.clone(),
            quantity,
            total: product.price * quantity,
            timestamp: Utc::now(),
        }
    }

    #[cfg(test)]
    pub fn with_timestamp(mut self, timestamp: DateTime<Utc>) -> Self {
        self.timestamp = timestamp;
        self
    }
}

impl fmt::Display for Entry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} — {} x{} = {:.2}",
            self.timestamp.format("%Y-%m-%d %H:%M"),
            self.product_name,
            self.quantity,
            self.total
        )
    }
}
