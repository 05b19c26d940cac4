use serde::{Deserialize, Serialize};
use std::fmt;

/// A catalog product. The id is assigned by the store on insert and is
/// immutable for the lifetime of the record.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Product {
    #[serde(default)]
    pub id: i64,
    pub name: String,
    pub price: f64,
}

impl Product {
    /// A product that has not been inserted yet (id 0 until the store
    /// assigns one).
    pub fn new(name: impl Into<String>, price: f64) -> Self {
        Self {
            id: 0,
            name: name.into(),
            price,
        }
    }
}

impl fmt::Display for Product {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} — {:.2}", self.name, self.price)
    }
}
