//! # Cart Lines
//!
//! Line items as supplied by the storefront cart state.

use crate::lenient;
use serde::{Deserialize, Serialize};

/// A line in the customer's cart
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CartLine {
    /// Display label
    #[serde(default, deserialize_with = "lenient::text")]
    pub name: String,

    /// Unit price in major units
    #[serde(default, alias = "price", deserialize_with = "lenient::number")]
    pub unit_price: f64,

    /// Quantity; negative values are priced as zero
    #[serde(default, alias = "qty", deserialize_with = "lenient::integer")]
    pub quantity: i64,

    #[serde(
        default,
        skip_serializing_if = "Option::is_none",
        deserialize_with = "lenient::optional_id"
    )]
    pub product_id: Option<String>,

    #[serde(
        default,
        skip_serializing_if = "Option::is_none",
        deserialize_with = "lenient::optional_id"
    )]
    pub variant_id: Option<String>,
}

impl CartLine {
    /// Create a line with a name, unit price and quantity
    pub fn new(name: impl Into<String>, unit_price: f64, quantity: i64) -> Self {
        Self {
            name: name.into(),
            unit_price,
            quantity,
            product_id: None,
            variant_id: None,
        }
    }

    /// Builder: set product ID
    pub fn with_product(mut self, product_id: impl Into<String>) -> Self {
        self.product_id = Some(product_id.into());
        self
    }

    /// Builder: set variant ID
    pub fn with_variant(mut self, variant_id: impl Into<String>) -> Self {
        self.variant_id = Some(variant_id.into());
        self
    }

    /// Quantity actually priced (negatives clamp to zero)
    pub fn billable_quantity(&self) -> i64 {
        self.quantity.max(0)
    }
}

/// Total number of billable units across lines, saturating at `i64::MAX`
pub fn item_count(lines: &[CartLine]) -> i64 {
    lines
        .iter()
        .map(CartLine::billable_quantity)
        .fold(0, i64::saturating_add)
}
