//! # Pricing Engine
//!
//! Computes cart totals from cart lines and [`PricingSettings`].
//!
//! ```text
//! lines ──► lineSubtotal = round2(unitPrice × max(0, qty))
//!             │
//!             ▼
//!        subtotal = round2(Σ lineSubtotal)
//!             │
//!             ▼
//!        shippingFee = 0 if threshold > 0 && subtotal >= threshold, else baseFee
//!             │
//!             ▼
//!        tax (exclusive: added on top, apportioned per line)
//!            (inclusive: backed out of prices, reported only)
//!             │
//!             ▼
//!        grandTotal
//! ```
//!
//! Every intermediate amount is rounded to 2 decimals. Summing rounded lines
//! can differ by ±0.01 from rounding the unrounded sum; receipts already
//! rely on the line-level values, so that drift is part of the contract.
//!
//! The engine is a pure function: no I/O, no shared state, and no failure
//! mode. Degenerate input (empty cart, NaN prices, missing settings) yields
//! zero-valued totals.

use crate::cart::CartLine;
use crate::money::{non_negative, round2};
use crate::settings::{PricingSettings, TaxMode};
use serde::{Deserialize, Serialize};

/// Per-line breakdown, in input order
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LineBreakdown {
    pub name: String,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub product_id: Option<String>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub variant_id: Option<String>,

    /// Unit price as priced (coerced to a finite non-negative amount)
    pub unit_price: f64,

    /// Quantity as priced (negatives clamped to zero)
    pub quantity: i64,

    pub line_subtotal: f64,

    /// Tax attributed to this line (embedded tax in inclusive mode)
    pub line_tax: f64,

    /// Amount the customer pays for this line
    pub line_total: f64,
}

/// Result of a pricing computation
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PricingResult {
    pub currency: String,
    pub tax_mode: TaxMode,
    pub subtotal: f64,
    pub shipping_fee: f64,
    pub tax_amount: f64,
    pub grand_total: f64,
    pub lines: Vec<LineBreakdown>,
}

impl PricingResult {
    /// Whether free shipping was applied on a cart that has billable items
    pub fn has_free_shipping(&self) -> bool {
        self.shipping_fee == 0.0 && self.subtotal > 0.0
    }

    /// Number of billable units, saturating at `i64::MAX`
    pub fn item_count(&self) -> i64 {
        self.lines
            .iter()
            .map(|l| l.quantity)
            .fold(0, i64::saturating_add)
    }
}

/// Compute subtotal, shipping, tax and grand total for a cart.
pub fn compute_pricing(lines: &[CartLine], settings: &PricingSettings) -> PricingResult {
    let rate = non_negative(settings.tax_rate_percent);

    let mut breakdown: Vec<LineBreakdown> = lines
        .iter()
        .map(|line| {
            let unit_price = non_negative(line.unit_price);
            let quantity = line.billable_quantity();
            let line_subtotal = round2(unit_price * quantity as f64);
            LineBreakdown {
                name: line.name.clone(),
                product_id: line.product_id.clone(),
                variant_id: line.variant_id.clone(),
                unit_price,
                quantity,
                line_subtotal,
                line_tax: 0.0,
                line_total: line_subtotal,
            }
        })
        .collect();

    let subtotal = round2(breakdown.iter().map(|l| l.line_subtotal).sum());
    let shipping_fee = shipping_fee_for(subtotal, settings);

    let tax_amount = if rate == 0.0 {
        0.0
    } else {
        let taxed_shipping = settings.tax_on_shipping;
        match settings.tax_mode {
            TaxMode::Exclusive => {
                apply_exclusive_tax(&mut breakdown, subtotal, shipping_fee, rate, taxed_shipping)
            }
            TaxMode::Inclusive => {
                apply_inclusive_tax(&mut breakdown, subtotal, shipping_fee, rate, taxed_shipping)
            }
        }
    };

    let grand_total = match settings.tax_mode {
        TaxMode::Exclusive => round2(subtotal + shipping_fee + tax_amount),
        TaxMode::Inclusive => round2(subtotal + shipping_fee),
    };

    PricingResult {
        currency: settings.currency.clone(),
        tax_mode: settings.tax_mode,
        subtotal,
        shipping_fee,
        tax_amount,
        grand_total,
        lines: breakdown,
    }
}

/// Shipping fee for a subtotal; the threshold is inclusive and `0` disables it.
pub fn shipping_fee_for(subtotal: f64, settings: &PricingSettings) -> f64 {
    let threshold = non_negative(settings.shipping.free_threshold);
    if threshold > 0.0 && subtotal >= threshold {
        0.0
    } else {
        round2(non_negative(settings.shipping.base_fee))
    }
}

/// Tax added on top of prices, apportioned by each line's share of subtotal.
fn apply_exclusive_tax(
    lines: &mut [LineBreakdown],
    subtotal: f64,
    shipping_fee: f64,
    rate: f64,
    tax_on_shipping: bool,
) -> f64 {
    let base = if tax_on_shipping {
        subtotal + shipping_fee
    } else {
        subtotal
    };
    let tax_amount = round2(base * rate / 100.0);

    for line in lines.iter_mut() {
        line.line_tax = if subtotal > 0.0 {
            round2(tax_amount * line.line_subtotal / subtotal)
        } else {
            0.0
        };
        line.line_total = round2(line.line_subtotal + line.line_tax);
    }

    tax_amount
}

/// Tax already embedded in prices, backed out for reporting only.
fn apply_inclusive_tax(
    lines: &mut [LineBreakdown],
    subtotal: f64,
    shipping_fee: f64,
    rate: f64,
    tax_on_shipping: bool,
) -> f64 {
    let fraction = rate / (100.0 + rate);

    for line in lines.iter_mut() {
        line.line_tax = round2(line.line_subtotal * fraction);
        line.line_total = line.line_subtotal;
    }

    let goods_tax = round2(subtotal * fraction);
    let shipping_tax = if tax_on_shipping && shipping_fee > 0.0 {
        round2(shipping_fee * fraction)
    } else {
        0.0
    };

    round2(goods_tax + shipping_tax)
}
