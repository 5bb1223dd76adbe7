//! # Pricing Settings
//!
//! Two shapes live here:
//!
//! - [`PricingSettings`]: what the pricing engine consumes.
//! - [`RawSettings`]: what the backend's `/api/settings/public` endpoint
//!   returns. Turned into `PricingSettings` by the [`SettingsAdapter`].
//!
//! [`PricingDefaults`] is the fallback configuration used when the backend
//! payload is incomplete or could not be loaded at all.
//!
//! [`SettingsAdapter`]: crate::adapter::SettingsAdapter

use crate::lenient;
use serde::{Deserialize, Deserializer, Serialize};

/// How displayed prices relate to tax
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum TaxMode {
    /// Prices exclude tax; tax is added on top
    #[default]
    #[serde(rename = "tax_exclusive", alias = "exclusive")]
    Exclusive,
    /// Prices already include tax; tax is backed out for reporting
    #[serde(rename = "tax_inclusive", alias = "inclusive")]
    Inclusive,
}

impl TaxMode {
    /// Wire name of this mode
    pub fn as_str(&self) -> &'static str {
        match self {
            TaxMode::Exclusive => "tax_exclusive",
            TaxMode::Inclusive => "tax_inclusive",
        }
    }

    /// Parse a backend display-mode string; unknown values yield `None`.
    pub fn parse(value: &str) -> Option<Self> {
        match value.trim().to_ascii_lowercase().as_str() {
            "tax_exclusive" | "exclusive" | "excl" => Some(TaxMode::Exclusive),
            "tax_inclusive" | "inclusive" | "incl" => Some(TaxMode::Inclusive),
            _ => None,
        }
    }
}

impl std::fmt::Display for TaxMode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Lenient tax mode: anything unrecognised becomes exclusive.
fn lenient_tax_mode<'de, D>(deserializer: D) -> Result<TaxMode, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Option::<serde_json::Value>::deserialize(deserializer)?;
    Ok(value
        .as_ref()
        .and_then(|v| v.as_str())
        .and_then(TaxMode::parse)
        .unwrap_or_default())
}

/// Shipping part of [`PricingSettings`]
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ShippingSettings {
    /// Flat fee charged when free shipping does not apply
    #[serde(default, deserialize_with = "lenient::number")]
    pub base_fee: f64,

    /// Subtotal at or above which shipping is free; `0` disables
    #[serde(default, deserialize_with = "lenient::number")]
    pub free_threshold: f64,
}

/// Delivery ETA display
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct DeliverySettings {
    /// Free-text ETA, e.g. "2-4 business days"
    #[serde(default, deserialize_with = "lenient::text")]
    pub label: String,
}

/// Settings consumed by the pricing engine
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PricingSettings {
    /// ISO 4217-style code, display only
    #[serde(default, deserialize_with = "lenient::text")]
    pub currency: String,

    /// Tax display mode
    #[serde(default, deserialize_with = "lenient_tax_mode")]
    pub tax_mode: TaxMode,

    /// Tax rate as a percentage (5 means 5%)
    #[serde(default, deserialize_with = "lenient::number")]
    pub tax_rate_percent: f64,

    /// Whether shipping is taxed
    #[serde(default = "default_true", deserialize_with = "lenient::bool_default_true")]
    pub tax_on_shipping: bool,

    #[serde(default)]
    pub shipping: ShippingSettings,

    #[serde(default)]
    pub delivery: DeliverySettings,
}

fn default_true() -> bool {
    true
}

impl Default for PricingSettings {
    fn default() -> Self {
        Self {
            currency: String::new(),
            tax_mode: TaxMode::Exclusive,
            tax_rate_percent: 0.0,
            tax_on_shipping: true,
            shipping: ShippingSettings::default(),
            delivery: DeliverySettings::default(),
        }
    }
}

impl PricingSettings {
    /// Builder: set currency
    pub fn with_currency(mut self, currency: impl Into<String>) -> Self {
        self.currency = currency.into();
        self
    }

    /// Builder: set tax mode and percentage rate
    pub fn with_tax(mut self, mode: TaxMode, rate_percent: f64) -> Self {
        self.tax_mode = mode;
        self.tax_rate_percent = rate_percent;
        self
    }

    /// Builder: set whether shipping is taxed
    pub fn with_tax_on_shipping(mut self, taxed: bool) -> Self {
        self.tax_on_shipping = taxed;
        self
    }

    /// Builder: set shipping fee and free-shipping threshold
    pub fn with_shipping(mut self, base_fee: f64, free_threshold: f64) -> Self {
        self.shipping = ShippingSettings {
            base_fee,
            free_threshold,
        };
        self
    }

    /// Builder: set delivery label
    pub fn with_delivery_label(mut self, label: impl Into<String>) -> Self {
        self.delivery.label = label.into();
        self
    }
}

/// Fallback pricing configuration.
///
/// Passed explicitly to the adapter so tests and tenants can inject their own
/// values; used field-by-field when the backend payload omits something and
/// wholesale when settings cannot be fetched.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PricingDefaults {
    pub currency: String,
    pub tax_mode: TaxMode,
    pub tax_rate_percent: f64,
    pub tax_on_shipping: bool,
    pub base_fee: f64,
    pub free_threshold: f64,
    pub delivery_label: String,
}

impl Default for PricingDefaults {
    fn default() -> Self {
        Self {
            currency: "AED".to_string(),
            tax_mode: TaxMode::Exclusive,
            tax_rate_percent: 5.0,
            tax_on_shipping: true,
            base_fee: 15.0,
            free_threshold: 199.0,
            delivery_label: "2-4 business days".to_string(),
        }
    }
}

impl PricingDefaults {
    /// Settings built purely from these defaults
    pub fn to_settings(&self) -> PricingSettings {
        PricingSettings {
            currency: self.currency.clone(),
            tax_mode: self.tax_mode,
            tax_rate_percent: self.tax_rate_percent,
            tax_on_shipping: self.tax_on_shipping,
            shipping: ShippingSettings {
                base_fee: self.base_fee,
                free_threshold: self.free_threshold,
            },
            delivery: DeliverySettings {
                label: self.delivery_label.clone(),
            },
        }
    }
}

// =============================================================================
// Backend payload (`/api/settings/public`)
// =============================================================================

/// Tax block of the backend payload
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RawTax {
    /// Rate as a fraction (0.05) or a percentage (5)
    #[serde(default, alias = "ratePercent", deserialize_with = "lenient::optional_number")]
    pub rate: Option<f64>,

    /// "tax_exclusive" / "tax_inclusive"
    #[serde(default, alias = "mode", alias = "taxMode")]
    pub display_mode: Option<String>,

    /// Whether shipping is taxed
    #[serde(
        default,
        alias = "applyToShipping",
        alias = "shippingTaxable",
        deserialize_with = "lenient::optional_bool"
    )]
    pub tax_on_shipping: Option<bool>,
}

/// A configured shipping method
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ShippingMethod {
    #[serde(default, deserialize_with = "lenient::text")]
    pub code: String,

    #[serde(default, alias = "name", deserialize_with = "lenient::text")]
    pub label: String,

    /// Flat fee in major units
    #[serde(default, alias = "price", alias = "amount", deserialize_with = "lenient::number")]
    pub fee: f64,

    #[serde(default, alias = "etaMin", deserialize_with = "lenient::optional_integer")]
    pub eta_days_min: Option<i64>,

    #[serde(default, alias = "etaMax", deserialize_with = "lenient::optional_integer")]
    pub eta_days_max: Option<i64>,

    /// Absent means active
    #[serde(default = "default_true", deserialize_with = "lenient::bool_default_true")]
    pub active: bool,
}

impl ShippingMethod {
    /// Create an active method
    pub fn new(code: impl Into<String>, label: impl Into<String>, fee: f64) -> Self {
        Self {
            code: code.into(),
            label: label.into(),
            fee,
            eta_days_min: None,
            eta_days_max: None,
            active: true,
        }
    }

    /// Builder: set ETA range in business days
    pub fn with_eta(mut self, min_days: i64, max_days: i64) -> Self {
        self.eta_days_min = Some(min_days);
        self.eta_days_max = Some(max_days);
        self
    }

    /// Builder: set active flag
    pub fn with_active(mut self, active: bool) -> Self {
        self.active = active;
        self
    }
}

/// Shipping block of the backend payload
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RawShipping {
    #[serde(default)]
    pub methods: Vec<ShippingMethod>,

    #[serde(default, alias = "defaultMethod")]
    pub default_method_code: Option<String>,

    #[serde(
        default,
        alias = "freeShippingThreshold",
        deserialize_with = "lenient::optional_number"
    )]
    pub free_threshold: Option<f64>,
}

/// Public settings payload as served by the store backend
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RawSettings {
    #[serde(default)]
    pub currency: Option<String>,

    #[serde(default)]
    pub tax: RawTax,

    #[serde(default)]
    pub shipping: RawShipping,
}

impl RawSettings {
    /// Parse a settings payload, unwrapping `{ "settings": … }` or
    /// `{ "data": … }` envelopes.
    pub fn from_json(body: &str) -> serde_json::Result<Self> {
        let value: serde_json::Value = serde_json::from_str(body)?;
        Self::from_value(value)
    }

    /// Same as [`RawSettings::from_json`] for an already parsed value
    pub fn from_value(mut value: serde_json::Value) -> serde_json::Result<Self> {
        for key in ["settings", "data"] {
            let inner = value.get_mut(key).filter(|v| v.is_object()).map(serde_json::Value::take);
            if let Some(inner) = inner {
                value = inner;
                break;
            }
        }
        serde_json::from_value(value)
    }
}
