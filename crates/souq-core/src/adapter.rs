//! # Settings Adapter
//!
//! Maps the backend's public settings payload ([`RawSettings`]) into the
//! engine's input shape ([`PricingSettings`]). Never fails: anything the
//! payload leaves out is taken from the injected [`PricingDefaults`].
//!
//! ## Shipping method selection
//!
//! ```text
//! 1. active method whose code == defaultMethodCode
//! 2. first active method
//! 3. first method, even if inactive
//! 4. no methods at all -> defaults.base_fee / defaults.delivery_label
//! ```
//!
//! ## Tax rate encoding
//!
//! A configured rate in `(0, 1]` is read as a fraction and multiplied by 100;
//! anything above 1 is already a percentage. A genuine 1% rate stored as `1`
//! is therefore read as 100%. This is kept as-is because backends already
//! store rates in both encodings.

use crate::money::{delivery_label, non_negative};
use crate::settings::{
    DeliverySettings, PricingDefaults, PricingSettings, RawSettings, ShippingMethod,
    ShippingSettings, TaxMode,
};

/// Adapts backend settings using an explicit fallback configuration
#[derive(Debug, Clone, Default)]
pub struct SettingsAdapter {
    defaults: PricingDefaults,
}

impl SettingsAdapter {
    /// Create an adapter with the given fallback configuration
    pub fn new(defaults: PricingDefaults) -> Self {
        Self { defaults }
    }

    /// Fallback configuration in use
    pub fn defaults(&self) -> &PricingDefaults {
        &self.defaults
    }

    /// Settings to use when the backend payload could not be loaded
    pub fn fallback(&self) -> PricingSettings {
        self.defaults.to_settings()
    }

    /// Convert a backend payload into engine settings
    pub fn adapt(&self, raw: &RawSettings) -> PricingSettings {
        let defaults = &self.defaults;

        let currency = raw
            .currency
            .as_deref()
            .map(str::trim)
            .filter(|c| !c.is_empty())
            .map(str::to_uppercase)
            .unwrap_or_else(|| defaults.currency.clone());

        let tax_mode = raw
            .tax
            .display_mode
            .as_deref()
            .and_then(TaxMode::parse)
            .unwrap_or(defaults.tax_mode);

        let tax_rate_percent = raw
            .tax
            .rate
            .map(normalize_tax_rate)
            .unwrap_or(defaults.tax_rate_percent);

        let tax_on_shipping = raw.tax.tax_on_shipping.unwrap_or(defaults.tax_on_shipping);

        let method = select_shipping_method(
            &raw.shipping.methods,
            raw.shipping.default_method_code.as_deref(),
        );

        let (base_fee, label) = match method {
            Some(m) => {
                let eta = delivery_label(m.eta_days_min, m.eta_days_max);
                let label = if eta.is_empty() {
                    defaults.delivery_label.clone()
                } else {
                    eta
                };
                (non_negative(m.fee), label)
            }
            None => (defaults.base_fee, defaults.delivery_label.clone()),
        };

        let free_threshold = raw
            .shipping
            .free_threshold
            .map(non_negative)
            .unwrap_or(defaults.free_threshold);

        PricingSettings {
            currency,
            tax_mode,
            tax_rate_percent,
            tax_on_shipping,
            shipping: ShippingSettings {
                base_fee,
                free_threshold,
            },
            delivery: DeliverySettings { label },
        }
    }
}

/// Adapt with a one-off set of defaults
pub fn adapt_settings(raw: &RawSettings, defaults: &PricingDefaults) -> PricingSettings {
    SettingsAdapter::new(defaults.clone()).adapt(raw)
}

/// Pick the shipping method whose fee and ETA are shown
pub fn select_shipping_method<'a>(
    methods: &'a [ShippingMethod],
    default_code: Option<&str>,
) -> Option<&'a ShippingMethod> {
    let by_code =
        default_code.and_then(|code| methods.iter().find(|m| m.active && m.code == code));

    by_code
        .or_else(|| methods.iter().find(|m| m.active))
        .or_else(|| methods.first())
}

/// Read a configured rate as a percentage.
///
/// `(0, 1]` is a fraction, anything else is a percentage already.
/// Negative rates are treated as zero.
pub fn normalize_tax_rate(rate: f64) -> f64 {
    let rate = non_negative(rate);
    if rate > 0.0 && rate <= 1.0 {
        rate * 100.0
    } else {
        rate
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::settings::{RawShipping, RawTax};

    fn methods(list: &[(&str, bool)]) -> Vec<ShippingMethod> {
        list.iter()
            .map(|(code, active)| {
                ShippingMethod::new(*code, code.to_uppercase(), 10.0).with_active(*active)
            })
            .collect()
    }

    #[test]
    fn test_default_code_inactive_falls_to_first_active() {
        let list = methods(&[("a", false), ("b", true)]);
        let chosen = select_shipping_method(&list, Some("a")).unwrap();
        assert_eq!(chosen.code, "b");
    }

    #[test]
    fn test_default_code_active_wins() {
        let list = methods(&[("a", true), ("b", true), ("c", true)]);
        assert_eq!(select_shipping_method(&list, Some("c")).unwrap().code, "c");
        assert_eq!(select_shipping_method(&list, None).unwrap().code, "a");
        assert_eq!(select_shipping_method(&list, Some("zzz")).unwrap().code, "a");
    }

    #[test]
    fn test_all_inactive_falls_to_first() {
        let list = methods(&[("x", false), ("y", false)]);
        assert_eq!(select_shipping_method(&list, Some("y")).unwrap().code, "x");
        assert!(select_shipping_method(&[], Some("y")).is_none());
    }

    #[test]
    fn test_normalize_tax_rate() {
        assert_eq!(normalize_tax_rate(0.05), 5.0);
        assert_eq!(normalize_tax_rate(1.0), 100.0);
        assert_eq!(normalize_tax_rate(5.0), 5.0);
        assert_eq!(normalize_tax_rate(0.0), 0.0);
        assert_eq!(normalize_tax_rate(-2.0), 0.0);
    }

    #[test]
    fn test_adapt_full_payload() {
        let raw = RawSettings {
            currency: Some("aed".into()),
            tax: RawTax {
                rate: Some(0.05),
                display_mode: Some("tax_inclusive".into()),
                tax_on_shipping: Some(false),
            },
            shipping: RawShipping {
                methods: vec![
                    ShippingMethod::new("express", "Express", 35.0)
                        .with_eta(1, 1)
                        .with_active(false),
                    ShippingMethod::new("standard", "Standard", 15.0).with_eta(2, 4),
                ],
                default_method_code: Some("express".into()),
                free_threshold: Some(250.0),
            },
        };

        let settings = SettingsAdapter::default().adapt(&raw);

        assert_eq!(settings.currency, "AED");
        assert_eq!(settings.tax_mode, TaxMode::Inclusive);
        assert_eq!(settings.tax_rate_percent, 5.0);
        assert!(!settings.tax_on_shipping);
        assert_eq!(settings.shipping.base_fee, 15.0);
        assert_eq!(settings.shipping.free_threshold, 250.0);
        assert_eq!(settings.delivery.label, "2-4 business days");
    }

    #[test]
    fn test_adapt_empty_payload_uses_defaults() {
        let defaults = PricingDefaults {
            currency: "SAR".into(),
            tax_mode: TaxMode::Exclusive,
            tax_rate_percent: 15.0,
            tax_on_shipping: false,
            base_fee: 20.0,
            free_threshold: 0.0,
            delivery_label: "3-5 business days".into(),
        };

        let settings = adapt_settings(&RawSettings::default(), &defaults);

        assert_eq!(settings, defaults.to_settings());
    }

    #[test]
    fn test_adapt_zero_threshold_is_kept() {
        let raw = RawSettings {
            shipping: RawShipping {
                free_threshold: Some(0.0),
                ..Default::default()
            },
            ..Default::default()
        };
        let settings = SettingsAdapter::default().adapt(&raw);
        assert_eq!(settings.shipping.free_threshold, 0.0);
    }

    #[test]
    fn test_method_without_eta_uses_default_label() {
        let raw = RawSettings {
            shipping: RawShipping {
                methods: vec![ShippingMethod::new("pickup", "Pickup", 0.0)],
                ..Default::default()
            },
            ..Default::default()
        };
        let settings = SettingsAdapter::default().adapt(&raw);
        assert_eq!(settings.shipping.base_fee, 0.0);
        assert_eq!(settings.delivery.label, PricingDefaults::default().delivery_label);
    }
}
