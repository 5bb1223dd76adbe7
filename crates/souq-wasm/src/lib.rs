//! # souq-wasm
//!
//! WebAssembly bindings for souq-pricing.
//!
//! The storefront checkout and the admin settings preview run the same
//! engine as the API, so totals shown in the browser match the server quote.
//! Every entry point accepts plain JS objects; malformed input is treated as
//! empty rather than throwing.
//!
//! ## Usage (JavaScript)
//!
//! ```javascript
//! import init, { adapt_settings, compute_pricing, format_money } from 'souq-pricing-wasm';
//!
//! await init();
//!
//! const settings = adapt_settings(await (await fetch('/api/settings/public')).json());
//! const pricing = compute_pricing(cart.lines, settings);
//!
//! console.log('Total:', format_money(pricing.grandTotal, pricing.currency));
//! ```
//!
//! ## Building
//!
//! ```bash
//! wasm-pack build --target web
//! ```

use serde::Serialize;
use serde_json::Value;
use souq_core::{
    lenient, CartLine, PricingDefaults, PricingResult, PricingSettings, RawSettings,
};
use wasm_bindgen::prelude::*;

// =============================================================================
// Input decoding
// =============================================================================

/// Cart lines from a JSON array; anything else is an empty cart.
fn lines_from_json(value: Value) -> Vec<CartLine> {
    lenient::cart_lines_from_value(value)
}

/// Engine settings; malformed input prices with zero tax and zero shipping.
fn settings_from_json(value: Value) -> PricingSettings {
    if !value.is_object() {
        return PricingSettings::default();
    }
    serde_json::from_value(value).unwrap_or_default()
}

/// Backend settings payload, bare or enveloped
fn raw_settings_from_json(value: Value) -> RawSettings {
    if !value.is_object() {
        return RawSettings::default();
    }
    RawSettings::from_value(value).unwrap_or_default()
}

/// Fallback configuration; missing fields keep the platform defaults
fn defaults_from_json(value: Value) -> PricingDefaults {
    if !value.is_object() {
        return PricingDefaults::default();
    }
    serde_json::from_value(value).unwrap_or_default()
}

fn from_js(value: JsValue) -> Value {
    if value.is_undefined() || value.is_null() {
        return Value::Null;
    }
    serde_wasm_bindgen::from_value(value).unwrap_or(Value::Null)
}

fn to_js<T: Serialize>(value: &T) -> Result<JsValue, JsValue> {
    value
        .serialize(&serde_wasm_bindgen::Serializer::json_compatible())
        .map_err(|e| JsValue::from_str(&format!("Failed to serialize result: {}", e)))
}

// =============================================================================
// Bindings
// =============================================================================

/// Price a cart with engine settings (as returned by `adapt_settings`)
#[wasm_bindgen]
pub fn compute_pricing(lines: JsValue, settings: JsValue) -> Result<JsValue, JsValue> {
    let result: PricingResult = souq_core::compute_pricing(
        &lines_from_json(from_js(lines)),
        &settings_from_json(from_js(settings)),
    );
    to_js(&result)
}

/// Map a `/api/settings/public` payload to engine settings.
///
/// `defaults` is optional and overrides the built-in fallback values.
#[wasm_bindgen]
pub fn adapt_settings(raw: JsValue, defaults: JsValue) -> Result<JsValue, JsValue> {
    let settings = souq_core::adapt_settings(
        &raw_settings_from_json(from_js(raw)),
        &defaults_from_json(from_js(defaults)),
    );
    to_js(&settings)
}

/// Adapt a settings payload and price a cart in one call
#[wasm_bindgen]
pub fn quote(lines: JsValue, raw: JsValue) -> Result<JsValue, JsValue> {
    let raw = raw_settings_from_json(from_js(raw));
    let settings = souq_core::SettingsAdapter::default().adapt(&raw);
    to_js(&souq_core::compute_pricing(&lines_from_json(from_js(lines)), &settings))
}

/// Format an amount for display, e.g. `AED 1,250.50`
#[wasm_bindgen]
pub fn format_money(amount: f64, currency: &str) -> String {
    souq_core::format_money(amount, currency)
}

/// ETA label for a shipping method, e.g. `2-4 business days`
#[wasm_bindgen]
pub fn delivery_label(min_days: Option<i32>, max_days: Option<i32>) -> String {
    souq_core::delivery_label(min_days.map(i64::from), max_days.map(i64::from))
}

/// Log to browser console
#[wasm_bindgen]
pub fn log(message: &str) {
    web_sys::console::log_1(&JsValue::from_str(message));
}

/// Get library version
#[wasm_bindgen]
pub fn version() -> String {
    env!("CARGO_PKG_VERSION").to_string()
}
