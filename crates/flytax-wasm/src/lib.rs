//! WASM bindings for payslip field extraction.
//!
//! This crate provides WebAssembly bindings for use in browsers and Node.js.

use serde::Serialize;
use wasm_bindgen::prelude::*;

use flytax_core::payslip::rules::{format_amount as format_fr_amount, parse_amount as parse_fr_amount};
use flytax_core::{FieldResolver, ParsedDocument, PayslipExtractor};

/// Initialize panic hook for better error messages in console.
#[wasm_bindgen(start)]
pub fn init() {
    #[cfg(feature = "console_error_panic_hook")]
    console_error_panic_hook::set_once();
}

/// Version information.
#[wasm_bindgen]
pub fn version() -> String {
    env!("CARGO_PKG_VERSION").to_string()
}

fn to_js<T: Serialize>(value: &T) -> Result<JsValue, JsValue> {
    // Plain objects and `null` for unresolved fields
    let serializer = serde_wasm_bindgen::Serializer::json_compatible();
    value
        .serialize(&serializer)
        .map_err(|e| JsValue::from_str(&e.to_string()))
}

/// Resolve payslip fields from parser output (JSON text or raw text).
#[wasm_bindgen]
pub fn extract_payslip(output: &str) -> Result<JsValue, JsValue> {
    to_js(&FieldResolver::new().resolve_output(output))
}

/// Resolve payslip fields from an already parsed JavaScript value.
#[wasm_bindgen]
pub fn extract_payslip_value(parsed: JsValue) -> Result<JsValue, JsValue> {
    let value: serde_json::Value = serde_wasm_bindgen::from_value(parsed)
        .map_err(|e| JsValue::from_str(&e.to_string()))?;
    to_js(&FieldResolver::new().resolve(ParsedDocument::from(value)))
}

/// Resolve payslip fields and report which source produced each one.
#[wasm_bindgen]
pub fn explain_payslip(output: &str) -> Result<JsValue, JsValue> {
    let resolution =
        FieldResolver::new().resolve_detailed(ParsedDocument::from_parser_output(output));
    to_js(&resolution)
}

/// Parse a locale-formatted amount (e.g., "1 234,56").
#[wasm_bindgen]
pub fn parse_amount(amount: &str) -> Option<f64> {
    parse_fr_amount(amount).and_then(|d| d.normalize().to_string().parse().ok())
}

/// Format an amount in French style (1 234,56).
#[wasm_bindgen]
pub fn format_amount(amount: f64) -> Option<String> {
    parse_fr_amount(&format!("{:.2}", amount.abs())).map(|d| {
        let formatted = format_fr_amount(d);
        if amount < 0.0 { format!("-{}", formatted) } else { formatted }
    })
}
