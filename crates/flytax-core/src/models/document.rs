//! Parser output as received, and its normalized form.
//!
//! The external parser may hand back a JSON mapping (with or without the
//! target keys, a raw-text field and nested line items) or nothing but text.
//! [`ParsedDocument`] captures those two shapes; [`ParsedDocument::into_source`]
//! turns either into a [`PayslipSource`], which is all field resolution sees.

use std::collections::BTreeMap;

use serde_json::{Map, Value};

use crate::models::payslip::PayslipField;
use crate::payslip::rules::catalogue::{LINE_ITEM_KEYS, RAW_TEXT_KEY, TEXT_FALLBACK_KEYS};

/// Output of the external document parser.
#[derive(Debug, Clone, PartialEq)]
pub enum ParsedDocument {
    /// A JSON mapping.
    Structured(Map<String, Value>),
    /// Anything else, as text.
    Text(String),
}

impl ParsedDocument {
    /// Interpret the captured output of a parser program.
    ///
    /// JSON is used when the trimmed output parses, otherwise the output is
    /// treated as raw text.
    pub fn from_parser_output(output: &str) -> Self {
        ParserOutput::parse(output).document
    }

    /// Whether this is the mapping variant.
    pub fn is_structured(&self) -> bool {
        matches!(self, ParsedDocument::Structured(_))
    }

    /// Text that label scanning runs over.
    ///
    /// For mappings: the `raw_text` key when present (even if empty), then the
    /// first non-empty conventional text key, then the whole mapping as JSON.
    pub fn raw_text(&self) -> String {
        match self {
            ParsedDocument::Text(text) => text.clone(),
            ParsedDocument::Structured(map) => {
                if let Some(value) = map.get(RAW_TEXT_KEY) {
                    return value_as_text(value);
                }
                TEXT_FALLBACK_KEYS
                    .iter()
                    .filter_map(|key| map.get(*key))
                    .map(value_as_text)
                    .find(|text| !text.is_empty())
                    .unwrap_or_else(|| Value::Object(map.clone()).to_string())
            }
        }
    }

    /// Normalize into the form consumed by field resolution.
    pub fn into_source(self) -> PayslipSource {
        let raw_text = self.raw_text();
        let map = match self {
            ParsedDocument::Structured(map) => map,
            ParsedDocument::Text(_) => {
                return PayslipSource {
                    raw_text,
                    ..PayslipSource::default()
                };
            }
        };

        let fields = PayslipField::ALL
            .into_iter()
            .filter_map(|field| {
                map.get(field.key())
                    .filter(|value| !is_blank(value))
                    .map(|value| (field, value.clone()))
            })
            .collect();

        // First truthy candidate decides; a non-mapping there means no line items.
        let line_items = LINE_ITEM_KEYS
            .iter()
            .filter_map(|key| map.get(*key))
            .find(|value| is_truthy(value))
            .and_then(Value::as_object)
            .map(|items| {
                items
                    .iter()
                    .map(|(label, value)| LineItem {
                        label: label.clone(),
                        value: value.clone(),
                    })
                    .collect()
            });

        PayslipSource {
            raw_text,
            fields,
            line_items,
        }
    }
}

/// Captured parser output: the value as received and the document built from it.
#[derive(Debug, Clone, PartialEq)]
pub struct ParserOutput {
    /// Parsed JSON, or the trimmed output as a JSON string when it is not JSON.
    pub received: Value,
    pub document: ParsedDocument,
}

impl ParserOutput {
    pub fn parse(output: &str) -> Self {
        let trimmed = output.trim();
        let received = serde_json::from_str::<Value>(trimmed)
            .unwrap_or_else(|_| Value::String(trimmed.to_string()));
        let document = ParsedDocument::from(received.clone());
        Self { received, document }
    }
}

impl From<Value> for ParsedDocument {
    fn from(value: Value) -> Self {
        match value {
            Value::Object(map) => ParsedDocument::Structured(map),
            Value::String(text) => ParsedDocument::Text(text),
            Value::Null => ParsedDocument::Text(String::new()),
            other => ParsedDocument::Text(other.to_string()),
        }
    }
}

impl From<String> for ParsedDocument {
    fn from(text: String) -> Self {
        ParsedDocument::Text(text)
    }
}

impl From<&str> for ParsedDocument {
    fn from(text: &str) -> Self {
        ParsedDocument::Text(text.to_string())
    }
}

/// One labeled payslip entry from a nested line-item mapping.
#[derive(Debug, Clone, PartialEq)]
pub struct LineItem {
    /// Entry label as printed (e.g. `IND.REPAS`).
    pub label: String,
    /// Entry amount, usually locale-formatted text.
    pub value: Value,
}

/// Normalized parser output.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct PayslipSource {
    /// Text for label scanning; also copied into the result.
    pub raw_text: String,
    /// Non-empty values found under the target keys.
    pub fields: BTreeMap<PayslipField, Value>,
    /// Nested line items in document order, if the parser produced any.
    pub line_items: Option<Vec<LineItem>>,
}

fn value_as_text(value: &Value) -> String {
    match value {
        Value::Null => String::new(),
        Value::String(text) => text.clone(),
        other => other.to_string(),
    }
}

fn is_blank(value: &Value) -> bool {
    match value {
        Value::Null => true,
        Value::String(text) => text.trim().is_empty(),
        _ => false,
    }
}

fn is_truthy(value: &Value) -> bool {
    match value {
        Value::Null => false,
        Value::Bool(b) => *b,
        Value::Number(n) => n.as_f64().is_some_and(|f| f != 0.0),
        Value::String(s) => !s.is_empty(),
        Value::Array(a) => !a.is_empty(),
        Value::Object(o) => !o.is_empty(),
    }
}
