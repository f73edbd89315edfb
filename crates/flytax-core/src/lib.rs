//! Core library for payslip field resolution.
//!
//! This crate provides:
//! - Locale-aware amount normalization (`1 234,56`, `1.234.567,89`, ...)
//! - Label scanning over free text (`Montant imposable ... 1 234,56`)
//! - Tiered resolution of payslip fields from loosely structured parser output
//! - Output records shaped for the payslip extraction service

pub mod error;
pub mod models;
pub mod payslip;

pub use error::{ConfigError, FlytaxError, Result};
pub use models::config::FlytaxConfig;
pub use models::document::{LineItem, ParsedDocument, ParserOutput, PayslipSource};
pub use models::payslip::{ExtractionResponse, ExtractionResult, PayslipField};
pub use payslip::rules::{find_amount_after_label, parse_amount, LabelScanner};
pub use payslip::{FieldResolver, FieldSource, PayslipExtractor, Resolution};
