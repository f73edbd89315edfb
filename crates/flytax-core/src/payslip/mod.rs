//! Payslip field resolution.

mod resolver;
pub mod rules;

pub use resolver::{FieldResolver, FieldSource, Resolution};

use crate::models::document::ParsedDocument;
use crate::models::payslip::ExtractionResult;

/// Trait for turning parser output into a payslip record.
///
/// Implementations never fail: missing or malformed signals leave fields at
/// their defaults.
pub trait PayslipExtractor {
    /// Resolve a parsed document into a complete record.
    fn resolve(&self, document: ParsedDocument) -> ExtractionResult;

    /// Resolve the captured output of a parser program (JSON or text).
    fn resolve_output(&self, output: &str) -> ExtractionResult {
        self.resolve(ParsedDocument::from_parser_output(output))
    }
}
