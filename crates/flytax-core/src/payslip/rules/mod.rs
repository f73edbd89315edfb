//! Rule-based field extractors for payslips.

pub mod amounts;
pub mod catalogue;
pub mod labels;
pub mod patterns;

pub use amounts::{format_amount, parse_amount, parse_amount_value};
pub use catalogue::{is_expense_label, is_overnight_label, EXPENSE_LABELS};
pub use labels::{find_amount_after_label, LabelScanner};
pub use patterns::{LabelRule, RuleMode, LABEL_RULES};

/// Trait for field extractors.
pub trait FieldExtractor {
    /// The type of value this extractor produces.
    type Output;

    /// Extract the field from text.
    fn extract(&self, text: &str) -> Option<Self::Output>;

    /// Extract all occurrences of the field.
    fn extract_all(&self, text: &str) -> Vec<Self::Output>;
}

/// A value found in source text.
#[derive(Debug, Clone, PartialEq)]
pub struct ExtractionMatch<T> {
    /// Extracted value.
    pub value: T,
    /// Byte range of the matched amount in the source text.
    pub position: Option<(usize, usize)>,
    /// Source text that was matched.
    pub source: String,
}

impl<T> ExtractionMatch<T> {
    pub fn new(value: T, source: impl Into<String>) -> Self {
        Self {
            value,
            position: None,
            source: source.into(),
        }
    }

    pub fn with_position(mut self, start: usize, end: usize) -> Self {
        self.position = Some((start, end));
        self
    }
}
