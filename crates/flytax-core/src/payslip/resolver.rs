//! Tiered field resolver.
//!
//! Each field is taken from the first tier that yields a value:
//! 1. the target key in a structured parser result,
//! 2. nested line items (expense total and overnight allowance only),
//! 3. label scanning over the raw text,
//! 4. the field default.

use std::collections::BTreeMap;

use rust_decimal::Decimal;
use serde::Serialize;
use tracing::{debug, info};

use crate::models::document::{ParsedDocument, PayslipSource};
use crate::models::payslip::{ExtractionResult, PayslipField};

use super::rules::{is_expense_label, is_overnight_label, parse_amount_value, LABEL_RULES};
use super::PayslipExtractor;

/// Tier that produced a field value.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum FieldSource {
    /// Target key in the structured result.
    Direct,
    /// Nested line items.
    LineItems,
    /// Label scan over the raw text.
    RawText,
    /// Nothing found; field default.
    Default,
}

/// Extraction record with per-field provenance.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Resolution {
    /// The record itself.
    pub result: ExtractionResult,
    /// Which tier resolved each field.
    pub sources: BTreeMap<PayslipField, FieldSource>,
    /// Values that were present but ignored.
    pub warnings: Vec<String>,
}

/// Resolver applying direct, line-item and raw-text tiers in order.
#[derive(Debug, Clone)]
pub struct FieldResolver {
    /// Whether label scanning over raw text is attempted.
    text_fallback: bool,
}

impl FieldResolver {
    /// Create a resolver with every tier enabled.
    pub fn new() -> Self {
        Self { text_fallback: true }
    }

    /// Enable or disable the raw-text label scan.
    pub fn with_text_fallback(mut self, enabled: bool) -> Self {
        self.text_fallback = enabled;
        self
    }

    /// Resolve and report where every value came from.
    pub fn resolve_detailed(&self, document: ParsedDocument) -> Resolution {
        let structured = document.is_structured();
        let source = document.into_source();

        info!(
            "Resolving payslip fields from {} document ({} characters of text)",
            if structured { "structured" } else { "text" },
            source.raw_text.len()
        );

        let mut resolved: BTreeMap<PayslipField, (Decimal, FieldSource)> = BTreeMap::new();
        let mut warnings = Vec::new();

        for (field, value) in &source.fields {
            match parse_amount_value(value) {
                Some(amount) => {
                    debug!("{} = {} (direct)", field, amount);
                    resolved.insert(*field, (amount, FieldSource::Direct));
                }
                None => warnings.push(format!("Ignoring unparseable {}: {}", field, value)),
            }
        }

        self.resolve_line_items(&source, &mut resolved);

        if self.text_fallback {
            for rule in LABEL_RULES.iter() {
                if resolved.contains_key(&rule.field) {
                    continue;
                }
                if let Some(amount) = rule.apply(&source.raw_text) {
                    debug!("{} = {} (raw text)", rule.field, amount);
                    resolved.insert(rule.field, (amount, FieldSource::RawText));
                }
            }
        }

        let sources = PayslipField::ALL
            .into_iter()
            .map(|field| {
                let origin = resolved.get(&field).map_or(FieldSource::Default, |(_, s)| *s);
                (field, origin)
            })
            .collect();
        let amount = |field: PayslipField| resolved.get(&field).map(|(v, _)| *v);

        let result = ExtractionResult {
            montant_imposable: amount(PayslipField::MontantImposable),
            cumul_imposable: amount(PayslipField::CumulImposable),
            frais_emploi: amount(PayslipField::FraisEmploi).unwrap_or(Decimal::ZERO),
            decouchers_fpro: amount(PayslipField::DecouchersFpro),
            raw_text: source.raw_text,
        };

        debug!("Resolved {} of {} fields", resolved.len(), PayslipField::ALL.len());

        Resolution {
            result,
            sources,
            warnings,
        }
    }

    /// Sum catalogued expense lines and pick up the overnight allowance line.
    ///
    /// The expense total only counts as resolved when at least one catalogued
    /// line carried an amount; otherwise the raw-text scan gets its turn.
    fn resolve_line_items(
        &self,
        source: &PayslipSource,
        resolved: &mut BTreeMap<PayslipField, (Decimal, FieldSource)>,
    ) {
        let Some(items) = &source.line_items else {
            return;
        };

        let collect_expenses = !resolved.contains_key(&PayslipField::FraisEmploi);
        let mut expense_total = Decimal::ZERO;
        let mut expense_lines = 0usize;

        for item in items {
            if collect_expenses && is_expense_label(&item.label) {
                if let Some(amount) = parse_amount_value(&item.value) {
                    expense_total += amount;
                    expense_lines += 1;
                }
            }

            if is_overnight_label(&item.label)
                && !resolved.contains_key(&PayslipField::DecouchersFpro)
            {
                if let Some(amount) = parse_amount_value(&item.value) {
                    debug!("{} = {} (line {:?})", PayslipField::DecouchersFpro, amount, item.label);
                    resolved.insert(PayslipField::DecouchersFpro, (amount, FieldSource::LineItems));
                }
            }
        }

        if expense_lines > 0 {
            debug!(
                "{} = {} ({} lines)",
                PayslipField::FraisEmploi,
                expense_total,
                expense_lines
            );
            resolved.insert(PayslipField::FraisEmploi, (expense_total, FieldSource::LineItems));
        }
    }
}

impl Default for FieldResolver {
    fn default() -> Self {
        Self::new()
    }
}

impl PayslipExtractor for FieldResolver {
    fn resolve(&self, document: ParsedDocument) -> ExtractionResult {
        self.resolve_detailed(document).result
    }
}
