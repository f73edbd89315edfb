//! Label patterns for French payslip fields.

use lazy_static::lazy_static;
use rust_decimal::Decimal;

use super::catalogue::EXPENSE_LABELS;
use super::labels::LabelScanner;
use super::FieldExtractor;
use crate::models::payslip::PayslipField;

/// Amount grammar shared by every label pattern.
///
/// One to three digits followed by three-digit groups (space, NBSP, period or
/// comma separated) and an optional two-digit fraction; failing that, a plain
/// run of digits with an optional two-digit fraction.
pub const AMOUNT_GRAMMAR: &str =
    r"[0-9]{1,3}(?:[ \x{00A0}.,][0-9]{3})+(?:[.,][0-9]{2})?|[0-9]+(?:[.,][0-9]{2})?";

/// Maximum number of characters between a label and its amount.
pub const MAX_LABEL_GAP: usize = 50;

pub const TAXABLE_AMOUNT_LABELS: &[&str] = &[r"Montant\s+imposable", r"Montant\s+imposable\s*[:\-]"];

pub const CUMULATIVE_TAXABLE_LABELS: &[&str] = &[r"Cumul\s+imposable", r"Cumul\s+imposable\s*[:\-]"];

pub const OVERNIGHT_ALLOWANCE_LABELS: &[&str] = &[
    r"I\.?DECOUCHERS\s*F\.?PRO",
    r"DECOUCHERS F\.?PRO",
    r"Découchers F PRO",
];

/// How a rule turns label matches into a field value.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RuleMode {
    /// The first scanner match is the value.
    First,
    /// Every scanner contributes its match; the total is the value.
    Sum,
}

/// Free-text fallback for one field.
#[derive(Debug, Clone)]
pub struct LabelRule {
    pub field: PayslipField,
    pub mode: RuleMode,
    scanners: Vec<LabelScanner>,
}

impl LabelRule {
    /// Rule reading the first amount after any of `patterns`.
    pub fn first(field: PayslipField, patterns: &[&str]) -> Self {
        Self {
            field,
            mode: RuleMode::First,
            scanners: vec![LabelScanner::new(patterns)],
        }
    }

    /// Rule summing the amounts after each of `labels`.
    ///
    /// Every label is scanned on its own, as a pattern fragment and then as
    /// escaped literal text.
    pub fn sum(field: PayslipField, labels: &[&str]) -> Self {
        let scanners = labels
            .iter()
            .map(|label| LabelScanner::new([label.to_string(), regex::escape(label)]))
            .collect();
        Self {
            field,
            mode: RuleMode::Sum,
            scanners,
        }
    }

    /// Evaluate the rule over `text`.
    ///
    /// In [`RuleMode::Sum`], each label adds its own first amount, so a line
    /// such as `IND. TRANSPORT EXO 3,00` contributes through every label it
    /// carries. `None` means no label matched at all; a matched zero is
    /// `Some(0)`.
    pub fn apply(&self, text: &str) -> Option<Decimal> {
        match self.mode {
            RuleMode::First => self.scanners.iter().find_map(|s| s.extract(text)).map(|m| m.value),
            RuleMode::Sum => {
                let mut matched = false;
                let mut total = Decimal::ZERO;

                for found in self.scanners.iter().filter_map(|s| s.extract(text)) {
                    total += found.value;
                    matched = true;
                }

                matched.then(|| total.round_dp(2))
            }
        }
    }
}

lazy_static! {
    /// Free-text fallbacks, one per field, in resolution order.
    pub static ref LABEL_RULES: Vec<LabelRule> = vec![
        LabelRule::first(PayslipField::MontantImposable, TAXABLE_AMOUNT_LABELS),
        LabelRule::first(PayslipField::CumulImposable, CUMULATIVE_TAXABLE_LABELS),
        LabelRule::sum(PayslipField::FraisEmploi, EXPENSE_LABELS),
        LabelRule::first(PayslipField::DecouchersFpro, OVERNIGHT_ALLOWANCE_LABELS),
    ];
}

/// Fallback rule for `field`.
pub fn rule_for(field: PayslipField) -> Option<&'static LabelRule> {
    LABEL_RULES.iter().find(|rule| rule.field == field)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::str::FromStr;

    fn dec(s: &str) -> Decimal {
        Decimal::from_str(s).unwrap()
    }

    fn apply(field: PayslipField, text: &str) -> Option<Decimal> {
        rule_for(field).unwrap().apply(text)
    }

    #[test]
    fn test_every_field_has_one_rule() {
        for field in PayslipField::ALL {
            assert_eq!(LABEL_RULES.iter().filter(|r| r.field == field).count(), 1);
        }
        for rule in LABEL_RULES.iter() {
            assert!(rule.scanners.iter().all(|s| !s.is_empty()));
        }
    }

    #[test]
    fn test_taxable_amount_rule() {
        assert_eq!(
            apply(PayslipField::MontantImposable, "MONTANT IMPOSABLE - 2 145,30"),
            Some(dec("2145.30"))
        );
    }

    #[test]
    fn test_cumulative_rule() {
        assert_eq!(
            apply(PayslipField::CumulImposable, "... Cumul imposable .... 12 345,67 EUR ..."),
            Some(dec("12345.67"))
        );
    }

    #[test]
    fn test_overnight_rule_variants() {
        for text in [
            "I.DECOUCHERS F.PRO 45,00",
            "IDECOUCHERS FPRO 45,00",
            "Découchers F PRO : 45,00",
            "découchers f pro 45,00",
        ] {
            assert_eq!(apply(PayslipField::DecouchersFpro, text), Some(dec("45.00")), "{text}");
        }
    }

    #[test]
    fn test_expense_rule_sums_labels() {
        let text = "IND.REPAS 10,00\nIND. TRANSPORT 5,50\nSALAIRE 2 000,00";
        assert_eq!(apply(PayslipField::FraisEmploi, text), Some(dec("15.50")));
    }

    #[test]
    fn test_expense_rule_adds_every_label_match() {
        // Both IND. TRANSPORT and IND. TRANSPORT EXO find this line
        assert_eq!(apply(PayslipField::FraisEmploi, "IND. TRANSPORT EXO 3,00"), Some(dec("6.00")));
    }

    #[test]
    fn test_expense_rule_takes_first_match_per_label() {
        let forward = "IND. TRANSPORT 5,50\nIND. TRANSPORT EXO 3,00";
        let reverse = "IND. TRANSPORT EXO 3,00\nIND. TRANSPORT 5,50";
        assert_eq!(apply(PayslipField::FraisEmploi, forward), Some(dec("8.50")));
        // IND. TRANSPORT stops at the EXO line when it comes first
        assert_eq!(apply(PayslipField::FraisEmploi, reverse), Some(dec("6.00")));
    }

    #[test]
    fn test_expense_rule_distinguishes_zero_from_missing() {
        assert_eq!(apply(PayslipField::FraisEmploi, "IND.REPAS 0,00"), Some(Decimal::ZERO));
        assert_eq!(apply(PayslipField::FraisEmploi, "SALAIRE 2 000,00"), None);
    }
}
