//! Label scanning: find the amount printed after a label in free text.

use regex::Regex;
use rust_decimal::Decimal;
use tracing::warn;

use super::amounts::parse_amount;
use super::patterns::{AMOUNT_GRAMMAR, MAX_LABEL_GAP};
use super::{ExtractionMatch, FieldExtractor};

/// Ordered set of label patterns sharing one amount grammar.
///
/// Each pattern is a case-insensitive regex fragment. A match is the label,
/// up to [`MAX_LABEL_GAP`] characters without digits or line breaks, then an
/// amount. Patterns are tried in order and the first one found anywhere in
/// the text decides the result.
#[derive(Debug, Clone)]
pub struct LabelScanner {
    patterns: Vec<Regex>,
}

impl LabelScanner {
    /// Compile a scanner from label fragments.
    ///
    /// Fragments that do not compile are skipped with a warning.
    pub fn new<I, S>(labels: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let patterns = labels
            .into_iter()
            .filter_map(|label| {
                let label = label.as_ref();
                let source = format!(
                    r"(?i)(?:{})[^0-9\n\r]{{0,{}}}(?P<amount>{})",
                    label, MAX_LABEL_GAP, AMOUNT_GRAMMAR
                );
                match Regex::new(&source) {
                    Ok(re) => Some(re),
                    Err(e) => {
                        warn!("Skipping label pattern {:?}: {}", label, e);
                        None
                    }
                }
            })
            .collect();

        Self { patterns }
    }

    /// Number of usable patterns.
    pub fn len(&self) -> usize {
        self.patterns.len()
    }

    pub fn is_empty(&self) -> bool {
        self.patterns.is_empty()
    }

    /// First amount after any label, trying patterns in order.
    ///
    /// The first pattern that matches decides: if its amount does not
    /// normalize, later patterns are not consulted.
    pub fn find(&self, text: &str) -> Option<ExtractionMatch<Decimal>> {
        if text.is_empty() {
            return None;
        }

        let caps = self.patterns.iter().find_map(|re| re.captures(text))?;
        let amount = caps.name("amount")?;
        let value = parse_amount(amount.as_str())?;
        Some(ExtractionMatch::new(value, &caps[0]).with_position(amount.start(), amount.end()))
    }
}

impl FieldExtractor for LabelScanner {
    type Output = ExtractionMatch<Decimal>;

    fn extract(&self, text: &str) -> Option<Self::Output> {
        self.find(text)
    }

    /// Every labeled amount, pattern by pattern.
    fn extract_all(&self, text: &str) -> Vec<Self::Output> {
        self.patterns
            .iter()
            .flat_map(|re| re.captures_iter(text))
            .filter_map(|caps| {
                let amount = caps.name("amount")?;
                let value = parse_amount(amount.as_str())?;
                Some(ExtractionMatch::new(value, &caps[0]).with_position(amount.start(), amount.end()))
            })
            .collect()
    }
}

/// Find the first amount following one of `labels` in `text`.
pub fn find_amount_after_label<S: AsRef<str>>(text: &str, labels: &[S]) -> Option<Decimal> {
    LabelScanner::new(labels).find(text).map(|m| m.value)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::str::FromStr;

    fn dec(s: &str) -> Decimal {
        Decimal::from_str(s).unwrap()
    }

    const TAXABLE: &[&str] = &[r"Montant\s+imposable", r"Montant\s+imposable\s*[:\-]"];

    #[test]
    fn test_finds_amount_after_label() {
        let text = "Salaire de base 2 000,00\nMontant imposable : 1 834,12 EUR\n";
        assert_eq!(find_amount_after_label(text, TAXABLE), Some(dec("1834.12")));
    }

    #[test]
    fn test_case_insensitive() {
        for label in ["Montant imposable", "MONTANT IMPOSABLE", "montant imposable"] {
            let text = format!("{} ..... 1 234,56", label);
            assert_eq!(find_amount_after_label(&text, TAXABLE), Some(dec("1234.56")));
        }
    }

    #[test]
    fn test_label_spanning_lines() {
        let text = "Montant\nimposable: 950,00";
        assert_eq!(find_amount_after_label(text, TAXABLE), Some(dec("950.00")));
    }

    #[test]
    fn test_no_amount_after_label() {
        assert_eq!(find_amount_after_label("Montant imposable : néant", TAXABLE), None);
        // Value on the next line is outside the window
        assert_eq!(find_amount_after_label("Montant imposable\n1 000,00", TAXABLE), None);
        assert_eq!(find_amount_after_label("", TAXABLE), None);
        assert_eq!(find_amount_after_label("Cumul imposable 10,00", TAXABLE), None);
    }

    #[test]
    fn test_gap_limit() {
        let within = format!("Montant imposable{}12,00", ".".repeat(50));
        assert_eq!(find_amount_after_label(&within, TAXABLE), Some(dec("12.00")));

        let beyond = format!("Montant imposable{}12,00", ".".repeat(51));
        assert_eq!(find_amount_after_label(&beyond, TAXABLE), None);
    }

    #[test]
    fn test_grouped_and_plain_amounts() {
        let labels = ["Total"];
        assert_eq!(find_amount_after_label("Total 1.234.567,89", &labels), Some(dec("1234567.89")));
        assert_eq!(find_amount_after_label("Total 12\u{00a0}345,67", &labels), Some(dec("12345.67")));
        assert_eq!(find_amount_after_label("Total 1234,56", &labels), Some(dec("1234.56")));
        assert_eq!(find_amount_after_label("Total 100 EUR", &labels), Some(dec("100")));
        // Fraction needs two digits
        assert_eq!(find_amount_after_label("Total 12,5", &labels), Some(dec("12")));
    }

    #[test]
    fn test_pattern_order_wins_over_position() {
        let text = "Brut 3 000,00 Net 2 400,00";
        assert_eq!(find_amount_after_label(text, &["Net", "Brut"]), Some(dec("2400.00")));
        assert_eq!(find_amount_after_label(text, &["Brut", "Net"]), Some(dec("3000.00")));
    }

    #[test]
    fn test_first_occurrence_of_label() {
        let text = "Net 10,00\nNet 20,00";
        assert_eq!(find_amount_after_label(text, &["Net"]), Some(dec("10.00")));
    }

    #[test]
    fn test_invalid_fragment_is_skipped() {
        let scanner = LabelScanner::new(["IND.(REPAS", r"IND\.\(REPAS"]);
        assert_eq!(scanner.len(), 1);
        assert_eq!(scanner.find("IND.(REPAS 8,40").map(|m| m.value), Some(dec("8.40")));
    }

    #[test]
    fn test_match_reports_amount_position() {
        let text = "Net: 1 000,00";
        let found = LabelScanner::new(["Net"]).find(text).unwrap();
        let (start, end) = found.position.unwrap();
        assert_eq!(&text[start..end], "1 000,00");
        assert_eq!(found.source, text);
    }

    #[test]
    fn test_extract_all_reports_every_match() {
        let scanner = LabelScanner::new(["IND.REPAS"]);
        let text = "IND.REPAS 10,00\nSALAIRE 2 000,00\nIND.REPAS 4,20";
        let values: Vec<_> = scanner.extract_all(text).into_iter().map(|m| m.value).collect();
        assert_eq!(values, vec![dec("10.00"), dec("4.20")]);
    }
}
