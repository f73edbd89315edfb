//! Fixed label catalogue for payslip resolution.
//!
//! Everything that ties resolution to a particular payroll layout lives here:
//! the keys a parser uses for raw text and line items, the line-item labels
//! that count as employment expenses, and the tokens identifying the
//! overnight-stay allowance.

/// Key holding free text in a structured parser result.
pub const RAW_TEXT_KEY: &str = "raw_text";

/// Other text-bearing keys, in order of preference.
pub const TEXT_FALLBACK_KEYS: &[&str] = &["text", "raw"];

/// Keys under which parsers nest line items, in order of preference.
pub const LINE_ITEM_KEYS: &[&str] = &["lines", "items", "rows"];

/// Line-item labels summed into the employment-expense total.
///
/// Matching is a case-insensitive substring test against the line label. In
/// free-text scanning each label is also used as a pattern fragment, so `.`
/// there matches any character.
pub const EXPENSE_LABELS: &[&str] = &[
    "IND.REPAS",
    "INDEMNITE REPAS",
    "IR.FIN ANNEE DOUBL",
    "IND. TRANSPORT",
    "IND. TRANSPORT EXO",
    "FRAIS REELS TRANSP",
    "R. FRAIS DE TRANSPORT",
    "IR EXONEREES",
    "IR NON EXONEREES",
];

/// Tokens marking an overnight-stay ("découcher") line.
pub const OVERNIGHT_TOKENS: &[&str] = &["DECOUCH", "DÉCOUCH"];

/// Tokens marking a professional-expense ("F.PRO") line.
pub const PROFESSIONAL_TOKENS: &[&str] = &["F.PRO"];

/// Whether a line-item label belongs to the employment-expense total.
pub fn is_expense_label(label: &str) -> bool {
    let label = label.to_lowercase();
    EXPENSE_LABELS
        .iter()
        .any(|expense| label.contains(&expense.to_lowercase()))
}

/// Whether a line-item label is the overnight-stay allowance.
pub fn is_overnight_label(label: &str) -> bool {
    let label = label.to_uppercase();
    OVERNIGHT_TOKENS.iter().any(|t| label.contains(t))
        && PROFESSIONAL_TOKENS.iter().any(|t| label.contains(t))
}
