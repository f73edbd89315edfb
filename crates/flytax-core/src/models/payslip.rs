//! Payslip extraction records.

use std::fmt;

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// Numeric payslip field resolved by flytax.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PayslipField {
    /// Amount subject to income tax for the period.
    MontantImposable,
    /// Year-to-date running total of the taxable amount.
    CumulImposable,
    /// Sum of itemized meal and transport allowances.
    FraisEmploi,
    /// Professional allowance for nights away from home.
    DecouchersFpro,
}

impl PayslipField {
    /// All fields, in output order.
    pub const ALL: [PayslipField; 4] = [
        PayslipField::MontantImposable,
        PayslipField::CumulImposable,
        PayslipField::FraisEmploi,
        PayslipField::DecouchersFpro,
    ];

    /// Key used for this field in parser output and in the output record.
    pub fn key(self) -> &'static str {
        match self {
            PayslipField::MontantImposable => "montant_imposable",
            PayslipField::CumulImposable => "cumul_imposable",
            PayslipField::FraisEmploi => "frais_emploi",
            PayslipField::DecouchersFpro => "decouchers_fpro",
        }
    }

    /// Look a field up by its key.
    pub fn from_key(key: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|f| f.key() == key)
    }
}

impl fmt::Display for PayslipField {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.key())
    }
}

/// Fully populated extraction record.
///
/// Serializes to exactly five keys. Amounts are emitted as JSON numbers,
/// unresolved optional amounts as `null`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ExtractionResult {
    /// Taxable amount for the period.
    #[serde(default, with = "amount_serde::option")]
    pub montant_imposable: Option<Decimal>,

    /// Year-to-date taxable amount.
    #[serde(default, with = "amount_serde::option")]
    pub cumul_imposable: Option<Decimal>,

    /// Employment-expense total, zero when nothing was found.
    #[serde(default, with = "amount_serde")]
    pub frais_emploi: Decimal,

    /// Overnight-stay allowance.
    #[serde(default, with = "amount_serde::option")]
    pub decouchers_fpro: Option<Decimal>,

    /// Text the label scan ran over.
    #[serde(default)]
    pub raw_text: String,
}

impl ExtractionResult {
    /// Record with every field at its default.
    pub fn new(raw_text: impl Into<String>) -> Self {
        Self {
            montant_imposable: None,
            cumul_imposable: None,
            frais_emploi: Decimal::ZERO,
            decouchers_fpro: None,
            raw_text: raw_text.into(),
        }
    }

    /// Value of a field; `frais_emploi` is always present.
    pub fn get(&self, field: PayslipField) -> Option<Decimal> {
        match field {
            PayslipField::MontantImposable => self.montant_imposable,
            PayslipField::CumulImposable => self.cumul_imposable,
            PayslipField::FraisEmploi => Some(self.frais_emploi),
            PayslipField::DecouchersFpro => self.decouchers_fpro,
        }
    }

    /// Value of a field as `f64`, for display and bindings.
    pub fn get_f64(&self, field: PayslipField) -> Option<f64> {
        self.get(field).map(amount_serde::to_f64)
    }
}

impl Default for ExtractionResult {
    fn default() -> Self {
        Self::new(String::new())
    }
}

/// Amounts travel as JSON numbers.
///
/// Conversion goes through the decimal text form so `12345.67` is emitted as
/// the nearest `f64` to 12345.67, whatever the decimal's internal scale.
mod amount_serde {
    use std::str::FromStr;

    use rust_decimal::Decimal;
    use serde::{Deserialize, Deserializer, Serializer};

    pub fn to_f64(value: Decimal) -> f64 {
        f64::from_str(&value.normalize().to_string()).unwrap_or(0.0)
    }

    fn from_f64(value: f64) -> Option<Decimal> {
        if !value.is_finite() {
            return None;
        }
        Decimal::from_str(&value.to_string())
            .or_else(|_| Decimal::from_scientific(&format!("{:e}", value)))
            .ok()
    }

    pub fn serialize<S: Serializer>(value: &Decimal, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_f64(to_f64(*value))
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Decimal, D::Error> {
        let value = f64::deserialize(deserializer)?;
        from_f64(value).ok_or_else(|| serde::de::Error::custom("amount out of range"))
    }

    pub mod option {
        use super::*;

        pub fn serialize<S: Serializer>(
            value: &Option<Decimal>,
            serializer: S,
        ) -> Result<S::Ok, S::Error> {
            match value {
                Some(v) => serializer.serialize_some(&to_f64(*v)),
                None => serializer.serialize_none(),
            }
        }

        pub fn deserialize<'de, D: Deserializer<'de>>(
            deserializer: D,
        ) -> Result<Option<Decimal>, D::Error> {
            match Option::<f64>::deserialize(deserializer)? {
                Some(v) => from_f64(v)
                    .map(Some)
                    .ok_or_else(|| serde::de::Error::custom("amount out of range")),
                None => Ok(None),
            }
        }
    }
}

/// Summary together with the parser output it was resolved from.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ExtractionResponse {
    /// Parser output, as received.
    pub parsed_raw: serde_json::Value,
    /// Resolved record.
    pub summary: ExtractionResult,
}
