//! End-to-end resolution scenarios over realistic parser outputs.

use std::str::FromStr;
use std::sync::Arc;
use std::thread;

use pretty_assertions::assert_eq;
use rust_decimal::Decimal;
use serde_json::{json, Value};

use flytax_core::{
    ExtractionResponse, FieldResolver, FieldSource, ParsedDocument, ParserOutput, PayslipExtractor,
    PayslipField,
};

const PAYSLIP_TEXT: &str = "\
BULLETIN DE PAIE - MARS 2024
Salaire de base                      3 250,00
IND.REPAS                               84,00
IND. TRANSPORT EXO                      42,50
I.DECOUCHERS F.PRO                     156,80
Montant imposable :                  2 876,43
Cumul imposable                      8 512,97 EUR
Net à payer                          2 512,10
";

fn dec(s: &str) -> Decimal {
    Decimal::from_str(s).unwrap()
}

fn summary(value: Value) -> Value {
    let result = FieldResolver::new().resolve(ParsedDocument::from(value));
    serde_json::to_value(result).unwrap()
}

#[test]
fn text_only_parser_output() {
    let result = FieldResolver::new().resolve_output(PAYSLIP_TEXT);

    assert_eq!(result.montant_imposable, Some(dec("2876.43")));
    assert_eq!(result.cumul_imposable, Some(dec("8512.97")));
    // The EXO line is found by both IND. TRANSPORT labels
    assert_eq!(result.frais_emploi, dec("169.00"));
    assert_eq!(result.decouchers_fpro, Some(dec("156.80")));
    assert_eq!(result.raw_text, PAYSLIP_TEXT.trim());
}

#[test]
fn structured_output_with_line_items() {
    let value = summary(json!({
        "montant_imposable": "2 876,43",
        "lines": {
            "SALAIRE DE BASE": "3 250,00",
            "IND.REPAS": "84,00",
            "IND. TRANSPORT EXO": "42,50",
            "I.DECOUCHERS F.PRO": "156,80"
        },
        "text": "Cumul imposable 8 512,97"
    }));

    assert_eq!(
        value,
        json!({
            "montant_imposable": 2876.43,
            "cumul_imposable": 8512.97,
            "frais_emploi": 126.5,
            "decouchers_fpro": 156.8,
            "raw_text": "Cumul imposable 8 512,97"
        })
    );
}

#[test]
fn empty_document_yields_defaults() {
    for input in [json!({"raw_text": ""}), json!(""), json!(null)] {
        assert_eq!(
            summary(input),
            json!({
                "montant_imposable": null,
                "cumul_imposable": null,
                "frais_emploi": 0.0,
                "decouchers_fpro": null,
                "raw_text": ""
            })
        );
    }
}

#[test]
fn degenerate_inputs_never_fail() {
    let inputs = [
        json!({}),
        json!([]),
        json!(true),
        json!(12.5),
        json!({"lines": "not a mapping", "montant_imposable": {"nested": 1}}),
        json!({"raw_text": 42, "items": {"IND.REPAS": null, "I.DECOUCHERS F.PRO": []}}),
        json!({"raw_text": "Montant imposable ".repeat(200)}),
    ];

    for input in inputs {
        let value = summary(input);
        let keys: Vec<&String> = value.as_object().unwrap().keys().collect();
        assert_eq!(
            keys,
            vec!["montant_imposable", "cumul_imposable", "frais_emploi", "decouchers_fpro", "raw_text"]
        );
        assert!(value["frais_emploi"].is_f64());
        assert!(value["raw_text"].is_string());
    }
}

#[test]
fn serialized_mapping_is_scanned_as_text() {
    // No raw-text key: the JSON serialization of the mapping becomes the text
    let result = FieldResolver::new().resolve(ParsedDocument::from(json!({
        "entries": ["Cumul imposable 4 000,00"]
    })));
    assert_eq!(result.cumul_imposable, Some(dec("4000")));
    assert!(result.raw_text.starts_with('{'));
}

#[test]
fn provenance_is_reported_per_field() {
    let resolution = FieldResolver::new().resolve_detailed(ParsedDocument::from(json!({
        "montant_imposable": 1000,
        "lines": {"IND.REPAS": "8,00"},
        "raw_text": "Cumul imposable 3 000,00"
    })));

    assert_eq!(resolution.sources[&PayslipField::MontantImposable], FieldSource::Direct);
    assert_eq!(resolution.sources[&PayslipField::FraisEmploi], FieldSource::LineItems);
    assert_eq!(resolution.sources[&PayslipField::CumulImposable], FieldSource::RawText);
    assert_eq!(resolution.sources[&PayslipField::DecouchersFpro], FieldSource::Default);
}

#[test]
fn response_envelope_carries_parser_output() {
    let output = ParserOutput::parse("Montant imposable 1 000,00");
    let response = ExtractionResponse {
        parsed_raw: output.received,
        summary: FieldResolver::new().resolve(output.document),
    };

    let value = serde_json::to_value(&response).unwrap();
    assert_eq!(value["parsed_raw"], json!("Montant imposable 1 000,00"));
    assert_eq!(value["summary"]["montant_imposable"], json!(1000.0));
}

#[test]
fn response_envelope_echoes_non_mapping_json() {
    for received in [json!(42), json!([1, 2]), Value::Null] {
        let output = ParserOutput::parse(&received.to_string());
        let response = ExtractionResponse {
            parsed_raw: output.received,
            summary: FieldResolver::new().resolve(output.document),
        };

        let value = serde_json::to_value(&response).unwrap();
        assert_eq!(value["parsed_raw"], received);
        assert_eq!(value["summary"]["frais_emploi"], json!(0.0));
    }
}

#[test]
fn concurrent_resolution() {
    let resolver = Arc::new(FieldResolver::new());
    let handles: Vec<_> = (0..8)
        .map(|i| {
            let resolver = Arc::clone(&resolver);
            thread::spawn(move || {
                let text = format!("Montant imposable {},00", 1000 + i);
                resolver.resolve(ParsedDocument::from(text)).montant_imposable
            })
        })
        .collect();

    for (i, handle) in handles.into_iter().enumerate() {
        assert_eq!(handle.join().unwrap(), Some(Decimal::from(1000 + i as i64)));
    }
}
