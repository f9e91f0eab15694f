use anyhow::Result;
use regex::{Captures, Regex};

use super::{capture_parse, capture_str, compile};
use crate::model::SummaryRecord;

#[derive(Debug, Clone, Copy)]
enum SummaryField {
    SurveyReference,
    ReferenceNumber,
    ProcessDate,
    SapRatings,
    EiRatings,
    FuelBill,
    Uprn,
    Postcode,
    Address,
}

// Each rule is applied to the first match only.
const SUMMARY_RULES: [(SummaryField, &str); 9] = [
    (
        SummaryField::SurveyReference,
        r"(?i)Survey Reference:[ \t]*([A-Za-z0-9/\-]+(?: [A-Za-z0-9/\-]*\d[A-Za-z0-9/\-]*)*)",
    ),
    (
        SummaryField::ReferenceNumber,
        r"(?i)Reference Number:\s*([A-Za-z0-9/\-]+)",
    ),
    (
        SummaryField::ProcessDate,
        r"(?i)Process date:\s*([0-9]{2}/[0-9]{2}/[0-9]{4})",
    ),
    (
        SummaryField::SapRatings,
        r"(?is)Current SAP rating:\s*([A-G])\s*(\d+)\b.*?Potential SAP rating:\s*([A-G])\s*(\d+)",
    ),
    (
        SummaryField::EiRatings,
        r"(?is)Current EI rating:\s*([A-G])\s*(\d+)\b.*?Potential EI rating:\s*([A-G])\s*(\d+)",
    ),
    (
        SummaryField::FuelBill,
        r"(?i)(?:Fuel Bill|Estimated Fuel Costs?):\s*[£$€]?\s*([0-9][0-9,]*(?:\.[0-9]+)?)",
    ),
    (SummaryField::Uprn, r"(?i)UPRN:\s*([A-Za-z0-9\-]+)"),
    (
        SummaryField::Postcode,
        r"(?i)\b([A-Z]{1,2}[0-9]{1,2}[A-Z]?\s*[0-9][A-Z]{2})\b",
    ),
    (
        SummaryField::Address,
        r"(?is)Address:\s*(.+?)\s*(?:\bUPRN\b|\bPostcode\b|\z)",
    ),
];

struct FieldRule {
    field: SummaryField,
    pattern: Regex,
}

pub struct SummaryScanner {
    rules: Vec<FieldRule>,
}

impl SummaryScanner {
    pub fn new() -> Result<Self> {
        let rules = SUMMARY_RULES
            .iter()
            .map(|(field, pattern)| {
                Ok(FieldRule {
                    field: *field,
                    pattern: compile(pattern, &format!("summary {field:?}"))?,
                })
            })
            .collect::<Result<Vec<FieldRule>>>()?;
        Ok(Self { rules })
    }

    pub fn scan(&self, text: &str) -> SummaryRecord {
        let mut record = SummaryRecord::default();
        for rule in &self.rules {
            if let Some(captures) = rule.pattern.captures(text) {
                assign(rule.field, &captures, &mut record);
            }
        }
        record
    }
}

fn assign(field: SummaryField, captures: &Captures<'_>, record: &mut SummaryRecord) {
    match field {
        SummaryField::SurveyReference => record.survey_reference = capture_str(captures, 1),
        SummaryField::ReferenceNumber => record.reference_number = capture_str(captures, 1),
        SummaryField::ProcessDate => record.process_date = capture_str(captures, 1),
        SummaryField::SapRatings => {
            if let Some(pair) = rating_pair(captures) {
                record.sap_current_band = Some(pair.current_band);
                record.sap_current = Some(pair.current);
                record.sap_potential_band = Some(pair.potential_band);
                record.sap_potential = Some(pair.potential);
            }
        }
        SummaryField::EiRatings => {
            if let Some(pair) = rating_pair(captures) {
                record.ei_current_band = Some(pair.current_band);
                record.ei_current = Some(pair.current);
                record.ei_potential_band = Some(pair.potential_band);
                record.ei_potential = Some(pair.potential);
            }
        }
        SummaryField::FuelBill => {
            record.fuel_bill =
                capture_str(captures, 1).and_then(|value| value.replace(',', "").parse().ok());
        }
        SummaryField::Uprn => record.uprn = capture_str(captures, 1),
        SummaryField::Postcode => record.postcode = capture_str(captures, 1).map(format_postcode),
        SummaryField::Address => {
            record.address = capture_str(captures, 1)
                .map(|value| value.split_whitespace().collect::<Vec<&str>>().join(" "));
        }
    }
}

struct RatingPair {
    current_band: char,
    current: u32,
    potential_band: char,
    potential: u32,
}

/// All four values or nothing; an unparseable score drops the whole block.
fn rating_pair(captures: &Captures<'_>) -> Option<RatingPair> {
    Some(RatingPair {
        current_band: capture_band(captures, 1)?,
        current: capture_parse(captures, 2)?,
        potential_band: capture_band(captures, 3)?,
        potential: capture_parse(captures, 4)?,
    })
}

fn capture_band(captures: &Captures<'_>, index: usize) -> Option<char> {
    capture_str(captures, index)?
        .chars()
        .next()
        .map(|band| band.to_ascii_uppercase())
}

/// Upper-cases and puts a single space before the inward code.
fn format_postcode(raw: String) -> String {
    let compact = raw
        .chars()
        .filter(|character| !character.is_whitespace())
        .flat_map(char::to_uppercase)
        .collect::<Vec<char>>();
    let split = compact.len().saturating_sub(3);
    let outward = compact[..split].iter().collect::<String>();
    let inward = compact[split..].iter().collect::<String>();
    format!("{outward} {inward}")
}
