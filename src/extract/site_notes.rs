use anyhow::Result;
use regex::{Captures, Regex};

use super::{capture_parse, capture_str, compile};
use crate::model::{HotWaterType, SiteNotes};

const YES_TOKENS: [&str; 9] = [
    "y", "yes", "true", "present", "installed", "fitted", "exists", "smart", "on",
];
const NO_TOKENS: [&str; 7] = ["n", "no", "false", "absent", "none", "not present", "off"];

/// Reads a yes/no answer. An exact token is looked up directly; otherwise
/// any yes word anywhere in the text wins over any no word. Words match
/// whole, so `y`, `n` and `on` never fire inside longer words, and the
/// `present` of a `not present` phrase does not count as yes.
/// `None` when neither vocabulary appears.
pub fn parse_flag(raw: &str) -> Option<bool> {
    let text = raw
        .split_whitespace()
        .collect::<Vec<&str>>()
        .join(" ")
        .to_lowercase();

    if YES_TOKENS.contains(&text.as_str()) {
        return Some(true);
    }
    if NO_TOKENS.contains(&text.as_str()) {
        return Some(false);
    }

    let without_negated = text.replace("not present", " ");
    if words(&without_negated).any(|word| YES_TOKENS.contains(&word)) {
        return Some(true);
    }
    if text.contains("not present") || words(&text).any(|word| NO_TOKENS.contains(&word)) {
        return Some(false);
    }
    None
}

fn words(text: &str) -> impl Iterator<Item = &str> {
    text.split(|character: char| !character.is_alphanumeric())
        .filter(|word| !word.is_empty())
}

#[derive(Debug, Clone, Copy)]
enum SiteNoteField {
    SmartGasMeter,
    SmartElecMeter,
    LoftInsulation,
    CavityWallInsulation,
    InternalWallInsulation,
    FlatRoofInsulation,
    MechanicalVentilation,
    AirPermeability,
    DoubleGlazing,
    Doors,
    Lighting,
    MainHeatingEfficiency,
    HeatingControls,
    HotWater,
    SolarPv,
}

// `{flag}` is replaced by the alternation of every yes/no token.
const SITE_NOTE_RULES: [(SiteNoteField, &str); 15] = [
    (
        SiteNoteField::SmartGasMeter,
        r"(?i)\bsmart\s+gas\s+meter(?:\s*[:\-]?\s*({flag})\b)?",
    ),
    (
        SiteNoteField::SmartElecMeter,
        r"(?i)\bsmart\s+elec\w*\s+meter(?:\s*[:\-]?\s*({flag})\b)?",
    ),
    (
        SiteNoteField::LoftInsulation,
        r"(?i)\bloft\s+insulation\s*:\s*(\d+)\s*mm",
    ),
    (
        SiteNoteField::CavityWallInsulation,
        r"(?i)\b(?:cavity|cav)\s+wall\s+insulation\s*[:\-]?[ \t]*([^\n]{0,40})",
    ),
    (
        SiteNoteField::InternalWallInsulation,
        r"(?i)\b(?:internal|solid)\s+wall\s+insulation\s*:\s*(\d+)\s*mm",
    ),
    (
        SiteNoteField::FlatRoofInsulation,
        r"(?i)\bflat\s+roof\s+insulat(?:ed|ion)\s*[:\-]?[ \t]*([^\n]{0,40})",
    ),
    (
        SiteNoteField::MechanicalVentilation,
        r"(?i)\bMEV\b|\bdecentrali[sz]ed\s+extract|\bMVHR\b|\bmechanical\s+ventilation",
    ),
    (
        SiteNoteField::AirPermeability,
        r"(?i)(?:\bair\s+pressure|\bAP4\b)\D{0,40}?(\d+(?:\.\d+)?)",
    ),
    (
        SiteNoteField::DoubleGlazing,
        r"(?i)\bdouble[\s\-]+glaz(?:ed|ing)(?:\s*[:\-]?\s*({flag})\b)?",
    ),
    (
        SiteNoteField::Doors,
        r"(?i)\bDoors\s*:\s*(\d+)\s*\(\s*uninsulated\s*\)",
    ),
    (
        SiteNoteField::Lighting,
        r"(?i)\b(\d+)\s+low[\s\-]*energy\s+(?:(?:lights?|lighting|outlets?)\s+)?of\s+(\d+)",
    ),
    (
        SiteNoteField::MainHeatingEfficiency,
        r"(?is)\bmain\s+heating\s+system.{0,80}?efficiency.{0,20}?(\d{1,3}\.\d)\s*%",
    ),
    (
        SiteNoteField::HeatingControls,
        r"(?i)\bheating\s+controls\s*:\s*([^\n]*)",
    ),
    (
        SiteNoteField::HotWater,
        r"(?i)\bwater\s+heating[^\n]{0,60}?\b(no\s+cylinder|cylinder|combi)",
    ),
    (SiteNoteField::SolarPv, r"(?i)\bsolar\s+pv\b|\bphotovoltaic"),
];

struct SiteNoteRule {
    field: SiteNoteField,
    pattern: Regex,
}

pub struct SiteNotesScanner {
    rules: Vec<SiteNoteRule>,
}

impl SiteNotesScanner {
    pub fn new() -> Result<Self> {
        let flag = flag_alternation();
        let rules = SITE_NOTE_RULES
            .iter()
            .map(|(field, pattern)| {
                Ok(SiteNoteRule {
                    field: *field,
                    pattern: compile(
                        &pattern.replace("{flag}", &flag),
                        &format!("site note {field:?}"),
                    )?,
                })
            })
            .collect::<Result<Vec<SiteNoteRule>>>()?;
        Ok(Self { rules })
    }

    /// Every rule runs independently; a miss leaves its attribute unset.
    pub fn scan(&self, text: &str) -> SiteNotes {
        let mut notes = SiteNotes::default();
        for rule in &self.rules {
            let captures = rule.pattern.captures(text);
            assign(rule.field, captures.as_ref(), &mut notes);
        }
        notes.loft_insulated = notes.loft_insulation_mm.map(|mm| mm > 0);
        notes
    }
}

fn assign(field: SiteNoteField, captures: Option<&Captures<'_>>, notes: &mut SiteNotes) {
    // Presence-only attributes are decided whether or not the pattern matched.
    match field {
        SiteNoteField::MechanicalVentilation => {
            notes.mechanical_ventilation = Some(captures.is_some());
            return;
        }
        SiteNoteField::SolarPv => {
            notes.pv_present = Some(captures.is_some());
            return;
        }
        _ => {}
    }

    let Some(captures) = captures else {
        return;
    };

    match field {
        SiteNoteField::SmartGasMeter => notes.smart_gas_meter = flag_or_present(captures),
        SiteNoteField::SmartElecMeter => notes.smart_elec_meter = flag_or_present(captures),
        SiteNoteField::LoftInsulation => notes.loft_insulation_mm = capture_parse(captures, 1),
        SiteNoteField::CavityWallInsulation => {
            notes.cavity_wall_insulation = capture_str(captures, 1).and_then(|raw| parse_flag(&raw));
        }
        SiteNoteField::InternalWallInsulation => {
            notes.internal_wall_insulation_mm = capture_parse(captures, 1);
        }
        SiteNoteField::FlatRoofInsulation => {
            notes.flat_roof_insulated = capture_str(captures, 1).and_then(|raw| parse_flag(&raw));
        }
        SiteNoteField::AirPermeability => notes.air_permeability_ap4 = capture_parse(captures, 1),
        SiteNoteField::DoubleGlazing => notes.double_glazed = flag_or_present(captures),
        SiteNoteField::Doors => notes.doors_uninsulated = capture_parse(captures, 1),
        SiteNoteField::Lighting => {
            let low_energy = capture_parse::<u32>(captures, 1);
            let total = capture_parse::<u32>(captures, 2);
            if let (Some(low_energy), Some(total)) = (low_energy, total) {
                notes.low_energy_lights = Some(low_energy);
                notes.lights_total = Some(total);
            }
        }
        SiteNoteField::MainHeatingEfficiency => {
            notes.main_heat_eff_pct = capture_parse(captures, 1);
        }
        SiteNoteField::HeatingControls => {
            let span = captures
                .get(1)
                .map(|value| value.as_str().to_lowercase())
                .unwrap_or_default();
            notes.heating_controls_smart = Some(
                ["smart", "zoned", "trv"]
                    .iter()
                    .any(|term| span.contains(term)),
            );
        }
        SiteNoteField::HotWater => {
            notes.hot_water_type = capture_str(captures, 1).and_then(|raw| hot_water_type(&raw));
        }
        SiteNoteField::MechanicalVentilation | SiteNoteField::SolarPv => {}
    }
}

/// An explicit token decides; the bare phrase on its own reads as yes.
fn flag_or_present(captures: &Captures<'_>) -> Option<bool> {
    match capture_str(captures, 1) {
        Some(token) => parse_flag(&token),
        None => Some(true),
    }
}

fn hot_water_type(raw: &str) -> Option<HotWaterType> {
    let folded = raw
        .split_whitespace()
        .collect::<Vec<&str>>()
        .join(" ")
        .to_lowercase();
    match folded.as_str() {
        "cylinder" => Some(HotWaterType::Cylinder),
        "combi" => Some(HotWaterType::Combi),
        "no cylinder" => Some(HotWaterType::NoCylinder),
        _ => None,
    }
}

/// Longest tokens first so `no` never shadows `none` or `not present`.
fn flag_alternation() -> String {
    let mut tokens = YES_TOKENS
        .iter()
        .chain(NO_TOKENS.iter())
        .map(|token| token.replace(' ', r"\s+"))
        .collect::<Vec<String>>();
    tokens.sort_by(|a, b| b.len().cmp(&a.len()).then(a.cmp(b)));
    tokens.join("|")
}
