use std::collections::BTreeMap;
use std::fmt;

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct SummaryRecord {
    pub survey_reference: Option<String>,
    pub reference_number: Option<String>,
    pub process_date: Option<String>,
    pub sap_current: Option<u32>,
    pub sap_current_band: Option<char>,
    pub sap_potential: Option<u32>,
    pub sap_potential_band: Option<char>,
    pub ei_current: Option<u32>,
    pub ei_current_band: Option<char>,
    pub ei_potential: Option<u32>,
    pub ei_potential_band: Option<char>,
    pub fuel_bill: Option<f64>,
    pub uprn: Option<String>,
    pub postcode: Option<String>,
    pub address: Option<String>,
}

/// Floor/room areas in square metres, keyed by canonical label.
pub type MeasureMap = BTreeMap<String, f64>;

/// Always holds every tracked measure name, matched or not.
pub type RecommendationMap = BTreeMap<String, RecommendationEntry>;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Status {
    #[serde(rename = "Already Installed")]
    AlreadyInstalled,
    #[serde(rename = "Not Applicable")]
    NotApplicable,
    #[serde(rename = "Sap Increase Too Small")]
    SapIncreaseTooSmall,
    #[serde(rename = "Recommended")]
    Recommended,
}

impl Status {
    pub const ALL: [Status; 4] = [
        Status::AlreadyInstalled,
        Status::NotApplicable,
        Status::SapIncreaseTooSmall,
        Status::Recommended,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            Self::AlreadyInstalled => "Already Installed",
            Self::NotApplicable => "Not Applicable",
            Self::SapIncreaseTooSmall => "Sap Increase Too Small",
            Self::Recommended => "Recommended",
        }
    }
}

impl fmt::Display for Status {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Status for one retrofit measure. `status` is `None` when undetermined;
/// `descriptor` keeps the parenthetical text as printed (title-cased).
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct RecommendationEntry {
    pub status: Option<Status>,
    pub descriptor: Option<String>,
}

impl RecommendationEntry {
    /// Text the status was (or would be) derived from.
    pub fn raw_text(&self) -> &str {
        match (&self.status, &self.descriptor) {
            (Some(status), _) => status.as_str(),
            (None, Some(descriptor)) => descriptor.as_str(),
            (None, None) => "",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum HotWaterType {
    #[serde(rename = "cylinder")]
    Cylinder,
    #[serde(rename = "combi")]
    Combi,
    #[serde(rename = "no cylinder")]
    NoCylinder,
}

/// Surveyor site notes. `None` means the attribute was not mentioned,
/// which is distinct from an explicit `Some(false)` / `Some(0)`.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct SiteNotes {
    pub smart_gas_meter: Option<bool>,
    pub smart_elec_meter: Option<bool>,
    pub loft_insulation_mm: Option<u32>,
    pub loft_insulated: Option<bool>,
    pub cavity_wall_insulation: Option<bool>,
    pub internal_wall_insulation_mm: Option<u32>,
    pub flat_roof_insulated: Option<bool>,
    pub mechanical_ventilation: Option<bool>,
    pub air_permeability_ap4: Option<f64>,
    pub double_glazed: Option<bool>,
    pub doors_uninsulated: Option<u32>,
    pub low_energy_lights: Option<u32>,
    pub lights_total: Option<u32>,
    pub main_heat_eff_pct: Option<f64>,
    pub heating_controls_smart: Option<bool>,
    pub hot_water_type: Option<HotWaterType>,
    pub pv_present: Option<bool>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DocumentRecord {
    pub summary: SummaryRecord,
    pub measures: MeasureMap,
    pub recommendations: RecommendationMap,
    pub site_notes: SiteNotes,
    pub normalized_text: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StatusChange {
    pub pre: String,
    pub post: String,
    pub changed: bool,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MeasureChange {
    pub pre: Option<f64>,
    pub post: Option<f64>,
    pub delta: Option<f64>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DiffResult {
    pub sap_change: Option<i64>,
    pub ei_change: Option<i64>,
    pub fuel_bill_change: Option<f64>,
    pub recommendations: BTreeMap<String, StatusChange>,
    pub measures: BTreeMap<String, MeasureChange>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum QaLevel {
    Info,
    Warning,
    Error,
}

impl QaLevel {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Info => "info",
            Self::Warning => "warning",
            Self::Error => "error",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct QaFinding {
    pub level: QaLevel,
    pub field: String,
    pub message: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Comparison {
    pub pre: DocumentRecord,
    pub post: DocumentRecord,
    pub diff: DiffResult,
    pub findings: Vec<QaFinding>,
}

impl Comparison {
    pub fn finding_count(&self, level: QaLevel) -> usize {
        self.findings
            .iter()
            .filter(|finding| finding.level == level)
            .count()
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ReportHeader {
    pub address: Option<String>,
    pub uprn: Option<String>,
    pub pre_date: Option<String>,
    pub post_date: Option<String>,
    pub notes: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SourceDocument {
    pub role: String,
    pub path: String,
    pub sha256: String,
    pub page_count: usize,
    pub empty_page_count: usize,
    pub failed_page_count: usize,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ComparisonReport {
    pub manifest_version: u32,
    pub report_id: String,
    pub generated_at: String,
    pub safe_mode: bool,
    pub header: ReportHeader,
    pub sources: Vec<SourceDocument>,
    pub comparison: Comparison,
    pub warnings: Vec<String>,
}
