use std::str::FromStr;

use anyhow::{Context, Result};
use regex::{Captures, Regex};
use tracing::debug;

use crate::model::DocumentRecord;

mod measures;
mod normalize;
mod recommendations;
mod site_notes;
mod status;
mod summary;
#[cfg(test)]
mod tests;

pub use measures::MeasureScanner;
pub use normalize::{normalize_lines, normalize_pages, normalize_text};
pub use recommendations::{RECOMMENDATION_NAMES, RecommendationScanner};
pub use site_notes::{SiteNotesScanner, parse_flag};
pub use status::{classify_status, normalize_status, title_case};
pub use summary::SummaryScanner;

/// Caller-supplied values that take part in record assembly.
#[derive(Debug, Clone, Default)]
pub struct DocumentOverrides {
    /// Replaces the extracted process date when set.
    pub process_date: Option<String>,
    /// Used only when no address was extracted.
    pub address: Option<String>,
    /// Used only when no UPRN was extracted.
    pub uprn: Option<String>,
}

/// All pattern scanners, compiled once and shared between documents.
pub struct Extractor {
    summary: SummaryScanner,
    measures: MeasureScanner,
    recommendations: RecommendationScanner,
    site_notes: SiteNotesScanner,
}

impl Extractor {
    pub fn new() -> Result<Self> {
        Ok(Self {
            summary: SummaryScanner::new()?,
            measures: MeasureScanner::new()?,
            recommendations: RecommendationScanner::new()?,
            site_notes: SiteNotesScanner::new()?,
        })
    }

    pub fn extract_pages(&self, pages: &[String], overrides: &DocumentOverrides) -> DocumentRecord {
        self.extract_normalized(normalize_pages(pages), overrides)
    }

    pub fn extract_normalized(
        &self,
        normalized_text: String,
        overrides: &DocumentOverrides,
    ) -> DocumentRecord {
        let mut summary = self.summary.scan(&normalized_text);
        let measures = self.measures.scan(&normalized_text);
        let recommendations = self.recommendations.scan(&normalized_text);
        let site_notes = self.site_notes.scan(&normalized_text);

        if let Some(date) = non_empty(overrides.process_date.as_deref()) {
            summary.process_date = Some(date);
        }
        if summary.address.is_none() {
            summary.address = non_empty(overrides.address.as_deref());
        }
        if summary.uprn.is_none() {
            summary.uprn = non_empty(overrides.uprn.as_deref());
        }

        debug!(
            lines = normalized_text.lines().count(),
            measures = measures.len(),
            recommendations_determined = recommendations
                .values()
                .filter(|entry| entry.status.is_some())
                .count(),
            sap_current = ?summary.sap_current,
            "extracted document record"
        );

        DocumentRecord {
            summary,
            measures,
            recommendations,
            site_notes,
            normalized_text,
        }
    }
}

/// Record with nothing extracted, used when parsing is skipped.
pub fn empty_record(overrides: &DocumentOverrides) -> DocumentRecord {
    let mut record = DocumentRecord {
        summary: Default::default(),
        measures: Default::default(),
        recommendations: RecommendationScanner::empty_map(),
        site_notes: Default::default(),
        normalized_text: String::new(),
    };
    record.summary.process_date = non_empty(overrides.process_date.as_deref());
    record.summary.address = non_empty(overrides.address.as_deref());
    record.summary.uprn = non_empty(overrides.uprn.as_deref());
    record
}

pub(crate) fn compile(pattern: &str, what: &str) -> Result<Regex> {
    Regex::new(pattern).with_context(|| format!("failed to compile {what} regex"))
}

pub(crate) fn capture_str(captures: &Captures<'_>, index: usize) -> Option<String> {
    captures
        .get(index)
        .map(|value| value.as_str().trim())
        .filter(|value| !value.is_empty())
        .map(ToOwned::to_owned)
}

/// Parse failures read as "not found".
pub(crate) fn capture_parse<T: FromStr>(captures: &Captures<'_>, index: usize) -> Option<T> {
    capture_str(captures, index)?.parse::<T>().ok()
}

fn non_empty(value: Option<&str>) -> Option<String> {
    value
        .map(str::trim)
        .filter(|value| !value.is_empty())
        .map(ToOwned::to_owned)
}
