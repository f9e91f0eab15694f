use anyhow::Result;
use regex::Regex;

use super::{capture_str, classify_status, compile, title_case};
use crate::model::{RecommendationEntry, RecommendationMap};

pub const RECOMMENDATION_NAMES: [&str; 8] = [
    "Flat roof insulation",
    "Room-in-roof insulation",
    "Floor insulation (solid floor)",
    "Heating controls for wet central heating system",
    "Loft insulation",
    "Cavity wall insulation",
    "Draught proofing",
    "Low energy lighting",
];

struct MeasurePatterns {
    name: &'static str,
    descriptor: Regex,
    keyword: Regex,
}

pub struct RecommendationScanner {
    measures: Vec<MeasurePatterns>,
}

impl RecommendationScanner {
    pub fn new() -> Result<Self> {
        let measures = RECOMMENDATION_NAMES
            .iter()
            .map(|&name| {
                let escaped = regex::escape(name);
                Ok(MeasurePatterns {
                    name,
                    descriptor: compile(
                        &format!(r"(?i){escaped}\s*\(([^)]+)\)"),
                        &format!("'{name}' descriptor"),
                    )?,
                    // Non-digits only, so the window stops at the next figure.
                    keyword: compile(
                        &format!(
                            r"(?i){escaped}\D{{0,60}}?(recommended|already installed|not applicable|sap increase too small)"
                        ),
                        &format!("'{name}' status keyword"),
                    )?,
                })
            })
            .collect::<Result<Vec<MeasurePatterns>>>()?;
        Ok(Self { measures })
    }

    pub fn empty_map() -> RecommendationMap {
        RECOMMENDATION_NAMES
            .iter()
            .map(|name| (name.to_string(), RecommendationEntry::default()))
            .collect()
    }

    pub fn scan(&self, text: &str) -> RecommendationMap {
        self.measures
            .iter()
            .map(|measure| (measure.name.to_string(), measure.scan(text)))
            .collect()
    }
}

impl MeasurePatterns {
    fn scan(&self, text: &str) -> RecommendationEntry {
        if let Some(descriptor) = self
            .descriptor
            .captures(text)
            .and_then(|captures| capture_str(&captures, 1))
        {
            return RecommendationEntry {
                status: classify_status(&descriptor),
                descriptor: Some(title_case(&descriptor)),
            };
        }

        if let Some(keyword) = self
            .keyword
            .captures(text)
            .and_then(|captures| capture_str(&captures, 1))
        {
            return RecommendationEntry {
                status: classify_status(&keyword),
                descriptor: None,
            };
        }

        RecommendationEntry::default()
    }
}
