use anyhow::Result;
use regex::Regex;

use super::{capture_parse, compile};
use crate::model::MeasureMap;

/// Canonical label and the spellings surveys use for it.
const AREA_LABELS: [(&str, &[&str]); 5] = [
    (
        "Room(s) in Roof",
        &["Room(s) in Roof", "Rooms in Roof", "Room in Roof"],
    ),
    ("1st Floor", &["1st Floor", "First Floor"]),
    ("Ground Floor", &["Ground Floor"]),
    ("2nd Floor", &["2nd Floor", "Second Floor"]),
    ("Total Floor Area", &["Total Floor Area"]),
];

pub struct MeasureScanner {
    labels: Vec<(&'static str, Regex)>,
}

impl MeasureScanner {
    pub fn new() -> Result<Self> {
        let labels = AREA_LABELS
            .iter()
            .map(|(label, spellings)| {
                let alternatives = spellings
                    .iter()
                    .map(|spelling| regex::escape(spelling))
                    .collect::<Vec<String>>()
                    .join("|");
                let pattern = format!(r"(?i)(?:{alternatives})\s*:\s*([0-9]+(?:\.[0-9]+)?)");
                Ok((*label, compile(&pattern, &format!("area label '{label}'"))?))
            })
            .collect::<Result<Vec<(&'static str, Regex)>>>()?;
        Ok(Self { labels })
    }

    /// Only labels present in the text appear in the result.
    pub fn scan(&self, text: &str) -> MeasureMap {
        self.labels
            .iter()
            .filter_map(|(label, pattern)| {
                let captures = pattern.captures(text)?;
                let value = capture_parse::<f64>(&captures, 1)?;
                Some((label.to_string(), value))
            })
            .collect()
    }
}
