/// Joins pages with a line break and normalizes the result.
pub fn normalize_pages(pages: &[String]) -> String {
    normalize_text(&pages.join("\n"))
}

pub fn normalize_text(raw: &str) -> String {
    normalize_lines(raw).join("\n")
}

/// Collapses whitespace runs within each line, trims, and drops empty lines.
pub fn normalize_lines(raw: &str) -> Vec<String> {
    raw.lines()
        .map(|line| line.split_whitespace().collect::<Vec<&str>>().join(" "))
        .filter(|line| !line.is_empty())
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn normalize_lines_collapses_and_drops_blank_lines() {
        let raw = "  Current SAP   rating:\tD 65  \n\n   \r\nPotential SAP rating: B 82\n";
        assert_eq!(
            normalize_lines(raw),
            vec!["Current SAP rating: D 65", "Potential SAP rating: B 82"]
        );
    }

    #[test]
    fn normalize_text_is_idempotent() {
        let samples = [
            "a  b\n\n c ",
            "\u{000C}Page one\u{000C}\n  Page   two ",
            "",
            "   \n\t\n",
            "Fuel Bill:   £1,234.50\r\nUPRN:  100023",
        ];

        for sample in samples {
            let once = normalize_text(sample);
            assert_eq!(normalize_text(&once), once);
            assert!(!once.contains("  "));
            assert!(once.lines().all(|line| !line.is_empty()));
        }
    }

    #[test]
    fn normalize_pages_tolerates_empty_pages() {
        let pages = vec![
            "Survey Reference: SR-1".to_string(),
            String::new(),
            "  UPRN: 12345 ".to_string(),
        ];
        assert_eq!(normalize_pages(&pages), "Survey Reference: SR-1\nUPRN: 12345");
    }
}
