use crate::model::Status;

const CANONICAL_PHRASES: [(&str, Status); 4] = [
    ("already installed", Status::AlreadyInstalled),
    ("not applicable", Status::NotApplicable),
    ("sap increase too small", Status::SapIncreaseTooSmall),
    ("recommended", Status::Recommended),
];

// Order matters: "uninsulated" must be tested before "insulated".
const DESCRIPTOR_TERMS: [(&[&str], Status); 4] = [
    (
        &[
            "uninsulated",
            "below",
            "no insulation",
            "less than",
            "<",
            "not insulated",
        ],
        Status::Recommended,
    ),
    (
        &["already", "insulated", "installed", "present", "existing"],
        Status::AlreadyInstalled,
    ),
    (&["too small"], Status::SapIncreaseTooSmall),
    (
        &[
            "n/a",
            "not applicable",
            "no flat roof",
            "no cavity",
            "solid wall",
            "not relevant",
        ],
        Status::NotApplicable,
    ),
];

const SYNONYM_TERMS: [(&[&str], Status); 4] = [
    (
        &[
            "n/a",
            "not app",
            "no ",
            "none ",
            "no flat roof",
            "no loft",
            "not relevant",
        ],
        Status::NotApplicable,
    ),
    (
        &["existing", "present", "installed", "insulated", "fitted"],
        Status::AlreadyInstalled,
    ),
    (&["too small"], Status::SapIncreaseTooSmall),
    (
        &["uninsulated", "below", "single glazed", "poor", "recommend"],
        Status::Recommended,
    ),
];

/// Maps descriptor or status text onto a canonical status, if any rule applies.
pub fn classify_status(raw: &str) -> Option<Status> {
    let text = fold(raw);
    if text.is_empty() {
        return None;
    }

    if let Some((_, status)) = CANONICAL_PHRASES
        .iter()
        .find(|(phrase, _)| text.contains(phrase))
    {
        return Some(*status);
    }

    [&DESCRIPTOR_TERMS, &SYNONYM_TERMS]
        .into_iter()
        .flat_map(|rules| rules.iter())
        .find(|(terms, _)| terms.iter().any(|term| text.contains(term)))
        .map(|(_, status)| *status)
}

/// Canonical status label, or the raw text title-cased when nothing matches.
pub fn normalize_status(raw: &str) -> String {
    match classify_status(raw) {
        Some(status) => status.as_str().to_string(),
        None => title_case(raw.trim()),
    }
}

/// Upper-cases the first letter of every alphabetic run, lower-cases the rest.
pub fn title_case(input: &str) -> String {
    let mut output = String::with_capacity(input.len());
    let mut previous_alphabetic = false;
    for character in input.chars() {
        if character.is_alphabetic() {
            if previous_alphabetic {
                output.extend(character.to_lowercase());
            } else {
                output.extend(character.to_uppercase());
            }
            previous_alphabetic = true;
        } else {
            output.push(character);
            previous_alphabetic = false;
        }
    }
    output
}

fn fold(raw: &str) -> String {
    raw.split_whitespace()
        .collect::<Vec<&str>>()
        .join(" ")
        .to_lowercase()
}
