use super::*;
use crate::model::{HotWaterType, Status};

const PRE_SURVEY: &str = "
Energy Performance Report
Survey Reference: SR-2024 0117   Reference Number: EPR/88-1203
Process date: 14/03/2024
Address: 12 Station Road
Little Hadham
UPRN: 100023456789
Postcode: SG11 2AB
Current SAP rating: D 58 Current EI rating: E 51
Potential SAP rating: B 84 Potential EI rating: B 82
Estimated Fuel Costs: £1,234.50 per year
Key Areas
Ground Floor: 45.20
1st Floor : 41.5
Room(s) in Roof: 12
Total Floor Area: 98.70
Recommendations
Loft insulation (Uninsulated)
Cavity wall insulation (Already installed)
Flat roof insulation (No flat roof)
Floor insulation (solid floor) - Sap increase too small
Draught proofing recommended
Low energy lighting (Mixed Fittings)
Site notes
Smart gas meter: yes
Smart electric meter: no
Loft insulation: 100mm
Cavity wall insulation: yes
Solid wall insulation: 50 mm
Flat roof insulated: no
MVHR unit in kitchen
Air pressure test result 7.45 m3/h.m2
Double glazing throughout
Doors: 3 (uninsulated)
Lighting 4 low-energy of 10
Main heating system: gas boiler, efficiency 89.5%
Heating controls: programmer, room thermostat and TRVs
Water heating from main system, cylinder in airing cupboard
Solar PV array on south roof
";

fn extractor() -> Extractor {
    Extractor::new().expect("patterns should compile")
}

#[test]
fn summary_reads_labelled_fields() {
    let record = extractor().extract_normalized(normalize_text(PRE_SURVEY), &Default::default());
    let summary = record.summary;

    assert_eq!(summary.survey_reference.as_deref(), Some("SR-2024 0117"));
    assert_eq!(summary.reference_number.as_deref(), Some("EPR/88-1203"));
    assert_eq!(summary.process_date.as_deref(), Some("14/03/2024"));
    assert_eq!(summary.uprn.as_deref(), Some("100023456789"));
    assert_eq!(summary.postcode.as_deref(), Some("SG11 2AB"));
    assert_eq!(summary.address.as_deref(), Some("12 Station Road Little Hadham"));
    assert_eq!(summary.fuel_bill, Some(1234.50));
}

#[test]
fn sap_and_ei_blocks_span_intervening_text() {
    let record = extractor().extract_normalized(normalize_text(PRE_SURVEY), &Default::default());
    let summary = record.summary;

    assert_eq!(summary.sap_current, Some(58));
    assert_eq!(summary.sap_current_band, Some('D'));
    assert_eq!(summary.sap_potential, Some(84));
    assert_eq!(summary.sap_potential_band, Some('B'));
    assert_eq!(summary.ei_current, Some(51));
    assert_eq!(summary.ei_current_band, Some('E'));
    assert_eq!(summary.ei_potential, Some(82));
    assert_eq!(summary.ei_potential_band, Some('B'));
}

#[test]
fn sap_rating_pair_from_separate_lines() {
    let text = normalize_text("Current SAP rating: D 65\nsome other line\nPotential SAP rating: B 82");
    let summary = extractor().extract_normalized(text, &Default::default()).summary;

    assert_eq!(summary.sap_current, Some(65));
    assert_eq!(summary.sap_current_band, Some('D'));
    assert_eq!(summary.sap_potential, Some(82));
    assert_eq!(summary.sap_potential_band, Some('B'));
}

#[test]
fn sap_block_without_potential_is_absent() {
    let text = normalize_text("Current SAP rating: D 65\nNo potential given");
    let summary = extractor().extract_normalized(text, &Default::default()).summary;

    assert_eq!(summary.sap_current, None);
    assert_eq!(summary.sap_current_band, None);
    assert_eq!(summary.sap_potential, None);
}

#[test]
fn oversized_rating_score_drops_the_whole_block() {
    let text = normalize_text(
        "Current SAP rating: D 99999999999\nPotential SAP rating: B 84\n\
         Current EI rating: E 51\nPotential EI rating: B 82",
    );
    let summary = extractor().extract_normalized(text, &Default::default()).summary;

    assert_eq!(summary.sap_current, None);
    assert_eq!(summary.sap_current_band, None);
    assert_eq!(summary.sap_potential, None);
    assert_eq!(summary.sap_potential_band, None);
    assert_eq!(summary.ei_current, Some(51));
    assert_eq!(summary.ei_potential_band, Some('B'));
}

#[test]
fn fuel_bill_strips_thousands_separators() {
    let summary = extractor()
        .extract_normalized("Fuel Bill: £1,234.50".to_string(), &Default::default())
        .summary;
    assert_eq!(summary.fuel_bill, Some(1234.50));

    let summary = extractor()
        .extract_normalized("Fuel Bill: 980".to_string(), &Default::default())
        .summary;
    assert_eq!(summary.fuel_bill, Some(980.0));
}

#[test]
fn postcode_is_upper_cased_with_single_space() {
    let summary = extractor()
        .extract_normalized("Property at sw1a1aa today".to_string(), &Default::default())
        .summary;
    assert_eq!(summary.postcode.as_deref(), Some("SW1A 1AA"));
}

#[test]
fn missing_fields_stay_empty() {
    let record = extractor().extract_normalized(String::new(), &Default::default());
    assert_eq!(record.summary, Default::default());
    assert!(record.measures.is_empty());
    assert_eq!(record.site_notes.loft_insulation_mm, None);
    assert_eq!(record.site_notes.pv_present, Some(false));
}

#[test]
fn overrides_replace_date_and_fill_missing_address() {
    let overrides = DocumentOverrides {
        process_date: Some("01/02/2025".to_string()),
        address: Some("1 Override Street".to_string()),
        uprn: Some("999".to_string()),
    };
    let record = extractor().extract_normalized(normalize_text(PRE_SURVEY), &overrides);

    assert_eq!(record.summary.process_date.as_deref(), Some("01/02/2025"));
    assert_eq!(
        record.summary.address.as_deref(),
        Some("12 Station Road Little Hadham")
    );
    assert_eq!(record.summary.uprn.as_deref(), Some("100023456789"));

    let record = extractor().extract_normalized("nothing here".to_string(), &overrides);
    assert_eq!(record.summary.address.as_deref(), Some("1 Override Street"));
    assert_eq!(record.summary.uprn.as_deref(), Some("999"));
}

#[test]
fn blank_override_does_not_clear_extracted_date() {
    let overrides = DocumentOverrides {
        process_date: Some("  ".to_string()),
        ..Default::default()
    };
    let record = extractor().extract_normalized(normalize_text(PRE_SURVEY), &overrides);
    assert_eq!(record.summary.process_date.as_deref(), Some("14/03/2024"));
}

#[test]
fn measures_require_colon_and_keep_only_matches() {
    let record = extractor().extract_normalized(normalize_text(PRE_SURVEY), &Default::default());
    let measures = record.measures;

    assert_eq!(measures.get("Ground Floor"), Some(&45.20));
    assert_eq!(measures.get("1st Floor"), Some(&41.5));
    assert_eq!(measures.get("Room(s) in Roof"), Some(&12.0));
    assert_eq!(measures.get("Total Floor Area"), Some(&98.70));
    assert!(!measures.contains_key("2nd Floor"));
    assert_eq!(measures.len(), 4);

    let lenient = extractor()
        .extract_normalized("Ground Floor .... 45.2".to_string(), &Default::default())
        .measures;
    assert!(lenient.is_empty());
}

#[test]
fn measure_synonyms_map_to_canonical_label() {
    let measures = extractor()
        .extract_normalized(
            "First Floor: 30.25\nSecond Floor: 18".to_string(),
            &Default::default(),
        )
        .measures;
    assert_eq!(measures.get("1st Floor"), Some(&30.25));
    assert_eq!(measures.get("2nd Floor"), Some(&18.0));
}

#[test]
fn recommendations_always_hold_every_measure() {
    for text in ["", "Loft insulation (Uninsulated)", PRE_SURVEY] {
        let record = extractor().extract_normalized(normalize_text(text), &Default::default());
        assert_eq!(record.recommendations.len(), RECOMMENDATION_NAMES.len());
        for name in RECOMMENDATION_NAMES {
            assert!(record.recommendations.contains_key(name));
        }
    }
}

#[test]
fn recommendation_descriptors_map_to_statuses() {
    let record = extractor().extract_normalized(normalize_text(PRE_SURVEY), &Default::default());
    let recs = record.recommendations;

    let loft = &recs["Loft insulation"];
    assert_eq!(loft.status, Some(Status::Recommended));
    assert_eq!(loft.descriptor.as_deref(), Some("Uninsulated"));

    let cavity = &recs["Cavity wall insulation"];
    assert_eq!(cavity.status, Some(Status::AlreadyInstalled));
    assert_eq!(cavity.descriptor.as_deref(), Some("Already Installed"));

    assert_eq!(
        recs["Flat roof insulation"].status,
        Some(Status::NotApplicable)
    );
    assert_eq!(
        recs["Floor insulation (solid floor)"].status,
        Some(Status::SapIncreaseTooSmall)
    );
    assert_eq!(recs["Draught proofing"].status, Some(Status::Recommended));
    assert_eq!(recs["Draught proofing"].descriptor, None);

    let lighting = &recs["Low energy lighting"];
    assert_eq!(lighting.status, None);
    assert_eq!(lighting.descriptor.as_deref(), Some("Mixed Fittings"));

    assert_eq!(recs["Room-in-roof insulation"], Default::default());
}

#[test]
fn single_descriptor_scenarios() {
    let recs = extractor()
        .extract_normalized("Loft insulation (Uninsulated)".to_string(), &Default::default())
        .recommendations;
    assert_eq!(recs["Loft insulation"].status, Some(Status::Recommended));

    let recs = extractor()
        .extract_normalized(
            "Loft insulation (Already installed)".to_string(),
            &Default::default(),
        )
        .recommendations;
    assert_eq!(recs["Loft insulation"].status, Some(Status::AlreadyInstalled));
}

#[test]
fn keyword_fallback_stops_at_digits() {
    let recs = extractor()
        .extract_normalized(
            "Draught proofing 25 doors recommended".to_string(),
            &Default::default(),
        )
        .recommendations;
    assert_eq!(recs["Draught proofing"].status, None);
}

#[test]
fn classify_status_precedence() {
    assert_eq!(classify_status("Already installed"), Some(Status::AlreadyInstalled));
    assert_eq!(classify_status("  NOT   applicable "), Some(Status::NotApplicable));
    assert_eq!(classify_status("Uninsulated"), Some(Status::Recommended));
    assert_eq!(classify_status("less than 100mm"), Some(Status::Recommended));
    assert_eq!(classify_status("< 100mm"), Some(Status::Recommended));
    assert_eq!(classify_status("Insulated"), Some(Status::AlreadyInstalled));
    assert_eq!(classify_status("too small"), Some(Status::SapIncreaseTooSmall));
    assert_eq!(classify_status("No cavity"), Some(Status::NotApplicable));
    assert_eq!(classify_status("N/A"), Some(Status::NotApplicable));
    assert_eq!(classify_status("fitted"), Some(Status::AlreadyInstalled));
    assert_eq!(classify_status("poor"), Some(Status::Recommended));
    assert_eq!(classify_status("Mixed fittings"), None);
    assert_eq!(classify_status(""), None);
}

#[test]
fn normalize_status_is_idempotent_on_canonical_values() {
    for status in Status::ALL {
        assert_eq!(normalize_status(status.as_str()), status.as_str());
        let once = normalize_status(&status.as_str().to_lowercase());
        assert_eq!(normalize_status(&once), once);
    }
}

#[test]
fn normalize_status_falls_back_to_title_case() {
    assert_eq!(normalize_status("  mixed  fittings "), "Mixed  Fittings");
    assert_eq!(normalize_status(""), "");
    assert_eq!(title_case("n/a LED"), "N/A Led");
}

#[test]
fn parse_flag_vocabulary() {
    assert_eq!(parse_flag("Yes"), Some(true));
    assert_eq!(parse_flag("y"), Some(true));
    assert_eq!(parse_flag("Not present"), Some(false));
    assert_eq!(parse_flag("none"), Some(false));
    assert_eq!(parse_flag("(already installed)"), Some(true));
    assert_eq!(parse_flag("(No flat roof)"), Some(false));
    assert_eq!(parse_flag("awaiting survey"), None);
    assert_eq!(parse_flag(""), None);
}

#[test]
fn parse_flag_prefers_yes_vocabulary_when_mixed() {
    assert_eq!(parse_flag("no, fitted 2019"), Some(true));
    assert_eq!(parse_flag("yes, none"), Some(true));
    assert_eq!(parse_flag("none visible, installed 2019"), Some(true));
    assert_eq!(parse_flag("not present at survey"), Some(false));
    assert_eq!(parse_flag("not present, fitted since"), Some(true));
    assert_eq!(parse_flag("only one gap noted"), None);
}

#[test]
fn cavity_wall_note_with_mixed_vocabulary_reads_as_installed() {
    let notes = extractor()
        .extract_normalized(
            "Cavity wall insulation: none visible, installed 2019".to_string(),
            &Default::default(),
        )
        .site_notes;
    assert_eq!(notes.cavity_wall_insulation, Some(true));
}

#[test]
fn site_notes_from_survey_text() {
    let record = extractor().extract_normalized(normalize_text(PRE_SURVEY), &Default::default());
    let notes = record.site_notes;

    assert_eq!(notes.smart_gas_meter, Some(true));
    assert_eq!(notes.smart_elec_meter, Some(false));
    assert_eq!(notes.loft_insulation_mm, Some(100));
    assert_eq!(notes.loft_insulated, Some(true));
    assert_eq!(notes.internal_wall_insulation_mm, Some(50));
    assert_eq!(notes.flat_roof_insulated, Some(false));
    assert_eq!(notes.mechanical_ventilation, Some(true));
    assert_eq!(notes.air_permeability_ap4, Some(7.45));
    assert_eq!(notes.double_glazed, Some(true));
    assert_eq!(notes.doors_uninsulated, Some(3));
    assert_eq!(notes.low_energy_lights, Some(4));
    assert_eq!(notes.lights_total, Some(10));
    assert_eq!(notes.main_heat_eff_pct, Some(89.5));
    assert_eq!(notes.heating_controls_smart, Some(true));
    assert_eq!(notes.hot_water_type, Some(HotWaterType::Cylinder));
    assert_eq!(notes.pv_present, Some(true));
}

#[test]
fn cavity_wall_recommendation_line_is_read_as_flag() {
    let notes = extractor()
        .extract_normalized(
            "Cavity wall insulation (Already installed)".to_string(),
            &Default::default(),
        )
        .site_notes;
    assert_eq!(notes.cavity_wall_insulation, Some(true));
}

#[test]
fn smart_meter_phrase_without_token_reads_as_present() {
    let notes = extractor()
        .extract_normalized("Smart gas meter".to_string(), &Default::default())
        .site_notes;
    assert_eq!(notes.smart_gas_meter, Some(true));
    assert_eq!(notes.smart_elec_meter, None);

    let notes = extractor()
        .extract_normalized("Smart electricity meter - not present".to_string(), &Default::default())
        .site_notes;
    assert_eq!(notes.smart_elec_meter, Some(false));
}

#[test]
fn zero_loft_insulation_is_not_insulated() {
    let notes = extractor()
        .extract_normalized("Loft insulation: 0mm".to_string(), &Default::default())
        .site_notes;
    assert_eq!(notes.loft_insulation_mm, Some(0));
    assert_eq!(notes.loft_insulated, Some(false));
}

#[test]
fn heating_controls_without_smart_terms() {
    let notes = extractor()
        .extract_normalized(
            "Heating controls: programmer and room thermostat".to_string(),
            &Default::default(),
        )
        .site_notes;
    assert_eq!(notes.heating_controls_smart, Some(false));

    let notes = extractor()
        .extract_normalized("no controls mentioned".to_string(), &Default::default())
        .site_notes;
    assert_eq!(notes.heating_controls_smart, None);
}

#[test]
fn hot_water_variants() {
    let cases = [
        ("Water heating: combi boiler", Some(HotWaterType::Combi)),
        ("Water heating from boiler, no cylinder", Some(HotWaterType::NoCylinder)),
        ("Water heating: electric immersion", None),
    ];
    for (text, expected) in cases {
        let notes = extractor()
            .extract_normalized(text.to_string(), &Default::default())
            .site_notes;
        assert_eq!(notes.hot_water_type, expected, "{text}");
    }
}

#[test]
fn lighting_counts_are_captured_together() {
    let notes = extractor()
        .extract_normalized("12 low energy lights of 15".to_string(), &Default::default())
        .site_notes;
    assert_eq!(notes.low_energy_lights, Some(12));
    assert_eq!(notes.lights_total, Some(15));

    let notes = extractor()
        .extract_normalized("12 low energy lights".to_string(), &Default::default())
        .site_notes;
    assert_eq!(notes.low_energy_lights, None);
    assert_eq!(notes.lights_total, None);
}

#[test]
fn efficiency_needs_one_decimal_place() {
    let notes = extractor()
        .extract_normalized(
            "Main heating system condensing boiler efficiency 90%".to_string(),
            &Default::default(),
        )
        .site_notes;
    assert_eq!(notes.main_heat_eff_pct, None);
}

#[test]
fn empty_record_has_every_recommendation_key() {
    let record = empty_record(&DocumentOverrides {
        process_date: Some("05/05/2025".to_string()),
        ..Default::default()
    });
    assert_eq!(record.recommendations.len(), 8);
    assert_eq!(record.summary.process_date.as_deref(), Some("05/05/2025"));
    assert!(record.normalized_text.is_empty());
}
