//! Plausibility checks between PRE and POST site notes.
//!
//! Every rule runs, in a fixed order, and may append any number of findings.

use crate::model::{QaFinding, QaLevel, SiteNotes};

const AP4_WORSENED_THRESHOLD: f64 = 0.5;
const AP4_IMPROVED_THRESHOLD: f64 = -2.0;
const DOOR_REDUCTION_TOLERANCE: u32 = 2;

fn tracked_flags(notes: &SiteNotes) -> [(&'static str, Option<bool>); 6] {
    [
        ("Smart gas meter", notes.smart_gas_meter),
        ("Smart electric meter", notes.smart_elec_meter),
        ("Mechanical ventilation", notes.mechanical_ventilation),
        ("Double glazing", notes.double_glazed),
        ("Solar PV", notes.pv_present),
        ("Flat roof insulation", notes.flat_roof_insulated),
    ]
}

pub fn compare(pre: &SiteNotes, post: &SiteNotes) -> Vec<QaFinding> {
    let mut findings = Vec::new();
    check_flag_changes(pre, post, &mut findings);
    check_air_permeability(pre, post, &mut findings);
    check_lighting(pre, post, &mut findings);
    check_doors(pre, post, &mut findings);
    check_loft_insulation(pre, post, &mut findings);
    check_heating_controls(post, &mut findings);
    check_solar_pv(pre, post, &mut findings);
    findings
}

fn push(findings: &mut Vec<QaFinding>, level: QaLevel, field: &str, message: String) {
    findings.push(QaFinding {
        level,
        field: field.to_string(),
        message,
    });
}

fn check_flag_changes(pre: &SiteNotes, post: &SiteNotes, findings: &mut Vec<QaFinding>) {
    for ((field, pre_flag), (_, post_flag)) in
        tracked_flags(pre).into_iter().zip(tracked_flags(post))
    {
        match (pre_flag, post_flag) {
            (Some(true), Some(false)) => push(
                findings,
                QaLevel::Error,
                field,
                format!("{field} ticked PRE but not POST - likely missed"),
            ),
            (Some(false), Some(true)) => push(
                findings,
                QaLevel::Info,
                field,
                format!("{field} added on POST - verify installed"),
            ),
            _ => {}
        }
    }
}

fn check_air_permeability(pre: &SiteNotes, post: &SiteNotes, findings: &mut Vec<QaFinding>) {
    let (Some(pre_ap4), Some(post_ap4)) = (pre.air_permeability_ap4, post.air_permeability_ap4)
    else {
        return;
    };

    let change = post_ap4 - pre_ap4;
    if change > AP4_WORSENED_THRESHOLD {
        push(
            findings,
            QaLevel::Warning,
            "Air permeability (AP4)",
            format!(
                "AP4 worsened by {change:.2} ({pre_ap4:.2} -> {post_ap4:.2}) - re-check test"
            ),
        );
    } else if change < AP4_IMPROVED_THRESHOLD {
        push(
            findings,
            QaLevel::Info,
            "Air permeability (AP4)",
            format!(
                "AP4 improved by {:.2} ({pre_ap4:.2} -> {post_ap4:.2}) - ensure test evidence attached",
                -change
            ),
        );
    }
}

fn check_lighting(pre: &SiteNotes, post: &SiteNotes, findings: &mut Vec<QaFinding>) {
    if let (Some(pre_total), Some(post_total)) = (pre.lights_total, post.lights_total) {
        if pre_total != post_total {
            push(
                findings,
                QaLevel::Warning,
                "Lighting",
                format!(
                    "Total light count changed ({pre_total} -> {post_total}) - confirm room count"
                ),
            );
        }
    }

    let pre_low_energy = pre.low_energy_lights.filter(|count| *count != 0);
    let post_low_energy = post.low_energy_lights.filter(|count| *count != 0);
    if let (Some(pre_count), Some(post_count)) = (pre_low_energy, post_low_energy) {
        if post_count < pre_count {
            push(
                findings,
                QaLevel::Warning,
                "Low energy lighting",
                format!("Low energy lights decreased ({pre_count} -> {post_count})"),
            );
        }
    }
}

fn check_doors(pre: &SiteNotes, post: &SiteNotes, findings: &mut Vec<QaFinding>) {
    if let (Some(pre_doors), Some(post_doors)) = (pre.doors_uninsulated, post.doors_uninsulated) {
        let reduced = pre_doors
            .checked_sub(DOOR_REDUCTION_TOLERANCE)
            .is_some_and(|limit| post_doors < limit);
        if reduced {
            push(
                findings,
                QaLevel::Info,
                "Doors",
                format!(
                    "Uninsulated doors reduced ({pre_doors} -> {post_doors}) - were doors replaced?"
                ),
            );
        }
    }
}

fn check_loft_insulation(pre: &SiteNotes, post: &SiteNotes, findings: &mut Vec<QaFinding>) {
    if let (Some(pre_mm), Some(post_mm)) = (pre.loft_insulation_mm, post.loft_insulation_mm) {
        if post_mm < pre_mm {
            push(
                findings,
                QaLevel::Warning,
                "Loft insulation",
                format!("Loft insulation thickness decreased ({pre_mm}mm -> {post_mm}mm)"),
            );
        }
    }
}

fn check_heating_controls(post: &SiteNotes, findings: &mut Vec<QaFinding>) {
    if post.heating_controls_smart == Some(true) && post.main_heat_eff_pct.is_none() {
        push(
            findings,
            QaLevel::Warning,
            "Heating controls",
            "Smart/zoned controls recorded on POST but main heating efficiency is missing"
                .to_string(),
        );
    }
}

fn check_solar_pv(pre: &SiteNotes, post: &SiteNotes, findings: &mut Vec<QaFinding>) {
    if post.pv_present == Some(true) && post.low_energy_lights.is_none() {
        push(
            findings,
            QaLevel::Info,
            "Solar PV",
            "Solar PV on POST but low energy lighting count not recorded".to_string(),
        );
    }
    if pre.pv_present == Some(true) && post.pv_present != Some(true) {
        push(
            findings,
            QaLevel::Error,
            "Solar PV",
            "Solar PV recorded PRE but missing on POST".to_string(),
        );
    }
}
