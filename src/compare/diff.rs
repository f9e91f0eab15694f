use std::collections::{BTreeMap, BTreeSet};
use std::ops::Sub;

use crate::extract::normalize_status;
use crate::model::{DiffResult, DocumentRecord, MeasureChange, StatusChange};

/// `post - pre`, or `None` unless both sides are known.
pub fn delta<T: Sub<Output = T>>(pre: Option<T>, post: Option<T>) -> Option<T> {
    match (pre, post) {
        (Some(pre), Some(post)) => Some(post - pre),
        _ => None,
    }
}

pub fn diff_records(pre: &DocumentRecord, post: &DocumentRecord) -> DiffResult {
    DiffResult {
        sap_change: delta(
            pre.summary.sap_current.map(i64::from),
            post.summary.sap_current.map(i64::from),
        ),
        ei_change: delta(
            pre.summary.ei_current.map(i64::from),
            post.summary.ei_current.map(i64::from),
        ),
        fuel_bill_change: delta(pre.summary.fuel_bill, post.summary.fuel_bill),
        recommendations: diff_recommendations(pre, post),
        measures: diff_measures(pre, post),
    }
}

fn diff_recommendations(
    pre: &DocumentRecord,
    post: &DocumentRecord,
) -> BTreeMap<String, StatusChange> {
    let names = pre
        .recommendations
        .keys()
        .chain(post.recommendations.keys())
        .collect::<BTreeSet<&String>>();

    names
        .into_iter()
        .map(|name| {
            let pre_status = normalize_status(
                pre.recommendations
                    .get(name)
                    .map(|entry| entry.raw_text())
                    .unwrap_or_default(),
            );
            let post_status = normalize_status(
                post.recommendations
                    .get(name)
                    .map(|entry| entry.raw_text())
                    .unwrap_or_default(),
            );
            let change = StatusChange {
                changed: pre_status != post_status,
                pre: pre_status,
                post: post_status,
            };
            (name.clone(), change)
        })
        .collect()
}

fn diff_measures(pre: &DocumentRecord, post: &DocumentRecord) -> BTreeMap<String, MeasureChange> {
    let labels = pre
        .measures
        .keys()
        .chain(post.measures.keys())
        .collect::<BTreeSet<&String>>();

    labels
        .into_iter()
        .map(|label| {
            let pre_value = pre.measures.get(label).copied();
            let post_value = post.measures.get(label).copied();
            let change = MeasureChange {
                pre: pre_value,
                post: post_value,
                delta: delta(pre_value, post_value),
            };
            (label.clone(), change)
        })
        .collect()
}
