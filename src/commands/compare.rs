use std::fmt;
use std::path::Path;
use std::thread;

use anyhow::{Context, Result, bail};
use chrono::Utc;
use tracing::{info, warn};

use crate::cli::CompareArgs;
use crate::compare::compare_records;
use crate::extract::{DocumentOverrides, Extractor, empty_record};
use crate::model::{
    Comparison, ComparisonReport, DocumentRecord, QaLevel, ReportHeader, SourceDocument,
};
use crate::pdf::extract_pages;
use crate::store::{DEFAULT_DB_FILENAME, insert_report, open_store};
use crate::util::{print_json_pretty, sha256_file, short_token, utc_string, write_json_pretty};

const REPORT_MANIFEST_VERSION: u32 = 1;

/// The report was produced, but `--fail-on` tripped on its findings.
#[derive(Debug)]
pub struct QaGateFailure {
    pub report_id: String,
    pub threshold: QaLevel,
    pub count: usize,
}

impl fmt::Display for QaGateFailure {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} QA finding(s) at or above '{}' in report {}",
            self.count,
            self.threshold.as_str(),
            self.report_id
        )
    }
}

impl std::error::Error for QaGateFailure {}

struct LoadedDocument {
    record: DocumentRecord,
    source: SourceDocument,
    warnings: Vec<String>,
}

pub fn run(args: CompareArgs) -> Result<()> {
    let generated_at = utc_string(Utc::now());

    info!(
        pre = %args.pre.display(),
        post = %args.post.display(),
        safe_mode = args.safe_mode,
        "starting comparison"
    );

    let extractor = Extractor::new()?;
    let pre_overrides = document_overrides(&args, args.pre_date.as_deref());
    let post_overrides = document_overrides(&args, args.post_date.as_deref());

    let (pre, post) = thread::scope(|scope| {
        let pre_handle = scope.spawn(|| {
            load_document("pre", &args.pre, &pre_overrides, &extractor, args.safe_mode)
        });
        let post = load_document("post", &args.post, &post_overrides, &extractor, args.safe_mode);
        let pre = pre_handle
            .join()
            .unwrap_or_else(|panic| std::panic::resume_unwind(panic));
        (pre, post)
    });
    let pre = pre?;
    let post = post?;

    let report_id = short_token(&[&pre.source.sha256, &post.source.sha256, &generated_at]);
    let mut warnings = pre.warnings;
    warnings.extend(post.warnings);
    if args.safe_mode {
        warnings.push("safe mode: text extraction skipped".to_string());
    }

    let comparison = compare_records(pre.record, post.record);
    let header = build_header(&args, &comparison);

    let report = ComparisonReport {
        manifest_version: REPORT_MANIFEST_VERSION,
        report_id: report_id.clone(),
        generated_at,
        safe_mode: args.safe_mode,
        header,
        sources: vec![pre.source, post.source],
        comparison,
        warnings,
    };

    log_summary(&report);

    let report_path = args.output.clone().unwrap_or_else(|| {
        args.cache_root
            .join("reports")
            .join(format!("report_{report_id}.json"))
    });
    write_json_pretty(&report_path, &report)?;
    info!(path = %report_path.display(), report_id = %report_id, "wrote comparison report");

    if args.no_store {
        info!("report store skipped");
    } else {
        let db_path = args
            .db_path
            .clone()
            .unwrap_or_else(|| args.cache_root.join(DEFAULT_DB_FILENAME));
        let connection = open_store(&db_path)?;
        insert_report(&connection, &report)?;
        info!(path = %db_path.display(), report_id = %report_id, "stored comparison report");
    }

    if args.json {
        print_json_pretty(&report)?;
    }

    if let Some(threshold) = args.fail_on.threshold() {
        let gated = report
            .comparison
            .findings
            .iter()
            .filter(|finding| finding.level >= threshold)
            .count();
        if gated > 0 {
            return Err(QaGateFailure {
                report_id,
                threshold,
                count: gated,
            }
            .into());
        }
    }

    Ok(())
}

fn document_overrides(args: &CompareArgs, process_date: Option<&str>) -> DocumentOverrides {
    DocumentOverrides {
        process_date: process_date.map(ToOwned::to_owned),
        address: args.address.clone(),
        uprn: args.uprn.clone(),
    }
}

fn load_document(
    role: &str,
    path: &Path,
    overrides: &DocumentOverrides,
    extractor: &Extractor,
    safe_mode: bool,
) -> Result<LoadedDocument> {
    if !path.is_file() {
        bail!("{role} survey not found: {}", path.display());
    }
    let sha256 = sha256_file(path)?;

    if safe_mode {
        return Ok(LoadedDocument {
            record: empty_record(overrides),
            source: SourceDocument {
                role: role.to_string(),
                path: path.display().to_string(),
                sha256,
                page_count: 0,
                empty_page_count: 0,
                failed_page_count: 0,
            },
            warnings: Vec::new(),
        });
    }

    let extraction =
        extract_pages(path).with_context(|| format!("failed to read {role} survey"))?;
    let mut warnings = extraction.warnings;
    for warning in &warnings {
        warn!(role, warning = %warning, "page extraction warning");
    }
    if extraction.empty_page_count == extraction.pages.len() {
        warn!(role, path = %path.display(), "no text extracted");
        warnings.push(format!(
            "no text extracted from {role} survey {}",
            path.display()
        ));
    }

    let record = extractor.extract_pages(&extraction.pages, overrides);

    Ok(LoadedDocument {
        record,
        source: SourceDocument {
            role: role.to_string(),
            path: path.display().to_string(),
            sha256,
            page_count: extraction.pages.len(),
            empty_page_count: extraction.empty_page_count,
            failed_page_count: extraction.failed_page_count,
        },
        warnings,
    })
}

fn build_header(args: &CompareArgs, comparison: &Comparison) -> ReportHeader {
    let pre = &comparison.pre.summary;
    let post = &comparison.post.summary;
    ReportHeader {
        address: pre.address.clone().or_else(|| post.address.clone()),
        uprn: pre.uprn.clone().or_else(|| post.uprn.clone()),
        pre_date: pre.process_date.clone(),
        post_date: post.process_date.clone(),
        notes: args
            .notes
            .as_deref()
            .map(str::trim)
            .filter(|notes| !notes.is_empty())
            .map(ToOwned::to_owned),
    }
}

fn log_summary(report: &ComparisonReport) {
    let comparison = &report.comparison;
    for finding in &comparison.findings {
        match finding.level {
            QaLevel::Error | QaLevel::Warning => warn!(
                level = finding.level.as_str(),
                field = %finding.field,
                message = %finding.message,
                "qa finding"
            ),
            QaLevel::Info => info!(
                level = finding.level.as_str(),
                field = %finding.field,
                message = %finding.message,
                "qa finding"
            ),
        }
    }

    info!(
        report_id = %report.report_id,
        address = %report.header.address.as_deref().unwrap_or_default(),
        sap_change = ?comparison.diff.sap_change,
        ei_change = ?comparison.diff.ei_change,
        fuel_bill_change = ?comparison.diff.fuel_bill_change,
        changed_recommendations = comparison
            .diff
            .recommendations
            .values()
            .filter(|change| change.changed)
            .count(),
        errors = comparison.finding_count(QaLevel::Error),
        warnings = comparison.finding_count(QaLevel::Warning),
        infos = comparison.finding_count(QaLevel::Info),
        "comparison completed"
    );
}
