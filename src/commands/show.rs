use anyhow::{Result, bail};
use tracing::info;

use crate::cli::ShowArgs;
use crate::store::{DEFAULT_DB_FILENAME, load_latest_report, load_report, open_store};
use crate::util::print_json_pretty;

pub fn run(args: ShowArgs) -> Result<()> {
    let db_path = args
        .db_path
        .clone()
        .unwrap_or_else(|| args.cache_root.join(DEFAULT_DB_FILENAME));

    if !db_path.exists() {
        bail!("no report available yet: {} does not exist", db_path.display());
    }

    let connection = open_store(&db_path)?;
    let report = match args.report_id.as_deref() {
        Some(report_id) => load_report(&connection, report_id)?,
        None => load_latest_report(&connection)?,
    };

    let Some(report) = report else {
        match args.report_id {
            Some(report_id) => bail!("report {report_id} not found in {}", db_path.display()),
            None => bail!("no report available yet in {}", db_path.display()),
        }
    };

    info!(
        report_id = %report.report_id,
        generated_at = %report.generated_at,
        findings = report.comparison.findings.len(),
        "loaded stored report"
    );
    print_json_pretty(&report)
}
