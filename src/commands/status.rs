use std::fs;

use anyhow::{Context, Result};
use tracing::{info, warn};

use crate::cli::StatusArgs;
use crate::store::{DEFAULT_DB_FILENAME, latest_report_summary, open_store, report_count};
use crate::util::utc_string;

pub fn run(args: StatusArgs) -> Result<()> {
    let reports_dir = args.cache_root.join("reports");
    let db_path = args
        .db_path
        .clone()
        .unwrap_or_else(|| args.cache_root.join(DEFAULT_DB_FILENAME));

    info!(cache_root = %args.cache_root.display(), "status requested");

    if reports_dir.is_dir() {
        let entries = fs::read_dir(&reports_dir)
            .with_context(|| format!("failed to read {}", reports_dir.display()))?;
        let mut json_count = 0_usize;
        for entry in entries {
            let entry =
                entry.with_context(|| format!("failed to read {}", reports_dir.display()))?;
            if entry.path().extension().is_some_and(|ext| ext == "json") {
                json_count += 1;
            }
        }
        info!(
            path = %reports_dir.display(),
            reports = json_count,
            "report directory status"
        );
    } else {
        warn!(path = %reports_dir.display(), "report directory missing");
    }

    if db_path.exists() {
        let connection = open_store(&db_path)?;
        let count = report_count(&connection)?;
        info!(path = %db_path.display(), reports = count, "report store status");

        match latest_report_summary(&connection)? {
            Some(latest) => info!(
                report_id = %latest.report_id,
                generated_at = %utc_string(latest.generated_at),
                address = %latest.address.unwrap_or_default(),
                errors = latest.error_count,
                warnings = latest.warning_count,
                infos = latest.info_count,
                "latest stored report"
            ),
            None => warn!(path = %db_path.display(), "report store is empty"),
        }
    } else {
        warn!(path = %db_path.display(), "report store missing");
    }

    Ok(())
}
