use std::path::Path;

use anyhow::{Context, Result};
use chrono::{DateTime, Utc};
use rusqlite::{Connection, OptionalExtension, params};

use crate::model::{ComparisonReport, QaLevel};
use crate::util::ensure_directory;

pub const DB_SCHEMA_VERSION: &str = "0.1.0";
pub const DEFAULT_DB_FILENAME: &str = "retrofit_reports.sqlite";

#[derive(Debug, Clone, PartialEq)]
pub struct StoredReportSummary {
    pub report_id: String,
    pub generated_at: DateTime<Utc>,
    pub address: Option<String>,
    pub error_count: i64,
    pub warning_count: i64,
    pub info_count: i64,
}

pub fn open_store(db_path: &Path) -> Result<Connection> {
    if let Some(parent) = db_path.parent() {
        ensure_directory(parent)?;
    }
    let connection = Connection::open(db_path)
        .with_context(|| format!("failed to open {}", db_path.display()))?;
    configure_connection(&connection)?;
    ensure_schema(&connection)?;
    Ok(connection)
}

fn configure_connection(connection: &Connection) -> Result<()> {
    connection
        .pragma_update(None, "journal_mode", "WAL")
        .context("failed to set journal_mode=WAL")?;
    connection
        .pragma_update(None, "synchronous", "NORMAL")
        .context("failed to set synchronous=NORMAL")?;
    Ok(())
}

pub fn ensure_schema(connection: &Connection) -> Result<()> {
    connection
        .execute_batch(
            "
            CREATE TABLE IF NOT EXISTS metadata (
              key TEXT PRIMARY KEY,
              value TEXT NOT NULL
            );

            CREATE TABLE IF NOT EXISTS reports (
              report_id TEXT PRIMARY KEY,
              generated_at TEXT NOT NULL,
              address TEXT,
              uprn TEXT,
              pre_sha256 TEXT,
              post_sha256 TEXT,
              error_count INTEGER NOT NULL DEFAULT 0,
              warning_count INTEGER NOT NULL DEFAULT 0,
              info_count INTEGER NOT NULL DEFAULT 0,
              payload_json TEXT NOT NULL
            );

            CREATE INDEX IF NOT EXISTS idx_reports_generated_at ON reports(generated_at);
            ",
        )
        .context("failed to create report store schema")?;

    connection
        .execute(
            "INSERT INTO metadata(key, value) VALUES('db_schema_version', ?1)
             ON CONFLICT(key) DO UPDATE SET value = excluded.value",
            params![DB_SCHEMA_VERSION],
        )
        .context("failed to record schema version")?;
    Ok(())
}

pub fn insert_report(connection: &Connection, report: &ComparisonReport) -> Result<()> {
    let payload = serde_json::to_string(report)
        .with_context(|| format!("failed to serialize report {}", report.report_id))?;
    let source_hash = |role: &str| {
        report
            .sources
            .iter()
            .find(|source| source.role == role)
            .map(|source| source.sha256.clone())
    };
    let generated_at = DateTime::parse_from_rfc3339(&report.generated_at)
        .with_context(|| {
            format!(
                "report {} has an invalid generated_at timestamp: {}",
                report.report_id, report.generated_at
            )
        })?
        .with_timezone(&Utc);
    let comparison = &report.comparison;

    connection
        .execute(
            "
            INSERT INTO reports(
              report_id, generated_at, address, uprn, pre_sha256, post_sha256,
              error_count, warning_count, info_count, payload_json
            ) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10)
            ON CONFLICT(report_id) DO UPDATE SET
              generated_at = excluded.generated_at,
              address = excluded.address,
              uprn = excluded.uprn,
              pre_sha256 = excluded.pre_sha256,
              post_sha256 = excluded.post_sha256,
              error_count = excluded.error_count,
              warning_count = excluded.warning_count,
              info_count = excluded.info_count,
              payload_json = excluded.payload_json
            ",
            params![
                report.report_id,
                generated_at,
                report.header.address,
                report.header.uprn,
                source_hash("pre"),
                source_hash("post"),
                comparison.finding_count(QaLevel::Error) as i64,
                comparison.finding_count(QaLevel::Warning) as i64,
                comparison.finding_count(QaLevel::Info) as i64,
                payload,
            ],
        )
        .with_context(|| format!("failed to store report {}", report.report_id))?;
    Ok(())
}

pub fn load_report(connection: &Connection, report_id: &str) -> Result<Option<ComparisonReport>> {
    let payload = connection
        .query_row(
            "SELECT payload_json FROM reports WHERE report_id = ?1",
            params![report_id],
            |row| row.get::<_, String>(0),
        )
        .optional()
        .with_context(|| format!("failed to load report {report_id}"))?;

    payload.map(|raw| parse_payload(&raw)).transpose()
}

pub fn load_latest_report(connection: &Connection) -> Result<Option<ComparisonReport>> {
    let payload = connection
        .query_row(
            "SELECT payload_json FROM reports ORDER BY generated_at DESC, rowid DESC LIMIT 1",
            [],
            |row| row.get::<_, String>(0),
        )
        .optional()
        .context("failed to load latest report")?;

    payload.map(|raw| parse_payload(&raw)).transpose()
}

pub fn report_count(connection: &Connection) -> Result<i64> {
    let count = connection
        .query_row("SELECT COUNT(*) FROM reports", [], |row| row.get(0))
        .context("failed to count reports")?;
    Ok(count)
}

pub fn latest_report_summary(connection: &Connection) -> Result<Option<StoredReportSummary>> {
    connection
        .query_row(
            "
            SELECT report_id, generated_at, address, error_count, warning_count, info_count
            FROM reports
            ORDER BY generated_at DESC, rowid DESC
            LIMIT 1
            ",
            [],
            |row| {
                Ok(StoredReportSummary {
                    report_id: row.get(0)?,
                    generated_at: row.get(1)?,
                    address: row.get(2)?,
                    error_count: row.get(3)?,
                    warning_count: row.get(4)?,
                    info_count: row.get(5)?,
                })
            },
        )
        .optional()
        .context("failed to load latest report summary")
}

fn parse_payload(raw: &str) -> Result<ComparisonReport> {
    serde_json::from_str(raw).context("failed to parse stored report payload")
}
