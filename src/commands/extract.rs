use anyhow::Result;
use tracing::{info, warn};

use crate::cli::ExtractArgs;
use crate::extract::{DocumentOverrides, Extractor};
use crate::pdf::extract_pages;
use crate::util::{print_json_pretty, write_json_pretty};

pub fn run(args: ExtractArgs) -> Result<()> {
    let extractor = Extractor::new()?;
    let extraction = extract_pages(&args.input)?;
    for warning in &extraction.warnings {
        warn!(warning = %warning, "page extraction warning");
    }

    let overrides = DocumentOverrides {
        process_date: args.process_date.clone(),
        ..Default::default()
    };
    let record = extractor.extract_pages(&extraction.pages, &overrides);

    info!(
        path = %args.input.display(),
        pages = extraction.pages.len(),
        empty_pages = extraction.empty_page_count,
        reference = %record.summary.reference_number.as_deref().unwrap_or_default(),
        sap = ?record.summary.sap_current,
        "extracted survey"
    );

    match &args.output {
        Some(path) => {
            write_json_pretty(path, &record)?;
            info!(path = %path.display(), "wrote document record");
            Ok(())
        }
        None => print_json_pretty(&record),
    }
}
