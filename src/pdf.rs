use std::fs;
use std::path::Path;
use std::process::Command;

use anyhow::{Context, Result, bail};
use tracing::{info, warn};

/// Per-page text for one input document. Pages that could not be read are
/// kept as empty strings so page numbering stays stable.
#[derive(Debug, Default)]
pub struct ExtractedPages {
    pub pages: Vec<String>,
    pub empty_page_count: usize,
    pub failed_page_count: usize,
    pub warnings: Vec<String>,
}

impl ExtractedPages {
    fn from_pages(pages: Vec<String>, failed_page_count: usize, warnings: Vec<String>) -> Self {
        let empty_page_count = pages
            .iter()
            .filter(|page| non_whitespace_char_count(page) == 0)
            .count();
        Self {
            pages,
            empty_page_count,
            failed_page_count,
            warnings,
        }
    }
}

pub fn extract_pages(path: &Path) -> Result<ExtractedPages> {
    if !path.is_file() {
        bail!("input file not found: {}", path.display());
    }

    let extension = path
        .extension()
        .and_then(|ext| ext.to_str())
        .map(|ext| ext.to_ascii_lowercase());

    let extraction = match extension.as_deref() {
        Some("pdf") => extract_pdf_pages(path)?,
        Some("txt") => {
            let raw = fs::read_to_string(path)
                .with_context(|| format!("failed to read {}", path.display()))?;
            ExtractedPages::from_pages(split_pages(&raw), 0, Vec::new())
        }
        _ => bail!(
            "unsupported input type (expected .pdf or .txt): {}",
            path.display()
        ),
    };

    info!(
        path = %path.display(),
        pages = extraction.pages.len(),
        empty_pages = extraction.empty_page_count,
        failed_pages = extraction.failed_page_count,
        "extracted page text"
    );

    Ok(extraction)
}

fn extract_pdf_pages(pdf_path: &Path) -> Result<ExtractedPages> {
    match run_pdftotext(pdf_path, None) {
        Ok(raw) => Ok(ExtractedPages::from_pages(split_pages(&raw), 0, Vec::new())),
        Err(error) => {
            warn!(
                path = %pdf_path.display(),
                error = %error,
                "whole-document extraction failed; retrying page by page"
            );
            extract_pdf_pages_individually(pdf_path, &error)
        }
    }
}

fn extract_pdf_pages_individually(
    pdf_path: &Path,
    document_error: &anyhow::Error,
) -> Result<ExtractedPages> {
    let page_count = pdf_page_count(pdf_path).with_context(|| {
        format!(
            "text extraction failed for {} ({document_error}) and its page count is unavailable",
            pdf_path.display()
        )
    })?;

    let mut pages = Vec::with_capacity(page_count);
    let mut failed_page_count = 0usize;
    let mut warnings = Vec::new();

    for page_number in 1..=page_count {
        match run_pdftotext(pdf_path, Some(page_number)) {
            Ok(raw) => pages.push(clean_page(&raw)),
            Err(error) => {
                failed_page_count += 1;
                warnings.push(format!(
                    "page {} of {} could not be read: {}",
                    page_number,
                    pdf_path.display(),
                    error
                ));
                pages.push(String::new());
            }
        }
    }

    Ok(ExtractedPages::from_pages(
        pages,
        failed_page_count,
        warnings,
    ))
}

fn run_pdftotext(pdf_path: &Path, page: Option<usize>) -> Result<String> {
    let mut command = Command::new("pdftotext");
    command.arg("-enc").arg("UTF-8");
    if let Some(page) = page {
        command
            .arg("-f")
            .arg(page.to_string())
            .arg("-l")
            .arg(page.to_string());
    }
    command.arg(pdf_path).arg("-");

    let output = command
        .output()
        .with_context(|| format!("failed to execute pdftotext for {}", pdf_path.display()))?;

    if !output.status.success() {
        let stderr = String::from_utf8_lossy(&output.stderr);
        bail!(
            "pdftotext returned non-zero exit status for {}: {}",
            pdf_path.display(),
            stderr.trim()
        );
    }

    Ok(String::from_utf8_lossy(&output.stdout).into_owned())
}

fn pdf_page_count(pdf_path: &Path) -> Result<usize> {
    let output = Command::new("pdfinfo")
        .arg(pdf_path)
        .output()
        .with_context(|| format!("failed to execute pdfinfo for {}", pdf_path.display()))?;

    if !output.status.success() {
        let stderr = String::from_utf8_lossy(&output.stderr);
        bail!(
            "pdfinfo returned non-zero exit status for {}: {}",
            pdf_path.display(),
            stderr.trim()
        );
    }

    parse_page_count(&String::from_utf8_lossy(&output.stdout))
        .with_context(|| format!("pdfinfo reported no page count for {}", pdf_path.display()))
}

fn parse_page_count(pdfinfo_output: &str) -> Option<usize> {
    pdfinfo_output.lines().find_map(|line| {
        let value = line.strip_prefix("Pages:")?;
        value.trim().parse::<usize>().ok()
    })
}

/// Splits text-layer output on form feeds and drops trailing blank pages.
fn split_pages(raw: &str) -> Vec<String> {
    let mut pages = raw.split('\u{000C}').map(clean_page).collect::<Vec<String>>();

    while let Some(last_page) = pages.last() {
        if last_page.trim().is_empty() {
            pages.pop();
            continue;
        }
        break;
    }

    pages
}

fn clean_page(raw: &str) -> String {
    raw.replace(['\u{0000}', '\u{000C}'], "")
}

fn non_whitespace_char_count(text: &str) -> usize {
    text.chars()
        .filter(|character| !character.is_whitespace())
        .count()
}
