use crate::extract::{DocumentOverrides, Extractor};
use crate::model::{Comparison, DocumentRecord};

pub mod diff;
pub mod qa;

pub use diff::{delta, diff_records};

/// Pages of extracted text for one document plus its caller overrides.
#[derive(Debug, Clone, Default)]
pub struct DocumentInput {
    pub pages: Vec<String>,
    pub overrides: DocumentOverrides,
}

pub fn compare_inputs(extractor: &Extractor, pre: &DocumentInput, post: &DocumentInput) -> Comparison {
    let pre = extractor.extract_pages(&pre.pages, &pre.overrides);
    let post = extractor.extract_pages(&post.pages, &post.overrides);
    compare_records(pre, post)
}

pub fn compare_records(pre: DocumentRecord, post: DocumentRecord) -> Comparison {
    let diff = diff_records(&pre, &post);
    let findings = qa::compare(&pre.site_notes, &post.site_notes);
    Comparison {
        pre,
        post,
        diff,
        findings,
    }
}
