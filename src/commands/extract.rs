use crate::page_range::{format_pages, parse_ranges};
use crate::pdf::PdfDocument;
use anyhow::Result;
use serde::Serialize;
use std::fmt;
use std::path::Path;
use tracing::info;

#[derive(Debug, Serialize)]
pub struct ExtractOutcome {
    pub output_path: String,
    pub page_count: usize,
    /// Extracted pages as a 1-based range expression
    pub pages: String,
    pub bytes_written: usize,
}

impl fmt::Display for ExtractOutcome {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "Extracted {} page(s) ({}) to {}",
            self.page_count, self.pages, self.output_path
        )
    }
}

/// Copy the pages selected by `ranges` into a new PDF at `output`.
pub fn run<P: AsRef<Path>, Q: AsRef<Path>>(
    input: P,
    ranges: &str,
    output: Q,
) -> Result<ExtractOutcome> {
    let doc = PdfDocument::open(&input)?;
    let total_pages = doc.page_count();

    let selected = parse_ranges(ranges, total_pages);
    if selected.is_empty() {
        anyhow::bail!(
            "Invalid ranges: '{}' selects no pages of {}",
            ranges,
            total_pages
        );
    }

    let mut new_doc = doc.extract_pages(&selected)?;
    let bytes_written = PdfDocument::save(&mut new_doc, &output)?;

    let pages = format_pages(&selected);
    info!(pages = %pages, output = %output.as_ref().display(), "extracted pages");

    Ok(ExtractOutcome {
        output_path: output.as_ref().display().to_string(),
        page_count: selected.len(),
        pages,
        bytes_written,
    })
}
