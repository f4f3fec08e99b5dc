use crate::pdf::merge::merge_documents;
use crate::pdf::PdfDocument;
use anyhow::{Context, Result};
use serde::Serialize;
use std::fmt;
use std::path::Path;
use tracing::info;

#[derive(Debug, Serialize)]
pub struct MergeOutcome {
    pub output_path: String,
    pub file_count: usize,
    pub page_count: u32,
    pub bytes_written: usize,
}

impl fmt::Display for MergeOutcome {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "Merged {} files ({} pages) into {}",
            self.file_count, self.page_count, self.output_path
        )
    }
}

pub fn run<P: AsRef<Path>, Q: AsRef<Path>>(inputs: &[P], output: Q) -> Result<MergeOutcome> {
    if inputs.len() < 2 {
        anyhow::bail!("Add at least 2 PDFs to merge");
    }

    let mut documents = Vec::with_capacity(inputs.len());
    let mut page_count = 0;
    for input in inputs {
        let doc = PdfDocument::open(input)?;
        page_count += doc.page_count();
        documents.push(doc.doc);
    }

    let mut merged = merge_documents(documents).context("Failed to merge PDFs")?;
    let bytes_written = PdfDocument::save(&mut merged, &output)?;
    info!(files = inputs.len(), pages = page_count, "merged PDFs");

    Ok(MergeOutcome {
        output_path: output.as_ref().display().to_string(),
        file_count: inputs.len(),
        page_count,
        bytes_written,
    })
}
