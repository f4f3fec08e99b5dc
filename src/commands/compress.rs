use crate::pdf::compress::compress_document;
use crate::pdf::PdfDocument;
use anyhow::{Context, Result};
use serde::Serialize;
use std::fmt;
use std::path::Path;
use tracing::info;

#[derive(Debug, Serialize)]
pub struct CompressOutcome {
    pub output_path: String,
    pub original_size: u64,
    pub compressed_size: u64,
    pub pruned_objects: usize,
    pub dropped_streams: usize,
}

impl CompressOutcome {
    /// Percentage saved; negative when the resave grew the file
    pub fn savings_percent(&self) -> f64 {
        if self.original_size == 0 {
            return 0.0;
        }
        100.0 * (1.0 - self.compressed_size as f64 / self.original_size as f64)
    }
}

impl fmt::Display for CompressOutcome {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "Compressed {} -> {} bytes ({:.1}% saved) into {}",
            self.original_size,
            self.compressed_size,
            self.savings_percent(),
            self.output_path
        )
    }
}

pub fn run<P: AsRef<Path>, Q: AsRef<Path>>(input: P, output: Q) -> Result<CompressOutcome> {
    let input = input.as_ref();
    let original_size = std::fs::metadata(input)
        .with_context(|| format!("Failed to read PDF: {}", input.display()))?
        .len();

    let mut doc = PdfDocument::open(input)?.doc;
    let stats = compress_document(&mut doc);
    let compressed_size = PdfDocument::save(&mut doc, &output)? as u64;

    info!(original_size, compressed_size, "compressed PDF");

    Ok(CompressOutcome {
        output_path: output.as_ref().display().to_string(),
        original_size,
        compressed_size,
        pruned_objects: stats.pruned_objects,
        dropped_streams: stats.dropped_streams,
    })
}
