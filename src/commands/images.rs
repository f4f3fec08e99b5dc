use crate::pdf::images::{images_to_pdf, ImageSource};
use crate::pdf::PdfDocument;
use anyhow::{Context, Result};
use serde::Serialize;
use std::fmt;
use std::path::{Path, PathBuf};
use tracing::info;
use walkdir::WalkDir;

const IMAGE_EXTENSIONS: [&str; 3] = ["jpg", "jpeg", "png"];

#[derive(Debug, Serialize)]
pub struct ImagesOutcome {
    pub output_path: String,
    pub page_count: usize,
    pub bytes_written: usize,
}

impl fmt::Display for ImagesOutcome {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "Converted {} image(s) into {}",
            self.page_count, self.output_path
        )
    }
}

pub fn run<P: AsRef<Path>, Q: AsRef<Path>>(inputs: &[P], output: Q) -> Result<ImagesOutcome> {
    let files = collect_images(inputs)?;
    if files.is_empty() {
        anyhow::bail!("No images specified");
    }

    let sources = files
        .iter()
        .map(|path| -> Result<ImageSource> {
            let bytes = std::fs::read(path)
                .with_context(|| format!("Failed to read image: {}", path.display()))?;
            Ok(ImageSource {
                name: path.display().to_string(),
                bytes,
            })
        })
        .collect::<Result<Vec<_>>>()?;

    let mut doc = images_to_pdf(&sources)?;
    let bytes_written = PdfDocument::save(&mut doc, &output)?;
    info!(images = sources.len(), output = %output.as_ref().display(), "converted images");

    Ok(ImagesOutcome {
        output_path: output.as_ref().display().to_string(),
        page_count: sources.len(),
        bytes_written,
    })
}

/// Files are taken as given; directories are walked in name order and only
/// files with an image extension are kept.
fn collect_images<P: AsRef<Path>>(inputs: &[P]) -> Result<Vec<PathBuf>> {
    let mut files = Vec::new();

    for input in inputs {
        let input = input.as_ref();
        if !input.is_dir() {
            files.push(input.to_path_buf());
            continue;
        }

        for entry in WalkDir::new(input).sort_by_file_name() {
            let entry =
                entry.with_context(|| format!("Failed to walk directory: {}", input.display()))?;
            if entry.file_type().is_file() && has_image_extension(entry.path()) {
                files.push(entry.into_path());
            }
        }
    }

    Ok(files)
}

fn has_image_extension(path: &Path) -> bool {
    path.extension()
        .and_then(|e| e.to_str())
        .is_some_and(|e| IMAGE_EXTENSIONS.iter().any(|x| e.eq_ignore_ascii_case(x)))
}
