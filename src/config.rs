//! Runtime configuration for quickpdf

use std::env;
use std::path::{Path, PathBuf};

use crate::page_range::DEFAULT_RANGES;

#[derive(Debug, Clone)]
pub struct Config {
    /// Range expression used by `extract` when none is given
    pub default_ranges: String,
    /// Directory that default output names are resolved against
    pub output_dir: PathBuf,
    /// Tracing filter used when `RUST_LOG` is unset
    pub log_filter: String,
}

/// Output file name used when the caller does not pass one.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OutputKind {
    Images,
    Merged,
    Extracted,
    Compressed,
}

impl OutputKind {
    pub fn file_name(self) -> &'static str {
        match self {
            OutputKind::Images => "images.pdf",
            OutputKind::Merged => "merged.pdf",
            OutputKind::Extracted => "extracted.pdf",
            OutputKind::Compressed => "compressed.pdf",
        }
    }
}

impl Default for Config {
    fn default() -> Self {
        Config {
            default_ranges: DEFAULT_RANGES.to_string(),
            output_dir: PathBuf::from("."),
            log_filter: "quickpdf=info".to_string(),
        }
    }
}

impl Config {
    pub fn from_env() -> Self {
        Self::from_lookup(|key| env::var(key).ok())
    }

    fn from_lookup<F>(lookup: F) -> Self
    where
        F: Fn(&str) -> Option<String>,
    {
        let defaults = Config::default();
        let non_empty = |key: &str| lookup(key).filter(|v| !v.trim().is_empty());

        Config {
            default_ranges: non_empty("QUICKPDF_DEFAULT_RANGES").unwrap_or(defaults.default_ranges),
            output_dir: non_empty("QUICKPDF_OUTPUT_DIR")
                .map(PathBuf::from)
                .unwrap_or(defaults.output_dir),
            log_filter: non_empty("QUICKPDF_LOG").unwrap_or(defaults.log_filter),
        }
    }

    /// The explicit output path, or the default name for `kind` in `output_dir`.
    pub fn output_path(&self, explicit: Option<&Path>, kind: OutputKind) -> PathBuf {
        match explicit {
            Some(path) => path.to_path_buf(),
            None => self.output_dir.join(kind.file_name()),
        }
    }

    /// The user's range expression, falling back to `default_ranges` when it
    /// is missing or empty. Whitespace-only input is kept as-is.
    pub fn ranges_or_default<'a>(&'a self, ranges: Option<&'a str>) -> &'a str {
        match ranges {
            Some(r) if !r.is_empty() => r,
            _ => &self.default_ranges,
        }
    }
}
