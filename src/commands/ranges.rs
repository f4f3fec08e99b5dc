use crate::page_range::{format_pages, parse_ranges_with_warnings};
use serde::Serialize;
use std::fmt;

/// What a range expression selects in a document of `total_pages` pages
#[derive(Debug, Serialize)]
pub struct RangesOutcome {
    pub expression: String,
    pub total_pages: u32,
    /// Zero-based indices
    pub indices: Vec<u32>,
    /// The selection as a canonical 1-based expression
    pub pages: String,
    pub warnings: Vec<String>,
}

impl fmt::Display for RangesOutcome {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.indices.is_empty() {
            write!(f, "Invalid ranges.")?;
        } else {
            write!(f, "{} page(s): {}", self.indices.len(), self.pages)?;
        }
        for warning in &self.warnings {
            write!(f, "\nwarning: {}", warning)?;
        }
        Ok(())
    }
}

pub fn run(expression: &str, total_pages: u32) -> RangesOutcome {
    let selection = parse_ranges_with_warnings(expression, total_pages);

    RangesOutcome {
        expression: expression.to_string(),
        total_pages,
        pages: format_pages(&selection.pages),
        warnings: selection.warnings.iter().map(|w| w.to_string()).collect(),
        indices: selection.pages,
    }
}
