use std::collections::BTreeSet;
use std::fmt;
use tracing::warn;

/// Range expression used when the caller has none: the first page only.
pub const DEFAULT_RANGES: &str = "1-1";

/// Why a token contributed no pages.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RangeWarning {
    /// Not a number and not a `a-b` pair of numbers.
    Malformed(String),
    /// A single page number outside `1..=total`.
    PageOutOfRange { token: String, page: u64 },
    /// A range that lies entirely outside the document after clamping.
    EmptyRange { token: String },
}

impl fmt::Display for RangeWarning {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RangeWarning::Malformed(token) => write!(f, "ignoring malformed token '{}'", token),
            RangeWarning::PageOutOfRange { token, page } => {
                write!(f, "ignoring '{}': page {} does not exist", token, page)
            }
            RangeWarning::EmptyRange { token } => {
                write!(f, "ignoring '{}': no pages of the range exist", token)
            }
        }
    }
}

/// Result of parsing a range expression: the pages and what was dropped.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RangeSelection {
    /// Zero-based, strictly ascending page indices.
    pub pages: Vec<u32>,
    pub warnings: Vec<RangeWarning>,
}

/// Parse a range expression like "1-3, 5, 8-8" into zero-based page indices.
///
/// Never fails: malformed tokens and pages outside `1..=total_pages` are
/// dropped (and logged at `warn`), reversed ranges are normalized, and
/// overlapping tokens collapse. An empty result means nothing usable was
/// selected.
pub fn parse_ranges(expression: &str, total_pages: u32) -> Vec<u32> {
    select_pages(expression, total_pages, |warning| {
        warn!(total_pages, "{}", warning);
    })
}

/// Same selection as [`parse_ranges`], returning each dropped token instead
/// of logging it.
pub fn parse_ranges_with_warnings(expression: &str, total_pages: u32) -> RangeSelection {
    let mut warnings = Vec::new();
    let pages = select_pages(expression, total_pages, |warning| warnings.push(warning));
    RangeSelection { pages, warnings }
}

fn select_pages<F>(expression: &str, total_pages: u32, mut on_dropped: F) -> Vec<u32>
where
    F: FnMut(RangeWarning),
{
    let total = u64::from(total_pages);
    let mut pages = BTreeSet::new();

    for token in expression.split(',').map(str::trim).filter(|t| !t.is_empty()) {
        if token.contains('-') {
            let Some((a, b)) = parse_pair(token) else {
                on_dropped(RangeWarning::Malformed(token.to_string()));
                continue;
            };

            let start = a.min(b).max(1);
            let end = a.max(b).min(total);
            if start > end {
                on_dropped(RangeWarning::EmptyRange {
                    token: token.to_string(),
                });
                continue;
            }

            // end <= total_pages, so the indices fit in u32
            pages.extend((start - 1..end).map(|i| i as u32));
        } else {
            match parse_number(token) {
                Some(n) if n >= 1 && n <= total => {
                    pages.insert((n - 1) as u32);
                }
                Some(n) => on_dropped(RangeWarning::PageOutOfRange {
                    token: token.to_string(),
                    page: n,
                }),
                None => on_dropped(RangeWarning::Malformed(token.to_string())),
            }
        }
    }

    pages.into_iter().collect()
}

fn parse_pair(token: &str) -> Option<(u64, u64)> {
    let mut parts = token.split('-');
    match (parts.next(), parts.next(), parts.next()) {
        (Some(a), Some(b), None) => Some((parse_number(a)?, parse_number(b)?)),
        _ => None,
    }
}

/// Leading decimal digits after an optional `+`; anything after them is
/// ignored, so "3abc" and "2.0" read as 3 and 2.
fn parse_number(s: &str) -> Option<u64> {
    let s = s.trim();
    let s = s.strip_prefix('+').unwrap_or(s);
    let end = s.find(|c: char| !c.is_ascii_digit()).unwrap_or(s.len());
    s[..end].parse().ok()
}

/// Render zero-based indices as a 1-based expression, collapsing runs
/// (`[0, 1, 2, 4]` becomes `"1-3,5"`).
pub fn format_pages(indices: &[u32]) -> String {
    let mut parts: Vec<String> = Vec::new();
    let mut iter = indices.iter().map(|&i| u64::from(i) + 1).peekable();

    while let Some(start) = iter.next() {
        let mut end = start;
        while iter.peek() == Some(&(end + 1)) {
            end += 1;
            iter.next();
        }
        if start == end {
            parts.push(start.to_string());
        } else {
            parts.push(format!("{}-{}", start, end));
        }
    }

    parts.join(",")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_simple_range() {
        assert_eq!(parse_ranges("1-3", 5), vec![0, 1, 2]);
    }

    #[test]
    fn test_reverse_range() {
        assert_eq!(parse_ranges("5-2", 5), vec![1, 2, 3, 4]);
    }

    #[test]
    fn test_dedup_across_token_kinds() {
        assert_eq!(parse_ranges("1,3,1-2", 5), vec![0, 1, 2]);
        assert_eq!(parse_ranges("1-3,2", 5), vec![0, 1, 2]);
    }

    #[test]
    fn test_range_above_total_is_empty() {
        assert_eq!(parse_ranges("10-20", 5), Vec::<u32>::new());
    }

    #[test]
    fn test_range_clamped_to_total() {
        assert_eq!(parse_ranges("3-99", 5), vec![2, 3, 4]);
        assert_eq!(parse_ranges("0-2", 5), vec![0, 1]);
    }

    #[test]
    fn test_malformed_token_ignored() {
        assert_eq!(parse_ranges("abc,2", 5), vec![1]);
        assert_eq!(parse_ranges("1-x,4", 5), vec![3]);
        assert_eq!(parse_ranges("1-2-3", 5), Vec::<u32>::new());
        assert_eq!(parse_ranges("-3", 5), Vec::<u32>::new());
        assert_eq!(parse_ranges("+,x-2", 5), Vec::<u32>::new());
    }

    #[test]
    fn test_numbers_read_leading_digits() {
        assert_eq!(parse_ranges("3abc", 5), vec![2]);
        assert_eq!(parse_ranges("2.0", 5), vec![1]);
        assert_eq!(parse_ranges("4 pages", 5), vec![3]);
        assert_eq!(parse_ranges("+5", 5), vec![4]);
        assert_eq!(parse_ranges("1-2nd", 5), vec![0, 1]);
        assert_eq!(parse_ranges("1.5-3", 5), vec![0, 1, 2]);
    }

    #[test]
    fn test_empty_expression() {
        assert_eq!(parse_ranges("", 5), Vec::<u32>::new());
        assert_eq!(parse_ranges("  , ,", 5), Vec::<u32>::new());
    }

    #[test]
    fn test_whitespace_and_stray_commas() {
        assert_eq!(parse_ranges(" 1 - 2 ,, 4 ,", 5), vec![0, 1, 3]);
    }

    #[test]
    fn test_single_page_out_of_range_dropped() {
        assert_eq!(parse_ranges("0,6,5", 5), vec![4]);
    }

    #[test]
    fn test_zero_total_pages() {
        assert_eq!(parse_ranges("1-1,1,1-100", 0), Vec::<u32>::new());
    }

    #[test]
    fn test_huge_numbers() {
        assert_eq!(parse_ranges("4-18446744073709551615", 5), vec![3, 4]);
        // overflows u64, so it is not a number at all
        assert_eq!(parse_ranges("99999999999999999999999", 5), Vec::<u32>::new());
    }

    #[test]
    fn test_default_ranges_selects_first_page() {
        assert_eq!(parse_ranges(DEFAULT_RANGES, 12), vec![0]);
    }

    #[test]
    fn test_output_bounded_and_strictly_ascending() {
        let expressions = ["9-1,3,3,2-2", "7,1-4,x,4-7", "100,2-1,0-0", "1-9999"];
        for total in 0..10 {
            for expr in expressions {
                let pages = parse_ranges(expr, total);
                assert!(pages.iter().all(|&p| p < total), "{} / {}", expr, total);
                assert!(pages.windows(2).all(|w| w[0] < w[1]), "{} / {}", expr, total);
            }
        }
    }

    #[test]
    fn test_warnings_do_not_change_selection() {
        let selection = parse_ranges_with_warnings("abc, 2, 9, 7-8, 1-2-3", 5);
        assert_eq!(selection.pages, vec![1]);
        assert_eq!(
            selection.warnings,
            vec![
                RangeWarning::Malformed("abc".to_string()),
                RangeWarning::PageOutOfRange {
                    token: "9".to_string(),
                    page: 9
                },
                RangeWarning::EmptyRange {
                    token: "7-8".to_string()
                },
                RangeWarning::Malformed("1-2-3".to_string()),
            ]
        );
    }

    #[test]
    fn test_no_warnings_for_clean_expression() {
        let selection = parse_ranges_with_warnings("1-2,4", 5);
        assert!(selection.warnings.is_empty());
        assert_eq!(selection.pages, vec![0, 1, 3]);
    }

    #[test]
    fn test_format_pages() {
        assert_eq!(format_pages(&[]), "");
        assert_eq!(format_pages(&[0]), "1");
        assert_eq!(format_pages(&[0, 1, 2, 4, 6, 7]), "1-3,5,7-8");
    }

    #[test]
    fn test_reparse_canonical_rendering() {
        for expr in ["5-2,9", "1,3,1-2", "2-2,4,6-9", "abc,3"] {
            let pages = parse_ranges(expr, 8);

            let collapsed = format_pages(&pages);
            assert_eq!(parse_ranges(&collapsed, 8), pages);

            let listed: Vec<String> = pages.iter().map(|p| (p + 1).to_string()).collect();
            assert_eq!(parse_ranges(&listed.join(","), 8), pages);
        }
    }
}
