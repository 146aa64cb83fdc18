//! Text-ruled table synthesis — fallback strategy 3 of spec §4.A.
//!
//! When geometric line detection finds nothing (borderless tables, or a
//! statement that never draws ruling lines at all), fall back to treating
//! a run of lines that look like a header followed by date+amount rows as
//! an implicit table, splitting each line on wide whitespace gaps.

use once_cell::sync::Lazy;
use regex::Regex;

const HEADER_KEYWORDS: &[&str] =
    &["date", "transaction", "particulars", "amount", "balance", "remarks"];

/// A header line must contain at least this many distinct keywords.
const HEADER_KEYWORD_THRESHOLD: usize = 3;

static DATE_PATTERN: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"(?i)\b\d{1,2}[-/ ](?:\d{1,2}|[a-z]{3,9})[-/ ]\d{2,4}\b").unwrap()
});

static AMOUNT_PATTERN: Lazy<Regex> = Lazy::new(|| Regex::new(r"\d[\d,]*\.\d{2}").unwrap());

/// Splits a line into cells on runs of 3+ spaces or any tab (spec §4.A.3).
static COLUMN_SPLIT: Lazy<Regex> = Lazy::new(|| Regex::new(r"(?: {3,}|\t+)").unwrap());

fn split_row(line: &str) -> Vec<String> {
    COLUMN_SPLIT.split(line.trim()).map(|s| s.trim().to_string()).collect()
}

fn is_header_line(line: &str) -> bool {
    let lower = line.to_lowercase();
    HEADER_KEYWORDS.iter().filter(|kw| lower.contains(*kw)).count() >= HEADER_KEYWORD_THRESHOLD
}

fn looks_like_transaction_line(line: &str) -> bool {
    DATE_PATTERN.is_match(line) && AMOUNT_PATTERN.is_match(line)
}

/// Synthesize a table from plain text, or `None` if no header-like line is
/// found.
pub fn synthesize(text: &str) -> Option<Vec<Vec<String>>> {
    let lines: Vec<&str> = text.lines().collect();
    let header_idx = lines.iter().position(|l| is_header_line(l))?;

    let mut rows = vec![split_row(lines[header_idx])];
    let width = rows[0].len();

    for line in &lines[header_idx + 1..] {
        if looks_like_transaction_line(line) {
            let mut cells = split_row(line);
            cells.resize(width.max(cells.len()), String::new());
            rows.push(cells);
        }
    }

    if rows.len() <= 1 {
        return None;
    }

    // Pad every row to the widest row so the table stays rectangular.
    let max_width = rows.iter().map(|r| r.len()).max().unwrap_or(width);
    for row in &mut rows {
        row.resize(max_width, String::new());
    }

    Some(rows)
}
