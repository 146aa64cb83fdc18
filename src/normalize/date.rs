//! Date parsing and canonicalization (spec §4.D).

use chrono::NaiveDate;
use once_cell::sync::Lazy;
use regex::Regex;

/// One accepted date pattern, tried in the order given in spec §4.D.
struct DateFormat {
    re: &'static Lazy<Regex>,
    /// Extract `(day, month, year)` from a match; `year` is already
    /// 4-digit (two-digit years have had 2000 added per the documented
    /// century-boundary behavior — see `SPEC_FULL.md`/`DESIGN.md`).
    parse: fn(&regex::Captures) -> Option<(u32, u32, i32)>,
}

fn month_number(name: &str) -> Option<u32> {
    let lower = name.to_lowercase();
    let short = &lower[..lower.len().min(3)];
    Some(match short {
        "jan" => 1,
        "feb" => 2,
        "mar" => 3,
        "apr" => 4,
        "may" => 5,
        "jun" => 6,
        "jul" => 7,
        "aug" => 8,
        "sep" => 9,
        "oct" => 10,
        "nov" => 11,
        "dec" => 12,
        _ => return None,
    })
}

fn numeric(caps: &regex::Captures, full_year: bool) -> Option<(u32, u32, i32)> {
    let day: u32 = caps.name("d")?.as_str().parse().ok()?;
    let month: u32 = caps.name("m")?.as_str().parse().ok()?;
    let y_str = caps.name("y")?.as_str();
    let year: i32 = if full_year {
        y_str.parse().ok()?
    } else {
        let yy: i32 = y_str.parse().ok()?;
        2000 + yy
    };
    Some((day, month, year))
}

fn numeric_iso(caps: &regex::Captures) -> Option<(u32, u32, i32)> {
    let year: i32 = caps.name("y")?.as_str().parse().ok()?;
    let month: u32 = caps.name("m")?.as_str().parse().ok()?;
    let day: u32 = caps.name("d")?.as_str().parse().ok()?;
    Some((day, month, year))
}

fn named_month(caps: &regex::Captures, full_year: bool) -> Option<(u32, u32, i32)> {
    let day: u32 = caps.name("d")?.as_str().parse().ok()?;
    let month = month_number(caps.name("m")?.as_str())?;
    let y_str = caps.name("y")?.as_str();
    let year: i32 = if full_year {
        y_str.parse().ok()?
    } else {
        let yy: i32 = y_str.parse().ok()?;
        2000 + yy
    };
    Some((day, month, year))
}

macro_rules! date_format {
    ($re:expr, $parse:expr) => {
        DateFormat { re: &$re, parse: $parse }
    };
}

// DD-MM-YYYY
static DD_MM_YYYY: Lazy<Regex> = Lazy::new(|| Regex::new(r"^(?P<d>\d{1,2})-(?P<m>\d{1,2})-(?P<y>\d{4})$").unwrap());
// DD/MM/YYYY
static DD_SLASH_MM_YYYY: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^(?P<d>\d{1,2})/(?P<m>\d{1,2})/(?P<y>\d{4})$").unwrap());
// YYYY-MM-DD
static YYYY_MM_DD: Lazy<Regex> = Lazy::new(|| Regex::new(r"^(?P<y>\d{4})-(?P<m>\d{1,2})-(?P<d>\d{1,2})$").unwrap());
// YYYY/MM/DD
static YYYY_SLASH_MM_DD: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^(?P<y>\d{4})/(?P<m>\d{1,2})/(?P<d>\d{1,2})$").unwrap());
// DD-MM-YY
static DD_MM_YY: Lazy<Regex> = Lazy::new(|| Regex::new(r"^(?P<d>\d{1,2})-(?P<m>\d{1,2})-(?P<y>\d{2})$").unwrap());
// DD/MM/YY
static DD_SLASH_MM_YY: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^(?P<d>\d{1,2})/(?P<m>\d{1,2})/(?P<y>\d{2})$").unwrap());
// DD MMM YYYY / DD MMMM YYYY (one pattern covers both abbreviated and full names)
static DD_SPACE_MMM_YYYY: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^(?P<d>\d{1,2})\s+(?P<m>[A-Za-z]{3,})\s+(?P<y>\d{4})$").unwrap());
// DD-MMM-YYYY
static DD_DASH_MMM_YYYY: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^(?P<d>\d{1,2})-(?P<m>[A-Za-z]{3,})-(?P<y>\d{4})$").unwrap());
// DD-MMM-YY
static DD_DASH_MMM_YY: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^(?P<d>\d{1,2})-(?P<m>[A-Za-z]{3,})-(?P<y>\d{2})$").unwrap());
// DD/MMM/YYYY
static DD_SLASH_MMM_YYYY: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^(?P<d>\d{1,2})/(?P<m>[A-Za-z]{3,})/(?P<y>\d{4})$").unwrap());
// DD/MMM/YY
static DD_SLASH_MMM_YY: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^(?P<d>\d{1,2})/(?P<m>[A-Za-z]{3,})/(?P<y>\d{2})$").unwrap());
// DD MMM YY / DD MMMM YY
static DD_SPACE_MMM_YY: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^(?P<d>\d{1,2})\s+(?P<m>[A-Za-z]{3,})\s+(?P<y>\d{2})$").unwrap());

static FORMATS: Lazy<[DateFormat; 12]> = Lazy::new(|| {
    [
        date_format!(DD_MM_YYYY, |c| numeric(c, true)),
        date_format!(DD_SLASH_MM_YYYY, |c| numeric(c, true)),
        date_format!(YYYY_MM_DD, numeric_iso),
        date_format!(YYYY_SLASH_MM_DD, numeric_iso),
        date_format!(DD_MM_YY, |c| numeric(c, false)),
        date_format!(DD_SLASH_MM_YY, |c| numeric(c, false)),
        date_format!(DD_SPACE_MMM_YYYY, |c| named_month(c, true)),
        date_format!(DD_DASH_MMM_YYYY, |c| named_month(c, true)),
        date_format!(DD_DASH_MMM_YY, |c| named_month(c, false)),
        date_format!(DD_SLASH_MMM_YYYY, |c| named_month(c, true)),
        date_format!(DD_SLASH_MMM_YY, |c| named_month(c, false)),
        date_format!(DD_SPACE_MMM_YY, |c| named_month(c, false)),
    ]
});

fn formats() -> &'static [DateFormat] {
    &*FORMATS
}

/// Parse a single date string under one of the accepted formats (spec §4.D).
///
/// Tries formats in the documented order and returns the first that both
/// matches the pattern and resolves to a calendar date (so `31-02-2025`
/// is rejected even though it matches the numeric pattern).
pub fn parse_date(s: &str) -> Option<NaiveDate> {
    let s = s.trim();
    if s.is_empty() {
        return None;
    }
    for fmt in formats() {
        if let Some(caps) = fmt.re.captures(s) {
            if let Some((day, month, year)) = (fmt.parse)(&caps) {
                if let Some(date) = NaiveDate::from_ymd_opt(year, month, day) {
                    return Some(date);
                }
            }
        }
    }
    None
}

/// Parse a possibly multi-line date cell, taking the first line that
/// parses successfully (extended from the amount rule in spec §4.D to
/// dates, following the original implementation's `_parse_date_flexible` —
/// see `SPEC_FULL.md`).
pub fn parse_multiline(s: &str) -> Option<NaiveDate> {
    s.lines().find_map(parse_date)
}
