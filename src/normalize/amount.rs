//! Amount parsing (spec §4.D, §6).

use once_cell::sync::Lazy;
use regex::Regex;
use rust_decimal::Decimal;
use std::str::FromStr;

/// A credit/debit suffix recognized on an amount token.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AmountSuffix {
    Credit,
    Debit,
}

static AMOUNT_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"(?i)^(?:₹|rs\.?|inr)?\s*(?P<num>[0-9][0-9,]*(?:\.[0-9]{1,2})?)\s*(?P<suffix>cr|dr|c|d)?$").unwrap()
});

/// Parse one amount token: strip currency marks/thousands separators, and
/// recognize a trailing `C|D|Cr|Dr|CR|DR` suffix.
///
/// Returns the *unsigned* magnitude plus the detected suffix — callers
/// assign the final sign according to their own issuer-specific rule
/// (suffix meaning and keyword-fallback differ per extractor).
///
/// `""`, `"-"`, and `"0.00"` are defined to carry no amount (spec §4.D).
pub fn parse_amount(raw: &str) -> Option<(Decimal, Option<AmountSuffix>)> {
    let trimmed = raw.trim();
    if trimmed.is_empty() || trimmed == "-" {
        return None;
    }

    let caps = AMOUNT_RE.captures(trimmed)?;
    let num_str = caps.name("num")?.as_str().replace(',', "");
    let magnitude = Decimal::from_str(&num_str).ok()?;
    if magnitude.is_zero() {
        return None;
    }

    let suffix = caps.name("suffix").map(|m| match m.as_str().to_lowercase().as_str() {
        "cr" | "c" => AmountSuffix::Credit,
        "dr" | "d" => AmountSuffix::Debit,
        _ => unreachable!(),
    });

    Some((magnitude, suffix))
}

/// Parse a possibly multi-line amount cell, returning the first line that
/// parses successfully (spec §4.D — single-amount contexts only).
pub fn parse_multiline(raw: &str) -> Option<(Decimal, Option<AmountSuffix>)> {
    raw.lines().find_map(parse_amount)
}
