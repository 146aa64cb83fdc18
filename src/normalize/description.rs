//! Description cleaning (spec §4.D, design note §9).
//!
//! The source grows a city list linearly; here a single generic
//! trailing-uppercase-then-digits rule does most of the work, backed by a
//! short allowlist for bare city names (no trailing digits) the generic
//! rule can't distinguish from an ordinary merchant-name word.

use once_cell::sync::Lazy;
use regex::Regex;

static LEADING_TIMESTAMP_RE: Lazy<Regex> = Lazy::new(|| Regex::new(r"^\d{2}:\d{2}:\d{2}\s*").unwrap());

/// Generic trailing rule: an uppercase word (3+ letters) immediately
/// followed by a numeric code, e.g. a branch or reference suffix.
///
/// Requiring the digits (rather than treating them as fully optional, per
/// the letter of spec §4.D) avoids eating the last word of an ordinary
/// all-caps merchant name that happens to have no trailing code — see
/// `DESIGN.md`.
static GENERIC_TAIL_RE: Lazy<Regex> = Lazy::new(|| Regex::new(r"(?i)\b[a-z]{3,}\s+\d+\s*$").unwrap());

/// Short allowlist of Indian city names that legitimately trail a
/// description with no accompanying digit (design note §9).
const CITY_ALLOWLIST: &[&str] = &[
    "BANGALORE",
    "BENGALURU",
    "MUMBAI",
    "DELHI",
    "GURGAON",
    "GURUGRAM",
    "NOIDA",
    "PUNE",
    "HYDERABAD",
    "CHENNAI",
    "KOLKATA",
    "AHMEDABAD",
    "JAIPUR",
    "LUCKNOW",
    "CHANDIGARH",
    "KOCHI",
    "SURAT",
    "PATNA",
    "BHOPAL",
    "INDORE",
    "NAGPUR",
    "COIMBATORE",
    "THANE",
    "IND",
];

/// Trailing business-entity suffixes to strip (spec §4.D).
const BUSINESS_SUFFIXES: &[&str] = &["LIMITED", "LTD", "PVT", "PRIVATE", "INDIA", "IN"];

static WHITESPACE_RE: Lazy<Regex> = Lazy::new(|| Regex::new(r"\s+").unwrap());

/// Clean a raw description per spec §4.D, applied to all credit-card
/// extractors.
pub fn clean(raw: &str) -> String {
    let without_timestamp = LEADING_TIMESTAMP_RE.replace(raw, "");
    let without_tail = strip_city_or_generic_tail(&without_timestamp);
    let without_suffix = strip_business_suffixes(&without_tail);
    collapse_whitespace(&without_suffix)
}

fn strip_city_or_generic_tail(s: &str) -> String {
    let words: Vec<&str> = s.split_whitespace().collect();
    if let Some(last) = words.last() {
        let bare = last.trim_end_matches(|c: char| c.is_ascii_digit());
        if !bare.is_empty() && CITY_ALLOWLIST.contains(&bare.to_uppercase().as_str()) {
            return words[..words.len() - 1].join(" ");
        }
    }
    GENERIC_TAIL_RE.replace(s, "").trim_end().to_string()
}

fn strip_business_suffixes(s: &str) -> String {
    let mut words: Vec<&str> = s.split_whitespace().collect();
    while let Some(last) = words.last() {
        if words.len() <= 1 {
            break;
        }
        if BUSINESS_SUFFIXES.contains(&last.to_uppercase().as_str()) {
            words.pop();
        } else {
            break;
        }
    }
    words.join(" ")
}

fn collapse_whitespace(s: &str) -> String {
    WHITESPACE_RE.replace_all(s.trim(), " ").to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn strips_leading_timestamp() {
        assert_eq!(clean("14:32:01 UPI-SOMEONE"), "UPI-SOMEONE");
    }

    #[test]
    fn strips_trailing_city() {
        assert_eq!(clean("SWIGGY INSTAMART BANGALORE"), "SWIGGY INSTAMART");
    }

    #[test]
    fn strips_generic_trailing_code() {
        assert_eq!(clean("EAZYDINER PRIVATE LIMI GURGAON IN RESTAURANTS 41"), "EAZYDINER PRIVATE LIMI GURGAON");
    }

    #[test]
    fn strips_business_suffix_chain() {
        assert_eq!(clean("ACME TRADING PRIVATE LIMITED"), "ACME TRADING");
    }

    #[test]
    fn collapses_whitespace() {
        assert_eq!(clean("FOO   BAR    BAZ"), "FOO BAR BAZ");
    }

    #[test]
    fn leaves_ordinary_merchant_name_alone() {
        assert_eq!(clean("AMAZON PAY"), "AMAZON PAY");
    }
}
