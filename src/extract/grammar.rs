//! Shared grammar helpers for text-line extractors (design note §9).
//!
//! Each text-grammar extractor is a date head, a description body, an
//! amount tail, and an optional sign suffix — rather than one overlapping
//! regex per issuer, issuer extractors compose these two anchored matchers
//! and keep only their own sign-assignment rule.

use chrono::NaiveDate;
use once_cell::sync::Lazy;
use regex::Regex;
use rust_decimal::Decimal;

use crate::normalize::amount::{parse_amount, AmountSuffix};
use crate::normalize::date::parse_date;
use crate::types::TransactionMode;

/// Anchored date head: `DD/MM/YYYY` (or `-`) at the start of a line.
static SLASH_DATE_HEAD: Lazy<Regex> = Lazy::new(|| Regex::new(r"^\s*(?P<date>\d{1,2}[/-]\d{1,2}[/-]\d{4})\s+(?P<rest>.*)$").unwrap());

/// Anchored date head: `DD MMM YY` (SBI-style) at the start of a line.
static SBI_DATE_HEAD: Lazy<Regex> = Lazy::new(|| Regex::new(r"(?i)^\s*(?P<date>\d{1,2}\s+[a-z]{3}\s+\d{2})\s+(?P<rest>.*)$").unwrap());

/// Anchored amount tail: a decimal amount with optional `C|D|Cr|Dr|CR|DR`
/// suffix at the end of a line.
static AMOUNT_TAIL: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"(?i)(?P<amt>[\d,]+(?:\.\d{1,2})?)\s*(?P<suffix>cr|dr|c|d)?\s*$").unwrap()
});

/// Match a `DD/MM/YYYY`-style date at the start of `line`, returning the
/// parsed date and the remainder of the line.
pub fn slash_date_head(line: &str) -> Option<(NaiveDate, &str)> {
    let caps = SLASH_DATE_HEAD.captures(line)?;
    let date = parse_date(caps.name("date")?.as_str())?;
    Some((date, rest_str(line, &caps)))
}

/// Match a `DD MMM YY`-style date (SBI) at the start of `line`.
pub fn sbi_date_head(line: &str) -> Option<(NaiveDate, &str)> {
    let caps = SBI_DATE_HEAD.captures(line)?;
    let date = parse_date(caps.name("date")?.as_str())?;
    Some((date, rest_str(line, &caps)))
}

fn rest_str<'a>(line: &'a str, caps: &regex::Captures) -> &'a str {
    let m = caps.name("rest").unwrap();
    &line[m.start()..m.end()]
}

/// Match a trailing amount (with optional suffix) at the end of `line`,
/// returning `(amount, suffix, description)` where `description` is
/// whatever preceded the matched tail, trimmed.
pub fn amount_tail(line: &str) -> Option<(Decimal, Option<AmountSuffix>, String)> {
    let trimmed = line.trim_end();
    let caps = AMOUNT_TAIL.captures(trimmed)?;
    let whole = caps.get(0)?;
    let amt_token = format!(
        "{}{}",
        caps.name("amt")?.as_str(),
        caps.name("suffix").map(|m| m.as_str()).unwrap_or("")
    );
    let (amount, suffix) = parse_amount(&amt_token)?;
    let description = trimmed[..whole.start()].trim().to_string();
    if description.is_empty() {
        return None;
    }
    Some((amount, suffix, description))
}

/// Keyword-based sign inference shared by ICICI/SBI no-suffix fallbacks
/// (spec §4.C.2, §4.C.4): credit-sounding keywords flip the default
/// negative sign to positive.
pub fn has_credit_keyword(description: &str, keywords: &[&str]) -> bool {
    let upper = description.to_uppercase();
    keywords.iter().any(|kw| upper.contains(kw))
}

/// Credit-card statement boilerplate that must never be promoted to a
/// transaction (spec §6), extended with a few contact/boilerplate phrases
/// present in the original source but not enumerated in spec §6's list
/// (SPEC_FULL.md, "Supplemented from original_source").
pub const SUMMARY_SKIP_LIST: &[&str] = &[
    "minimum amount due",
    "minimum due",
    "payment due",
    "total amount due",
    "outstanding balance",
    "current balance",
    "previous balance",
    "credit limit",
    "available credit",
    "cash advance limit",
    "statement date",
    "due date",
    "payment due date",
    "total credits",
    "total debits",
    "finance charges",
    "late payment fee",
    "overlimit fee",
    "annual fee",
    "reward points summary",
    "cashback summary",
    "in case you wish to update",
    "please write a letter",
    "for queries",
    "contact",
    "customer care",
];

/// True if `line` contains any summary/boilerplate phrase (spec §4.C.3, §4.C.4).
pub fn is_summary_line(line: &str) -> bool {
    let lower = line.to_lowercase();
    SUMMARY_SKIP_LIST.iter().any(|kw| lower.contains(kw))
}

/// Coarse channel tag inferred from a cleaned description (spec §3).
pub fn infer_mode(description: &str) -> Option<TransactionMode> {
    let upper = description.to_uppercase();
    if upper.contains("UPI") || upper.contains("MOBILE BANKING") || upper.contains("IMPS") {
        Some(TransactionMode::MobileBanking)
    } else if upper.contains("ATM") {
        Some(TransactionMode::Atm)
    } else if upper.contains("POS") || upper.contains("ONLINE") || upper.contains("ECOM") {
        Some(TransactionMode::Online)
    } else if upper.contains("CREDIT CARD") || upper.starts_with("CC") {
        Some(TransactionMode::CreditCard)
    } else {
        None
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn slash_date_head_splits_line() {
        let (date, rest) = slash_date_head("19/05/2025 SWIGGY INSTAMART BANGALORE 825.00").unwrap();
        assert_eq!(date.format("%d-%m-%Y").to_string(), "19-05-2025");
        assert_eq!(rest, "SWIGGY INSTAMART BANGALORE 825.00");
    }

    #[test]
    fn sbi_date_head_splits_line() {
        let (date, rest) = sbi_date_head("20 Apr 25 SWIGGY*ORDER 174.00 D").unwrap();
        assert_eq!(date.format("%d-%m-%Y").to_string(), "20-04-2025");
        assert_eq!(rest, "SWIGGY*ORDER 174.00 D");
    }

    #[test]
    fn amount_tail_with_suffix() {
        let (amount, suffix, desc) = amount_tail("SWIGGY*ORDER 174.00 D").unwrap();
        assert_eq!(amount.to_string(), "174.00");
        assert_eq!(suffix, Some(AmountSuffix::Debit));
        assert_eq!(desc, "SWIGGY*ORDER");
    }

    #[test]
    fn amount_tail_without_suffix() {
        let (amount, suffix, desc) = amount_tail("SWIGGY INSTAMART BANGALORE 825.00").unwrap();
        assert_eq!(amount.to_string(), "825.00");
        assert_eq!(suffix, None);
        assert_eq!(desc, "SWIGGY INSTAMART BANGALORE");
    }

    #[test]
    fn has_credit_keyword_matches_case_insensitively() {
        assert!(has_credit_keyword("bbps payment received", &["PAYMENT"]));
        assert!(!has_credit_keyword("grocery store purchase", &["PAYMENT", "REFUND"]));
    }

    #[test]
    fn summary_line_detects_minimum_due() {
        assert!(is_summary_line("Minimum Amount Due 5,000.00"));
        assert!(!is_summary_line("SWIGGY INSTAMART BANGALORE 825.00"));
    }

    #[test]
    fn infer_mode_recognizes_channels() {
        assert_eq!(infer_mode("UPI-GROCERY STORE"), Some(TransactionMode::MobileBanking));
        assert_eq!(infer_mode("ATM WITHDRAWAL"), Some(TransactionMode::Atm));
        assert_eq!(infer_mode("AMAZON PAY"), None);
    }
}
