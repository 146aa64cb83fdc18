//! Generic text extractor for savings-account statements (spec §4.C.6).
//!
//! The "previous balance" accumulator is threaded explicitly through the
//! line loop rather than kept as module state (design note §9).

use chrono::NaiveDate;
use once_cell::sync::Lazy;
use regex::Regex;
use rust_decimal::Decimal;

use crate::extract::{grammar, Extractor};
use crate::normalize::amount::parse_amount;
use crate::normalize::date::parse_date;
use crate::normalize::description;
use crate::pdf::Document;
use crate::types::{Transaction, TransactionType};

const HEADER_KEYWORDS: &[&str] = &["date", "particulars", "narration", "amount", "balance", "withdrawal", "deposit"];
const HEADER_KEYWORD_THRESHOLD: usize = 2;

const INCOME_KEYWORDS: &[&str] = &["FD CLOS", "CREDIT", "SALARY", "INTEREST", "DIVIDEND", "BONUS", "REFUND", "REVERSAL"];
const EXPENSE_KEYWORDS: &[&str] =
    &["PAYMENT", "TRANSFER", "WITHDRAWAL", "CHARGES", "TAX", "TDS", "GST", "BBPS", "BPAY", "CCWD", "BIL/", "ONL/", "TOP/"];
const TRANSACTION_PREFIXES: &[&str] = &["UPI-", "REV-", "NEFT-", "IMPS-", "ACH-", "CC"];
const BALANCE_CARRY_MARKERS: &[&str] = &["B/F", "C/F"];
const MAX_BACKSCAN: usize = 15;

static DMY_DASH_FULL: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^\s*(?P<date>\d{1,2}-\d{1,2}-\d{4})\s+(?P<mid>.+?)\s+(?P<amt>[\d,]+\.\d{2})\s+(?P<bal>[\d,]+\.\d{2})\s*$").unwrap()
});
static DMY_SLASH_FULL: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^\s*(?P<date>\d{1,2}/\d{1,2}/\d{4})\s+(?P<mid>.+?)\s+(?P<amt>[\d,]+\.\d{2})\s+(?P<bal>[\d,]+\.\d{2})\s*$").unwrap()
});
static DMY_DASH_DEBIT_CREDIT: Lazy<Regex> = Lazy::new(|| {
    Regex::new(
        r"^\s*(?P<date>\d{1,2}-\d{1,2}-\d{4})\s+(?P<mid>.+?)\s+(?P<debit>[\d,]+\.\d{2}|-)\s+(?P<credit>[\d,]+\.\d{2}|-)\s+(?P<bal>[\d,]+\.\d{2})\s*$",
    )
    .unwrap()
});
static DMY_SLASH_AMOUNT_ONLY: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^\s*(?P<date>\d{1,2}/\d{1,2}/\d{4})\s+(?P<mid>.+?)\s+(?P<amt>[\d,]+\.\d{2})\s*$").unwrap());
static ANY_DATE: Lazy<Regex> = Lazy::new(|| Regex::new(r"(?i)\d{1,2}[-/]\d{1,2}[-/]\d{2,4}").unwrap());
static ANY_AMOUNT: Lazy<Regex> = Lazy::new(|| Regex::new(r"[\d,]+\.\d{2}").unwrap());
static LINE_START_DATE: Lazy<Regex> = Lazy::new(|| Regex::new(r"^\d{1,2}[-/]\d{1,2}[-/]\d{2,4}").unwrap());

enum LineAmount {
    Signed(Decimal),
    Unsigned(Decimal),
}

pub struct GenericTextExtractor;

impl Extractor for GenericTextExtractor {
    fn extract(&self, document: &Document) -> Vec<Transaction> {
        let mut previous_balance: Option<Decimal> = None;
        let mut out = Vec::new();

        for page in &document.pages {
            let lines: Vec<&str> = page.text.lines().collect();
            let Some(header_idx) = lines.iter().position(|l| is_header_line(l)) else {
                continue;
            };
            let body = &lines[header_idx + 1..];

            for (i, line) in body.iter().enumerate() {
                if let Some(bal) = carried_balance(line) {
                    previous_balance = Some(bal);
                    continue;
                }

                let Some((date, mid, amount, balance)) = match_line(line) else {
                    continue;
                };
                let signed = resolve_sign(amount, balance, &mut previous_balance, &mid);
                if signed.is_zero() {
                    continue;
                }

                let raw_description = join_backscan(body, i, &mid);
                let description = description::clean(&raw_description);
                out.push(Transaction {
                    date,
                    description: description.clone(),
                    amount: signed,
                    balance,
                    transaction_type: TransactionType::from_amount(signed),
                    mode: grammar::infer_mode(&description),
                    details: description,
                    raw_line: line.trim().to_string(),
                });

                if let Some(b) = balance {
                    previous_balance = Some(b);
                }
            }
        }

        out
    }
}

fn is_header_line(line: &str) -> bool {
    let lower = line.to_lowercase();
    HEADER_KEYWORDS.iter().filter(|kw| lower.contains(**kw)).count() >= HEADER_KEYWORD_THRESHOLD
}

fn carried_balance(line: &str) -> Option<Decimal> {
    let upper = line.to_uppercase();
    if !BALANCE_CARRY_MARKERS.iter().any(|m| upper.contains(m)) {
        return None;
    }
    ANY_AMOUNT.find(line).and_then(|m| parse_amount(m.as_str())).map(|(a, _)| a)
}

fn match_line(line: &str) -> Option<(NaiveDate, String, LineAmount, Option<Decimal>)> {
    if let Some(caps) = DMY_DASH_DEBIT_CREDIT.captures(line) {
        let date = parse_date(caps.name("date")?.as_str())?;
        let mid = caps.name("mid")?.as_str().to_string();
        let debit = non_dash(caps.name("debit")?.as_str()).and_then(parse_amount);
        let credit = non_dash(caps.name("credit")?.as_str()).and_then(parse_amount);
        let balance = parse_amount(caps.name("bal")?.as_str()).map(|(a, _)| a);
        if let Some((d, _)) = debit {
            return Some((date, mid, LineAmount::Signed(-d), balance));
        }
        if let Some((c, _)) = credit {
            return Some((date, mid, LineAmount::Signed(c), balance));
        }
        return None;
    }

    if let Some(caps) = DMY_DASH_FULL.captures(line) {
        let date = parse_date(caps.name("date")?.as_str())?;
        let mid = caps.name("mid")?.as_str().to_string();
        let (amount, _) = parse_amount(caps.name("amt")?.as_str())?;
        let balance = parse_amount(caps.name("bal")?.as_str()).map(|(a, _)| a);
        return Some((date, mid, LineAmount::Unsigned(amount), balance));
    }

    if let Some(caps) = DMY_SLASH_FULL.captures(line) {
        let date = parse_date(caps.name("date")?.as_str())?;
        let mid = caps.name("mid")?.as_str().to_string();
        let (amount, _) = parse_amount(caps.name("amt")?.as_str())?;
        let balance = parse_amount(caps.name("bal")?.as_str()).map(|(a, _)| a);
        return Some((date, mid, LineAmount::Unsigned(amount), balance));
    }

    if let Some(caps) = DMY_SLASH_AMOUNT_ONLY.captures(line) {
        let date = parse_date(caps.name("date")?.as_str())?;
        let mid = caps.name("mid")?.as_str().to_string();
        let (amount, _) = parse_amount(caps.name("amt")?.as_str())?;
        return Some((date, mid, LineAmount::Unsigned(amount), None));
    }

    flexible_fallback(line)
}

fn non_dash(s: &str) -> Option<&str> {
    if s.trim() == "-" {
        None
    } else {
        Some(s)
    }
}

/// Locate a date anywhere; locate ≥2 decimal amounts; treat last as
/// balance, penultimate as signed amount, text in between as description
/// (spec §4.C.6's flexible fallback).
fn flexible_fallback(line: &str) -> Option<(NaiveDate, String, LineAmount, Option<Decimal>)> {
    let date_match = ANY_DATE.find(line)?;
    let date = parse_date(date_match.as_str())?;

    let amounts: Vec<regex::Match> = ANY_AMOUNT.find_iter(line).collect();
    if amounts.len() < 2 {
        return None;
    }
    let balance_match = amounts[amounts.len() - 1];
    let amount_match = amounts[amounts.len() - 2];
    let (amount, _) = parse_amount(amount_match.as_str())?;
    let (balance, _) = parse_amount(balance_match.as_str())?;

    let start = date_match.end();
    let end = amount_match.start();
    if end <= start {
        return None;
    }
    let mid = line[start..end].trim().to_string();

    Some((date, mid, LineAmount::Unsigned(amount), Some(balance)))
}

/// When `previous_balance` is known, pick the sign that reconciles
/// `balance ≈ previous_balance + signed_amount`; otherwise fall back to
/// keyword classes, defaulting to expense (spec §4.C.6, §7 class 3).
fn resolve_sign(amount: LineAmount, balance: Option<Decimal>, previous_balance: &mut Option<Decimal>, mid: &str) -> Decimal {
    match amount {
        LineAmount::Signed(signed) => signed,
        LineAmount::Unsigned(magnitude) => {
            if let (Some(prev), Some(bal)) = (*previous_balance, balance) {
                let diff = bal - prev;
                let tolerance = Decimal::new(1, 2).max(bal.abs() * Decimal::new(5, 3));
                if (diff - magnitude).abs() <= tolerance {
                    return magnitude;
                }
                if (diff + magnitude).abs() <= tolerance {
                    return -magnitude;
                }
            }

            if grammar::has_credit_keyword(mid, INCOME_KEYWORDS) {
                magnitude
            } else if grammar::has_credit_keyword(mid, EXPENSE_KEYWORDS) {
                -magnitude
            } else {
                -magnitude
            }
        }
    }
}

/// Walk backwards up to [`MAX_BACKSCAN`] lines, collecting description
/// continuation lines, then append the current line's mid-section (spec
/// §4.C.6's back-scan rule).
///
/// Stops on a blank line or a line starting with a date — a date alone,
/// with no amount required, since a transaction's date and amount can be
/// split across two physical lines.
fn join_backscan(body: &[&str], index: usize, mid: &str) -> String {
    let mut collected: Vec<&str> = Vec::new();
    let mut i = index;
    let mut steps = 0;
    while i > 0 && steps < MAX_BACKSCAN {
        i -= 1;
        steps += 1;
        let line = body[i].trim();
        if line.is_empty() {
            break;
        }
        if LINE_START_DATE.is_match(line) {
            break;
        }
        let has_prefix = TRANSACTION_PREFIXES.iter().any(|p| line.starts_with(p));
        let is_plain_text = line.chars().count() >= 10 && !line.chars().any(|c| c.is_ascii_digit());
        if has_prefix || is_plain_text {
            collected.push(line);
        }
    }
    collected.reverse();
    collected.push(mid.trim());
    collected.join(" | ")
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    #[test]
    fn debit_credit_columns_are_directly_signed() {
        let line = "02-05-2025 UPI-GROCERY STORE 450.00 - 9,550.00";
        let (date, mid, amount, balance) = match_line(line).unwrap();
        assert_eq!(date.format("%d-%m-%Y").to_string(), "02-05-2025");
        assert_eq!(mid, "UPI-GROCERY STORE");
        assert!(matches!(amount, LineAmount::Signed(a) if a == dec!(-450.00)));
        assert_eq!(balance, Some(dec!(9550.00)));
    }

    #[test]
    fn amount_only_line_resolves_sign_via_previous_balance() {
        let mut previous_balance = Some(dec!(10000.00));
        let signed = resolve_sign(LineAmount::Unsigned(dec!(450.00)), Some(dec!(9550.00)), &mut previous_balance, "UPI-GROCERY STORE");
        assert_eq!(signed, dec!(-450.00));
    }

    #[test]
    fn keyword_fallback_without_balance_context() {
        let mut previous_balance = None;
        let signed = resolve_sign(LineAmount::Unsigned(dec!(5000.00)), None, &mut previous_balance, "SALARY CREDIT MAY");
        assert_eq!(signed, dec!(5000.00));
    }

    #[test]
    fn defaults_to_expense_with_no_signal() {
        let mut previous_balance = None;
        let signed = resolve_sign(LineAmount::Unsigned(dec!(300.00)), None, &mut previous_balance, "MISC ENTRY");
        assert_eq!(signed, dec!(-300.00));
    }

    #[test]
    fn full_page_pipeline_assigns_expense_from_balance_drop() {
        let document = Document {
            pages: vec![crate::pdf::PageContent {
                text: "Date Particulars Amount Balance\n\
                       B/F 10,000.00\n\
                       02-05-2025 UPI-GROCERY STORE 450.00 9,550.00\n"
                    .to_string(),
                tables: Vec::new(),
            }],
        };
        let out = GenericTextExtractor.extract(&document);
        assert_eq!(out.len(), 1);
        assert_eq!(out[0].amount, dec!(-450.00));
        assert_eq!(out[0].date_string(), "02-05-2025");
    }
}
