//! ICICI credit-card row handler (spec §4.C.2): a tabular path and a text
//! path over the same 6-column layout, merged and deduplicated.

use once_cell::sync::Lazy;
use regex::{Match, Regex};
use rust_decimal::Decimal;

use crate::extract::{grammar, Extractor};
use crate::normalize::amount::{parse_amount, AmountSuffix};
use crate::normalize::date::parse_date;
use crate::normalize::{description, dedupe};
use crate::pdf::Document;
use crate::types::{Table, Transaction, TransactionType};

const CREDIT_KEYWORDS: &[&str] = &["PAYMENT", "BBPS", "CREDIT", "REFUND", "REVERSAL", "CASHBACK", "REWARD"];

pub struct IciciCcExtractor;

impl Extractor for IciciCcExtractor {
    fn extract(&self, document: &Document) -> Vec<Transaction> {
        let mut from_tables = Vec::new();
        for table in document.tables() {
            if let Some(header_idx) = find_icici_header(table) {
                from_tables.extend(extract_tabular(table, header_idx));
            }
        }

        let from_text = document.pages.iter().flat_map(|page| extract_text(&page.text));

        let mut combined = from_tables;
        combined.extend(from_text);
        dedupe(combined)
    }
}

fn find_icici_header(table: &Table) -> Option<usize> {
    if table.col_count() != 6 {
        return None;
    }
    (0..table.row_count()).find(|&i| {
        let joined = table.row(i).unwrap().join(" ").to_lowercase();
        joined.contains("reward") && joined.contains("intl")
    })
}

/// Tabular path: one record per qualifying 1×6 data row (spec §4.C.2).
pub fn extract_tabular(table: &Table, header_idx: usize) -> Vec<Transaction> {
    table.cells[header_idx + 1..]
        .iter()
        .filter_map(|row| extract_tabular_row(row))
        .collect()
}

fn extract_tabular_row(row: &[String]) -> Option<Transaction> {
    if row.len() < 6 {
        return None;
    }
    let date = parse_date(row[0].trim())?;
    if !row[1].trim().chars().next()?.is_ascii_digit() {
        return None;
    }
    if row[2].trim().chars().count() < 2 {
        return None;
    }
    let (magnitude, suffix) = parse_amount(row[5].trim())?;
    let amount = assign_sign(magnitude, suffix, &row[2]);
    Some(build_transaction(date, &row[2], amount, row.join(" | ")))
}

/// `desc reward amt suffix` — not one of spec §4.C.2's five named patterns,
/// but tried first: the flattened text of a 6-column row often drops a
/// blank `intl amount` cell entirely, leaving a bare reward-points integer
/// sitting between the description and the amount. Without isolating it
/// here the description swallows it (see DESIGN.md).
static PATTERN_REWARD_AMOUNT_SUFFIX: Lazy<Regex> = Lazy::new(|| {
    Regex::new(
        r"(?i)^\s*(?P<date>\d{1,2}/\d{1,2}/\d{4})\s+(?P<serial>\d+)\s+(?P<desc>.+?)\s+(?P<reward>\d[\d,]*(?:\.\d+)?)\s+(?P<amt>[\d,]+\.\d{1,2})\s*(?P<suffix>CR|DR)\s*$",
    )
    .unwrap()
});

static PATTERN_AMOUNT_SUFFIX: Lazy<Regex> = Lazy::new(|| {
    Regex::new(
        r"(?i)^\s*(?P<date>\d{1,2}/\d{1,2}/\d{4})\s+(?P<serial>\d+)\s+(?P<desc>.+?)\s+(?P<amt>[\d,]+\.\d{1,2})\s*(?P<suffix>CR|DR)\s*$",
    )
    .unwrap()
});

static PATTERN_REWARD_INTL_SUFFIX: Lazy<Regex> = Lazy::new(|| {
    Regex::new(
        r"(?i)^\s*(?P<date>\d{1,2}/\d{1,2}/\d{4})\s+(?P<serial>\d+)\s+(?P<desc>.+?)\s+[\d,]*\.?\d*\s+[\d,]*\.?\d*\s+(?P<amt>[\d,]+\.\d{1,2})\s*(?P<suffix>CR|DR)\s*$",
    )
    .unwrap()
});

static PATTERN_AMOUNT_ONLY: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"(?i)^\s*(?P<date>\d{1,2}/\d{1,2}/\d{4})\s+(?P<serial>\d+)\s+(?P<desc>.+?)\s+(?P<amt>[\d,]+\.\d{1,2})\s*$").unwrap()
});

static PATTERN_REWARD_AMOUNT: Lazy<Regex> = Lazy::new(|| {
    Regex::new(
        r"(?i)^\s*(?P<date>\d{1,2}/\d{1,2}/\d{4})\s+(?P<serial>\d+)\s+(?P<desc>.+?)\s+[\d,]*\.?\d*\s+(?P<amt>[\d,]+\.\d{1,2})\s*$",
    )
    .unwrap()
});

static PATTERN_FLEXIBLE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(
        r"(?i)^\s*(?P<date>\d{1,2}/\d{1,2}/\d{4})\s+(?P<serial>\d+)\s+(?P<desc>.+?)\s+(?P<amt>[\d,]+\.\d{1,2})\s*(?P<suffix>CR|DR)?\s*$",
    )
    .unwrap()
});

static PATTERN_LOOSE: Lazy<Regex> = Lazy::new(|| Regex::new(r"^\s*(?P<date>\d{1,2}/\d{1,2}/\d{4})\s+(?P<serial>\d+)\s+(?P<rest>.+)$").unwrap());

/// Text path: priority-ordered grammar dispatch, first match per line wins
/// (spec §4.C.2).
pub fn extract_text(text: &str) -> Vec<Transaction> {
    text.lines().filter_map(extract_text_line).collect()
}

fn extract_text_line(line: &str) -> Option<Transaction> {
    let trimmed = line.trim();
    if trimmed.is_empty() {
        return None;
    }

    for pattern in [
        &*PATTERN_REWARD_AMOUNT_SUFFIX,
        &*PATTERN_AMOUNT_SUFFIX,
        &*PATTERN_REWARD_INTL_SUFFIX,
        &*PATTERN_AMOUNT_ONLY,
        &*PATTERN_REWARD_AMOUNT,
        &*PATTERN_FLEXIBLE,
    ] {
        if let Some(caps) = pattern.captures(trimmed) {
            let date = parse_date(caps.name("date")?.as_str())?;
            let desc_raw = caps.name("desc")?.as_str();
            let (magnitude, _) = parse_amount(caps.name("amt")?.as_str())?;
            let suffix = caps.name("suffix").and_then(|m| parse_suffix(m));
            let amount = assign_sign(magnitude, suffix, desc_raw);
            return Some(build_transaction(date, desc_raw, amount, trimmed.to_string()));
        }
    }

    let caps = PATTERN_LOOSE.captures(trimmed)?;
    let date = parse_date(caps.name("date")?.as_str())?;
    let rest = caps.name("rest")?.as_str();
    let (amount_str, desc_raw) = split_last_numeric_token(rest)?;
    let (magnitude, suffix) = parse_amount(&amount_str)?;
    let amount = assign_sign(magnitude, suffix, &desc_raw);
    Some(build_transaction(date, &desc_raw, amount, trimmed.to_string()))
}

fn parse_suffix(m: Match) -> Option<AmountSuffix> {
    match m.as_str().to_uppercase().as_str() {
        "CR" => Some(AmountSuffix::Credit),
        "DR" => Some(AmountSuffix::Debit),
        _ => None,
    }
}

fn split_last_numeric_token(rest: &str) -> Option<(String, String)> {
    let tokens: Vec<&str> = rest.split_whitespace().collect();
    let idx = tokens.iter().rposition(|t| t.chars().any(|c| c.is_ascii_digit()))?;
    let amount_str = tokens[idx].to_string();
    let desc = tokens[..idx].join(" ");
    Some((amount_str, desc))
}

/// `CR` positive, `DR` negative, no suffix: positive if description
/// contains a credit-sounding keyword, else negative (spec §4.C.2, Open
/// Question 1).
fn assign_sign(magnitude: Decimal, suffix: Option<AmountSuffix>, description: &str) -> Decimal {
    match suffix {
        Some(AmountSuffix::Credit) => magnitude,
        Some(AmountSuffix::Debit) => -magnitude,
        None => {
            if grammar::has_credit_keyword(description, CREDIT_KEYWORDS) {
                magnitude
            } else {
                -magnitude
            }
        }
    }
}

fn build_transaction(date: chrono::NaiveDate, raw_description: &str, amount: Decimal, raw_line: String) -> Transaction {
    let description = description::clean(raw_description);
    Transaction {
        date,
        description: description.clone(),
        amount,
        balance: None,
        transaction_type: TransactionType::from_amount(amount),
        mode: grammar::infer_mode(&description),
        details: description,
        raw_line,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn no_suffix_zero_reward_defaults_positive_on_bbps_keyword() {
        let t = extract_text_line("02/05/2025 11192250773 BBPS Payment received 0 10,546.66 CR").unwrap();
        assert_eq!(t.date_string(), "02-05-2025");
        assert_eq!(t.amount.to_string(), "10546.66");
        assert_eq!(t.transaction_type, TransactionType::Income);
        assert!(t.description.contains("BBPS Payment received"));
    }

    #[test]
    fn dr_suffix_is_expense() {
        let t = extract_text_line("03/05/2025 11192250774 AMAZON PURCHASE 1500.00 DR").unwrap();
        assert_eq!(t.amount.to_string(), "-1500.00");
    }

    #[test]
    fn no_suffix_no_keyword_defaults_negative() {
        let t = extract_text_line("03/05/2025 11192250775 GROCERY STORE PURCHASE 500.00").unwrap();
        assert_eq!(t.amount.to_string(), "-500.00");
    }

    #[test]
    fn tabular_and_text_paths_dedupe_to_one_record() {
        let table = Table::new(
            vec![
                vec!["Date".into(), "SerNo".into(), "Transaction Details".into(), "Reward Points".into(), "Intl Amount".into(), "Amount".into()],
                vec!["02/05/2025".into(), "11192250773".into(), "BBPS Payment received".into(), "0".into(), "0".into(), "10,546.66 CR".into()],
            ],
            1,
        );
        let tabular = extract_tabular(&table, 0);
        let text = extract_text("02/05/2025 11192250773 BBPS Payment received 0 10,546.66 CR");

        let mut combined = tabular;
        combined.extend(text);
        let deduped = dedupe(combined);
        assert_eq!(deduped.len(), 1);
    }
}
