//! SBI credit-card text extractor (spec §4.C.4).

use crate::extract::{grammar, Extractor};
use crate::normalize::amount::AmountSuffix;
use crate::normalize::description;
use crate::pdf::Document;
use crate::types::{Transaction, TransactionType};

const CREDIT_KEYWORDS: &[&str] = &["PAYMENT", "CREDIT", "CASHBACK", "REFUND", "REVERSAL"];

pub struct SbiCcExtractor;

impl Extractor for SbiCcExtractor {
    fn extract(&self, document: &Document) -> Vec<Transaction> {
        document
            .pages
            .iter()
            .flat_map(|page| page.text.lines())
            .filter_map(extract_line)
            .collect()
    }
}

fn extract_line(line: &str) -> Option<Transaction> {
    if grammar::is_summary_line(line) {
        return None;
    }

    let (date, rest) = grammar::sbi_date_head(line)?;
    let (magnitude, suffix, desc_raw) = grammar::amount_tail(rest)?;
    let amount = match suffix {
        Some(AmountSuffix::Credit) => magnitude,
        Some(AmountSuffix::Debit) => -magnitude,
        None => {
            if grammar::has_credit_keyword(&desc_raw, CREDIT_KEYWORDS) {
                magnitude
            } else {
                -magnitude
            }
        }
    };

    let description = description::clean(&desc_raw);
    Some(Transaction {
        date,
        description: description.clone(),
        amount,
        balance: None,
        transaction_type: TransactionType::from_amount(amount),
        mode: grammar::infer_mode(&description),
        details: description,
        raw_line: line.trim().to_string(),
    })
}
