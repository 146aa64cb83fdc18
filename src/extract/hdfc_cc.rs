//! HDFC credit-card text extractor (spec §4.C.3).

use crate::extract::{grammar, Extractor};
use crate::normalize::amount::AmountSuffix;
use crate::normalize::description;
use crate::pdf::Document;
use crate::types::{Transaction, TransactionType};

pub struct HdfcCcExtractor;

impl Extractor for HdfcCcExtractor {
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

    let (date, rest) = grammar::slash_date_head(line)?;
    let (magnitude, suffix, desc_raw) = grammar::amount_tail(rest)?;
    let amount = match suffix {
        Some(AmountSuffix::Credit) => magnitude,
        _ => -magnitude,
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

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn cr_suffix_is_income() {
        let t = extract_line("17/05/2025 1% Swiggy Cashback (Ref# ST251380084000010969336) 15.72Cr").unwrap();
        assert_eq!(t.amount.to_string(), "15.72");
        assert_eq!(t.transaction_type, TransactionType::Income);
        assert!(t.description.contains("Swiggy Cashback"));
    }

    #[test]
    fn absent_suffix_is_expense() {
        let t = extract_line("19/05/2025 SWIGGY INSTAMART BANGALORE 825.00").unwrap();
        assert_eq!(t.amount.to_string(), "-825.00");
        assert_eq!(t.description, "SWIGGY INSTAMART");
    }

    #[test]
    fn summary_line_produces_no_transaction() {
        assert!(extract_line("19/05/2025 Minimum Amount Due 5,000.00").is_none());
    }

    #[test]
    fn non_matching_line_is_skipped() {
        assert!(extract_line("Statement Period: 01/05/2025 to 31/05/2025").is_none());
    }
}
