//! IndusInd credit-card text extractor (spec §4.C.5).
//!
//! Unlike HDFC/SBI, the `DR`/`CR` suffix is mandatory here — a line with no
//! suffix is not a transaction at all, not a sign-ambiguous one.

use crate::extract::{grammar, Extractor};
use crate::normalize::amount::AmountSuffix;
use crate::normalize::description;
use crate::pdf::Document;
use crate::types::{Transaction, TransactionType};

pub struct IndusindCcExtractor;

impl Extractor for IndusindCcExtractor {
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
    let (date, rest) = grammar::slash_date_head(line)?;
    let (magnitude, suffix, desc_raw) = grammar::amount_tail(rest)?;
    let suffix = suffix?;
    let amount = match suffix {
        AmountSuffix::Credit => magnitude,
        AmountSuffix::Debit => -magnitude,
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
    fn dr_suffix_is_expense() {
        let t = extract_line("04/05/2025 EAZYDINER PRIVATE LIMI GURGAON IN RESTAURANTS 41 2051.00 DR").unwrap();
        assert_eq!(t.date_string(), "04-05-2025");
        assert_eq!(t.amount.to_string(), "-2051.00");
        assert!(t.description.contains("EAZYDINER"));
    }

    #[test]
    fn cr_suffix_is_income() {
        let t = extract_line("05/05/2025 REFUND FROM MERCHANT 500.00 CR").unwrap();
        assert_eq!(t.transaction_type, TransactionType::Income);
    }

    #[test]
    fn missing_suffix_is_not_a_transaction() {
        assert!(extract_line("06/05/2025 SOME LINE WITH NO SUFFIX 100.00").is_none());
    }
}
