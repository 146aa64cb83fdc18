//! Cross-extractor deduplication (spec §3 invariant 5, §4.C.2, Glossary).

use std::collections::HashSet;

use crate::types::Transaction;

/// Merge transactions from (possibly) multiple extractors on the same
/// fingerprint, first occurrence wins.
///
/// Preserves the order of `transactions` — per spec §5's ordering
/// guarantee, the primary extractor's order is kept and any secondary
/// contributions are appended in their own order, minus duplicates. This
/// only dedupes; callers are responsible for feeding primary entries
/// before secondary ones.
pub fn dedupe(transactions: Vec<Transaction>) -> Vec<Transaction> {
    let mut seen = HashSet::new();
    let mut out = Vec::with_capacity(transactions.len());
    for t in transactions {
        if seen.insert(t.fingerprint()) {
            out.push(t);
        }
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::{TransactionMode, TransactionType};
    use chrono::NaiveDate;
    use rust_decimal_macros::dec;

    fn tx(desc: &str, amount: rust_decimal::Decimal) -> Transaction {
        Transaction {
            date: NaiveDate::from_ymd_opt(2025, 5, 2).unwrap(),
            description: desc.to_string(),
            amount,
            balance: None,
            transaction_type: TransactionType::from_amount(amount),
            mode: None::<TransactionMode>,
            details: String::new(),
            raw_line: String::new(),
        }
    }

    #[test]
    fn keeps_first_occurrence_on_duplicate_fingerprint() {
        let a = tx("BBPS Payment received", dec!(10546.66));
        let mut b = tx("BBPS Payment received via table path", dec!(10546.66));
        b.raw_line = "table-row".into();
        let result = dedupe(vec![a.clone(), b]);
        assert_eq!(result.len(), 1);
        assert_eq!(result[0].raw_line, a.raw_line);
    }

    #[test]
    fn keeps_distinct_transactions() {
        let a = tx("UPI-ONE", dec!(-100));
        let b = tx("UPI-TWO", dec!(-200));
        let result = dedupe(vec![a, b]);
        assert_eq!(result.len(), 2);
    }
}
