//! Aggregate counts returned alongside the transaction list (spec §6).

use rust_decimal::Decimal;
use serde::Serialize;

use crate::types::Transaction;

/// Summary statistics over one `extract` call's transactions.
#[derive(Debug, Clone, Default, Serialize)]
pub struct Summary {
    pub total: usize,
    pub debits: usize,
    pub credits: usize,
    pub total_debit_amount: Decimal,
    pub total_credit_amount: Decimal,
    /// Non-fatal issues surfaced per spec §7 class 2/3 (never a reason to
    /// fail the call).
    pub warnings: Vec<String>,
}

impl Summary {
    pub fn from_transactions(transactions: &[Transaction]) -> Self {
        let mut summary = Summary { total: transactions.len(), ..Default::default() };
        for t in transactions {
            if t.amount.is_sign_negative() {
                summary.debits += 1;
                summary.total_debit_amount += -t.amount;
            } else {
                summary.credits += 1;
                summary.total_credit_amount += t.amount;
            }
        }
        summary
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::{TransactionType};
    use chrono::NaiveDate;
    use rust_decimal_macros::dec;

    fn tx(amount: Decimal) -> Transaction {
        Transaction {
            date: NaiveDate::from_ymd_opt(2025, 5, 2).unwrap(),
            description: "TEST".into(),
            amount,
            balance: None,
            transaction_type: TransactionType::from_amount(amount),
            mode: None,
            details: String::new(),
            raw_line: String::new(),
        }
    }

    #[test]
    fn splits_debits_and_credits() {
        let txs = vec![tx(dec!(-100.00)), tx(dec!(50.00)), tx(dec!(-25.50))];
        let summary = Summary::from_transactions(&txs);
        assert_eq!(summary.total, 3);
        assert_eq!(summary.debits, 2);
        assert_eq!(summary.credits, 1);
        assert_eq!(summary.total_debit_amount, dec!(125.50));
        assert_eq!(summary.total_credit_amount, dec!(50.00));
    }

    #[test]
    fn debits_plus_credits_equals_total() {
        let txs = vec![tx(dec!(-1.00)), tx(dec!(2.00)), tx(dec!(-3.00)), tx(dec!(4.00))];
        let summary = Summary::from_transactions(&txs);
        assert_eq!(summary.debits + summary.credits, summary.total);
    }
}
