//! The normalized `Transaction` record — the pipeline's only output entity.

use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::{Serialize, Serializer};

/// Coarse income/expense tag, redundant with `sign(amount)` (spec §3).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum TransactionType {
    Income,
    Expense,
}

impl TransactionType {
    pub fn from_amount(amount: Decimal) -> Self {
        if amount.is_sign_positive() {
            TransactionType::Income
        } else {
            TransactionType::Expense
        }
    }
}

/// Coarse channel tag inferred from the description (spec §3).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum TransactionMode {
    MobileBanking,
    Atm,
    Online,
    CreditCard,
}

/// A normalized, canonical transaction record.
///
/// Produced only by extractors, mutated only by the normalizer, immutable
/// once returned from `extract` (spec §3, Lifecycle).
#[derive(Debug, Clone, Serialize)]
pub struct Transaction {
    #[serde(serialize_with = "serialize_date")]
    pub date: NaiveDate,
    pub description: String,
    pub amount: Decimal,
    pub balance: Option<Decimal>,
    #[serde(rename = "type")]
    pub transaction_type: TransactionType,
    pub mode: Option<TransactionMode>,
    pub details: String,
    pub raw_line: String,
}

impl Transaction {
    /// `date` rendered in the canonical `DD-MM-YYYY` form (spec §3, §4.D).
    pub fn date_string(&self) -> String {
        self.date.format("%d-%m-%Y").to_string()
    }

    /// The dedupe fingerprint: `(date, amount rounded to 2dp, description[:20])`
    /// (spec §3 invariant 5, Glossary).
    pub fn fingerprint(&self) -> (NaiveDate, Decimal, String) {
        let rounded = self.amount.round_dp(2);
        let prefix: String = self.description.chars().take(20).collect();
        (self.date, rounded, prefix)
    }
}

fn serialize_date<S: Serializer>(date: &NaiveDate, serializer: S) -> Result<S::Ok, S::Error> {
    serializer.serialize_str(&date.format("%d-%m-%Y").to_string())
}
