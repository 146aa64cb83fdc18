//! Generic tabular extractor (spec §4.C.1): header location, column role
//! mapping, multi-line row splitting, balance-arithmetic amount
//! reattribution, and description-line clustering.

use std::collections::VecDeque;

use rust_decimal::Decimal;

use crate::extract::{grammar, icici_cc, Extractor};
use crate::normalize::amount::{parse_amount, AmountSuffix};
use crate::normalize::date::parse_date;
use crate::normalize::description;
use crate::pdf::Document;
use crate::types::{Table, Transaction, TransactionType};

const HEADER_KEYWORDS: &[&str] = &[
    "date",
    "transaction",
    "particulars",
    "description",
    "narration",
    "amount",
    "balance",
    "debit",
    "credit",
    "withdrawal",
    "deposit",
    "remarks",
    "value date",
    "serno",
    "reward",
    "intl",
];
const HEADER_KEYWORD_THRESHOLD: usize = 2;

const TRANSACTION_PREFIXES: &[&str] = &["UPI-", "REV-", "NEFT-", "IMPS-", "ACH-", "CC"];

#[derive(Debug, Default, Clone, Copy)]
struct ColumnRoles {
    date: Option<usize>,
    desc: Option<usize>,
    debit: Option<usize>,
    credit: Option<usize>,
    amount: Option<usize>,
    balance: Option<usize>,
}

pub struct GenericTableExtractor;

impl Extractor for GenericTableExtractor {
    fn extract(&self, document: &Document) -> Vec<Transaction> {
        document.tables().flat_map(extract_table).collect()
    }
}

fn extract_table(table: &Table) -> Vec<Transaction> {
    let Some(header_idx) = find_header_row(table) else {
        return Vec::new();
    };

    if table.col_count() == 6 && is_icici_layout(table, header_idx) {
        return icici_cc::extract_tabular(table, header_idx);
    }

    let roles = map_columns(table.row(header_idx).unwrap());
    if roles.date.is_none() {
        return Vec::new();
    }

    table.cells[header_idx + 1..].iter().flat_map(|row| extract_row(row, &roles)).collect()
}

fn find_header_row(table: &Table) -> Option<usize> {
    (0..table.row_count()).find(|&i| {
        let joined = table.row(i).unwrap().join(" ").to_lowercase();
        HEADER_KEYWORDS.iter().filter(|kw| joined.contains(**kw)).count() >= HEADER_KEYWORD_THRESHOLD
    })
}

fn is_icici_layout(table: &Table, header_idx: usize) -> bool {
    let joined = table.row(header_idx).unwrap().join(" ").to_lowercase();
    joined.contains("reward") && joined.contains("intl")
}

fn map_columns(header_row: &[String]) -> ColumnRoles {
    let mut roles = ColumnRoles::default();
    for (i, cell) in header_row.iter().enumerate() {
        let lower = cell.to_lowercase();
        if roles.date.is_none() && lower.contains("date") {
            roles.date = Some(i);
        } else if roles.desc.is_none()
            && (lower.contains("particular") || lower.contains("description") || lower.contains("narration") || lower.contains("remarks"))
        {
            roles.desc = Some(i);
        } else if roles.debit.is_none() && (lower.contains("debit") || lower.contains("withdrawal")) {
            roles.debit = Some(i);
        } else if roles.credit.is_none() && (lower.contains("credit") || lower.contains("deposit")) {
            roles.credit = Some(i);
        } else if roles.amount.is_none() && lower.contains("amount") {
            roles.amount = Some(i);
        } else if roles.balance.is_none() && lower.contains("balance") {
            roles.balance = Some(i);
        }
    }
    roles
}

fn cell_lines(row: &[String], col: usize) -> Vec<String> {
    row.get(col)
        .map(|cell| cell.split('\n').map(|s| s.trim().to_string()).filter(|s| !s.is_empty()).collect())
        .unwrap_or_default()
}

fn extract_row(row: &[String], roles: &ColumnRoles) -> Vec<Transaction> {
    let date_strings = roles.date.map(|c| cell_lines(row, c)).unwrap_or_default();
    let balance_strings = roles.balance.map(|c| cell_lines(row, c)).unwrap_or_default();

    let n = if !date_strings.is_empty() {
        date_strings.len()
    } else if !balance_strings.is_empty() {
        balance_strings.len()
    } else {
        1
    };

    let dates: Vec<Option<chrono::NaiveDate>> = (0..n).map(|i| date_strings.get(i).and_then(|s| parse_date(s))).collect();

    let balances: Vec<Option<Decimal>> =
        (0..n).map(|i| balance_strings.get(i).and_then(|s| parse_amount(s)).map(|(a, _)| a)).collect();

    let amounts = resolve_amounts(row, roles, n, &balances);

    let descriptions = roles.desc.map(|c| group_descriptions(&cell_lines(row, c), n)).unwrap_or_else(|| vec![String::new(); n]);

    let mut out = Vec::new();
    for i in 0..n {
        let (Some(date), Some(amount)) = (dates[i], amounts[i]) else { continue };
        if amount.is_zero() {
            continue;
        }
        let description = description::clean(descriptions.get(i).map(String::as_str).unwrap_or(""));
        out.push(Transaction {
            date,
            description: description.clone(),
            amount,
            balance: balances[i],
            transaction_type: TransactionType::from_amount(amount),
            mode: grammar::infer_mode(&description),
            details: description,
            raw_line: row.join(" | "),
        });
    }
    out
}

/// Amount reattribution (spec §4.C.1.4): when debit/credit are split
/// across lines and ≥2 balances are available, recover signed amounts from
/// the balance recurrence rather than the (lost) original column order.
fn resolve_amounts(row: &[String], roles: &ColumnRoles, n: usize, balances: &[Option<Decimal>]) -> Vec<Option<Decimal>> {
    if let (Some(debit_col), Some(credit_col)) = (roles.debit, roles.credit) {
        let debit_lines = cell_lines(row, debit_col);
        let credit_lines = cell_lines(row, credit_col);
        let balance_values: Vec<Decimal> = balances.iter().filter_map(|b| *b).collect();

        if (debit_lines.len() > 1 || credit_lines.len() > 1) && balance_values.len() >= 2 {
            return balance_arithmetic(&debit_lines, &credit_lines, &balance_values, n);
        }

        return (0..n)
            .map(|i| {
                if let Some((d, _)) = debit_lines.get(i).and_then(|s| parse_amount(s)) {
                    Some(-d)
                } else if let Some((c, _)) = credit_lines.get(i).and_then(|s| parse_amount(s)) {
                    Some(c)
                } else {
                    None
                }
            })
            .collect();
    }

    if let Some(amount_col) = roles.amount {
        let amount_lines = cell_lines(row, amount_col);
        return (0..n)
            .map(|i| {
                amount_lines.get(i).and_then(|s| parse_amount(s)).map(|(magnitude, suffix)| match suffix {
                    Some(AmountSuffix::Credit) => magnitude,
                    _ => -magnitude,
                })
            })
            .collect();
    }

    vec![None; n]
}

/// `A[0]` is the first raw debit (or, failing that, first raw credit);
/// `A[i] = B[i] - B[i-1]` for `i >= 1`; remaining slots are padded from
/// leftover raw debits then raw credits (spec §4.C.1.4).
fn balance_arithmetic(debit_lines: &[String], credit_lines: &[String], balances: &[Decimal], n: usize) -> Vec<Option<Decimal>> {
    let mut raw_debits: VecDeque<Decimal> = debit_lines.iter().filter_map(|s| parse_amount(s)).map(|(a, _)| a).collect();
    let mut raw_credits: VecDeque<Decimal> = credit_lines.iter().filter_map(|s| parse_amount(s)).map(|(a, _)| a).collect();

    let mut amounts: Vec<Decimal> = Vec::with_capacity(n);
    if let Some(first_debit) = raw_debits.pop_front() {
        amounts.push(-first_debit);
    } else if let Some(first_credit) = raw_credits.pop_front() {
        amounts.push(first_credit);
    }

    for i in 1..balances.len() {
        amounts.push(balances[i] - balances[i - 1]);
    }

    while amounts.len() < n {
        if let Some(d) = raw_debits.pop_front() {
            amounts.push(-d);
        } else if let Some(c) = raw_credits.pop_front() {
            amounts.push(c);
        } else {
            break;
        }
    }
    amounts.truncate(n);
    amounts.into_iter().map(Some).collect()
}

/// Cluster description lines on transaction-start prefixes, pad to `n`
/// with empty strings (spec §4.C.1.5).
fn group_descriptions(lines: &[String], n: usize) -> Vec<String> {
    let mut clusters: Vec<Vec<String>> = Vec::new();
    for line in lines {
        let starts_cluster = clusters.is_empty() || TRANSACTION_PREFIXES.iter().any(|p| line.starts_with(p));
        if starts_cluster {
            clusters.push(vec![line.clone()]);
        } else {
            clusters.last_mut().unwrap().push(line.clone());
        }
    }
    let mut joined: Vec<String> = clusters.into_iter().map(|c| c.join(" | ")).collect();
    joined.resize(n, String::new());
    joined
}
