//! End-to-end scenarios from the representative-line table: classify a
//! single-page document, run the dispatched extractor, and check the
//! resulting transaction's date/amount/type/description.

use bankstmt::classify::{classify, IssuerFormat};
use bankstmt::extract;
use bankstmt::pdf::{Document, PageContent};
use bankstmt::types::TransactionType;
use rust_decimal_macros::dec;

fn single_page_document(header: &str, body: &str) -> Document {
    let text = format!("{header}\n{body}");
    Document { pages: vec![PageContent { text, tables: Vec::new() }] }
}

fn run_scenario(header: &str, body: &str, expected_format: IssuerFormat) -> Vec<bankstmt::types::Transaction> {
    let document = single_page_document(header, body);
    let format = classify(&document.header(), &document.full_text(), document.has_tables());
    assert_eq!(format, expected_format);
    extract::run(format, &document)
}

#[test]
fn icici_bbps_payment_received() {
    let header = "ICICI Bank Credit Card Statement";
    let body = "02/05/2025  11192250773  BBPS Payment received  0    10,546.66 CR";
    let txs = run_scenario(header, body, IssuerFormat::IciciCc);
    assert_eq!(txs.len(), 1);
    assert_eq!(txs[0].date_string(), "02-05-2025");
    assert_eq!(txs[0].amount, dec!(10546.66));
    assert_eq!(txs[0].transaction_type, TransactionType::Income);
    assert!(txs[0].description.contains("BBPS Payment received"));
}

#[test]
fn hdfc_swiggy_cashback_is_income() {
    let header = "HDFC Bank Credit Card Statement";
    let body = "credit card statement\n17/05/2025 1% Swiggy Cashback (Ref# ST251380084000010969336) 15.72Cr";
    let txs = run_scenario(header, body, IssuerFormat::HdfcCc);
    assert_eq!(txs.len(), 1);
    assert_eq!(txs[0].date_string(), "17-05-2025");
    assert_eq!(txs[0].amount, dec!(15.72));
    assert_eq!(txs[0].transaction_type, TransactionType::Income);
    assert!(txs[0].description.contains("Swiggy Cashback"));
}

#[test]
fn hdfc_swiggy_instamart_is_expense() {
    let header = "HDFC Bank Credit Card Statement";
    let body = "credit card statement\n19/05/2025 SWIGGY INSTAMART BANGALORE 825.00";
    let txs = run_scenario(header, body, IssuerFormat::HdfcCc);
    assert_eq!(txs.len(), 1);
    assert_eq!(txs[0].date_string(), "19-05-2025");
    assert_eq!(txs[0].amount, dec!(-825.00));
    assert_eq!(txs[0].transaction_type, TransactionType::Expense);
    assert!(txs[0].description.contains("SWIGGY INSTAMART"));
}

#[test]
fn sbi_date_canonicalizes_and_d_suffix_is_expense() {
    let header = "SBI Card Statement of Account";
    let body = "credit card statement\n20 Apr 25 SWIGGY*ORDER 174.00 D";
    let txs = run_scenario(header, body, IssuerFormat::SbiCc);
    assert_eq!(txs.len(), 1);
    assert_eq!(txs[0].date_string(), "20-04-2025");
    assert_eq!(txs[0].amount, dec!(-174.00));
    assert_eq!(txs[0].transaction_type, TransactionType::Expense);
    assert!(txs[0].description.contains("SWIGGY*ORDER"));
}

#[test]
fn indusind_eazydiner_is_expense() {
    let header = "IndusInd Bank Credit Card Statement";
    let body = "credit card statement\n04/05/2025 EAZYDINER PRIVATE LIMI GURGAON IN RESTAURANTS 41 2051.00 DR";
    let txs = run_scenario(header, body, IssuerFormat::IndusindCc);
    assert_eq!(txs.len(), 1);
    assert_eq!(txs[0].date_string(), "04-05-2025");
    assert_eq!(txs[0].amount, dec!(-2051.00));
    assert_eq!(txs[0].transaction_type, TransactionType::Expense);
    assert!(txs[0].description.contains("EAZYDINER"));
}

#[test]
fn generic_text_savings_row_resolves_expense_from_balance_drop() {
    let header = "Some Regional Bank";
    let body = "Statement of Account\n\
                Date       Particulars        Amount    Balance\n\
                B/F 10,000.00\n\
                02-05-2025 ATM WDL MG ROAD     450.00    9,550.00";
    let txs = run_scenario(header, body, IssuerFormat::GenericText);
    assert!(!txs.is_empty());
    let last = txs.last().unwrap();
    assert_eq!(last.amount, dec!(-450.00));
    assert_eq!(last.transaction_type, TransactionType::Expense);
    assert!(last.description.to_uppercase().contains("ATM WDL"));
}
