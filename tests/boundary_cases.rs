//! Boundary cases named in spec §8, exercised through the public
//! `extract::run` dispatch point rather than any extractor's private
//! helpers.

use bankstmt::classify::IssuerFormat;
use bankstmt::extract;
use bankstmt::pdf::{Document, PageContent};
use bankstmt::types::Table;
use rust_decimal_macros::dec;

#[test]
fn header_not_on_row_zero_is_still_found() {
    let table = Table::new(
        vec![
            vec!["Statement for May".into(), "".into(), "".into(), "".into()],
            vec!["Date".into(), "Particulars".into(), "Amount".into(), "Balance".into()],
            vec!["02-05-2025".into(), "UPI-GROCERY STORE".into(), "450.00".into(), "9,550.00".into()],
        ],
        1,
    );
    let document = Document { pages: vec![PageContent { text: String::new(), tables: vec![table] }] };

    let out = extract::run(IssuerFormat::GenericTable, &document);
    assert_eq!(out.len(), 1);
    assert_eq!(out[0].date_string(), "02-05-2025");
    assert_eq!(out[0].amount, dec!(-450.00));
}

#[test]
fn multi_line_row_five_debits_one_credit_recovers_via_balance_arithmetic() {
    let table = Table::new(
        vec![
            vec!["Date".into(), "Particulars".into(), "Debit".into(), "Credit".into(), "Balance".into()],
            vec![
                "01-05-2025\n02-05-2025\n03-05-2025\n04-05-2025\n05-05-2025\n06-05-2025".into(),
                "UPI-A\nUPI-B\nUPI-C\nUPI-D\nSALARY CREDIT\nUPI-E".into(),
                "100.00\n200.00\n150.00\n300.00\n400.00".into(),
                "50000.00".into(),
                "9900.00\n9700.00\n9550.00\n9250.00\n59250.00\n58850.00".into(),
            ],
        ],
        1,
    );
    let document = Document { pages: vec![PageContent { text: String::new(), tables: vec![table] }] };

    let out = extract::run(IssuerFormat::GenericTable, &document);
    assert_eq!(out.len(), 6);
    // exactly one credit recovered among five debits, correctly placed by
    // balance arithmetic rather than raw column order.
    let credits: Vec<_> = out.iter().filter(|t| t.amount.is_sign_positive()).collect();
    assert_eq!(credits.len(), 1);
    assert_eq!(credits[0].amount, dec!(50000.00));
}

#[test]
fn credit_card_cr_suffix_vs_unsuffixed_same_amount_differ_in_sign() {
    let document = Document {
        pages: vec![PageContent {
            text: "HDFC Bank Credit Card Statement\ncredit card statement\n\
                   10/05/2025 REFUND FROM MERCHANT 500.00Cr\n\
                   11/05/2025 SOME OTHER MERCHANT 500.00"
                .to_string(),
            tables: Vec::new(),
        }],
    };
    let out = extract::run(IssuerFormat::HdfcCc, &document);
    assert_eq!(out.len(), 2);
    assert_eq!(out[0].amount, dec!(500.00));
    assert_eq!(out[1].amount, dec!(-500.00));
}

#[test]
fn sbi_date_boundary_canonicalizes_two_digit_year() {
    let document = Document {
        pages: vec![PageContent {
            text: "SBI Card Statement of Account\ncredit card statement\n\
                   20 Apr 25 SWIGGY*ORDER 174.00 D"
                .to_string(),
            tables: Vec::new(),
        }],
    };
    let out = extract::run(IssuerFormat::SbiCc, &document);
    assert_eq!(out.len(), 1);
    assert_eq!(out[0].date_string(), "20-04-2025");
}

#[test]
fn icici_tabular_and_text_paths_agree_and_dedupe_to_one() {
    let table = Table::new(
        vec![
            vec![
                "Date".into(),
                "SerNo".into(),
                "Transaction Details".into(),
                "Reward Points".into(),
                "Intl Amount".into(),
                "Amount".into(),
            ],
            vec![
                "02/05/2025".into(),
                "11192250773".into(),
                "BBPS Payment received".into(),
                "0".into(),
                "0".into(),
                "10,546.66 CR".into(),
            ],
        ],
        1,
    );
    let text = "02/05/2025 11192250773 BBPS Payment received 0 10,546.66 CR".to_string();
    let document = Document { pages: vec![PageContent { text, tables: vec![table] }] };

    let out = extract::run(IssuerFormat::IciciCc, &document);
    assert_eq!(out.len(), 1);
    assert_eq!(out[0].amount, dec!(10546.66));
}

#[test]
fn hdfc_minimum_amount_due_line_produces_no_transaction() {
    let document = Document {
        pages: vec![PageContent {
            text: "HDFC Bank Credit Card Statement\ncredit card statement\n\
                   19/05/2025 Minimum Amount Due 5,000.00\n\
                   19/05/2025 SWIGGY INSTAMART BANGALORE 825.00"
                .to_string(),
            tables: Vec::new(),
        }],
    };
    let out = extract::run(IssuerFormat::HdfcCc, &document);
    assert_eq!(out.len(), 1);
    assert!(out[0].description.contains("SWIGGY INSTAMART"));
}
