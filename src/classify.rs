//! Issuer/format classification (spec §4.B).
//!
//! A tagged variant replaces the cascading string-check classes of the
//! source system (design note §9): one enum, one `classify` function, one
//! dispatch point in `extract::run`.

use serde::{Deserialize, Serialize};

/// The closed set of issuer/format variants a statement can be tagged as.
///
/// Ordered by classification priority: `classify` returns the first
/// matching variant, so the discriminant order below mirrors the priority
/// table in spec §4.B.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum IssuerFormat {
    SbiCc,
    HdfcCc,
    IndusindCc,
    IciciCc,
    GenericTable,
    GenericText,
}

/// Length of the header region inspected for issuer tokens (spec §4.B).
const HEADER_LEN: usize = 500;

/// Classify a statement from page-1 header text, full body text, and whether
/// table discovery found any tables.
///
/// `header` is expected to already be the first `HEADER_LEN` characters of
/// page 1's text (callers may pass the full page text; it is truncated
/// here too, defensively).
pub fn classify(header: &str, body: &str, has_tables: bool) -> IssuerFormat {
    let header = lower_prefix(header, HEADER_LEN);
    let body = body.to_lowercase();

    let body_has_cc_statement = body.contains("credit card") && body.contains("statement");

    if (header.contains("sbi card") || header.contains("sbi credit card") || header.contains("state bank of india"))
        && body_has_cc_statement
    {
        return IssuerFormat::SbiCc;
    }

    if (header.contains("hdfc bank") || header.contains("hdfc credit card") || header.contains("hdfc card"))
        && body_has_cc_statement
    {
        return IssuerFormat::HdfcCc;
    }

    if (header.contains("indusind") || header.contains("indusind bank")) && body_has_cc_statement {
        return IssuerFormat::IndusindCc;
    }

    if body.contains("icici") {
        return IssuerFormat::IciciCc;
    }

    if has_tables {
        return IssuerFormat::GenericTable;
    }

    IssuerFormat::GenericText
}

fn lower_prefix(s: &str, max_chars: usize) -> String {
    s.chars().take(max_chars).collect::<String>().to_lowercase()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn sbi_header_with_cc_body() {
        let header = "SBI Card Statement of Account";
        let body = "this is your credit card statement for the period";
        assert_eq!(classify(header, body, false), IssuerFormat::SbiCc);
    }

    #[test]
    fn hdfc_takes_priority_over_icici_mention_in_body() {
        let header = "HDFC Bank Credit Card";
        let body = "credit card statement, in partnership with icici network";
        assert_eq!(classify(header, body, false), IssuerFormat::HdfcCc);
    }

    #[test]
    fn indusind_header() {
        let header = "IndusInd Bank Credit Card Statement";
        let body = "your credit card statement details below";
        assert_eq!(classify(header, body, false), IssuerFormat::IndusindCc);
    }

    #[test]
    fn icici_is_broad_body_only_match() {
        let header = "Statement";
        let body = "ICICI Bank transactions for this period";
        assert_eq!(classify(header, body, false), IssuerFormat::IciciCc);
    }

    #[test]
    fn generic_table_when_tables_found() {
        let header = "Axis Bank";
        let body = "savings account statement";
        assert_eq!(classify(header, body, true), IssuerFormat::GenericTable);
    }

    #[test]
    fn generic_text_fallback() {
        let header = "Some Bank";
        let body = "a statement with no tables and no known issuer tokens";
        assert_eq!(classify(header, body, false), IssuerFormat::GenericText);
    }

    #[test]
    fn sbi_header_without_cc_body_falls_through() {
        let header = "SBI Card";
        let body = "savings account summary";
        assert_eq!(classify(header, body, true), IssuerFormat::GenericTable);
    }
}
