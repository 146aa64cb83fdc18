//! Normalized transaction extraction from Indian bank and credit-card PDF
//! statements.
//!
//! The crate is a four-stage pipeline — PDF text layer, issuer classifier,
//! extractors, normalizer (spec §2) — exposed as one pure entry point,
//! [`extract`].

pub mod classify;
pub mod config;
pub mod error;
pub mod extract;
pub mod normalize;
pub mod pdf;
pub mod summary;
pub mod types;

pub use config::ExtractionConfig;
pub use error::{Error, Result};
pub use summary::Summary;
pub use types::Transaction;

use tracing::{debug, warn};

use pdf::error::PdfError;

/// The result of one [`extract`] call (spec §6).
#[derive(Debug, Clone, Default)]
pub struct ExtractResult {
    pub transactions: Vec<Transaction>,
    pub summary: Summary,
}

/// Extract normalized transactions from a PDF statement's bytes.
///
/// Pure in its inputs (spec §5): the PDF document is opened, read, and
/// dropped entirely within this call, and running it twice on the same
/// `(bytes, config)` returns identical output.
pub fn extract(bytes: &[u8], config: &ExtractionConfig) -> Result<ExtractResult> {
    debug!(bytes = bytes.len(), "opening document");

    let table_settings = config.table.clone().unwrap_or_default().to_table_settings();

    let mut document = pdf::open(bytes, &config.passwords, Some(&table_settings)).map_err(|e| match e {
        PdfError::PasswordRequired | PdfError::InvalidPassword => Error::PasswordRequired,
        PdfError::InvalidPdf(msg) => Error::UnreadablePdf(msg),
        other => Error::Pdf(other),
    })?;

    // Strategy 3 (text-ruled synthesis) runs once, over plain text, after
    // geometric discovery has had its chance on every page (spec §4.A).
    document.apply_text_table_fallback();

    let format = config
        .issuer_override
        .unwrap_or_else(|| classify::classify(&document.header(), &document.full_text(), document.has_tables()));
    debug!(?format, "classified statement");

    let transactions = normalize::dedupe(extract::run(format, &document));

    let mut warnings = Vec::new();
    if transactions.is_empty() {
        warn!(?format, "no transactions recognized");
        warnings.push(format!("no transactions recognized for format {format:?}"));
    }

    let mut summary = Summary::from_transactions(&transactions);
    summary.warnings = warnings;

    Ok(ExtractResult { transactions, summary })
}
