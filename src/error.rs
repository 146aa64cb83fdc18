//! Top-level error type for the extraction pipeline.

use thiserror::Error;

use crate::pdf::error::PdfError;

/// Fatal errors that abort an `extract` call (spec §7 class 1).
///
/// Recoverable per-row failures never surface here — they are pushed onto
/// `Summary.warnings` and the offending record is dropped.
#[derive(Error, Debug)]
pub enum Error {
    #[error("PDF is password protected and no valid password was supplied")]
    PasswordRequired,

    #[error("PDF could not be read: {0}")]
    UnreadablePdf(String),

    #[error(transparent)]
    Pdf(#[from] PdfError),
}

pub type Result<T> = std::result::Result<T, Error>;
