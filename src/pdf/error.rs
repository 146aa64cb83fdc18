//! Errors raised while opening or reading a PDF document.

use thiserror::Error;

#[derive(Error, Debug)]
pub enum PdfError {
    #[error("invalid or corrupt PDF: {0}")]
    InvalidPdf(String),

    #[error("incorrect password")]
    InvalidPassword,

    #[error("PDF is encrypted and requires a password")]
    PasswordRequired,

    #[error("page {0} not found")]
    PageNotFound(usize),

    #[error("failed to extract text: {0}")]
    TextExtractionFailed(String),

    #[error("I/O error: {0}")]
    IOError(String),
}

pub type Result<T> = std::result::Result<T, PdfError>;
