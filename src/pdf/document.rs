//! Open a PDF and expose its plain text and detected tables per page
//! (spec §4.A).

use lopdf::Document as LopdfDocument;
use pdfium_render::prelude::*;

use super::error::{PdfError, Result};
use super::table_finder::{find_tables, DetectedTable, TableSettings, TableStrategy};
use super::text_table;
use crate::types::Table;

/// One page's extracted content.
#[derive(Debug, Clone, Default)]
pub struct PageContent {
    pub text: String,
    pub tables: Vec<Table>,
}

/// A PDF document reduced to the two things the rest of the pipeline needs:
/// per-page plain text and per-page detected tables.
///
/// Opened, used, and dropped within a single `extract` call (spec §5) — it
/// owns no long-lived handles beyond the call.
#[derive(Debug, Clone, Default)]
pub struct Document {
    pub pages: Vec<PageContent>,
}

impl Document {
    /// Concatenated text of every page (spec §4.B "full document body").
    pub fn full_text(&self) -> String {
        self.pages.iter().map(|p| p.text.as_str()).collect::<Vec<_>>().join("\n")
    }

    /// First 500 characters of page 1's text — the classifier's header
    /// region (spec §4.B).
    pub fn header(&self) -> String {
        self.pages.first().map(|p| p.text.chars().take(500).collect()).unwrap_or_default()
    }

    pub fn has_tables(&self) -> bool {
        self.pages.iter().any(|p| !p.tables.is_empty())
    }

    pub fn tables(&self) -> impl Iterator<Item = &Table> {
        self.pages.iter().flat_map(|p| p.tables.iter())
    }

    /// Strategy 3 of spec §4.A: for any page where geometric table
    /// discovery found nothing, synthesize a table from the plain text
    /// header-and-rows pattern instead.
    pub fn apply_text_table_fallback(&mut self) {
        for (index, page) in self.pages.iter_mut().enumerate() {
            if page.tables.is_empty() {
                if let Some(cells) = text_table::synthesize(&page.text) {
                    page.tables.push(Table::new(cells, index + 1));
                }
            }
        }
    }
}

/// Password probing ahead of the pdfium open call: `lopdf` is cheap to
/// load and tells us definitively whether a password is required or wrong
/// before handing the bytes to pdfium.
fn verify_password(bytes: &[u8], passwords: &[String]) -> Result<Option<String>> {
    let mut doc =
        LopdfDocument::load_mem(bytes).map_err(|e| PdfError::InvalidPdf(format!("failed to load PDF: {e}")))?;

    if !doc.is_encrypted() {
        return Ok(None);
    }

    for pwd in passwords {
        if doc.decrypt(pwd).is_ok() {
            return Ok(Some(pwd.clone()));
        }
    }

    if passwords.is_empty() {
        Err(PdfError::PasswordRequired)
    } else {
        Err(PdfError::InvalidPassword)
    }
}

/// Open a PDF from bytes, trying `passwords` in order if it is encrypted,
/// and extract per-page text and tables.
///
/// Table discovery falls back through the three strategies of spec §4.A:
/// default line-aware, strict ruling-line, then text-ruled synthesis. Any
/// page that yields no text at all (image-only/unreadable page) simply
/// contributes an empty `PageContent` — this is not a fatal error (spec
/// §4.A failure modes).
pub fn open(bytes: &[u8], passwords: &[String], table_settings: Option<&TableSettings>) -> Result<Document> {
    let password = verify_password(bytes, passwords)?;

    let pdfium = Pdfium::default();
    let document = match &password {
        Some(pwd) => pdfium.load_pdf_from_byte_slice(bytes, Some(pwd)),
        None => pdfium.load_pdf_from_byte_slice(bytes, None),
    }
    .map_err(|e| PdfError::InvalidPdf(format!("pdfium failed to open document: {e}")))?;

    let mut pages = Vec::new();
    for (index, page) in document.pages().iter().enumerate() {
        let text = page
            .text()
            .map(|t| t.all())
            .unwrap_or_default();

        let tables = detect_tables(&page, index + 1, table_settings)?;
        pages.push(PageContent { text, tables });
    }

    Ok(Document { pages })
}

/// Tries, in order: the caller-supplied settings (if any), the table
/// finder's own defaults, then a strict ruling-line variant — the first
/// strategy that finds anything wins (spec §4.A).
fn detect_tables(page: &PdfPage, page_number: usize, custom_settings: Option<&TableSettings>) -> Result<Vec<Table>> {
    let default_settings = TableSettings::default();
    let mut strict_settings = TableSettings::default();
    strict_settings.vertical_strategy = TableStrategy::LinesStrict;
    strict_settings.horizontal_strategy = TableStrategy::LinesStrict;

    let mut strategies: Vec<&TableSettings> = Vec::with_capacity(3);
    if let Some(settings) = custom_settings {
        strategies.push(settings);
    }
    strategies.push(&default_settings);
    strategies.push(&strict_settings);

    for settings in strategies {
        let found = find_tables(page, settings, None)?;
        if !found.tables.is_empty() {
            return Ok(to_tables(&found.tables, page, page_number)?);
        }
    }

    // Strategy 3 (text-ruled synthesis) doesn't need pdfium geometry and is
    // applied afterwards, over plain text, by `Document::apply_text_table_fallback`.
    Ok(Vec::new())
}

fn to_tables(detected: &[DetectedTable], page: &PdfPage, page_number: usize) -> Result<Vec<Table>> {
    let page_height = page.height().value as f64;
    let mut tables = Vec::with_capacity(detected.len());
    for table in detected {
        let text_rows = super::table_finder::extract_table_text(table, page, page_height)?;
        tables.push(Table::new(text_rows, page_number));
    }
    Ok(tables)
}
