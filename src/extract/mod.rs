//! Extractors (spec §4.C): one implementation per [`crate::classify::IssuerFormat`]
//! variant, dispatched from a single point (design note §9).

pub mod generic_table;
pub mod generic_text;
pub mod grammar;
pub mod hdfc_cc;
pub mod icici_cc;
pub mod indusind_cc;
pub mod sbi_cc;

use crate::classify::IssuerFormat;
use crate::pdf::Document;
use crate::types::Transaction;

/// One statement layout's row-to-`Transaction` conversion.
pub trait Extractor {
    fn extract(&self, document: &Document) -> Vec<Transaction>;
}

/// Dispatch `document` to the extractor for `format` — the crate's one
/// `match` over [`IssuerFormat`] (design note §9).
pub fn run(format: IssuerFormat, document: &Document) -> Vec<Transaction> {
    match format {
        IssuerFormat::SbiCc => sbi_cc::SbiCcExtractor.extract(document),
        IssuerFormat::HdfcCc => hdfc_cc::HdfcCcExtractor.extract(document),
        IssuerFormat::IndusindCc => indusind_cc::IndusindCcExtractor.extract(document),
        IssuerFormat::IciciCc => icici_cc::IciciCcExtractor.extract(document),
        IssuerFormat::GenericTable => generic_table::GenericTableExtractor.extract(document),
        IssuerFormat::GenericText => generic_text::GenericTextExtractor.extract(document),
    }
}
