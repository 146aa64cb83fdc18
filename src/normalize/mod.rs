//! Canonicalization: dates, amounts, descriptions, sign/type assignment,
//! and cross-extractor deduplication (spec §4.D).

pub mod amount;
pub mod date;
pub mod dedupe;
pub mod description;

pub use amount::{parse_amount, AmountSuffix};
pub use date::parse_date;
pub use dedupe::dedupe;
