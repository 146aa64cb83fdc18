//! Data model shared across pipeline stages.

pub mod table;
pub mod transaction;

pub use table::Table;
pub use transaction::{Transaction, TransactionMode, TransactionType};
