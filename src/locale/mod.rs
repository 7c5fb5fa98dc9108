//! Locale tables.
//!
//! - `table`: one JSON file, loaded leniently and written atomically
//! - `store`: the run-scoped set of pending entries and the merge into both tables

pub mod store;
pub mod table;

pub use store::{FlushReport, LocaleStore, RecordOutcome, RecoveredTable, TranslationEntry};
pub use table::LocaleTable;
