pub mod args;
pub mod categories;
pub mod config;
pub mod draft;
pub mod entry;
pub mod errors;
pub mod grouping;
pub mod layout;
pub mod logging;
pub mod money;
pub mod pdf;
pub mod report;
pub mod store;

pub use categories::CategoryTable;
pub use config::Config;
pub use draft::{EntryInput, EntryPatch, LedgerDraft};
pub use entry::{CategoryPath, LedgerEntry, TransactionType};
pub use money::Amount;
pub use report::{Balance, Summary};
pub use store::ReportStore;
