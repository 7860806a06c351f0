use std::io;

use thiserror::Error;

use crate::entry::TransactionType;

/// Errors raised while validating a single ledger entry.
#[derive(Debug, Error, PartialEq)]
pub enum EntryError {
    #[error("ledger entries MUST specify an amount, but none was provided")]
    AmountRequired,

    #[error("amount {0:?} is not a number")]
    InvalidAmount(String),

    #[error("amount {0:?} is negative")]
    NegativeAmount(String),

    #[error("amount {0:?} is too large")]
    AmountOutOfRange(String),

    #[error("ledger entries MUST specify a category, but none was provided")]
    CategoryRequired,

    #[error("ledger entries MUST specify a description, but none was provided")]
    DescriptionRequired,

    #[error("category {category:?} is not permitted for {transaction_type} entries")]
    UnknownCategory {
        transaction_type: TransactionType,
        category: String,
    },
}

#[derive(Debug, Error, PartialEq)]
pub enum DraftError {
    #[error(transparent)]
    Entry(#[from] EntryError),

    #[error("no such row: {0}")]
    NoSuchRow(usize),

    #[error("at least one row with a description and a valid amount is required")]
    NoValidRows,
}

/// Errors raised while totalling a report.
#[derive(Debug, Error, PartialEq)]
pub enum ReportError {
    #[error("{0} total exceeds the largest supported amount")]
    TotalOutOfRange(TransactionType),

    #[error("difference between income and expense exceeds the largest supported amount")]
    BalanceOutOfRange,
}

#[derive(Debug, Error)]
pub enum StoreError {
    #[error("I/O error: {0}")]
    Io(#[from] io::Error),

    #[error("failed to read or write csv records: {0}")]
    Csv(#[from] csv::Error),

    #[error("invalid report name {0:?}")]
    InvalidName(String),

    #[error("report {0:?} already exists")]
    AlreadyExists(String),

    #[error("no such report: {0}")]
    NotFound(String),

    #[error("refusing to save a report with no entries")]
    EmptyReport,

    #[error("invalid record on line {line}: {source}")]
    InvalidRecord { line: u64, source: EntryError },
}

#[derive(Debug, Error)]
pub enum RenderError {
    #[error(transparent)]
    Store(#[from] StoreError),

    #[error(transparent)]
    Report(#[from] ReportError),

    #[error("I/O error: {0}")]
    Io(#[from] io::Error),

    #[error(
        "text {0:?} cannot be drawn with the built-in fonts; \
         set fonts.regular and fonts.bold to a TrueType font covering it"
    )]
    MissingGlyphs(String),

    #[error("failed to build pdf document: {0}")]
    Pdf(String),
}

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("I/O error: {0}")]
    Io(#[from] io::Error),

    #[error("Serialization error: {0}")]
    Serde(String),
}
