use crate::errors::EntryError;
use crate::money::Amount;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Separator between a main category and its sub-category in the stored
/// category string, e.g. `Donations > Building Fund`.
pub const CATEGORY_SEPARATOR: &str = " > ";

/// Header row of a stored report, in field order.
pub const HEADER: [&str; 4] = ["ประเภท", "หมวดหมู่", "รายละเอียด", "จำนวนเงิน"];

#[derive(Clone, Copy, Debug, Deserialize, Serialize, PartialEq, Eq, Hash)]
pub enum TransactionType {
    /// Money received. Rendered in the left column of a report.
    #[serde(rename = "รายรับ", alias = "income", alias = "Income")]
    Income,

    /// Money spent. Rendered in the right column of a report.
    #[serde(rename = "รายจ่าย", alias = "expense", alias = "Expense")]
    Expense,
}

impl TransactionType {
    /// The label written to the record store.
    pub fn label(self) -> &'static str {
        match self {
            TransactionType::Income => "รายรับ",
            TransactionType::Expense => "รายจ่าย",
        }
    }
}

impl fmt::Display for TransactionType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TransactionType::Income => write!(f, "income"),
            TransactionType::Expense => write!(f, "expense"),
        }
    }
}

impl FromStr for TransactionType {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim() {
            "income" | "Income" | "รายรับ" => Ok(TransactionType::Income),
            "expense" | "Expense" | "รายจ่าย" => Ok(TransactionType::Expense),
            other => Err(format!("unknown transaction type: {}", other)),
        }
    }
}

/// A main category optionally qualified by a sub-category.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct CategoryPath {
    pub main: String,
    pub sub: Option<String>,
}

impl CategoryPath {
    pub fn new(main: &str, sub: Option<&str>) -> Self {
        Self {
            main: main.trim().to_string(),
            sub: sub
                .map(str::trim)
                .filter(|sub| !sub.is_empty())
                .map(str::to_string),
        }
    }

    /// Splits a stored category string on the first separator. Both halves
    /// are trimmed and an empty sub-category is treated as absent.
    pub fn parse(category: &str) -> Self {
        match category.split_once(CATEGORY_SEPARATOR) {
            Some((main, sub)) => Self::new(main, Some(sub)),
            None => Self::new(category, None),
        }
    }
}

impl fmt::Display for CategoryPath {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.sub {
            Some(sub) => write!(f, "{}{}{}", self.main, CATEGORY_SEPARATOR, sub),
            None => write!(f, "{}", self.main),
        }
    }
}

/// One recorded income or expense transaction.
#[derive(Clone, Debug, PartialEq)]
pub struct LedgerEntry {
    pub transaction_type: TransactionType,

    /// The literal stored category string. Grouping keys on this value; the
    /// main/sub split only happens when a report is laid out.
    pub category: String,

    pub description: String,
    pub amount: Amount,
}

impl LedgerEntry {
    pub fn new(
        transaction_type: TransactionType,
        category: impl Into<String>,
        description: impl Into<String>,
        amount: Amount,
    ) -> Self {
        Self {
            transaction_type,
            category: category.into(),
            description: description.into(),
            amount,
        }
    }

    pub fn category_path(&self) -> CategoryPath {
        CategoryPath::parse(&self.category)
    }

    /// Whether any field contains `query`, ignoring case.
    pub fn matches(&self, query: &str) -> bool {
        let query = query.to_lowercase();
        [
            self.transaction_type.label().to_string(),
            self.transaction_type.to_string(),
            self.category.clone(),
            self.description.clone(),
            self.amount.to_plain_string(),
        ]
        .iter()
        .any(|field| field.to_lowercase().contains(&query))
    }
}

/// A row of the record store as it appears on disk.
///
/// Header labels follow the stored report format. English header names are
/// accepted when reading.
#[derive(Clone, Debug, Deserialize, Serialize, PartialEq)]
pub struct Record {
    #[serde(rename = "ประเภท", alias = "type")]
    pub r#type: TransactionType,

    #[serde(rename = "หมวดหมู่", alias = "category")]
    pub category: String,

    #[serde(rename = "รายละเอียด", alias = "description")]
    pub description: String,

    #[serde(rename = "จำนวนเงิน", alias = "amount")]
    pub amount: String,
}

impl TryFrom<Record> for LedgerEntry {
    type Error = EntryError;

    fn try_from(record: Record) -> Result<Self, Self::Error> {
        Ok(LedgerEntry {
            transaction_type: record.r#type,
            category: record.category,
            description: record.description,
            amount: Amount::parse(&record.amount)?,
        })
    }
}

impl From<&LedgerEntry> for Record {
    fn from(entry: &LedgerEntry) -> Self {
        Record {
            r#type: entry.transaction_type,
            category: entry.category.clone(),
            description: entry.description.clone(),
            amount: entry.amount.to_plain_string(),
        }
    }
}
