use crate::entry::{LedgerEntry, TransactionType};
use crate::money::Amount;
use std::collections::HashMap;

/// A single `(description, amount)` line of a report.
#[derive(Clone, Debug, PartialEq)]
pub struct Line {
    pub description: String,
    pub amount: Amount,
}

/// All lines filed under one literal category string.
#[derive(Clone, Debug, PartialEq)]
pub struct Bucket {
    pub category: String,
    pub lines: Vec<Line>,
}

impl Bucket {
    /// Sum of the bucket's lines, or `None` if it does not fit in an
    /// [`Amount`].
    pub fn total(&self) -> Option<Amount> {
        Amount::checked_sum(self.lines.iter().map(|line| line.amount))
    }
}

/// Entries of one transaction type bucketed by category string.
///
/// Buckets keep the order in which their category was first seen, and lines
/// keep the order they were inserted in.
#[derive(Clone, Debug, Default)]
pub struct Grouping {
    buckets: Vec<Bucket>,
    index: HashMap<String, usize>,
}

impl Grouping {
    pub fn insert(&mut self, category: &str, line: Line) {
        match self.index.get(category) {
            Some(&position) => self.buckets[position].lines.push(line),
            None => {
                self.index.insert(category.to_string(), self.buckets.len());
                self.buckets.push(Bucket {
                    category: category.to_string(),
                    lines: vec![line],
                });
            }
        }
    }

    pub fn buckets(&self) -> &[Bucket] {
        &self.buckets
    }

    pub fn categories(&self) -> impl Iterator<Item = &str> {
        self.buckets.iter().map(|bucket| bucket.category.as_str())
    }

    pub fn get(&self, category: &str) -> Option<&Bucket> {
        self.index.get(category).map(|&position| &self.buckets[position])
    }

    pub fn is_empty(&self) -> bool {
        self.buckets.is_empty()
    }

    pub fn total(&self) -> Option<Amount> {
        self.buckets
            .iter()
            .try_fold(Amount::ZERO, |total, bucket| total.checked_add(bucket.total()?))
    }
}

impl PartialEq for Grouping {
    fn eq(&self, other: &Self) -> bool {
        self.buckets == other.buckets
    }
}

/// The income and expense groupings of one report.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct Groupings {
    pub income: Grouping,
    pub expense: Grouping,
}

impl Groupings {
    pub fn for_type(&self, transaction_type: TransactionType) -> &Grouping {
        match transaction_type {
            TransactionType::Income => &self.income,
            TransactionType::Expense => &self.expense,
        }
    }
}

/// Partitions `entries` into income and expense groupings in a single pass.
pub fn group_entries<'a, I>(entries: I) -> Groupings
where
    I: IntoIterator<Item = &'a LedgerEntry>,
{
    let mut groupings = Groupings::default();

    for entry in entries {
        let grouping = match entry.transaction_type {
            TransactionType::Income => &mut groupings.income,
            TransactionType::Expense => &mut groupings.expense,
        };
        grouping.insert(
            &entry.category,
            Line {
                description: entry.description.clone(),
                amount: entry.amount,
            },
        );
    }

    groupings
}
