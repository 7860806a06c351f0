use crate::categories::CategoryTable;
use crate::entry::{CategoryPath, LedgerEntry, TransactionType};
use crate::errors::{DraftError, EntryError};
use crate::money::Amount;

/// Raw, unvalidated values collected for a new entry.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct EntryInput {
    pub main: String,
    pub sub: Option<String>,
    pub description: String,
    pub amount: String,
}

/// Replacement values for an existing entry. Fields left as `None` keep
/// their current value.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct EntryPatch {
    pub transaction_type: Option<TransactionType>,
    pub main: Option<String>,
    pub sub: Option<String>,
    pub description: Option<String>,
    pub amount: Option<String>,
}

/// The list of entries a report is being built from or edited in.
///
/// Every mutation goes through this type; nothing else holds the in-progress
/// rows.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct LedgerDraft {
    entries: Vec<LedgerEntry>,
}

impl LedgerDraft {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_entries(entries: Vec<LedgerEntry>) -> Self {
        Self { entries }
    }

    pub fn entries(&self) -> &[LedgerEntry] {
        &self.entries
    }

    pub fn into_entries(self) -> Vec<LedgerEntry> {
        self.entries
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Validates `input` against `table` and appends the resulting entry.
    pub fn add(
        &mut self,
        table: &CategoryTable,
        transaction_type: TransactionType,
        input: EntryInput,
    ) -> Result<&LedgerEntry, DraftError> {
        let entry = build_entry(
            table,
            transaction_type,
            &input.main,
            input.sub.as_deref(),
            &input.description,
            &input.amount,
        )?;
        self.entries.push(entry);

        Ok(&self.entries[self.entries.len() - 1])
    }

    /// Appends several `(description, amount)` rows under one category.
    ///
    /// Rows with a blank description or an unparseable amount are skipped.
    /// If no row survives nothing is added and `NoValidRows` is returned.
    pub fn add_batch(
        &mut self,
        table: &CategoryTable,
        transaction_type: TransactionType,
        main: &str,
        sub: Option<&str>,
        rows: &[(String, String)],
    ) -> Result<usize, DraftError> {
        let category = validate_category(table, transaction_type, main, sub)?;

        let valid: Vec<LedgerEntry> = rows
            .iter()
            .filter(|(description, _)| !description.trim().is_empty())
            .filter_map(|(description, amount)| {
                Amount::parse(amount).ok().map(|amount| {
                    LedgerEntry::new(
                        transaction_type,
                        category.to_string(),
                        description.trim(),
                        amount,
                    )
                })
            })
            .collect();

        if valid.is_empty() {
            return Err(DraftError::NoValidRows);
        }

        let added = valid.len();
        self.entries.extend(valid);

        Ok(added)
    }

    /// Drops the most recently added entry.
    pub fn undo_last(&mut self) -> Option<LedgerEntry> {
        self.entries.pop()
    }

    pub fn remove(&mut self, index: usize) -> Result<LedgerEntry, DraftError> {
        if index >= self.entries.len() {
            return Err(DraftError::NoSuchRow(index));
        }

        Ok(self.entries.remove(index))
    }

    /// Applies `patch` to the entry at `index`.
    ///
    /// The category table is only consulted when the patch changes the
    /// transaction type or the main category, so rows stored under a
    /// category that has since left the table can still be corrected. A
    /// patch that leaves the category alone keeps the stored string as is.
    pub fn update(
        &mut self,
        table: &CategoryTable,
        index: usize,
        patch: EntryPatch,
    ) -> Result<&LedgerEntry, DraftError> {
        let current = self
            .entries
            .get(index)
            .ok_or(DraftError::NoSuchRow(index))?;
        let current_path = current.category_path();

        let recategorised = patch.transaction_type.is_some() || patch.main.is_some();
        let patch_sub_given = patch.sub.is_some();
        let transaction_type = patch
            .transaction_type
            .unwrap_or(current.transaction_type);
        let sub = match (&patch.main, patch.sub) {
            (_, Some(sub)) => Some(sub),
            (Some(_), None) => None,
            (None, None) => current_path.sub,
        };
        let main = patch.main.unwrap_or(current_path.main);

        let category = if recategorised {
            validate_category(table, transaction_type, &main, sub.as_deref())?.to_string()
        } else if patch_sub_given {
            CategoryPath::new(&main, sub.as_deref()).to_string()
        } else {
            current.category.clone()
        };

        let description = match patch.description {
            Some(description) if description.trim().is_empty() => {
                return Err(EntryError::DescriptionRequired.into())
            }
            Some(description) => description.trim().to_string(),
            None => current.description.clone(),
        };
        let amount = match patch.amount {
            Some(text) => Amount::parse(&text)?,
            None => current.amount,
        };

        self.entries[index] = LedgerEntry::new(transaction_type, category, description, amount);

        Ok(&self.entries[index])
    }

    /// Rows containing `query` in any field, ignoring case, with their index.
    pub fn search(&self, query: &str) -> Vec<(usize, &LedgerEntry)> {
        self.entries
            .iter()
            .enumerate()
            .filter(|(_, entry)| entry.matches(query))
            .collect()
    }
}

fn validate_category(
    table: &CategoryTable,
    transaction_type: TransactionType,
    main: &str,
    sub: Option<&str>,
) -> Result<CategoryPath, EntryError> {
    if main.trim().is_empty() {
        return Err(EntryError::CategoryRequired);
    }
    if !table.permits(transaction_type, main) {
        return Err(EntryError::UnknownCategory {
            transaction_type,
            category: main.trim().to_string(),
        });
    }

    Ok(CategoryPath::new(main, sub))
}

fn build_entry(
    table: &CategoryTable,
    transaction_type: TransactionType,
    main: &str,
    sub: Option<&str>,
    description: &str,
    amount: &str,
) -> Result<LedgerEntry, EntryError> {
    let category = validate_category(table, transaction_type, main, sub)?;
    if description.trim().is_empty() {
        return Err(EntryError::DescriptionRequired);
    }
    let amount = Amount::parse(amount)?;

    Ok(LedgerEntry::new(
        transaction_type,
        category.to_string(),
        description.trim(),
        amount,
    ))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn table() -> CategoryTable {
        CategoryTable::new(
            vec!["Donations".into(), "Interest".into()],
            vec!["Salary".into(), "Utilities".into()],
        )
    }

    fn input(main: &str, sub: Option<&str>, description: &str, amount: &str) -> EntryInput {
        EntryInput {
            main: main.to_string(),
            sub: sub.map(str::to_string),
            description: description.to_string(),
            amount: amount.to_string(),
        }
    }

    #[test]
    fn should_add_valid_entry() {
        let mut draft = LedgerDraft::new();
        let entry = draft
            .add(
                &table(),
                TransactionType::Income,
                input("Donations", Some("Roof"), "Fair", "1200.5"),
            )
            .unwrap();

        assert_eq!(entry.category, "Donations > Roof");
        assert_eq!(entry.amount, Amount::from_cents(120_050));
        assert_eq!(draft.len(), 1);
    }

    #[test]
    fn should_reject_invalid_entries_without_mutating() {
        let mut draft = LedgerDraft::new();

        // Category not permitted for the transaction type.
        assert_eq!(
            draft
                .add(
                    &table(),
                    TransactionType::Expense,
                    input("Donations", None, "Fair", "1"),
                )
                .unwrap_err(),
            DraftError::Entry(EntryError::UnknownCategory {
                transaction_type: TransactionType::Expense,
                category: "Donations".to_string(),
            })
        );

        // Malformed amount text is rejected at entry time.
        assert_eq!(
            draft
                .add(
                    &table(),
                    TransactionType::Expense,
                    input("Salary", None, "March", "12,000"),
                )
                .unwrap_err(),
            DraftError::Entry(EntryError::InvalidAmount("12,000".to_string()))
        );

        assert_eq!(
            draft
                .add(&table(), TransactionType::Expense, input("Salary", None, " ", "1"))
                .unwrap_err(),
            DraftError::Entry(EntryError::DescriptionRequired)
        );
        assert!(draft.is_empty());
    }

    #[test]
    fn should_add_batch_skipping_invalid_rows() {
        let mut draft = LedgerDraft::new();
        let rows = vec![
            ("Water".to_string(), "300".to_string()),
            ("".to_string(), "50".to_string()),
            ("Power".to_string(), "n/a".to_string()),
            ("Internet".to_string(), "590.25".to_string()),
        ];

        let added = draft
            .add_batch(&table(), TransactionType::Expense, "Utilities", None, &rows)
            .unwrap();
        assert_eq!(added, 2);
        assert_eq!(draft.entries()[0].description, "Water");
        assert_eq!(draft.entries()[1].description, "Internet");

        let rows = vec![("".to_string(), "1".to_string())];
        assert_eq!(
            draft.add_batch(&table(), TransactionType::Expense, "Utilities", None, &rows),
            Err(DraftError::NoValidRows)
        );
        assert_eq!(draft.len(), 2);
    }

    #[test]
    fn should_undo_and_remove_rows() {
        let mut draft = LedgerDraft::new();
        for amount in ["1", "2", "3"] {
            draft
                .add(
                    &table(),
                    TransactionType::Income,
                    input("Interest", None, "Bank", amount),
                )
                .unwrap();
        }

        let undone = draft.undo_last().unwrap();
        assert_eq!(undone.amount, Amount::from_cents(300));

        let removed = draft.remove(0).unwrap();
        assert_eq!(removed.amount, Amount::from_cents(100));
        assert_eq!(draft.remove(5), Err(DraftError::NoSuchRow(5)));
        assert_eq!(draft.len(), 1);

        draft.undo_last();
        assert_eq!(draft.undo_last(), None);
    }

    #[test]
    fn should_update_only_patched_fields() {
        let mut draft = LedgerDraft::from_entries(vec![LedgerEntry::new(
            TransactionType::Income,
            "Donations > Roof",
            "Fair",
            Amount::from_cents(1000),
        )]);

        // Changing only the amount keeps the category and description.
        let patch = EntryPatch {
            amount: Some("25".to_string()),
            ..EntryPatch::default()
        };
        let entry = draft.update(&table(), 0, patch).unwrap();
        assert_eq!(entry.category, "Donations > Roof");
        assert_eq!(entry.amount, Amount::from_cents(2500));

        // Changing only the sub-category keeps the main category.
        let patch = EntryPatch {
            sub: Some("Hall".to_string()),
            ..EntryPatch::default()
        };
        assert_eq!(
            draft.update(&table(), 0, patch).unwrap().category,
            "Donations > Hall"
        );

        // A new main category without a sub drops the old sub.
        let patch = EntryPatch {
            main: Some("Interest".to_string()),
            ..EntryPatch::default()
        };
        assert_eq!(draft.update(&table(), 0, patch).unwrap().category, "Interest");

        // Switching type validates the category against the new type.
        let patch = EntryPatch {
            transaction_type: Some(TransactionType::Expense),
            ..EntryPatch::default()
        };
        assert!(draft.update(&table(), 0, patch).is_err());
        assert_eq!(draft.entries()[0].transaction_type, TransactionType::Income);
    }

    #[test]
    fn should_keep_legacy_categories_on_plain_edits() {
        let mut draft = LedgerDraft::from_entries(vec![LedgerEntry::new(
            TransactionType::Expense,
            "Retired Category",
            "Old row",
            Amount::from_cents(500),
        )]);

        let patch = EntryPatch {
            description: Some("Renamed".to_string()),
            ..EntryPatch::default()
        };
        let entry = draft.update(&table(), 0, patch).unwrap();
        assert_eq!(entry.category, "Retired Category");
        assert_eq!(entry.description, "Renamed");
    }

    #[test]
    fn should_keep_category_string_verbatim_when_untouched() {
        let mut draft = LedgerDraft::from_entries(vec![LedgerEntry::new(
            TransactionType::Income,
            "Donations  > Roof",
            "Fair",
            Amount::from_cents(1000),
        )]);

        let patch = EntryPatch {
            description: Some("Fete".to_string()),
            amount: Some("12".to_string()),
            ..EntryPatch::default()
        };
        let entry = draft.update(&table(), 0, patch).unwrap();
        assert_eq!(entry.category, "Donations  > Roof");
        assert_eq!(entry.amount, Amount::from_cents(1200));
    }

    #[test]
    fn should_search_all_fields() {
        let draft = LedgerDraft::from_entries(vec![
            LedgerEntry::new(TransactionType::Income, "Donations", "Fair", Amount::from_cents(1)),
            LedgerEntry::new(TransactionType::Expense, "Salary", "March", Amount::from_cents(2)),
            LedgerEntry::new(TransactionType::Expense, "Utilities", "Water", Amount::from_cents(3)),
        ]);

        let hits: Vec<usize> = draft.search("EXPENSE").iter().map(|(i, _)| *i).collect();
        assert_eq!(hits, vec![1, 2]);
        assert_eq!(draft.search("water").len(), 1);
        assert!(draft.search("nothing").is_empty());
    }
}
