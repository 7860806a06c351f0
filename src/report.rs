use crate::entry::{LedgerEntry, TransactionType, HEADER};
use crate::errors::ReportError;
use crate::grouping::{group_entries, Grouping, Groupings};
use crate::layout::Labels;
use crate::money::Amount;

/// How total income compares to total expense.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Balance {
    /// Income exceeds expense by the contained amount.
    Surplus(Amount),

    /// Income is below expense by the contained amount.
    Deficit(Amount),

    /// Income equals expense.
    Even,
}

impl Balance {
    pub fn between(income: Amount, expense: Amount) -> Result<Self, ReportError> {
        let diff = income
            .checked_sub(expense)
            .filter(|diff| diff.cents() != i64::MIN)
            .ok_or(ReportError::BalanceOutOfRange)?;

        Ok(if diff.cents() > 0 {
            Balance::Surplus(diff)
        } else if diff.cents() < 0 {
            Balance::Deficit(diff.abs())
        } else {
            Balance::Even
        })
    }

    /// The value shown next to the comparison label: the absolute
    /// difference in parentheses, or a bare `0.00` when even.
    pub fn display_value(&self) -> String {
        match self {
            Balance::Surplus(diff) | Balance::Deficit(diff) => format!("({})", diff),
            Balance::Even => Amount::ZERO.to_string(),
        }
    }
}

/// Grouped entries and totals for one render pass.
#[derive(Clone, Debug, PartialEq)]
pub struct Summary {
    groupings: Groupings,
    total_income: Amount,
    total_expense: Amount,
    balance: Balance,
}

impl Summary {
    /// Groups and totals `entries`. Fails if a total leaves the range of
    /// [`Amount`].
    pub fn from_entries(entries: &[LedgerEntry]) -> Result<Self, ReportError> {
        let groupings = group_entries(entries);
        let total_income = groupings
            .income
            .total()
            .ok_or(ReportError::TotalOutOfRange(TransactionType::Income))?;
        let total_expense = groupings
            .expense
            .total()
            .ok_or(ReportError::TotalOutOfRange(TransactionType::Expense))?;
        let balance = Balance::between(total_income, total_expense)?;

        Ok(Self {
            groupings,
            total_income,
            total_expense,
            balance,
        })
    }

    pub fn income(&self) -> &Grouping {
        &self.groupings.income
    }

    pub fn expense(&self) -> &Grouping {
        &self.groupings.expense
    }

    pub fn total_income(&self) -> Amount {
        self.total_income
    }

    pub fn total_expense(&self) -> Amount {
        self.total_expense
    }

    pub fn balance(&self) -> Balance {
        self.balance
    }
}

/// A plain-text table of `entries` with 1-based row numbers, followed by the
/// totals and the income/expense comparison.
pub fn listing(entries: &[LedgerEntry], labels: &Labels) -> Result<String, ReportError> {
    let summary = Summary::from_entries(entries)?;
    let balance = summary.balance();
    let rule = "-".repeat(85);

    let mut out = format!(
        "{:<4} | {:<10} | {:<20} | {:<30} | {}\n{}\n",
        "No.", HEADER[0], HEADER[1], HEADER[2], HEADER[3], rule
    );
    for (row, entry) in entries.iter().enumerate() {
        out.push_str(&format!(
            "{:<4} | {:<10} | {:<20} | {:<30} | {}\n",
            row + 1,
            entry.transaction_type.label(),
            entry.category,
            entry.description,
            entry.amount
        ));
    }
    out.push_str(&format!(
        "{}\n{}: {}\n{}: {}\n{}: {}\n",
        rule,
        labels.total_income,
        summary.total_income(),
        labels.total_expense,
        summary.total_expense(),
        labels.for_balance(&balance),
        balance.display_value()
    ));

    Ok(out)
}
