use crate::entry::TransactionType;
use serde::{Deserialize, Serialize};

/// The main categories an entry may be filed under, per transaction type.
///
/// Order is significant: it is the order categories are offered in.
#[derive(Clone, Debug, Deserialize, Serialize, PartialEq)]
#[serde(default)]
pub struct CategoryTable {
    pub income: Vec<String>,
    pub expense: Vec<String>,
}

const DEFAULT_INCOME: [&str; 11] = [
    "กองทุนกรรมการ",
    "กองทุนการศึกษา",
    "งานไหว้บรรพบุรุษ (ตรุษจีน)",
    "งานไหว้พระจันทร์",
    "สนับสนุนหนังสือทำเนียบ",
    "ค่าทำป้ายแกะสลัก",
    "ค่าตั้งป้ายบรรพบุรุษ",
    "ดอกเบี้ยรับ",
    "รับบริจาคทั่วไป",
    "รับบริจาคสนับสนุนโครงการ",
    "อื่นๆ",
];

const DEFAULT_EXPENSE: [&str; 8] = [
    "เงินเดือน",
    "ค่ารถ ค่าล่วงเวลาผจก.",
    "การดำเนินงานและกิจกรรม",
    "การศึกษา และเยาวชน",
    "เครื่องใช้สำนักงาน และวัสดุสิ้นเปลือง",
    "ซ่อมแซม ค่าจ้างและค่าแรง",
    "ค่าสาธารณูปโภค",
    "อื่นๆ",
];

impl Default for CategoryTable {
    fn default() -> Self {
        Self {
            income: DEFAULT_INCOME.iter().map(|c| c.to_string()).collect(),
            expense: DEFAULT_EXPENSE.iter().map(|c| c.to_string()).collect(),
        }
    }
}

impl CategoryTable {
    pub fn new(income: Vec<String>, expense: Vec<String>) -> Self {
        Self { income, expense }
    }

    /// The ordered list of main categories allowed for `transaction_type`.
    pub fn allowed(&self, transaction_type: TransactionType) -> &[String] {
        match transaction_type {
            TransactionType::Income => &self.income,
            TransactionType::Expense => &self.expense,
        }
    }

    pub fn permits(&self, transaction_type: TransactionType, main: &str) -> bool {
        self.allowed(transaction_type)
            .iter()
            .any(|category| category == main.trim())
    }

    /// The category preselected for a new entry of `transaction_type`.
    pub fn first(&self, transaction_type: TransactionType) -> Option<&str> {
        self.allowed(transaction_type).first().map(String::as_str)
    }

    /// `main`, or the preselected category when `main` is absent or blank.
    pub fn main_or_first(&self, transaction_type: TransactionType, main: Option<&str>) -> String {
        match main.map(str::trim) {
            Some(main) if !main.is_empty() => main.to_string(),
            _ => self.first(transaction_type).unwrap_or_default().to_string(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn should_keep_vocabulary_per_type() {
        let table = CategoryTable::default();
        assert_eq!(table.allowed(TransactionType::Income).len(), 11);
        assert_eq!(table.allowed(TransactionType::Expense).len(), 8);
        assert_eq!(table.first(TransactionType::Expense), Some("เงินเดือน"));

        // Income-only categories are not valid expense categories.
        assert!(table.permits(TransactionType::Income, "ดอกเบี้ยรับ"));
        assert!(!table.permits(TransactionType::Expense, "ดอกเบี้ยรับ"));
        assert!(table.permits(TransactionType::Expense, " อื่นๆ "));
    }

    #[test]
    fn should_accept_injected_tables() {
        let table = CategoryTable::new(vec!["Salary".into()], Vec::new());
        assert!(table.permits(TransactionType::Income, "Salary"));
        assert!(!table.permits(TransactionType::Expense, "Salary"));
        assert_eq!(table.first(TransactionType::Expense), None);
    }

    #[test]
    fn should_preselect_first_category_when_blank() {
        let table = CategoryTable::new(vec!["Salary".into(), "Interest".into()], Vec::new());
        assert_eq!(table.main_or_first(TransactionType::Income, None), "Salary");
        assert_eq!(table.main_or_first(TransactionType::Income, Some("  ")), "Salary");
        assert_eq!(
            table.main_or_first(TransactionType::Income, Some(" Interest ")),
            "Interest"
        );

        // Nothing to preselect; validation later reports the missing category.
        assert_eq!(table.main_or_first(TransactionType::Expense, None), "");
    }
}
