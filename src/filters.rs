use chrono::Datelike;

use crate::models::{Transaction, TransactionKind};

/// Ledger view filter. Unset fields match everything.
#[derive(Debug, Clone, Default)]
pub struct LedgerFilter {
    pub month: Option<u32>,
    pub year: Option<i32>,
    pub kind: Option<TransactionKind>,
    /// Case-insensitive substring of the stored category.
    pub category: Option<String>,
}

impl LedgerFilter {
    pub fn matches(&self, txn: &Transaction) -> bool {
        if self.month.is_some_and(|m| txn.date.month() != m) {
            return false;
        }
        if self.year.is_some_and(|y| txn.date.year() != y) {
            return false;
        }
        if self.kind.is_some_and(|k| txn.kind != k) {
            return false;
        }
        if let Some(needle) = self.category.as_deref().filter(|c| !c.is_empty()) {
            if !txn.category.to_lowercase().contains(&needle.to_lowercase()) {
                return false;
            }
        }
        true
    }

    pub fn apply<'a>(&self, transactions: &'a [Transaction]) -> Vec<&'a Transaction> {
        transactions.iter().filter(|t| self.matches(t)).collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::TransactionStatus;
    use chrono::NaiveDate;

    fn txn(id: i64, date: (i32, u32, u32), kind: TransactionKind, category: &str) -> Transaction {
        Transaction {
            id,
            owner: "alice".to_string(),
            date: NaiveDate::from_ymd_opt(date.0, date.1, date.2).unwrap(),
            amount: 1.0,
            kind,
            name: "x".to_string(),
            category: category.to_string(),
            description: String::new(),
            status: TransactionStatus::Cleared,
            currency: "IDR".to_string(),
        }
    }

    fn ledger() -> Vec<Transaction> {
        vec![
            txn(1, (2024, 3, 2), TransactionKind::Expense, "Groceries"),
            txn(2, (2024, 3, 9), TransactionKind::Income, "Salary"),
            txn(3, (2023, 3, 9), TransactionKind::Expense, "Eating Out"),
            txn(4, (2024, 4, 1), TransactionKind::Expense, ""),
        ]
    }

    fn ids(filter: &LedgerFilter, txns: &[Transaction]) -> Vec<i64> {
        filter.apply(txns).iter().map(|t| t.id).collect()
    }

    #[test]
    fn test_empty_filter_matches_all() {
        let txns = ledger();
        assert_eq!(ids(&LedgerFilter::default(), &txns), vec![1, 2, 3, 4]);
    }

    #[test]
    fn test_month_and_year() {
        let txns = ledger();
        let march = LedgerFilter { month: Some(3), ..Default::default() };
        assert_eq!(ids(&march, &txns), vec![1, 2, 3]);
        let march_2024 = LedgerFilter { month: Some(3), year: Some(2024), ..Default::default() };
        assert_eq!(ids(&march_2024, &txns), vec![1, 2]);
    }

    #[test]
    fn test_kind() {
        let txns = ledger();
        let income = LedgerFilter { kind: Some(TransactionKind::Income), ..Default::default() };
        assert_eq!(ids(&income, &txns), vec![2]);
    }

    #[test]
    fn test_category_substring_ignores_case() {
        let txns = ledger();
        let f = LedgerFilter { category: Some("OUT".to_string()), ..Default::default() };
        assert_eq!(ids(&f, &txns), vec![3]);
        let blank = LedgerFilter { category: Some(String::new()), ..Default::default() };
        assert_eq!(ids(&blank, &txns).len(), 4);
    }
}
