//! Chart-ready views over one owner's transactions for a selected month.
//!
//! Everything here is a pure function of the input slice: views are rebuilt
//! from scratch on every call and nothing is cached between calls.

use std::collections::{BTreeSet, HashMap};
use std::fmt;

use chrono::{Datelike, NaiveDate};
use serde::{Serialize, Serializer};

use crate::models::{Transaction, TransactionKind};

pub const UNCATEGORIZED: &str = "Uncategorized";

// ---------------------------------------------------------------------------
// MonthKey
// ---------------------------------------------------------------------------

/// A calendar month, displayed as `YYYY-MM`. Ordering is chronological, which
/// matches lexicographic ordering of the zero-padded key.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct MonthKey {
    year: i32,
    month: u32,
}

impl MonthKey {
    pub fn new(year: i32, month: u32) -> Option<Self> {
        (1..=12).contains(&month).then_some(Self { year, month })
    }

    pub fn of(date: NaiveDate) -> Self {
        Self {
            year: date.year(),
            month: date.month(),
        }
    }

    /// Parse a `YYYY-MM` key. Anything else is `None`.
    pub fn parse(key: &str) -> Option<Self> {
        let (y, m) = key.trim().split_once('-')?;
        let all_digits = |s: &str| s.bytes().all(|b| b.is_ascii_digit());
        if y.len() != 4 || m.len() != 2 || !all_digits(y) || !all_digits(m) {
            return None;
        }
        Self::new(y.parse().ok()?, m.parse().ok()?)
    }

    pub fn month(&self) -> u32 {
        self.month
    }

    /// Number of days in the month, leap years included.
    pub fn days(&self) -> u32 {
        if self.month == 12 {
            return 31;
        }
        NaiveDate::from_ymd_opt(self.year, self.month + 1, 1)
            .and_then(|d| d.pred_opt())
            .map_or(0, |d| d.day())
    }

    pub fn contains(&self, date: NaiveDate) -> bool {
        date.year() == self.year && date.month() == self.month
    }
}

impl fmt::Display for MonthKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:04}-{:02}", self.year, self.month)
    }
}

impl Serialize for MonthKey {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

// ---------------------------------------------------------------------------
// Views
// ---------------------------------------------------------------------------

/// One day of the daily expense series.
#[derive(Debug, Clone, Serialize)]
pub struct DailyBucket<'a> {
    /// `DD/MM`
    pub label: String,
    pub total: f64,
    pub contributors: Vec<&'a Transaction>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CategoryTotal {
    pub name: String,
    pub total: f64,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Dashboard<'a> {
    pub months: Vec<MonthKey>,
    pub selected_month: Option<MonthKey>,
    pub daily_series: Vec<DailyBucket<'a>>,
    pub category_totals: Vec<CategoryTotal>,
    pub total_spent: f64,
}

/// Distinct months present in `transactions`, newest first.
pub fn months(transactions: &[Transaction]) -> Vec<MonthKey> {
    let unique: BTreeSet<MonthKey> = transactions.iter().map(|t| MonthKey::of(t.date)).collect();
    unique.into_iter().rev().collect()
}

/// Keep an explicit selection, otherwise pick the most recent month.
pub fn default_month(months: &[MonthKey], selected: Option<MonthKey>) -> Option<MonthKey> {
    selected.or_else(|| months.iter().max().copied())
}

fn expenses_in(
    transactions: &[Transaction],
    month: MonthKey,
) -> impl Iterator<Item = &Transaction> {
    transactions
        .iter()
        .filter(move |t| t.kind == TransactionKind::Expense && month.contains(t.date))
}

/// One bucket per day of `month`, in day order, including days with no spending.
pub fn daily_series(transactions: &[Transaction], month: MonthKey) -> Vec<DailyBucket<'_>> {
    let mut buckets: Vec<DailyBucket<'_>> = (1..=month.days())
        .map(|day| DailyBucket {
            label: format!("{:02}/{:02}", day, month.month()),
            total: 0.0,
            contributors: Vec::new(),
        })
        .collect();

    for txn in expenses_in(transactions, month) {
        if let Some(bucket) = buckets.get_mut(txn.date.day0() as usize) {
            bucket.total += txn.amount;
            bucket.contributors.push(txn);
        }
    }
    buckets
}

/// Expense totals per category, in order of first appearance.
pub fn category_totals(transactions: &[Transaction], month: MonthKey) -> Vec<CategoryTotal> {
    let mut totals: Vec<CategoryTotal> = Vec::new();
    let mut index: HashMap<&str, usize> = HashMap::new();

    for txn in expenses_in(transactions, month) {
        let name = match txn.category.trim() {
            "" => UNCATEGORIZED,
            other => other,
        };
        let slot = *index.entry(name).or_insert_with(|| {
            totals.push(CategoryTotal {
                name: name.to_string(),
                total: 0.0,
            });
            totals.len() - 1
        });
        totals[slot].total += txn.amount;
    }
    totals
}

pub fn total_spent(transactions: &[Transaction], month: MonthKey) -> f64 {
    expenses_in(transactions, month).map(|t| t.amount).sum()
}

/// Build every view for `selected`, defaulting to the newest month when no
/// month is given. A key that is not `YYYY-MM` selects nothing and yields
/// empty views.
pub fn build_dashboard<'a>(transactions: &'a [Transaction], selected: Option<&str>) -> Dashboard<'a> {
    let months = months(transactions);
    let selected_month = match selected {
        Some(key) => MonthKey::parse(key),
        None => default_month(&months, None),
    };

    let (daily_series, category_totals, total_spent) = match selected_month {
        Some(month) => (
            daily_series(transactions, month),
            category_totals(transactions, month),
            total_spent(transactions, month),
        ),
        None => (Vec::new(), Vec::new(), 0.0),
    };

    Dashboard {
        months,
        selected_month,
        daily_series,
        category_totals,
        total_spent,
    }
}
