use std::fmt;
use std::str::FromStr;

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::error::{Result, SpendlogError};

pub const DEFAULT_CURRENCY: &str = "IDR";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TransactionKind {
    Income,
    #[default]
    Expense,
}

impl TransactionKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Income => "income",
            Self::Expense => "expense",
        }
    }
}

impl FromStr for TransactionKind {
    type Err = SpendlogError;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_lowercase().as_str() {
            "income" => Ok(Self::Income),
            "expense" => Ok(Self::Expense),
            other => Err(SpendlogError::Validation(format!(
                "unknown type '{other}' (expected income or expense)"
            ))),
        }
    }
}

impl fmt::Display for TransactionKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TransactionStatus {
    #[default]
    Cleared,
    Pending,
    Refunded,
}

impl TransactionStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Cleared => "cleared",
            Self::Pending => "pending",
            Self::Refunded => "refunded",
        }
    }
}

impl FromStr for TransactionStatus {
    type Err = SpendlogError;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_lowercase().as_str() {
            "cleared" => Ok(Self::Cleared),
            "pending" => Ok(Self::Pending),
            "refunded" => Ok(Self::Refunded),
            other => Err(SpendlogError::Validation(format!(
                "unknown status '{other}' (expected cleared, pending or refunded)"
            ))),
        }
    }
}

impl fmt::Display for TransactionStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A stored transaction. `id` is assigned by the store.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Transaction {
    pub id: i64,
    pub owner: String,
    pub date: NaiveDate,
    pub amount: f64,
    pub kind: TransactionKind,
    pub name: String,
    pub category: String,
    pub description: String,
    pub status: TransactionStatus,
    pub currency: String,
}

/// A transaction that has not been stored yet.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NewTransaction {
    pub owner: String,
    pub date: NaiveDate,
    pub amount: f64,
    pub kind: TransactionKind,
    pub name: String,
    pub category: String,
    pub description: String,
    pub status: TransactionStatus,
    pub currency: String,
}

impl NewTransaction {
    /// A record with every optional field at its default.
    pub fn new(owner: &str, name: &str, amount: f64, date: NaiveDate) -> Self {
        Self {
            owner: owner.to_string(),
            date,
            amount,
            kind: TransactionKind::default(),
            name: name.to_string(),
            category: String::new(),
            description: String::new(),
            status: TransactionStatus::default(),
            currency: DEFAULT_CURRENCY.to_string(),
        }
    }

    pub fn validate(&self) -> Result<()> {
        validate_name(&self.name)?;
        validate_amount(self.amount)
    }
}

/// Partial update for an existing transaction. `id` and `owner` cannot be changed.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct TransactionPatch {
    pub date: Option<NaiveDate>,
    pub name: Option<String>,
    pub amount: Option<f64>,
    pub kind: Option<TransactionKind>,
    pub category: Option<String>,
    pub description: Option<String>,
    pub status: Option<TransactionStatus>,
    pub currency: Option<String>,
}

impl TransactionPatch {
    pub fn is_empty(&self) -> bool {
        *self == Self::default()
    }

    pub fn validate(&self) -> Result<()> {
        if let Some(name) = &self.name {
            validate_name(name)?;
        }
        if let Some(amount) = self.amount {
            validate_amount(amount)?;
        }
        Ok(())
    }

    pub fn apply(&self, txn: &mut Transaction) {
        if let Some(date) = self.date {
            txn.date = date;
        }
        if let Some(name) = &self.name {
            txn.name = name.clone();
        }
        if let Some(amount) = self.amount {
            txn.amount = amount;
        }
        if let Some(kind) = self.kind {
            txn.kind = kind;
        }
        if let Some(category) = &self.category {
            txn.category = category.clone();
        }
        if let Some(description) = &self.description {
            txn.description = description.clone();
        }
        if let Some(status) = self.status {
            txn.status = status;
        }
        if let Some(currency) = &self.currency {
            txn.currency = currency.clone();
        }
    }
}

fn validate_name(name: &str) -> Result<()> {
    if name.trim().is_empty() {
        return Err(SpendlogError::Validation("name is required".to_string()));
    }
    Ok(())
}

fn validate_amount(amount: f64) -> Result<()> {
    if !amount.is_finite() {
        return Err(SpendlogError::Validation(format!("amount must be a finite number, got {amount}")));
    }
    if amount < 0.0 {
        return Err(SpendlogError::Validation(format!(
            "amount must not be negative (use --type to record direction), got {amount}"
        )));
    }
    Ok(())
}

/// One row of the import audit log.
#[derive(Debug, Clone)]
pub struct ImportRecord {
    pub filename: String,
    pub owner: String,
    pub record_count: usize,
    pub rejected_count: usize,
    pub date_range_start: Option<NaiveDate>,
    pub date_range_end: Option<NaiveDate>,
    pub checksum: String,
}
