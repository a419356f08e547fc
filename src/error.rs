use std::fmt;

use thiserror::Error;

#[derive(Error, Debug)]
pub enum SpendlogError {
    #[error("Storage failure: {0}")]
    Storage(#[from] rusqlite::Error),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    #[error("Invalid transaction: {0}")]
    Validation(String),

    #[error("Parse error: {0}")]
    Parse(String),

    #[error("No valid rows found (must have at least name and amount); {} rows rejected", .rejected.len())]
    NoValidRows { rejected: Vec<RowError> },

    #[error("This file has already been imported: {0} (use --force to import it again)")]
    DuplicateImport(String),

    #[error("Transaction not found: {0}")]
    NotFound(i64),

    #[error("Settings error: {0}")]
    Settings(String),

    #[error("{0}")]
    Other(String),
}

pub type Result<T> = std::result::Result<T, SpendlogError>;

/// Why a single import row was dropped. Row problems are collected, never raised.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RowErrorKind {
    /// A required field is missing or a value is outside its allowed set.
    Validation(String),
    /// The amount is not a usable number.
    Parse(String),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RowError {
    /// 1-based line in the source file.
    pub line: u64,
    pub kind: RowErrorKind,
}

impl RowErrorKind {
    pub fn label(&self) -> &'static str {
        match self {
            Self::Validation(_) => "validation",
            Self::Parse(_) => "parse",
        }
    }

    pub fn message(&self) -> &str {
        match self {
            Self::Validation(msg) | Self::Parse(msg) => msg,
        }
    }
}

impl fmt::Display for RowError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "line {}: {}", self.line, self.kind.message())
    }
}
