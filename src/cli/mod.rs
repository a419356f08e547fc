pub mod add;
pub mod dashboard;
pub mod delete;
pub mod edit;
pub mod export;
pub mod import;
pub mod init;
pub mod list;
pub mod months;
pub mod status;

use chrono::NaiveDate;
use clap::{Parser, Subcommand};

use crate::db::SqliteStore;
use crate::error::Result;
use crate::models::{TransactionKind, TransactionStatus};
use crate::settings::{load_settings, Settings};

/// Settings for one invocation, with the owner override applied.
pub struct Context {
    pub settings: Settings,
}

impl Context {
    pub fn load(owner: Option<String>) -> Self {
        let mut settings = load_settings();
        if let Some(owner) = owner {
            settings.owner = owner;
        }
        Self { settings }
    }

    pub fn owner(&self) -> &str {
        &self.settings.owner
    }

    pub fn open_store(&self) -> Result<SqliteStore> {
        std::fs::create_dir_all(&self.settings.data_dir)?;
        SqliteStore::open(&self.settings.db_path())
    }
}

pub(crate) fn today() -> NaiveDate {
    chrono::Local::now().date_naive()
}

#[derive(Parser)]
#[command(name = "spendlog", about = "Track income and expenses, import CSV files, and see where the money went.")]
pub struct Cli {
    /// Act as this owner instead of the configured one
    #[arg(long, global = true)]
    pub owner: Option<String>,
    /// Show debug logging on stderr
    #[arg(short, long, global = true)]
    pub verbose: bool,
    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Choose a data directory and initialize the database. `--owner` is saved as the default owner.
    Init {
        /// Path for spendlog data (default: ~/Documents/spendlog)
        #[arg(long = "data-dir")]
        data_dir: Option<String>,
    },
    /// Record a single transaction.
    Add {
        #[arg(long)]
        name: String,
        #[arg(long)]
        amount: f64,
        /// Date: YYYY-MM-DD (default: today)
        #[arg(long)]
        date: Option<NaiveDate>,
        /// income or expense
        #[arg(long = "type", default_value = "expense")]
        kind: TransactionKind,
        #[arg(long, default_value = "")]
        category: String,
        #[arg(long, default_value = "")]
        description: String,
        /// cleared, pending or refunded
        #[arg(long, default_value = "cleared")]
        status: TransactionStatus,
        #[arg(long, default_value = crate::models::DEFAULT_CURRENCY)]
        currency: String,
    },
    /// Import transactions from a CSV file with a header row.
    Import {
        /// Path to the CSV file
        file: String,
        /// Import even if this exact file was imported before
        #[arg(long)]
        force: bool,
    },
    /// List transactions, newest first.
    List {
        /// Month filter: MM
        #[arg(long)]
        month: Option<u32>,
        /// Year filter: YYYY
        #[arg(long)]
        year: Option<i32>,
        /// income or expense
        #[arg(long = "type")]
        kind: Option<TransactionKind>,
        /// Category contains this text (case-insensitive)
        #[arg(long)]
        category: Option<String>,
    },
    /// Change fields of an existing transaction.
    Edit {
        /// Transaction ID (shown in `spendlog list`)
        id: i64,
        #[arg(long)]
        date: Option<NaiveDate>,
        #[arg(long)]
        name: Option<String>,
        #[arg(long)]
        amount: Option<f64>,
        #[arg(long = "type")]
        kind: Option<TransactionKind>,
        #[arg(long)]
        category: Option<String>,
        #[arg(long)]
        description: Option<String>,
        #[arg(long)]
        status: Option<TransactionStatus>,
        #[arg(long)]
        currency: Option<String>,
    },
    /// Delete a transaction.
    Delete {
        /// Transaction ID (shown in `spendlog list`)
        id: i64,
    },
    /// List the months that have transactions, newest first.
    Months,
    /// Daily spending, category totals and total spent for a month.
    Dashboard {
        /// Month: YYYY-MM (default: most recent month with data)
        #[arg(long)]
        month: Option<String>,
        /// Print the views as JSON
        #[arg(long)]
        json: bool,
    },
    /// Export transactions as CSV in the import format.
    Export {
        /// Output file (default: stdout)
        #[arg(long)]
        output: Option<String>,
    },
    /// Show current settings and summary statistics.
    Status,
}
