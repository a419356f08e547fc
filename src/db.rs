use std::path::Path;

use rusqlite::types::{FromSql, FromSqlError, FromSqlResult, ToSql, ToSqlOutput, ValueRef};
use rusqlite::{Connection, OptionalExtension, Row};

use crate::error::{Result, SpendlogError};
use crate::models::{
    ImportRecord, NewTransaction, Transaction, TransactionKind, TransactionPatch, TransactionStatus,
};
use crate::store::TransactionStore;

pub const SCHEMA: &str = "
CREATE TABLE IF NOT EXISTS transactions (
    id INTEGER PRIMARY KEY,
    owner TEXT NOT NULL,
    date TEXT NOT NULL,
    name TEXT NOT NULL,
    amount REAL NOT NULL,
    type TEXT NOT NULL DEFAULT 'expense',
    category TEXT NOT NULL DEFAULT '',
    description TEXT NOT NULL DEFAULT '',
    status TEXT NOT NULL DEFAULT 'cleared',
    currency TEXT NOT NULL DEFAULT 'IDR',
    created_at TEXT DEFAULT (datetime('now'))
);

CREATE INDEX IF NOT EXISTS idx_transactions_owner_date ON transactions (owner, date);

CREATE TABLE IF NOT EXISTS imports (
    id INTEGER PRIMARY KEY,
    filename TEXT NOT NULL,
    owner TEXT NOT NULL,
    import_date TEXT DEFAULT (datetime('now')),
    record_count INTEGER NOT NULL,
    rejected_count INTEGER NOT NULL DEFAULT 0,
    date_range_start TEXT,
    date_range_end TEXT,
    checksum TEXT NOT NULL
);
";

const TRANSACTION_COLUMNS: &str =
    "id, owner, date, name, amount, type, category, description, status, currency";

pub fn get_connection(db_path: &Path) -> Result<Connection> {
    let conn = Connection::open(db_path)?;
    conn.execute_batch("PRAGMA journal_mode=WAL; PRAGMA foreign_keys=ON;")?;
    Ok(conn)
}

pub fn init_db(conn: &Connection) -> Result<()> {
    conn.execute_batch(SCHEMA)?;
    Ok(())
}

impl ToSql for TransactionKind {
    fn to_sql(&self) -> rusqlite::Result<ToSqlOutput<'_>> {
        Ok(ToSqlOutput::from(self.as_str()))
    }
}

impl FromSql for TransactionKind {
    fn column_result(value: ValueRef<'_>) -> FromSqlResult<Self> {
        value.as_str()?.parse().map_err(|e| FromSqlError::Other(Box::new(e)))
    }
}

impl ToSql for TransactionStatus {
    fn to_sql(&self) -> rusqlite::Result<ToSqlOutput<'_>> {
        Ok(ToSqlOutput::from(self.as_str()))
    }
}

impl FromSql for TransactionStatus {
    fn column_result(value: ValueRef<'_>) -> FromSqlResult<Self> {
        value.as_str()?.parse().map_err(|e| FromSqlError::Other(Box::new(e)))
    }
}

fn transaction_from_row(row: &Row<'_>) -> rusqlite::Result<Transaction> {
    Ok(Transaction {
        id: row.get(0)?,
        owner: row.get(1)?,
        date: row.get(2)?,
        name: row.get(3)?,
        amount: row.get(4)?,
        kind: row.get(5)?,
        category: row.get(6)?,
        description: row.get(7)?,
        status: row.get(8)?,
        currency: row.get(9)?,
    })
}

pub struct StoreSummary {
    pub transactions: i64,
    pub imports: i64,
}

/// SQLite-backed [`TransactionStore`].
pub struct SqliteStore {
    conn: Connection,
}

impl SqliteStore {
    pub fn open(db_path: &Path) -> Result<Self> {
        let conn = get_connection(db_path)?;
        init_db(&conn)?;
        Ok(Self { conn })
    }

    pub fn get(&self, id: i64) -> Result<Option<Transaction>> {
        let sql = format!("SELECT {TRANSACTION_COLUMNS} FROM transactions WHERE id = ?1");
        let txn = self
            .conn
            .query_row(&sql, [id], transaction_from_row)
            .optional()?;
        Ok(txn)
    }

    pub fn summary(&self, owner: &str) -> Result<StoreSummary> {
        let transactions: i64 = self.conn.query_row(
            "SELECT count(*) FROM transactions WHERE owner = ?1",
            [owner],
            |r| r.get(0),
        )?;
        let imports: i64 = self.conn.query_row(
            "SELECT count(*) FROM imports WHERE owner = ?1",
            [owner],
            |r| r.get(0),
        )?;
        Ok(StoreSummary { transactions, imports })
    }
}

fn insert_rows(tx: &rusqlite::Transaction<'_>, records: &[NewTransaction]) -> Result<Vec<i64>> {
    let mut stmt = tx.prepare_cached(
        "INSERT INTO transactions (owner, date, name, amount, type, category, description, status, currency) \
         VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9)",
    )?;
    let mut ids = Vec::with_capacity(records.len());
    for r in records {
        stmt.execute(rusqlite::params![
            r.owner,
            r.date,
            r.name,
            r.amount,
            r.kind,
            r.category,
            r.description,
            r.status,
            r.currency,
        ])?;
        ids.push(tx.last_insert_rowid());
    }
    Ok(ids)
}

impl TransactionStore for SqliteStore {
    fn insert_batch(&mut self, records: &[NewTransaction]) -> Result<Vec<i64>> {
        let tx = self.conn.transaction()?;
        let ids = insert_rows(&tx, records)?;
        tx.commit()?;
        tracing::info!(count = ids.len(), "inserted transaction batch");
        Ok(ids)
    }

    fn fetch_all(&self, owner: &str) -> Result<Vec<Transaction>> {
        let sql = format!(
            "SELECT {TRANSACTION_COLUMNS} FROM transactions WHERE owner = ?1 ORDER BY date DESC, id DESC"
        );
        let mut stmt = self.conn.prepare(&sql)?;
        let rows = stmt
            .query_map([owner], transaction_from_row)?
            .collect::<std::result::Result<Vec<_>, _>>()?;
        Ok(rows)
    }

    fn update(&mut self, id: i64, patch: &TransactionPatch) -> Result<()> {
        let tx = self.conn.transaction()?;
        let sql = format!("SELECT {TRANSACTION_COLUMNS} FROM transactions WHERE id = ?1");
        let mut txn = tx
            .query_row(&sql, [id], transaction_from_row)
            .optional()?
            .ok_or(SpendlogError::NotFound(id))?;
        patch.apply(&mut txn);
        tx.execute(
            "UPDATE transactions SET date = ?1, name = ?2, amount = ?3, type = ?4, category = ?5, \
             description = ?6, status = ?7, currency = ?8 WHERE id = ?9",
            rusqlite::params![
                txn.date,
                txn.name,
                txn.amount,
                txn.kind,
                txn.category,
                txn.description,
                txn.status,
                txn.currency,
                id,
            ],
        )?;
        tx.commit()?;
        tracing::info!(id, "updated transaction");
        Ok(())
    }

    fn delete(&mut self, id: i64) -> Result<()> {
        let affected = self.conn.execute("DELETE FROM transactions WHERE id = ?1", [id])?;
        if affected == 0 {
            return Err(SpendlogError::NotFound(id));
        }
        tracing::info!(id, "deleted transaction");
        Ok(())
    }

    fn find_import(&self, owner: &str, checksum: &str) -> Result<Option<ImportRecord>> {
        let record = self
            .conn
            .query_row(
                "SELECT filename, owner, record_count, rejected_count, date_range_start, date_range_end, checksum \
                 FROM imports WHERE owner = ?1 AND checksum = ?2 ORDER BY id LIMIT 1",
                [owner, checksum],
                |row| {
                    Ok(ImportRecord {
                        filename: row.get(0)?,
                        owner: row.get(1)?,
                        record_count: row.get::<_, i64>(2)? as usize,
                        rejected_count: row.get::<_, i64>(3)? as usize,
                        date_range_start: row.get(4)?,
                        date_range_end: row.get(5)?,
                        checksum: row.get(6)?,
                    })
                },
            )
            .optional()?;
        Ok(record)
    }

    fn insert_import(&mut self, records: &[NewTransaction], record: &ImportRecord) -> Result<Vec<i64>> {
        let tx = self.conn.transaction()?;
        let ids = insert_rows(&tx, records)?;
        tx.execute(
            "INSERT INTO imports (filename, owner, record_count, rejected_count, date_range_start, date_range_end, checksum) \
             VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7)",
            rusqlite::params![
                record.filename,
                record.owner,
                record.record_count as i64,
                record.rejected_count as i64,
                record.date_range_start,
                record.date_range_end,
                record.checksum,
            ],
        )?;
        tx.commit()?;
        tracing::info!(count = ids.len(), file = %record.filename, "inserted import batch");
        Ok(ids)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    fn test_store() -> (tempfile::TempDir, SqliteStore) {
        let dir = tempfile::tempdir().unwrap();
        let store = SqliteStore::open(&dir.path().join("test.db")).unwrap();
        (dir, store)
    }

    fn record(owner: &str, name: &str, amount: f64, y: i32, m: u32, d: u32) -> NewTransaction {
        NewTransaction::new(owner, name, amount, NaiveDate::from_ymd_opt(y, m, d).unwrap())
    }

    #[test]
    fn test_init_db_creates_tables() {
        let (_dir, store) = test_store();
        let tables: Vec<String> = store
            .conn
            .prepare("SELECT name FROM sqlite_master WHERE type='table' AND name NOT LIKE 'sqlite_%'")
            .unwrap()
            .query_map([], |row| row.get(0))
            .unwrap()
            .collect::<std::result::Result<Vec<_>, _>>()
            .unwrap();
        for expected in &["transactions", "imports"] {
            assert!(tables.contains(&expected.to_string()), "missing table: {expected}");
        }
    }

    #[test]
    fn test_init_db_is_idempotent() {
        let (_dir, store) = test_store();
        init_db(&store.conn).unwrap();
    }

    #[test]
    fn test_insert_batch_and_fetch_all_newest_first() {
        let (_dir, mut store) = test_store();
        let ids = store
            .insert_batch(&[
                record("alice", "Rent", 500.0, 2024, 1, 1),
                record("alice", "Coffee", 4.5, 2024, 1, 20),
                record("bob", "Lunch", 12.0, 2024, 1, 10),
            ])
            .unwrap();
        assert_eq!(ids.len(), 3);

        let rows = store.fetch_all("alice").unwrap();
        assert_eq!(rows.len(), 2);
        assert_eq!(rows[0].name, "Coffee");
        assert_eq!(rows[1].name, "Rent");
        assert_eq!(rows[0].kind, TransactionKind::Expense);
        assert_eq!(rows[0].status, TransactionStatus::Cleared);
        assert_eq!(rows[0].currency, "IDR");
        assert_eq!(rows[0].date, NaiveDate::from_ymd_opt(2024, 1, 20).unwrap());
    }

    #[test]
    fn test_insert_batch_is_all_or_nothing() {
        let (_dir, mut store) = test_store();
        store
            .conn
            .execute_batch(
                "CREATE TRIGGER reject_boom BEFORE INSERT ON transactions \
                 WHEN NEW.name = 'boom' BEGIN SELECT RAISE(ABORT, 'boom rejected'); END;",
            )
            .unwrap();
        let err = store
            .insert_batch(&[
                record("alice", "ok", 1.0, 2024, 1, 1),
                record("alice", "boom", 2.0, 2024, 1, 2),
            ])
            .unwrap_err();
        assert!(err.to_string().contains("boom rejected"));
        assert!(store.fetch_all("alice").unwrap().is_empty());
    }

    #[test]
    fn test_update_changes_fields_but_not_owner() {
        let (_dir, mut store) = test_store();
        let ids = store.insert_batch(&[record("alice", "Lunch", 10.0, 2024, 2, 3)]).unwrap();
        let patch = TransactionPatch {
            amount: Some(15.0),
            kind: Some(TransactionKind::Income),
            category: Some("Food".to_string()),
            ..Default::default()
        };
        store.update(ids[0], &patch).unwrap();
        let txn = store.get(ids[0]).unwrap().unwrap();
        assert_eq!(txn.amount, 15.0);
        assert_eq!(txn.kind, TransactionKind::Income);
        assert_eq!(txn.category, "Food");
        assert_eq!(txn.name, "Lunch");
        assert_eq!(txn.owner, "alice");
    }

    #[test]
    fn test_update_unknown_id() {
        let (_dir, mut store) = test_store();
        let err = store.update(99, &TransactionPatch::default()).unwrap_err();
        assert!(matches!(err, SpendlogError::NotFound(99)));
    }

    #[test]
    fn test_delete() {
        let (_dir, mut store) = test_store();
        let ids = store.insert_batch(&[record("alice", "Lunch", 10.0, 2024, 2, 3)]).unwrap();
        store.delete(ids[0]).unwrap();
        assert!(store.get(ids[0]).unwrap().is_none());
        assert!(matches!(store.delete(ids[0]), Err(SpendlogError::NotFound(_))));
    }

    fn march_import(owner: &str, checksum: &str) -> ImportRecord {
        ImportRecord {
            filename: "march.csv".to_string(),
            owner: owner.to_string(),
            record_count: 2,
            rejected_count: 1,
            date_range_start: NaiveDate::from_ymd_opt(2024, 3, 1),
            date_range_end: NaiveDate::from_ymd_opt(2024, 3, 30),
            checksum: checksum.to_string(),
        }
    }

    #[test]
    fn test_import_records() {
        let (_dir, mut store) = test_store();
        assert!(store.find_import("alice", "abc").unwrap().is_none());
        let ids = store
            .insert_import(
                &[
                    record("alice", "Lunch", 10.0, 2024, 3, 1),
                    record("alice", "Bus", 2.0, 2024, 3, 30),
                ],
                &march_import("alice", "abc"),
            )
            .unwrap();
        assert_eq!(ids.len(), 2);
        let found = store.find_import("alice", "abc").unwrap().unwrap();
        assert_eq!(found.filename, "march.csv");
        assert_eq!(found.record_count, 2);
        assert_eq!(found.rejected_count, 1);
        assert!(store.find_import("bob", "abc").unwrap().is_none());

        let summary = store.summary("alice").unwrap();
        assert_eq!(summary.imports, 1);
        assert_eq!(summary.transactions, 2);
    }

    #[test]
    fn test_insert_import_rolls_back_rows_when_audit_fails() {
        let (_dir, mut store) = test_store();
        store
            .conn
            .execute_batch(
                "CREATE TRIGGER reject_audit BEFORE INSERT ON imports \
                 BEGIN SELECT RAISE(ABORT, 'audit rejected'); END;",
            )
            .unwrap();
        let err = store
            .insert_import(&[record("alice", "Lunch", 10.0, 2024, 3, 1)], &march_import("alice", "abc"))
            .unwrap_err();
        assert!(err.to_string().contains("audit rejected"));
        assert!(store.fetch_all("alice").unwrap().is_empty());
        assert!(store.find_import("alice", "abc").unwrap().is_none());
    }
}
