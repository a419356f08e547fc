use crate::error::Result;
use crate::models::{ImportRecord, NewTransaction, Transaction, TransactionPatch};

/// The persistence boundary. Each call is atomic; a failed call changes nothing.
pub trait TransactionStore {
    /// Insert all records or none. Returns the assigned ids in input order.
    fn insert_batch(&mut self, records: &[NewTransaction]) -> Result<Vec<i64>>;

    /// Every transaction belonging to `owner`, newest date first.
    fn fetch_all(&self, owner: &str) -> Result<Vec<Transaction>>;

    fn update(&mut self, id: i64, patch: &TransactionPatch) -> Result<()>;

    fn delete(&mut self, id: i64) -> Result<()>;

    fn find_import(&self, owner: &str, checksum: &str) -> Result<Option<ImportRecord>>;

    /// Insert `records` together with the audit row describing where they came
    /// from. Both land or neither does.
    fn insert_import(&mut self, records: &[NewTransaction], record: &ImportRecord) -> Result<Vec<i64>>;
}
