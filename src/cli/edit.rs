use crate::cli::Context;
use crate::error::{Result, SpendlogError};
use crate::fmt::money;
use crate::models::TransactionPatch;
use crate::store::TransactionStore;

pub fn run(ctx: &Context, id: i64, patch: TransactionPatch) -> Result<()> {
    if patch.is_empty() {
        return Err(SpendlogError::Other(
            "Nothing to change: pass at least one field, e.g. --amount or --category".to_string(),
        ));
    }
    patch.validate()?;

    let mut store = ctx.open_store()?;
    store.update(id, &patch)?;
    if let Some(t) = store.get(id)? {
        println!(
            "Updated #{id}: {} {} ({}, {}) on {}",
            t.name,
            money(t.amount, &t.currency),
            t.kind,
            if t.category.is_empty() { "no category" } else { t.category.as_str() },
            t.date
        );
    }
    Ok(())
}
