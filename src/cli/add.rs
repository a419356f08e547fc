use chrono::NaiveDate;

use crate::cli::{today, Context};
use crate::error::Result;
use crate::fmt::money;
use crate::models::{NewTransaction, TransactionKind, TransactionStatus};
use crate::store::TransactionStore;

pub struct AddArgs {
    pub name: String,
    pub amount: f64,
    pub date: Option<NaiveDate>,
    pub kind: TransactionKind,
    pub category: String,
    pub description: String,
    pub status: TransactionStatus,
    pub currency: String,
}

pub fn run(ctx: &Context, args: AddArgs) -> Result<()> {
    let txn = NewTransaction {
        kind: args.kind,
        category: args.category.trim().to_string(),
        description: args.description.trim().to_string(),
        status: args.status,
        currency: args.currency.trim().to_string(),
        ..NewTransaction::new(
            ctx.owner(),
            args.name.trim(),
            args.amount,
            args.date.unwrap_or_else(today),
        )
    };
    txn.validate()?;

    let mut store = ctx.open_store()?;
    let ids = store.insert_batch(std::slice::from_ref(&txn))?;
    println!(
        "Added #{}: {} {} ({}) on {}",
        ids[0],
        txn.name,
        money(txn.amount, &txn.currency),
        txn.kind,
        txn.date
    );
    Ok(())
}
