use crate::aggregator::months;
use crate::cli::Context;
use crate::error::Result;
use crate::store::TransactionStore;

pub fn run(ctx: &Context) -> Result<()> {
    let store = ctx.open_store()?;
    let transactions = store.fetch_all(ctx.owner())?;
    let keys = months(&transactions);
    if keys.is_empty() {
        println!("No transactions yet.");
        return Ok(());
    }
    for key in keys {
        println!("{key}");
    }
    Ok(())
}
