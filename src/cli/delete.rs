use crate::cli::Context;
use crate::error::Result;
use crate::store::TransactionStore;

pub fn run(ctx: &Context, id: i64) -> Result<()> {
    let mut store = ctx.open_store()?;
    store.delete(id)?;
    println!("Deleted transaction #{id}");
    Ok(())
}
