use crate::cli::Context;
use crate::db::SqliteStore;
use crate::error::Result;

pub fn run(ctx: &Context) -> Result<()> {
    let settings = &ctx.settings;
    let db_path = settings.db_path();

    println!("Owner:      {}", settings.owner);
    println!("Data dir:   {}", settings.data_dir);
    println!("Database:   {}", db_path.display());

    if db_path.exists() {
        let store = SqliteStore::open(&db_path)?;
        let summary = store.summary(ctx.owner())?;
        println!();
        println!("Transactions:  {}", summary.transactions);
        println!("Imports:       {}", summary.imports);
    } else {
        println!();
        println!("Database not found. Run `spendlog init` to set up.");
    }

    Ok(())
}
