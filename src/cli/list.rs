use colored::Colorize;
use comfy_table::{Cell, Table};

use crate::cli::Context;
use crate::error::Result;
use crate::filters::LedgerFilter;
use crate::fmt::money;
use crate::models::TransactionKind;
use crate::store::TransactionStore;

pub fn run(ctx: &Context, filter: LedgerFilter) -> Result<()> {
    let store = ctx.open_store()?;
    let transactions = store.fetch_all(ctx.owner())?;
    let rows = filter.apply(&transactions);

    if rows.is_empty() {
        println!("No transactions found.");
        return Ok(());
    }

    let mut table = Table::new();
    table.set_header(vec!["ID", "Date", "Name", "Amount", "Type", "Category", "Status"]);
    for t in &rows {
        let amt = match t.kind {
            TransactionKind::Expense => money(t.amount, &t.currency).red().to_string(),
            TransactionKind::Income => money(t.amount, &t.currency).green().to_string(),
        };
        let category = if t.category.is_empty() { "—" } else { t.category.as_str() };
        table.add_row(vec![
            Cell::new(t.id),
            Cell::new(t.date),
            Cell::new(&t.name),
            Cell::new(amt),
            Cell::new(t.kind),
            Cell::new(category),
            Cell::new(t.status),
        ]);
    }
    println!("Transactions\n{table}");
    println!("{} shown", rows.len());
    Ok(())
}
