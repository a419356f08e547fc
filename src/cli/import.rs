use std::path::PathBuf;

use colored::Colorize;
use comfy_table::{Cell, Table};

use crate::cli::{today, Context};
use crate::error::{Result, RowError, SpendlogError};
use crate::importer::import_file;

fn print_rejected(rejected: &[RowError]) {
    let mut table = Table::new();
    table.set_header(vec!["Line", "Problem", "Detail"]);
    for r in rejected {
        table.add_row(vec![
            Cell::new(r.line),
            Cell::new(r.kind.label()),
            Cell::new(r.kind.message()),
        ]);
    }
    println!("Rejected rows\n{table}");
}

pub fn run(ctx: &Context, file: &str, force: bool) -> Result<()> {
    let file_path = PathBuf::from(file);
    let mut store = ctx.open_store()?;

    match import_file(&mut store, &file_path, ctx.owner(), today(), force) {
        Ok(result) => {
            println!(
                "{} imported, {} rejected",
                result.ids.len().to_string().green(),
                result.rejected.len()
            );
            if !result.rejected.is_empty() {
                print_rejected(&result.rejected);
            }
            Ok(())
        }
        Err(SpendlogError::NoValidRows { rejected }) => {
            if !rejected.is_empty() {
                print_rejected(&rejected);
            }
            Err(SpendlogError::NoValidRows { rejected })
        }
        Err(e) => Err(e),
    }
}
