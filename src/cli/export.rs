use std::fs::File;
use std::io::BufWriter;
use std::path::PathBuf;

use crate::cli::Context;
use crate::error::Result;
use crate::exporter::write_csv;
use crate::store::TransactionStore;

pub fn run(ctx: &Context, output: Option<String>) -> Result<()> {
    let store = ctx.open_store()?;
    let transactions = store.fetch_all(ctx.owner())?;

    match output {
        Some(path) => {
            let path = PathBuf::from(path);
            if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
                std::fs::create_dir_all(parent)?;
            }
            let count = write_csv(BufWriter::new(File::create(&path)?), &transactions)?;
            eprintln!("Wrote {count} transactions to {}", path.display());
        }
        None => {
            write_csv(std::io::stdout().lock(), &transactions)?;
        }
    }
    Ok(())
}
