use std::path::PathBuf;

use crate::cli::Context;
use crate::db::{get_connection, init_db};
use crate::error::Result;
use crate::settings::{save_settings, shellexpand_path};

pub fn run(ctx: Context, data_dir: Option<String>) -> Result<()> {
    let mut settings = ctx.settings;
    if let Some(dir) = data_dir {
        settings.data_dir = shellexpand_path(&dir);
    }

    save_settings(&settings)?;

    let resolved = PathBuf::from(&settings.data_dir);
    std::fs::create_dir_all(&resolved)?;

    let conn = get_connection(&settings.db_path())?;
    init_db(&conn)?;

    println!("Initialized spendlog at {} (owner: {})", resolved.display(), settings.owner);
    Ok(())
}
