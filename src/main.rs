mod aggregator;
mod cli;
mod db;
mod error;
mod exporter;
mod filters;
mod fmt;
mod importer;
mod models;
mod settings;
mod store;

use clap::Parser;
use tracing_subscriber::EnvFilter;

use cli::add::AddArgs;
use cli::{Cli, Commands, Context};
use filters::LedgerFilter;
use models::TransactionPatch;

/// Logs go to stderr so `--json` output stays clean. `RUST_LOG` overrides the default level.
fn setup_logging(verbose: bool) {
    let default = if verbose { "debug" } else { "warn" };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();
}

fn main() {
    let cli = Cli::parse();
    setup_logging(cli.verbose);
    let ctx = Context::load(cli.owner);

    let result = match cli.command {
        Commands::Init { data_dir } => cli::init::run(ctx, data_dir),
        Commands::Add {
            name,
            amount,
            date,
            kind,
            category,
            description,
            status,
            currency,
        } => cli::add::run(
            &ctx,
            AddArgs {
                name,
                amount,
                date,
                kind,
                category,
                description,
                status,
                currency,
            },
        ),
        Commands::Import { file, force } => cli::import::run(&ctx, &file, force),
        Commands::List {
            month,
            year,
            kind,
            category,
        } => cli::list::run(
            &ctx,
            LedgerFilter {
                month,
                year,
                kind,
                category,
            },
        ),
        Commands::Edit {
            id,
            date,
            name,
            amount,
            kind,
            category,
            description,
            status,
            currency,
        } => cli::edit::run(
            &ctx,
            id,
            TransactionPatch {
                date,
                name,
                amount,
                kind,
                category,
                description,
                status,
                currency,
            },
        ),
        Commands::Delete { id } => cli::delete::run(&ctx, id),
        Commands::Months => cli::months::run(&ctx),
        Commands::Dashboard { month, json } => cli::dashboard::run(&ctx, month, json),
        Commands::Export { output } => cli::export::run(&ctx, output),
        Commands::Status => cli::status::run(&ctx),
    };

    if let Err(e) = result {
        eprintln!("Error: {e}");
        std::process::exit(1);
    }
}
