use colored::Colorize;
use comfy_table::{Cell, Table};

use crate::aggregator::{build_dashboard, Dashboard};
use crate::cli::Context;
use crate::error::{Result, SpendlogError};
use crate::fmt::money;
use crate::store::TransactionStore;

const BAR_WIDTH: f64 = 30.0;

/// The single currency used by the charted transactions, or "" when mixed.
fn display_currency(dash: &Dashboard<'_>) -> String {
    let mut currencies = dash
        .daily_series
        .iter()
        .flat_map(|b| b.contributors.iter().map(|t| t.currency.as_str()));
    match currencies.next() {
        Some(first) if currencies.all(|c| c == first) => first.to_string(),
        Some(_) => String::new(),
        None => crate::models::DEFAULT_CURRENCY.to_string(),
    }
}

fn print_text(dash: &Dashboard<'_>) {
    let Some(month) = dash.selected_month else {
        println!("No data.");
        return;
    };
    let currency = display_currency(dash);

    let others: Vec<String> = dash
        .months
        .iter()
        .filter(|m| **m != month)
        .map(|m| m.to_string())
        .collect();
    println!("Month: {}", month.to_string().bold());
    if !others.is_empty() {
        println!("Other months: {}", others.join(", "));
    }
    println!(
        "Total spent: {}\n",
        money(dash.total_spent, &currency).blue().bold()
    );

    let peak = dash
        .daily_series
        .iter()
        .map(|b| b.total)
        .fold(0.0_f64, f64::max);
    let mut daily = Table::new();
    daily.set_header(vec!["Day", "Total", "", "Transactions"]);
    for bucket in &dash.daily_series {
        let bar = if peak > 0.0 {
            "█".repeat((bucket.total / peak * BAR_WIDTH).round() as usize)
        } else {
            String::new()
        };
        let names: Vec<String> = bucket
            .contributors
            .iter()
            .map(|t| format!("{}: {}", t.name, money(t.amount, &t.currency)))
            .collect();
        daily.add_row(vec![
            Cell::new(&bucket.label),
            Cell::new(money(bucket.total, &currency)),
            Cell::new(bar),
            Cell::new(names.join("\n")),
        ]);
    }
    println!("Daily Expenses\n{daily}");

    if dash.category_totals.is_empty() {
        println!("\nNo expenses this month.");
        return;
    }
    let mut categories = Table::new();
    categories.set_header(vec!["Category", "Total", "%"]);
    for cat in &dash.category_totals {
        let pct = if dash.total_spent > 0.0 {
            cat.total / dash.total_spent * 100.0
        } else {
            0.0
        };
        categories.add_row(vec![
            Cell::new(&cat.name),
            Cell::new(money(cat.total, &currency)),
            Cell::new(format!("{pct:.1}%")),
        ]);
    }
    println!("\nCategory Summary\n{categories}");
}

pub fn run(ctx: &Context, month: Option<String>, json: bool) -> Result<()> {
    let store = ctx.open_store()?;
    let transactions = store.fetch_all(ctx.owner())?;
    let dash = build_dashboard(&transactions, month.as_deref());

    if json {
        let out = serde_json::to_string_pretty(&dash)
            .map_err(|e| SpendlogError::Other(format!("JSON encoding failed: {e}")))?;
        println!("{out}");
    } else {
        print_text(&dash);
    }
    Ok(())
}
