//! `la-admin dashboard`: daily income overview.

use anyhow::Result;
use la_admin_core::api::transactions;
use la_admin_core::models::DailyIncome;

use crate::cli::output::{
    bar, format_money, print_info, print_key_value, print_section, print_table_header,
    print_table_row, with_spinner,
};
use crate::cli::{App, describe};

const BAR_WIDTH: usize = 30;

pub async fn show(app: &App) -> Result<()> {
    let client = app.client()?;
    let signal = app.signal();

    let series = with_spinner(
        &client,
        "Loading daily income...",
        transactions::daily_income(&client, &signal),
    )
    .await
    .map_err(describe)?;

    print_section("Daily income");
    if series.is_empty() {
        print_info("No income recorded yet.");
        return Ok(());
    }

    print_table_header(&[("DATE", 12), ("INCOME", 14), ("", BAR_WIDTH)]);
    for (date, amount, graph) in rows(&series) {
        print_table_row(&[(&date, 12), (&amount, 14), (&graph, BAR_WIDTH)]);
    }

    println!();
    print_key_value("Days", &series.len().to_string());
    print_key_value("Total", &format_money(total(&series)));
    Ok(())
}

fn total(series: &[DailyIncome]) -> f64 {
    series.iter().map(|d| d.income).sum()
}

fn rows(series: &[DailyIncome]) -> Vec<(String, String, String)> {
    let max = series.iter().map(|d| d.income).fold(0.0, f64::max);
    series
        .iter()
        .map(|d| {
            (
                d.date.clone(),
                format_money(d.income),
                bar(d.income, max, BAR_WIDTH),
            )
        })
        .collect()
}
