//! Output formatting utilities for CLI.

use std::future::Future;
use std::time::Duration;

use anyhow::{Result, bail};
use console::{Term, style};
use indicatif::{ProgressBar, ProgressStyle};
use la_admin_core::http::{RequestClient, RequestState};
use la_admin_core::validation::ValidationErrors;
use tokio::sync::watch;

/// Prints a table header with the given columns.
pub fn print_table_header(columns: &[(&str, usize)]) {
    let header: String = columns
        .iter()
        .map(|(name, width)| format!("{:<width$}", name, width = width))
        .collect::<Vec<_>>()
        .join(" ");
    println!("{}", style(header).bold());

    let total_width: usize = columns.iter().map(|(_, w)| w + 1).sum();
    println!("{}", "-".repeat(total_width.saturating_sub(1)));
}

/// Prints a table row with the given values.
pub fn print_table_row(values: &[(&str, usize)]) {
    let row: String = values
        .iter()
        .map(|(val, width)| format!("{:<width$}", truncate(val, *width), width = width))
        .collect::<Vec<_>>()
        .join(" ");
    println!("{}", row);
}

/// Shortens `value` to `width` characters, marking the cut with "...".
fn truncate(value: &str, width: usize) -> String {
    if value.chars().count() <= width {
        return value.to_string();
    }
    let kept: String = value.chars().take(width.saturating_sub(3)).collect();
    format!("{}...", kept)
}

/// Prints a key-value pair with consistent formatting.
pub fn print_key_value(key: &str, value: &str) {
    println!("{:<16}{}", format!("{}:", key), value);
}

/// Prints a section header.
pub fn print_section(title: &str) {
    println!();
    println!("{}", style(title).bold().underlined());
}

/// Prints a success message.
pub fn print_success(message: &str) {
    println!("{} {}", style("✓").green(), message);
}

/// Prints an info message.
pub fn print_info(message: &str) {
    println!("{} {}", style("ℹ").blue(), message);
}

/// Prints a warning message.
pub fn print_warning(message: &str) {
    eprintln!("{} {}", style("⚠").yellow(), message);
}

/// Prints an error message.
pub fn print_error(message: &str) {
    eprintln!("{} {}", style("✗").red(), message);
}

/// Prints each field violation and returns the error that aborts the command.
pub fn validation_error(errors: &ValidationErrors) -> anyhow::Error {
    for error in errors.iter() {
        print_error(&format!("{}: {}", error.field, error.message));
    }
    anyhow::anyhow!("{} invalid field(s), nothing was sent", errors.len())
}

/// Asks a yes/no question on the terminal. Defaults to no.
pub fn confirm(question: &str) -> Result<bool> {
    let term = Term::stderr();
    if !term.is_term() {
        bail!("Cannot ask for confirmation without a terminal. Pass --yes to proceed.");
    }

    term.write_str(&format!("{} [y/N] ", question))?;
    let answer = term.read_line()?;
    Ok(matches!(answer.trim().to_lowercase().as_str(), "y" | "yes"))
}

/// Formats an amount of money for display.
pub fn format_money(amount: f64) -> String {
    format!("RM {:.2}", amount)
}

/// Renders `value` as a bar proportional to `max`.
pub fn bar(value: f64, max: f64, width: usize) -> String {
    if max <= 0.0 || value <= 0.0 {
        return String::new();
    }
    let filled = ((value / max) * width as f64).round() as usize;
    "█".repeat(filled.clamp(1, width))
}

/// Runs `work` while a spinner mirrors the client's loading flag.
pub async fn with_spinner<F: Future>(client: &RequestClient, message: &str, work: F) -> F::Output {
    let spinner = ProgressBar::new_spinner();
    spinner.set_style(
        ProgressStyle::default_spinner()
            .tick_chars("⠋⠙⠹⠸⠼⠴⠦⠧⠇⠏ ")
            .template("{spinner:.cyan} {msg}")
            .unwrap_or_else(|_| ProgressStyle::default_spinner()),
    );
    spinner.set_message(message.to_string());

    tokio::pin!(work);
    let output = tokio::select! {
        biased;
        output = &mut work => output,
        () = follow_loading(client.subscribe(), &spinner) => work.await,
    };

    spinner.finish_and_clear();
    output
}

async fn follow_loading(mut rx: watch::Receiver<RequestState>, spinner: &ProgressBar) {
    while rx.changed().await.is_ok() {
        if rx.borrow_and_update().is_loading {
            spinner.reset();
            spinner.enable_steady_tick(Duration::from_millis(80));
        } else {
            spinner.disable_steady_tick();
            spinner.finish_and_clear();
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_truncate() {
        assert_eq!(truncate("MBPJ", 10), "MBPJ");
        assert_eq!(truncate("Majlis Bandaraya Petaling Jaya", 10), "Majlis ...");
        assert_eq!(truncate("Pulau Pinang", 12), "Pulau Pinang");
    }

    #[test]
    fn test_bar() {
        assert_eq!(bar(50.0, 100.0, 10), "█████");
        assert_eq!(bar(100.0, 100.0, 10), "██████████");
        // Any positive value shows at least one block
        assert_eq!(bar(0.1, 100.0, 10), "█");
        assert_eq!(bar(0.0, 100.0, 10), "");
        assert_eq!(bar(5.0, 0.0, 10), "");
    }

    #[test]
    fn test_format_money() {
        assert_eq!(format_money(120.5), "RM 120.50");
        assert_eq!(format_money(0.0), "RM 0.00");
    }
}
