//! `la-admin payment` commands.
//!
//! Starting a payment never touches the authority's income. It is cleared by
//! `confirm`, or by `return` with a success URL, once PayPal has approved.

use anyhow::{Result, bail};
use console::style;
use la_admin_core::api::local_authority;
use la_admin_core::payment::{self, PaymentOutcome};

use crate::cli::args::PaymentCommands;
use crate::cli::output::{
    format_money, print_info, print_key_value, print_success, print_warning, with_spinner,
};
use crate::cli::{App, describe};

pub async fn handle_payment_command(app: &App, cmd: PaymentCommands) -> Result<()> {
    match cmd {
        PaymentCommands::Start {
            authority_id,
            uid,
            amount,
            open,
        } => start(app, &authority_id, &uid, amount, open).await,
        PaymentCommands::Confirm { authority_id } => {
            finish(app, &authority_id, PaymentOutcome::Success).await
        }
        PaymentCommands::Return {
            authority_id,
            return_url,
        } => {
            let outcome = PaymentOutcome::from_return_url(&return_url)?;
            finish(app, &authority_id, outcome).await
        }
        PaymentCommands::Cancel { authority_id } => {
            finish(app, &authority_id, PaymentOutcome::Cancelled).await
        }
    }
}

async fn start(
    app: &App,
    authority_id: &str,
    uid: &str,
    amount: Option<f64>,
    open_browser: bool,
) -> Result<()> {
    let client = app.client()?;
    let signal = app.signal();

    let money = match amount {
        Some(money) => money,
        None => {
            let authority = with_spinner(
                &client,
                "Loading collected income...",
                local_authority::profile(&client, &signal, authority_id),
            )
            .await
            .map_err(describe)?;

            match authority.income {
                Some(income) if income > 0.0 => income,
                _ => bail!(
                    "{} has no collected income to pay out. Pass --amount to pay anyway.",
                    authority.name
                ),
            }
        }
    };

    let link = with_spinner(
        &client,
        "Creating PayPal payment...",
        payment::initiate(&client, &signal, uid, authority_id, money),
    )
    .await
    .map_err(describe)?;

    print_success(&format!("Payment of {} created", format_money(money)));
    print_key_value("Approve at", &style(&link).cyan().underlined().to_string());

    if open_browser {
        if let Err(e) = open::that(&link) {
            print_warning(&format!("Could not open browser automatically: {}", e));
        }
    }

    println!();
    print_info(&format!(
        "After approving, run 'la-admin payment confirm {}' to clear the income.",
        authority_id
    ));
    Ok(())
}

async fn finish(app: &App, authority_id: &str, outcome: PaymentOutcome) -> Result<()> {
    let client = app.client()?;
    let signal = app.signal();

    let outcome = with_spinner(
        &client,
        "Recording payment...",
        payment::complete(&client, &signal, authority_id, outcome),
    )
    .await
    .map_err(describe)?;

    match outcome {
        PaymentOutcome::Success => {
            print_success(&format!("Payment successful, income cleared for {}", authority_id))
        }
        PaymentOutcome::Cancelled => print_info("Payment cancelled, income kept."),
    }
    Ok(())
}
