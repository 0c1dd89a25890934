//! `la-admin authority` commands.

use anyhow::Result;
use la_admin_core::api::local_authority;
use la_admin_core::models::LocalAuthority;
use la_admin_core::validation::LocalAuthorityForm;

use crate::cli::args::{AuthorityCommands, AuthorityFields};
use crate::cli::output::{
    confirm, format_money, print_info, print_key_value, print_section, print_success,
    print_table_header, print_table_row, validation_error, with_spinner,
};
use crate::cli::{App, describe};

pub async fn handle_authority_command(app: &App, cmd: AuthorityCommands) -> Result<()> {
    match cmd {
        AuthorityCommands::List => list(app).await,
        AuthorityCommands::Show { id } => show(app, &id).await,
        AuthorityCommands::Create { fields } => create(app, fields).await,
        AuthorityCommands::Update { id, fields } => update(app, &id, fields).await,
        // Confirmation is settled by `confirm_delete` before dispatch
        AuthorityCommands::Delete { id, .. } => delete(app, &id).await,
    }
}

async fn list(app: &App) -> Result<()> {
    let client = app.client()?;
    let signal = app.signal();

    let authorities = with_spinner(
        &client,
        "Loading local authorities...",
        local_authority::list(&client, &signal),
    )
    .await
    .map_err(describe)?;

    if authorities.is_empty() {
        print_info("No local authorities found.");
        return Ok(());
    }

    print_table_header(&[
        ("NO.", 4),
        ("ID", 26),
        ("NAME", 28),
        ("NICKNAME", 10),
        ("AREA", 16),
        ("STATE", 14),
        ("INCOME", 12),
    ]);
    for (i, authority) in authorities.iter().enumerate() {
        let number = (i + 1).to_string();
        let income = authority.income.map(format_money).unwrap_or_else(|| "-".to_string());
        print_table_row(&[
            (&number, 4),
            (&authority.id, 26),
            (&authority.name, 28),
            (&authority.nickname, 10),
            (&authority.area, 16),
            (&authority.state, 14),
            (&income, 12),
        ]);
    }
    Ok(())
}

async fn show(app: &App, id: &str) -> Result<()> {
    let client = app.client()?;
    let signal = app.signal();

    let authority = with_spinner(
        &client,
        "Loading local authority...",
        local_authority::profile(&client, &signal, id),
    )
    .await
    .map_err(describe)?;

    print_authority(&authority);
    Ok(())
}

fn print_authority(authority: &LocalAuthority) {
    print_section(&authority.name);
    print_key_value("ID", &authority.id);
    print_key_value("Nickname", &authority.nickname);
    print_key_value("Email", &authority.email);
    print_key_value("Phone", &authority.no_telephone);
    print_key_value("Area", &authority.area);
    print_key_value("State", &authority.state);
    print_key_value(
        "Income",
        &authority.income.map(format_money).unwrap_or_else(|| "-".to_string()),
    );
}

/// Overlays the fields given on the command line onto `form`.
fn apply(form: &mut LocalAuthorityForm, fields: AuthorityFields) {
    let AuthorityFields {
        name,
        nickname,
        email,
        phone,
        area,
        state,
    } = fields;

    for (slot, value) in [
        (&mut form.name, name),
        (&mut form.nickname, nickname),
        (&mut form.email, email),
        (&mut form.phone, phone),
        (&mut form.area, area),
        (&mut form.state, state),
    ] {
        if let Some(value) = value {
            *slot = value;
        }
    }
}

async fn create(app: &App, fields: AuthorityFields) -> Result<()> {
    let mut form = LocalAuthorityForm::default();
    apply(&mut form, fields);
    let payload = form.validate().map_err(|e| validation_error(&e))?;

    let client = app.client()?;
    let signal = app.signal();
    with_spinner(
        &client,
        "Creating local authority...",
        local_authority::create(&client, &signal, &payload),
    )
    .await
    .map_err(describe)?;

    print_success(&format!("Created local authority '{}'", payload.name));
    Ok(())
}

async fn update(app: &App, id: &str, fields: AuthorityFields) -> Result<()> {
    let client = app.client()?;
    let signal = app.signal();

    let current = with_spinner(
        &client,
        "Loading local authority...",
        local_authority::profile(&client, &signal, id),
    )
    .await
    .map_err(describe)?;

    let mut form = LocalAuthorityForm::from(&current);
    apply(&mut form, fields);
    let payload = form.validate().map_err(|e| validation_error(&e))?;

    with_spinner(
        &client,
        "Saving local authority...",
        local_authority::update(&client, &signal, id, &payload),
    )
    .await
    .map_err(describe)?;

    print_success(&format!("Updated local authority '{}'", payload.name));
    Ok(())
}

/// Asks before a delete. Checks the session first so a logged-out operator
/// is not prompted for nothing.
pub fn confirm_delete(app: &App, id: &str) -> Result<bool> {
    app.require_session()?;

    if confirm(&format!("Delete local authority {}?", id))? {
        Ok(true)
    } else {
        print_info("Nothing deleted.");
        Ok(false)
    }
}

async fn delete(app: &App, id: &str) -> Result<()> {
    let client = app.client()?;
    let signal = app.signal();
    with_spinner(
        &client,
        "Deleting local authority...",
        local_authority::delete(&client, &signal, id),
    )
    .await
    .map_err(describe)?;

    print_success(&format!("Deleted local authority {}", id));
    Ok(())
}
