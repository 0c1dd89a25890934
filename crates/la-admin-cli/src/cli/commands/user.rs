//! `la-admin user` commands.

use anyhow::Result;
use la_admin_core::api::users;
use la_admin_core::validation::UserForm;

use crate::cli::args::{UserCommands, UserFields};
use crate::cli::output::{
    print_info, print_key_value, print_section, print_success, print_table_header,
    print_table_row, validation_error, with_spinner,
};
use crate::cli::{App, describe};

pub async fn handle_user_command(app: &App, cmd: UserCommands) -> Result<()> {
    match cmd {
        UserCommands::List => list(app).await,
        UserCommands::Show { uid } => show(app, &uid).await,
        UserCommands::Update { uid, fields } => update(app, &uid, fields).await,
    }
}

async fn list(app: &App) -> Result<()> {
    let client = app.client()?;
    let signal = app.signal();

    let users = with_spinner(&client, "Loading users...", users::list(&client, &signal))
        .await
        .map_err(describe)?;

    if users.is_empty() {
        print_info("No users found.");
        return Ok(());
    }

    print_table_header(&[
        ("NO.", 4),
        ("ID", 26),
        ("NAME", 24),
        ("EMAIL", 28),
        ("PHONE", 14),
        ("ROLE", 14),
    ]);
    for (i, user) in users.iter().enumerate() {
        let number = (i + 1).to_string();
        print_table_row(&[
            (&number, 4),
            (&user.id, 26),
            (&user.name, 24),
            (user.email.as_deref().unwrap_or("-"), 28),
            (user.no_telephone.as_deref().unwrap_or("-"), 14),
            (&user.role, 14),
        ]);
    }
    Ok(())
}

async fn show(app: &App, uid: &str) -> Result<()> {
    let client = app.client()?;
    let signal = app.signal();

    let user = with_spinner(&client, "Loading user...", users::profile(&client, &signal, uid))
        .await
        .map_err(describe)?;

    print_section(&user.name);
    print_key_value("ID", &user.id);
    print_key_value("Email", user.email.as_deref().unwrap_or("-"));
    print_key_value("Phone", user.no_telephone.as_deref().unwrap_or("-"));
    print_key_value("Role", &user.role);
    Ok(())
}

/// Overlays the fields given on the command line onto `form`.
fn apply(form: &mut UserForm, fields: UserFields) {
    let UserFields {
        name,
        email,
        phone,
        role,
    } = fields;

    for (slot, value) in [
        (&mut form.name, name),
        (&mut form.email, email),
        (&mut form.phone, phone),
        (&mut form.role, role),
    ] {
        if let Some(value) = value {
            *slot = value;
        }
    }
}

async fn update(app: &App, uid: &str, fields: UserFields) -> Result<()> {
    let client = app.client()?;
    let signal = app.signal();

    let current = with_spinner(&client, "Loading user...", users::profile(&client, &signal, uid))
        .await
        .map_err(describe)?;

    let mut form = UserForm::from(&current);
    apply(&mut form, fields);
    let payload = form.validate().map_err(|e| validation_error(&e))?;

    with_spinner(
        &client,
        "Saving user...",
        users::admin_update(&client, &signal, uid, &payload),
    )
    .await
    .map_err(describe)?;

    print_success(&format!("Updated user '{}' ({})", payload.name, payload.role));
    Ok(())
}
