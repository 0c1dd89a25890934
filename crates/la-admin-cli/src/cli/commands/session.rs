//! `la-admin login`, `logout`, and `status`.

use anyhow::{Context, Result, bail};
use chrono::Local;
use console::Term;

use crate::cli::App;
use crate::cli::output::{print_info, print_key_value, print_success};

/// Stores a session token. The token comes from `--token`, then
/// `LA_ADMIN_TOKEN` or the profile, then an interactive prompt.
pub fn login(app: &App, token: Option<String>) -> Result<()> {
    let token = match token.or_else(|| app.config().token.clone()) {
        Some(t) => t,
        None => prompt_token()?,
    };

    app.session().login(token.trim())?;

    print_success("Logged in");
    if let Some(expires_at) = app.session().expires_at() {
        let local = expires_at.with_timezone(&Local);
        print_key_value("Expires", &local.format("%Y-%m-%d %H:%M:%S").to_string());
    }
    Ok(())
}

fn prompt_token() -> Result<String> {
    let term = Term::stderr();
    if !term.is_term() {
        bail!("No token given. Pass --token or set LA_ADMIN_TOKEN.");
    }

    term.write_str("Session token: ")?;
    let token = term.read_secure_line().context("Failed to read token")?;
    Ok(token)
}

/// Clears the stored session.
pub fn logout(app: &App) -> Result<()> {
    let was_authenticated = app.session().is_authenticated();
    app.session().logout()?;

    if was_authenticated {
        print_success("Logged out");
    } else {
        print_info("No active session");
    }
    Ok(())
}

/// Shows the current session.
pub fn status(app: &App) -> Result<()> {
    print_key_value("Server", &app.config().server);
    print_key_value("Session file", &app.session_path().display().to_string());

    match app.session().expires_at() {
        Some(expires_at) => {
            let remaining = expires_at - chrono::Utc::now();
            print_key_value("Session", "active");
            print_key_value(
                "Expires",
                &format!(
                    "{} ({} min left)",
                    expires_at.with_timezone(&Local).format("%Y-%m-%d %H:%M:%S"),
                    remaining.num_minutes().max(0)
                ),
            );
        }
        None => {
            print_key_value("Session", "none");
            print_info("Run 'la-admin login' to start a session.");
        }
    }
    Ok(())
}
