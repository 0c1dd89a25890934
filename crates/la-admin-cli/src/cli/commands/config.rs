//! `la-admin config` commands for managing CLI configuration.

use anyhow::{Context, Result, bail};
use std::collections::HashMap;
use std::fs;
use std::path::Path;

#[cfg(unix)]
use std::os::unix::fs::PermissionsExt;

use crate::cli::args::ConfigCommands;
use crate::cli::output::{print_info, print_key_value, print_section, print_success};
use crate::config::{
    CONFIG_ENV, CliConfig, DEFAULT_SERVER, Profile, config_path, default_config_path, load_config,
};

pub fn handle_config_command(cmd: ConfigCommands) -> Result<()> {
    match cmd {
        ConfigCommands::Init {
            server,
            token,
            force,
        } => init_config(server, token, force),
        ConfigCommands::Set {
            profile,
            server,
            token,
            timeout_secs,
            default,
        } => set_config(profile, server, token, timeout_secs, default),
        ConfigCommands::Show { show_token } => show_config(show_token),
        ConfigCommands::Profiles => list_profiles(),
        ConfigCommands::Path => show_path(),
    }
}

/// Create a new config file.
fn init_config(server: Option<String>, token: Option<String>, force: bool) -> Result<()> {
    let path = config_path()?;

    if path.exists() && !force {
        bail!(
            "Config file already exists at {}. Use --force to overwrite.",
            path.display()
        );
    }

    let mut profiles = HashMap::new();
    profiles.insert(
        "default".to_string(),
        Profile {
            server: server.unwrap_or_else(|| DEFAULT_SERVER.to_string()),
            token,
            timeout_secs: None,
        },
    );
    let config = CliConfig {
        default_profile: "default".to_string(),
        profiles,
    };

    write_config(&path, &config)?;

    print_success(&format!("Created config file at {}", path.display()));
    println!();
    println!("To add more profiles:");
    println!("  la-admin config set --name staging --server https://staging.example.gov.my/api");
    println!();
    println!("To set a token:");
    println!("  la-admin config set --token <your-token>");

    Ok(())
}

/// Update profile values.
fn set_config(
    profile_name: String,
    server: Option<String>,
    token: Option<String>,
    timeout_secs: Option<u64>,
    set_default: bool,
) -> Result<()> {
    let path = config_path()?;
    let mut config = load_config()?.unwrap_or_else(|| CliConfig {
        default_profile: "default".to_string(),
        profiles: HashMap::new(),
    });

    if !apply_changes(
        &mut config,
        &profile_name,
        server,
        token,
        timeout_secs,
        set_default,
    )? {
        print_info("No changes specified. Use --server, --token, --timeout-secs, or --default.");
        return Ok(());
    }

    write_config(&path, &config)?;

    print_success(&format!("Updated profile '{}'", profile_name));
    if set_default {
        print_success(&format!("Set '{}' as default profile", profile_name));
    }

    Ok(())
}

/// Applies `set` arguments to `config`. Returns whether anything changed.
fn apply_changes(
    config: &mut CliConfig,
    profile_name: &str,
    server: Option<String>,
    token: Option<String>,
    timeout_secs: Option<u64>,
    set_default: bool,
) -> Result<bool> {
    if timeout_secs == Some(0) {
        bail!("--timeout-secs must be greater than zero");
    }
    if let Some(ref s) = server {
        url::Url::parse(s).with_context(|| format!("Invalid server URL '{}'", s))?;
    }

    let profile = config
        .profiles
        .entry(profile_name.to_string())
        .or_insert_with(|| Profile::new(DEFAULT_SERVER));

    let mut updated = false;
    if let Some(s) = server {
        profile.server = s;
        updated = true;
    }
    if let Some(t) = token {
        profile.token = Some(t);
        updated = true;
    }
    if let Some(secs) = timeout_secs {
        profile.timeout_secs = Some(secs);
        updated = true;
    }

    // A fresh file needs its default to point somewhere real
    if set_default || !config.profiles.contains_key(&config.default_profile) {
        updated |= config.default_profile != profile_name;
        config.default_profile = profile_name.to_string();
    }

    Ok(updated || set_default)
}

/// Display current configuration.
fn show_config(show_token: bool) -> Result<()> {
    let path = config_path()?;

    let config = match load_config()? {
        Some(c) => c,
        None => {
            print_info(&format!("No config file found at {}", path.display()));
            println!();
            println!("Using defaults:");
            print_key_value("  Server", DEFAULT_SERVER);
            println!();
            println!("Run 'la-admin config init' to create a config file.");
            return Ok(());
        }
    };

    print_key_value("Config file", &path.display().to_string());
    print_key_value("Default profile", &config.default_profile);

    let mut names: Vec<_> = config.profiles.keys().collect();
    names.sort();

    for name in names {
        let profile = &config.profiles[name];
        let marker = if name == &config.default_profile { " *" } else { "" };

        print_section(&format!("[{}]{}", name, marker));
        print_key_value("Server", &profile.server);
        match profile.token {
            Some(ref token) if show_token => print_key_value("Token", token),
            Some(ref token) => print_key_value(
                "Token",
                &format!("{} (use --show-token to reveal)", mask_token(token)),
            ),
            None => print_key_value("Token", "(not set)"),
        }
        if let Some(secs) = profile.timeout_secs {
            print_key_value("Timeout", &format!("{}s", secs));
        }
    }

    Ok(())
}

/// List all available profiles.
fn list_profiles() -> Result<()> {
    let config = match load_config()? {
        Some(c) => c,
        None => {
            print_info("No config file found. Run 'la-admin config init' to create one.");
            return Ok(());
        }
    };

    let mut names: Vec<_> = config.profiles.keys().collect();
    names.sort();

    println!("Available profiles:");
    for name in names {
        if name == &config.default_profile {
            println!("  {} *", name);
        } else {
            println!("  {}", name);
        }
    }
    println!();
    println!("* = default profile");

    Ok(())
}

/// Show the config file path.
fn show_path() -> Result<()> {
    println!("{}", config_path()?.display());

    if std::env::var(CONFIG_ENV).is_ok() {
        println!();
        println!(
            "Note: {} is set; the default would be {}",
            CONFIG_ENV,
            default_config_path()?.display()
        );
    }

    Ok(())
}

/// Mask a token for display (show first 4 and last 4 characters).
/// Requires at least 12 characters to show partial content (ensuring 4+ masked in middle).
fn mask_token(token: &str) -> String {
    let chars: Vec<char> = token.chars().collect();
    if chars.len() < 12 {
        "*".repeat(chars.len())
    } else {
        let head: String = chars[..4].iter().collect();
        let tail: String = chars[chars.len() - 4..].iter().collect();
        format!("{}...{}", head, tail)
    }
}

/// Write config to file with proper HUML formatting and secure permissions.
fn write_config(path: &Path, config: &CliConfig) -> Result<()> {
    if let Some(dir) = path.parent().filter(|d| !d.as_os_str().is_empty()) {
        if !dir.exists() {
            fs::create_dir_all(dir)
                .with_context(|| format!("Failed to create {}", dir.display()))?;
            #[cfg(unix)]
            {
                let permissions = fs::Permissions::from_mode(0o700);
                fs::set_permissions(dir, permissions)?;
            }
        }
    }

    let content = serialize_to_huml(config);
    fs::write(path, &content).with_context(|| format!("Failed to write {}", path.display()))?;

    // Owner read/write only
    #[cfg(unix)]
    {
        let permissions = fs::Permissions::from_mode(0o600);
        fs::set_permissions(path, permissions)?;
    }

    Ok(())
}

/// Serialize config to HUML format.
///
/// huml-rs only deserializes, so the document is generated by hand.
fn serialize_to_huml(config: &CliConfig) -> String {
    let mut output = String::new();

    output.push_str("%HUML v0.2.0\n");
    output.push_str(&format!("default_profile: {}\n", quote(&config.default_profile)));
    output.push('\n');
    output.push_str("profiles::\n");

    // Sorted for deterministic output
    let mut profile_names: Vec<_> = config.profiles.keys().collect();
    profile_names.sort();

    for name in profile_names {
        let profile = &config.profiles[name];
        output.push_str(&format!("  {}::\n", name));
        output.push_str(&format!("    server: {}\n", quote(&profile.server)));
        if let Some(ref token) = profile.token {
            output.push_str(&format!("    token: {}\n", quote(token)));
        }
        if let Some(secs) = profile.timeout_secs {
            output.push_str(&format!("    timeout_secs: {}\n", secs));
        }
        output.push('\n');
    }

    output
}

fn quote(value: &str) -> String {
    format!("\"{}\"", value.replace('\\', "\\\\").replace('"', "\\\""))
}
