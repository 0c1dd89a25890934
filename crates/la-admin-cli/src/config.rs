//! CLI configuration loading and resolution.
//!
//! Supports profile-based configuration from `~/.la-admin/config.huml` with
//! priority order: CLI flags > environment variables > config file > defaults.

use anyhow::{Context, Result, bail};
use la_admin_core::http::DEFAULT_TIMEOUT;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::path::PathBuf;
use std::time::Duration;

pub const DEFAULT_SERVER: &str = "http://localhost:5000/api";

pub const CONFIG_ENV: &str = "LA_ADMIN_CONFIG";
pub const SERVER_ENV: &str = "LA_ADMIN_BACKEND_URL";
pub const TOKEN_ENV: &str = "LA_ADMIN_TOKEN";
pub const TIMEOUT_ENV: &str = "LA_ADMIN_TIMEOUT_SECS";

/// CLI configuration loaded from config.huml file.
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct CliConfig {
    /// Name of the default profile to use.
    pub default_profile: String,
    /// Map of profile name to profile configuration.
    pub profiles: HashMap<String, Profile>,
}

/// A named profile containing backend connection settings.
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct Profile {
    /// Backend API base URL (e.g., "https://api.example.gov.my/api").
    pub server: String,
    /// Optional session token used by `la-admin login`.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub token: Option<String>,
    /// Request timeout in seconds.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub timeout_secs: Option<u64>,
}

impl Profile {
    pub fn new(server: impl Into<String>) -> Self {
        Self {
            server: server.into(),
            token: None,
            timeout_secs: None,
        }
    }
}

/// Resolved configuration after applying priority rules.
#[derive(Debug, Clone)]
pub struct ResolvedConfig {
    /// Backend base URL.
    pub server: String,
    /// Token to log in with, if one was supplied.
    pub token: Option<String>,
    /// Per-request timeout.
    pub timeout: Duration,
}

impl Default for CliConfig {
    fn default() -> Self {
        let mut profiles = HashMap::new();
        profiles.insert("default".to_string(), Profile::new(DEFAULT_SERVER));
        Self {
            default_profile: "default".to_string(),
            profiles,
        }
    }
}

/// Returns the config directory path (~/.la-admin).
pub fn config_dir() -> Result<PathBuf> {
    dirs::home_dir()
        .map(|h| h.join(".la-admin"))
        .context("Could not determine home directory")
}

/// Returns the default config file path (~/.la-admin/config.huml).
pub fn default_config_path() -> Result<PathBuf> {
    Ok(config_dir()?.join("config.huml"))
}

/// Returns the config file in use, honoring `LA_ADMIN_CONFIG`.
pub fn config_path() -> Result<PathBuf> {
    match std::env::var(CONFIG_ENV) {
        Ok(p) if !p.is_empty() => Ok(PathBuf::from(p)),
        _ => default_config_path(),
    }
}

/// Returns the persisted session file path (~/.la-admin/session.json).
pub fn session_path() -> Result<PathBuf> {
    Ok(config_dir()?.join("session.json"))
}

/// Load configuration from the config file.
///
/// Returns `Ok(None)` if the config file doesn't exist.
/// Returns an error if the file exists but is invalid.
pub fn load_config() -> Result<Option<CliConfig>> {
    let path = config_path()?;

    if !path.exists() {
        return Ok(None);
    }

    let content = std::fs::read_to_string(&path)
        .with_context(|| format!("Failed to read {}", path.display()))?;

    let config: CliConfig = huml_rs::serde::from_str(&content)
        .with_context(|| format!("Invalid HUML in {}", path.display()))?;

    validate_config(&config)?;
    check_file_permissions(&path);

    Ok(Some(config))
}

/// Validate that the config has at least one profile and the default profile exists.
fn validate_config(config: &CliConfig) -> Result<()> {
    if config.profiles.is_empty() {
        bail!("Config file must contain at least one profile");
    }

    if !config.profiles.contains_key(&config.default_profile) {
        bail!(
            "Default profile '{}' not found in profiles",
            config.default_profile
        );
    }

    for (name, profile) in &config.profiles {
        if profile.server.is_empty() {
            bail!("Profile '{}' has an empty server URL", name);
        }
        if profile.timeout_secs == Some(0) {
            bail!("Profile '{}' has a zero timeout", name);
        }
    }

    Ok(())
}

/// Warn if config file has overly permissive permissions (on Unix).
#[cfg(unix)]
fn check_file_permissions(path: &std::path::Path) {
    use std::os::unix::fs::PermissionsExt;

    if let Ok(metadata) = std::fs::metadata(path) {
        let mode = metadata.permissions().mode();
        // Group or others can read the token
        if mode & 0o077 != 0 {
            tracing::warn!(
                "{} has overly permissive permissions ({:o}). Consider running: chmod 600 {}",
                path.display(),
                mode & 0o777,
                path.display()
            );
        }
    }
}

#[cfg(not(unix))]
fn check_file_permissions(_path: &std::path::Path) {}

/// Resolve configuration by applying priority rules.
///
/// Priority order (highest to lowest):
/// 1. CLI flags (`--server`, `--token`)
/// 2. Environment variables (`LA_ADMIN_BACKEND_URL`, `LA_ADMIN_TOKEN`,
///    `LA_ADMIN_TIMEOUT_SECS`)
/// 3. Config file profile
/// 4. Hardcoded defaults (`http://localhost:5000/api`, 30 seconds)
pub fn resolve_config(
    profile_flag: Option<&str>,
    server_flag: Option<&str>,
    token_flag: Option<&str>,
    file_config: Option<CliConfig>,
) -> Result<ResolvedConfig> {
    let mut server = DEFAULT_SERVER.to_string();
    let mut token: Option<String> = None;
    let mut timeout = DEFAULT_TIMEOUT;

    // Apply config file (lowest priority)
    if let Some(config) = file_config {
        let profile_name = profile_flag.unwrap_or(&config.default_profile);
        if let Some(profile) = config.profiles.get(profile_name) {
            server = profile.server.clone();
            token = profile.token.clone();
            if let Some(secs) = profile.timeout_secs {
                timeout = Duration::from_secs(secs);
            }
        } else if profile_flag.is_some() {
            bail!(
                "Profile '{}' not found. Run 'la-admin config profiles' to see available profiles.",
                profile_name
            );
        }
    } else if let Some(requested_profile) = profile_flag {
        if requested_profile != "default" {
            bail!(
                "Profile '{}' not found. No config file exists. Run 'la-admin config init' to create one.",
                requested_profile
            );
        }
    }

    // Apply environment variables (medium priority)
    if let Some(env_server) = env_value(SERVER_ENV) {
        server = env_server;
    }
    if let Some(env_token) = env_value(TOKEN_ENV) {
        token = Some(env_token);
    }
    if let Some(env_timeout) = env_value(TIMEOUT_ENV) {
        let secs: u64 = env_timeout
            .parse()
            .with_context(|| format!("{} must be a whole number of seconds", TIMEOUT_ENV))?;
        if secs == 0 {
            bail!("{} must be greater than zero", TIMEOUT_ENV);
        }
        timeout = Duration::from_secs(secs);
    }

    // Apply CLI flags (highest priority)
    if let Some(s) = server_flag {
        server = s.to_string();
    }
    if let Some(t) = token_flag {
        token = Some(t.to_string());
    }

    url::Url::parse(&server).with_context(|| format!("Invalid server URL '{}'", server))?;

    Ok(ResolvedConfig {
        server,
        token,
        timeout,
    })
}

fn env_value(name: &str) -> Option<String> {
    std::env::var(name).ok().filter(|v| !v.trim().is_empty())
}
