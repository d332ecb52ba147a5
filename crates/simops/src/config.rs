//! CLI configuration and session persistence.
//!
//! Settings come from `~/.config/simops/config.toml`, `SIMOPS_`
//! environment variables, and CLI flags, in increasing priority.
//! The session (credential + profile) survives between invocations in
//! `session.json` next to the config file.

use std::fs;
use std::path::PathBuf;

use directories::ProjectDirs;
use figment::Figment;
use figment::providers::{Env, Format, Serialized, Toml};
use serde::{Deserialize, Serialize};
use tracing::debug;
use url::Url;

use simops_api::{Scope, SessionSnapshot};

use crate::cli::GlobalOpts;
use crate::error::CliError;

const DEFAULT_BASE_URL: &str = "https://reporting.simsy.net/api/v1";

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    pub base_url: String,
    pub tenant: Option<String>,
    pub customer: Option<String>,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_BASE_URL.to_owned(),
            tenant: None,
            customer: None,
        }
    }
}

fn project_dirs() -> Result<ProjectDirs, CliError> {
    ProjectDirs::from("net", "simsy", "simops")
        .ok_or_else(|| CliError::Config("could not determine a home directory".into()))
}

pub fn config_path() -> Result<PathBuf, CliError> {
    Ok(project_dirs()?.config_dir().join("config.toml"))
}

fn session_path() -> Result<PathBuf, CliError> {
    Ok(project_dirs()?.config_dir().join("session.json"))
}

/// Load config from file + env, with defaults for anything unset.
pub fn load_config() -> Result<Config, CliError> {
    let path = config_path()?;
    Figment::from(Serialized::defaults(Config::default()))
        .merge(Toml::file(&path))
        .merge(Env::prefixed("SIMOPS_"))
        .extract()
        .map_err(|e| CliError::Config(e.to_string()))
}

/// Resolve the API base URL: flag > env > config file > default.
pub fn resolve_base_url(global: &GlobalOpts, config: &Config) -> Result<Url, CliError> {
    let raw = global.base_url.as_deref().unwrap_or(&config.base_url);
    raw.parse().map_err(|_| CliError::Validation {
        field: "base-url".into(),
        reason: format!("invalid URL: {raw}"),
    })
}

/// Resolve the tenant/customer scope: flags override the config file.
pub fn resolve_scope(global: &GlobalOpts, config: &Config) -> Scope {
    Scope {
        tenant_id: global.tenant.clone().or_else(|| config.tenant.clone()),
        customer: global.customer.clone().or_else(|| config.customer.clone()),
    }
}

// ── Session persistence ─────────────────────────────────────────────

pub fn load_session() -> Option<SessionSnapshot> {
    let path = session_path().ok()?;
    let raw = fs::read_to_string(&path).ok()?;
    match serde_json::from_str(&raw) {
        Ok(snapshot) => Some(snapshot),
        Err(e) => {
            debug!("discarding unreadable session file: {e}");
            None
        }
    }
}

pub fn save_session(snapshot: &SessionSnapshot) -> Result<(), CliError> {
    let path = session_path()?;
    if let Some(dir) = path.parent() {
        fs::create_dir_all(dir)?;
    }
    let raw = serde_json::to_string_pretty(snapshot)
        .map_err(|e| CliError::Config(e.to_string()))?;
    fs::write(&path, raw)?;
    restrict_permissions(&path);
    Ok(())
}

/// Drop the persisted session. Missing file is fine.
pub fn clear_session() {
    if let Ok(path) = session_path() {
        let _ = fs::remove_file(path);
    }
}

#[cfg(unix)]
fn restrict_permissions(path: &std::path::Path) {
    use std::os::unix::fs::PermissionsExt;
    let _ = fs::set_permissions(path, fs::Permissions::from_mode(0o600));
}

#[cfg(not(unix))]
fn restrict_permissions(_path: &std::path::Path) {}
