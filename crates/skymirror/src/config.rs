//! Settings resolution: defaults → `skymirror.toml` → `SKYMIRROR_*`
//! environment → CLI flags.

use std::path::PathBuf;
use std::time::Duration;

use directories::ProjectDirs;
use figment::{
    Figment,
    providers::{Env, Format, Serialized, Toml},
};
use serde::{Deserialize, Serialize};

use skymirror_core::MirrorConfig;

use crate::cli::GlobalOpts;
use crate::error::CliError;

// ── TOML settings ───────────────────────────────────────────────────

/// On-disk settings, mirroring [`MirrorConfig`] with plain-second
/// durations for TOML friendliness.
#[derive(Debug, Deserialize, Serialize)]
pub struct Settings {
    #[serde(default = "default_api_base")]
    pub api_base: String,

    #[serde(default = "default_depth_limit")]
    pub depth_limit: usize,

    #[serde(default = "default_refresh_interval_secs")]
    pub refresh_interval_secs: u64,

    #[serde(default = "default_escape_body")]
    pub escape_body: bool,

    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            api_base: default_api_base(),
            depth_limit: default_depth_limit(),
            refresh_interval_secs: default_refresh_interval_secs(),
            escape_body: default_escape_body(),
            timeout_secs: default_timeout_secs(),
        }
    }
}

fn default_api_base() -> String {
    skymirror_api::client::PUBLIC_APPVIEW_BASE.to_owned()
}
fn default_depth_limit() -> usize {
    skymirror_core::config::DEFAULT_DEPTH_LIMIT
}
fn default_refresh_interval_secs() -> u64 {
    skymirror_core::config::DEFAULT_REFRESH_INTERVAL.as_secs()
}
fn default_escape_body() -> bool {
    true
}
fn default_timeout_secs() -> u64 {
    skymirror_core::config::DEFAULT_TIMEOUT.as_secs()
}

// ── Settings file path ──────────────────────────────────────────────

/// Resolve the settings file path via XDG / platform conventions.
pub fn settings_path() -> PathBuf {
    ProjectDirs::from("app", "skymirror", "skymirror").map_or_else(
        || {
            let mut p = dirs_fallback();
            p.push("skymirror.toml");
            p
        },
        |dirs| dirs.config_dir().join("skymirror.toml"),
    )
}

fn dirs_fallback() -> PathBuf {
    let mut p = PathBuf::from(std::env::var("HOME").unwrap_or_else(|_| ".".into()));
    p.push(".config");
    p.push("skymirror");
    p
}

// ── Resolution ──────────────────────────────────────────────────────

/// Load file + environment settings.
pub fn load_settings() -> Result<Settings, CliError> {
    let figment = Figment::new()
        .merge(Serialized::defaults(Settings::default()))
        .merge(Toml::file(settings_path()))
        .merge(Env::prefixed("SKYMIRROR_"));

    let settings: Settings = figment.extract()?;
    Ok(settings)
}

/// Build the effective [`MirrorConfig`]: settings with CLI overrides on
/// top, then validated.
pub fn resolve_config(global: &GlobalOpts) -> Result<MirrorConfig, CliError> {
    let settings = load_settings()?;

    let mut config = MirrorConfig {
        api_base: settings.api_base,
        depth_limit: settings.depth_limit,
        refresh_interval: Duration::from_secs(settings.refresh_interval_secs),
        escape_body: settings.escape_body,
        timeout: Duration::from_secs(settings.timeout_secs),
    };

    if let Some(ref api_base) = global.api_base {
        config.api_base = api_base.clone();
    }
    if let Some(depth) = global.depth {
        config.depth_limit = depth;
    }
    if let Some(interval) = global.interval {
        config.refresh_interval = interval;
    }
    if global.raw_body {
        config.escape_body = false;
    }
    if let Some(timeout) = global.timeout {
        config.timeout = timeout;
    }

    config.validate()?;
    Ok(config)
}
